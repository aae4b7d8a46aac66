use callwire_client::{
    ConnectionRole, IceCandidate, NegotiationState, SessionDescription, SessionError,
    SessionNotice, TransportError,
};

use super::{start_session, wait_for_notice, wait_for_state};
use crate::integration::init_tracing;
use crate::utils::{MediaCall, memory_link};

#[tokio::test]
async fn test_caller_and_callee_reach_stable() {
    init_tracing();

    let ((caller_tx, caller_rx), (callee_tx, callee_rx)) = memory_link();
    let (mut caller, caller_media) =
        start_session(ConnectionRole::Caller, caller_tx, caller_rx, "alice");
    let (mut callee, callee_media) =
        start_session(ConnectionRole::Callee, callee_tx, callee_rx, "bob");

    assert!(wait_for_notice(&mut caller, |n| *n == SessionNotice::Established).await.is_some());
    assert!(wait_for_notice(&mut callee, |n| *n == SessionNotice::Established).await.is_some());

    caller.call().await.expect("Failed to place call");

    assert!(wait_for_state(&caller, NegotiationState::Stable).await);
    assert!(wait_for_state(&callee, NegotiationState::Stable).await);
    assert!(wait_for_notice(&mut caller, |n| *n == SessionNotice::Stable).await.is_some());
    assert!(wait_for_notice(&mut callee, |n| *n == SessionNotice::Stable).await.is_some());

    let offer = SessionDescription::offer(caller_media.offer_sdp());
    let answer = SessionDescription::answer(callee_media.answer_sdp());

    assert_eq!(
        caller_media.calls().await,
        vec![
            MediaCall::CreateOffer,
            MediaCall::SetLocal(offer.clone()),
            MediaCall::SetRemote(answer.clone()),
        ]
    );
    assert_eq!(
        callee_media.calls().await,
        vec![
            MediaCall::SetRemote(offer),
            MediaCall::CreateAnswer,
            MediaCall::SetLocal(answer),
        ]
    );

    caller.hang_up().await.expect("Caller should end cleanly");
    assert_eq!(caller_media.calls().await.last(), Some(&MediaCall::Close));

    // The link dies with the caller's connection, which the callee sees as a lost relay.
    assert!(matches!(
        callee.join().await,
        Err(SessionError::Transport(TransportError::ConnectionLost(_)))
    ));
}

#[tokio::test]
async fn test_local_candidates_travel_to_the_peer() {
    init_tracing();

    let ((caller_tx, caller_rx), (callee_tx, callee_rx)) = memory_link();
    let (caller, caller_media) =
        start_session(ConnectionRole::Caller, caller_tx, caller_rx, "alice");
    let (callee, callee_media) =
        start_session(ConnectionRole::Callee, callee_tx, callee_rx, "bob");

    caller.call().await.unwrap();
    assert!(wait_for_state(&callee, NegotiationState::Stable).await);

    let from_callee = IceCandidate::new("0", 0, "candidate:1 1 udp 2122260223 10.0.0.7 51000 typ host");
    let from_caller = IceCandidate::new("0", 0, "candidate:2 1 udp 1686052607 1.2.3.4 40000 typ srflx")
        .with_server_url("stun:stun.l.google.com:19302");

    callee_media.discover_local_candidate(from_callee.clone()).await;
    caller_media.discover_local_candidate(from_caller.clone()).await;

    assert!(caller_media.wait_for_calls(4, 5000).await);
    assert!(callee_media.wait_for_calls(4, 5000).await);
    assert_eq!(caller_media.remote_candidates().await, vec![from_callee]);
    assert_eq!(callee_media.remote_candidates().await, vec![from_caller]);

    caller.hang_up().await.unwrap();
    let _ = callee.join().await;
}
