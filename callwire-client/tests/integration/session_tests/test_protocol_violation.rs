use callwire_client::{
    ConnectionRole, NegotiationError, NegotiationState, SdpKind, SessionError, SignallingMessage,
};

use super::start_session_with_relay;
use crate::integration::init_tracing;

#[tokio::test]
async fn test_callee_receiving_answer_fails_the_call() {
    init_tracing();

    let (session, _media, relay) = start_session_with_relay(ConnectionRole::Callee, "bob");

    relay.deliver_message(&SignallingMessage::Answer {
        sdp: "v=0 stray".to_string(),
    });

    let result = tokio::time::timeout(std::time::Duration::from_secs(5), session.join())
        .await
        .expect("Session should end on a contract violation");

    assert_eq!(
        result,
        Err(SessionError::Negotiation(
            NegotiationError::UnexpectedDescriptionKind {
                expected: SdpKind::Offer,
                actual: SdpKind::Answer,
            }
        ))
    );
}

#[tokio::test]
async fn test_second_offer_is_already_set() {
    init_tracing();

    let (session, media, mut relay) = start_session_with_relay(ConnectionRole::Callee, "bob");
    let state = session.state();

    relay.deliver_message(&SignallingMessage::Offer {
        sdp: "v=0 first".to_string(),
    });
    relay.deliver_message(&SignallingMessage::Offer {
        sdp: "v=0 second".to_string(),
    });

    // The first offer is fully answered before the second one is looked at.
    assert_eq!(
        relay.next_message(5000).await,
        Some(SignallingMessage::Answer {
            sdp: media.answer_sdp()
        })
    );

    let result = tokio::time::timeout(std::time::Duration::from_secs(5), session.join())
        .await
        .expect("Session should end");
    assert_eq!(
        result,
        Err(SessionError::Negotiation(NegotiationError::AlreadySet("remote")))
    );
    assert_eq!(*state.borrow(), NegotiationState::Stable);
}

#[tokio::test]
async fn test_callee_pressing_call_is_invalid_phase() {
    init_tracing();

    let (session, _media, _relay) = start_session_with_relay(ConnectionRole::Callee, "bob");

    session.call().await.unwrap();
    let result = tokio::time::timeout(std::time::Duration::from_secs(5), session.join())
        .await
        .expect("Session should end");

    assert!(matches!(
        result,
        Err(SessionError::Negotiation(NegotiationError::InvalidPhase {
            state: NegotiationState::Idle,
            ..
        }))
    ));
}
