use callwire_client::{
    ConnectionRole, IceCandidate, NegotiationEngine, NegotiationState, SessionDescription,
};

use crate::integration::init_tracing;
use crate::utils::{MediaCall, RecordingMedia};

/// Description steps for one role, in the only order the state machine accepts.
enum Step {
    Create,
    Commit,
    ApplyRemote,
}

fn steps(role: ConnectionRole) -> Vec<Step> {
    match role {
        ConnectionRole::Caller => vec![Step::Create, Step::Commit, Step::ApplyRemote],
        ConnectionRole::Callee => vec![Step::ApplyRemote, Step::Create, Step::Commit],
    }
}

async fn run_step(
    engine: &mut NegotiationEngine,
    step: &Step,
    created: &mut Option<SessionDescription>,
) {
    match step {
        Step::Create => {
            *created = Some(engine.create_initial_description().await.unwrap());
        }
        Step::Commit => {
            let local = created.take().expect("Commit runs after Create");
            engine.set_local_description(local).await.unwrap();
        }
        Step::ApplyRemote => {
            let remote = match engine.role() {
                ConnectionRole::Caller => SessionDescription::answer("v=0 remote answer"),
                ConnectionRole::Callee => SessionDescription::offer("v=0 remote offer"),
            };
            engine.apply_remote_description(remote).await.unwrap();
        }
    }
}

/// Interleaves `total` candidates with the description steps at positions chosen by a
/// small linear congruential generator, and checks they all arrive once, in order.
async fn check_interleaving(role: ConnectionRole, total: u16, seed: u32) {
    let (media, _events) = RecordingMedia::new("durability");
    let mut engine = NegotiationEngine::new(role, media.clone());

    let mut state = seed;
    let mut next = || {
        state = state.wrapping_mul(1_103_515_245).wrapping_add(12_345);
        (state >> 16) % 4
    };

    let mut pending_steps = steps(role).into_iter();
    let mut created = None;
    let mut sent = Vec::new();
    for i in 0..total {
        if next() == 0 {
            if let Some(step) = pending_steps.next() {
                run_step(&mut engine, &step, &mut created).await;
            }
        }
        let candidate = IceCandidate::new("0", 0, format!("candidate:{}:{}", seed, i));
        engine.add_remote_candidate(candidate.clone()).await.unwrap();
        sent.push(candidate);
    }
    for step in pending_steps {
        run_step(&mut engine, &step, &mut created).await;
    }

    assert_eq!(engine.state(), NegotiationState::Stable);
    assert_eq!(media.remote_candidates().await, sent);
    assert_eq!(engine.candidates_forwarded(), total as u64);
}

#[tokio::test]
async fn test_every_candidate_reaches_media_once_in_order() {
    init_tracing();

    for seed in [1, 7, 42, 1234, 99_991] {
        check_interleaving(ConnectionRole::Caller, 25, seed).await;
        check_interleaving(ConnectionRole::Callee, 25, seed).await;
    }
}

#[tokio::test]
async fn test_rejected_candidates_do_not_touch_negotiation() {
    init_tracing();

    let (media, _events) = RecordingMedia::rejecting_candidates("picky");
    let mut engine = NegotiationEngine::new(ConnectionRole::Callee, media.clone());

    assert!(
        engine
            .add_remote_candidate(IceCandidate::new("0", 0, "candidate:bad"))
            .await
            .is_err()
    );
    assert_eq!(engine.state(), NegotiationState::Idle);

    engine
        .apply_remote_description(SessionDescription::offer("v=0"))
        .await
        .expect("Rejected candidates must not poison the state machine");
    assert_eq!(engine.state(), NegotiationState::RemoteOfferReceived);

    assert!(matches!(
        media.calls().await.as_slice(),
        [MediaCall::AddCandidate(_), MediaCall::SetRemote(_)]
    ));
}
