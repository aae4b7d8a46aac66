use std::time::Duration;

use callwire_client::{SignallingChannel, SignallingMessage, TransportError};

use crate::integration::{create_test_channel, init_tracing};
use crate::utils::{ListenerEvent, RecordingListener};

#[tokio::test]
async fn test_destroy_stops_loops_and_is_idempotent() {
    init_tracing();

    let listener = RecordingListener::new();
    let (mut channel, mut relay) = create_test_channel(listener.clone());
    assert!(listener.wait_for_events(1, 2000).await);

    channel.destroy().await;
    channel.destroy().await;

    assert!(channel.is_terminated());
    assert!(relay.client_closed(1000).await, "write half should be released");

    let err = channel
        .send(SignallingMessage::Answer {
            sdp: "v=0".to_string(),
        })
        .unwrap_err();
    assert!(matches!(err, TransportError::SendFailed(_)));

    // Nothing reaches the listener after destroy, not even an error.
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(listener.events().await, vec![ListenerEvent::Established]);
}

#[tokio::test]
async fn test_destroy_before_handshake_completes() {
    init_tracing();

    let listener = RecordingListener::new();
    let mut channel = SignallingChannel::with_transport(
        std::future::pending::<
            Result<(crate::utils::MemorySender, crate::utils::MemoryReceiver), TransportError>,
        >(),
        listener.clone(),
    );

    tokio::time::timeout(Duration::from_secs(1), channel.destroy())
        .await
        .expect("destroy must not hang on a pending handshake");

    assert!(!channel.is_established());
    assert!(listener.events().await.is_empty());
}
