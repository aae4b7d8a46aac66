use callwire_client::{SessionDescription, SignallingMessage};

use crate::integration::{create_test_channel, init_tracing};
use crate::utils::{ListenerEvent, RecordingListener};

#[tokio::test]
async fn test_undecodable_frames_are_dropped_and_channel_keeps_running() {
    init_tracing();

    let listener = RecordingListener::new();
    let (channel, mut relay) = create_test_channel(listener.clone());

    relay.deliver("{}");
    relay.deliver("not json at all");
    relay.deliver(r#"{"type":"PRANSWER","sdp":"v=0"}"#);
    relay.deliver(r#"{"serverUrl":"","sdpMid":"0"}"#);
    relay.deliver_message(&SignallingMessage::Answer {
        sdp: "v=0 valid".to_string(),
    });

    assert!(listener.wait_for_events(2, 2000).await);
    // Give any stray delivery a chance to show up.
    tokio::time::sleep(std::time::Duration::from_millis(50)).await;

    assert_eq!(
        listener.events().await,
        vec![
            ListenerEvent::Established,
            ListenerEvent::Answer(SessionDescription::answer("v=0 valid")),
        ]
    );
    assert!(!channel.is_terminated());

    channel
        .send(SignallingMessage::Offer {
            sdp: "v=0 still alive".to_string(),
        })
        .expect("Channel should still accept messages");
    assert_eq!(
        relay.next_message(1000).await,
        Some(SignallingMessage::Offer {
            sdp: "v=0 still alive".to_string()
        })
    );
}
