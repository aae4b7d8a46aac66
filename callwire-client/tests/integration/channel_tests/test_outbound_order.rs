use std::time::Duration;

use callwire_client::{IceCandidate, SignallingChannel, SignallingMessage};

use crate::integration::init_tracing;
use crate::utils::{RecordingListener, memory_transport};

fn mixed_messages(count: u16) -> Vec<SignallingMessage> {
    (0..count)
        .map(|i| match i % 3 {
            0 => SignallingMessage::Candidate(IceCandidate::new("0", i, format!("candidate:{}", i))),
            1 => SignallingMessage::Offer {
                sdp: format!("v=0 offer {}", i),
            },
            _ => SignallingMessage::Answer {
                sdp: format!("v=0 answer {}", i),
            },
        })
        .collect()
}

#[tokio::test]
async fn test_outbound_messages_keep_submission_order() {
    init_tracing();

    let (sender, receiver, mut relay) = memory_transport();
    let listener = RecordingListener::new();

    // The handshake finishes only after the first half has been queued.
    let connect = async move {
        tokio::time::sleep(Duration::from_millis(50)).await;
        Ok((sender, receiver))
    };
    let channel = SignallingChannel::with_transport(connect, listener.clone());

    let messages = mixed_messages(60);
    for message in &messages[..30] {
        channel.send(message.clone()).expect("Failed to queue");
    }
    assert!(listener.wait_for_events(1, 2000).await);
    for message in &messages[30..] {
        channel.send(message.clone()).expect("Failed to queue");
    }

    let mut received = Vec::new();
    while let Some(message) = relay.next_message(500).await {
        received.push(message);
        if received.len() == messages.len() {
            break;
        }
    }

    assert_eq!(received, messages);
}

#[tokio::test]
async fn test_outbound_flows_while_inbound_is_busy() {
    init_tracing();

    let listener = RecordingListener::new();
    let (channel, mut relay) = crate::integration::create_test_channel(listener.clone());

    for i in 0..200u16 {
        relay.deliver_message(&SignallingMessage::Candidate(IceCandidate::new(
            "0",
            i,
            "candidate:x",
        )));
    }
    channel
        .send(SignallingMessage::Answer {
            sdp: "v=0".to_string(),
        })
        .unwrap();

    assert_eq!(
        relay.next_message(1000).await,
        Some(SignallingMessage::Answer {
            sdp: "v=0".to_string()
        })
    );
    assert!(listener.wait_for_events(201, 5000).await);
}
