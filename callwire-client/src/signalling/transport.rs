use crate::error::TransportError;
use async_trait::async_trait;

/// Write half of a text-frame connection to the relay.
#[async_trait]
pub trait FrameSender: Send + 'static {
    async fn send_frame(&mut self, text: String) -> Result<(), TransportError>;

    /// Best-effort close handshake.
    async fn close(&mut self) {}
}

/// Read half of a text-frame connection to the relay.
#[async_trait]
pub trait FrameReceiver: Send + 'static {
    /// `None` once the peer closed the connection cleanly.
    async fn recv_frame(&mut self) -> Option<Result<String, TransportError>>;
}
