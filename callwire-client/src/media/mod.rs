mod peer_connection;
mod transport_config;

pub use peer_connection::PeerConnectionMedia;
pub use transport_config::TransportConfig;

use anyhow::Result;
use async_trait::async_trait;
use callwire_core::{IceCandidate, SessionDescription};

/// The media transport the negotiation drives. Encryption, ICE and RTP live behind it.
#[async_trait]
pub trait MediaEngine: Send + Sync + 'static {
    async fn create_offer(&self) -> Result<SessionDescription>;

    async fn create_answer(&self) -> Result<SessionDescription>;

    async fn set_local_description(&self, description: SessionDescription) -> Result<()>;

    async fn set_remote_description(&self, description: SessionDescription) -> Result<()>;

    /// Rejection of a malformed candidate is reported here, not by the negotiation.
    async fn add_ice_candidate(&self, candidate: IceCandidate) -> Result<()>;

    async fn close(&self) -> Result<()> {
        Ok(())
    }
}

/// Things a [`MediaEngine`] reports on its own schedule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MediaEvent {
    /// A local network path was discovered and should be sent to the peer.
    LocalCandidate(IceCandidate),
    RemoteStreamAdded { stream_id: String, track_id: String },
    ConnectionStateChanged(String),
}
