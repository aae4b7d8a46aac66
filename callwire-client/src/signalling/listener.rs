use crate::error::TransportError;
use async_trait::async_trait;
use callwire_core::{IceCandidate, SessionDescription};
use tracing::{debug, info, warn};

/// Receives what the signalling channel decodes, in arrival order.
///
/// Every method has a logging default, so implementors only override the events
/// they care about.
#[async_trait]
pub trait SignallingListener: Send + Sync + 'static {
    /// Called once, before any inbound message is delivered.
    async fn on_connection_established(&self) {
        info!("Signalling connection established");
    }

    async fn on_offer_received(&self, description: SessionDescription) {
        debug!("Unhandled offer ({} bytes)", description.sdp().len());
    }

    async fn on_answer_received(&self, description: SessionDescription) {
        debug!("Unhandled answer ({} bytes)", description.sdp().len());
    }

    async fn on_ice_candidate_received(&self, candidate: IceCandidate) {
        debug!("Unhandled ICE candidate: {}", candidate.candidate);
    }

    /// Called at most once; the channel is dead afterwards.
    async fn on_transport_error(&self, error: TransportError) {
        warn!("Signalling transport failed: {}", error);
    }
}
