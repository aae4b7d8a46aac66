use crate::error::{SessionError, TransportError};
use crate::signalling::SignallingListener;
use async_trait::async_trait;
use callwire_core::{IceCandidate, SessionDescription};
use tokio::sync::mpsc;
use tracing::warn;

/// Requests from the application to the coordinator.
#[derive(Debug)]
pub(crate) enum SessionCommand {
    Call,
    HangUp,
}

/// What the coordinator reports upward (to a UI, a CLI, a test).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionNotice {
    /// The relay connection is up; calling is now possible.
    Established,
    /// Both descriptions are committed; media can flow.
    Stable,
    RemoteStreamAdded { stream_id: String, track_id: String },
    MediaState(String),
    /// The session is over. `None` means a clean hang-up.
    Ended(Option<SessionError>),
}

/// Inbound signalling, queued for the coordinator in arrival order.
#[derive(Debug)]
pub(crate) enum SignalEvent {
    Established,
    Offer(SessionDescription),
    Answer(SessionDescription),
    Candidate(IceCandidate),
    TransportFailed(TransportError),
}

/// The coordinator's listener: pushes every callback onto its event queue so all
/// negotiation work happens on the coordinator task, one event at a time.
pub(crate) struct SessionEvents {
    tx: mpsc::UnboundedSender<SignalEvent>,
}

impl SessionEvents {
    pub(crate) fn new(tx: mpsc::UnboundedSender<SignalEvent>) -> Self {
        Self { tx }
    }

    fn forward(&self, event: SignalEvent) {
        if let Err(e) = self.tx.send(event) {
            warn!("Session already finished, dropping {:?}", e.0);
        }
    }
}

#[async_trait]
impl SignallingListener for SessionEvents {
    async fn on_connection_established(&self) {
        self.forward(SignalEvent::Established);
    }

    async fn on_offer_received(&self, description: SessionDescription) {
        self.forward(SignalEvent::Offer(description));
    }

    async fn on_answer_received(&self, description: SessionDescription) {
        self.forward(SignalEvent::Answer(description));
    }

    async fn on_ice_candidate_received(&self, candidate: IceCandidate) {
        self.forward(SignalEvent::Candidate(candidate));
    }

    async fn on_transport_error(&self, error: TransportError) {
        self.forward(SignalEvent::TransportFailed(error));
    }
}
