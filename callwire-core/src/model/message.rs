use crate::model::{IceCandidate, SdpKind, SessionDescription};

/// Everything that travels over the signalling relay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignallingMessage {
    Candidate(IceCandidate),
    Offer { sdp: String },
    Answer { sdp: String },
}

impl SignallingMessage {
    /// The description carried by an offer or answer frame.
    pub fn description(&self) -> Option<SessionDescription> {
        match self {
            SignallingMessage::Offer { sdp } => Some(SessionDescription::offer(sdp.clone())),
            SignallingMessage::Answer { sdp } => Some(SessionDescription::answer(sdp.clone())),
            SignallingMessage::Candidate(_) => None,
        }
    }

    /// Short label for logs.
    pub fn label(&self) -> &'static str {
        match self {
            SignallingMessage::Candidate(_) => "CANDIDATE",
            SignallingMessage::Offer { .. } => "OFFER",
            SignallingMessage::Answer { .. } => "ANSWER",
        }
    }
}

impl From<SessionDescription> for SignallingMessage {
    fn from(desc: SessionDescription) -> Self {
        match desc.kind() {
            SdpKind::Offer => SignallingMessage::Offer {
                sdp: desc.into_sdp(),
            },
            SdpKind::Answer => SignallingMessage::Answer {
                sdp: desc.into_sdp(),
            },
        }
    }
}

impl From<IceCandidate> for SignallingMessage {
    fn from(candidate: IceCandidate) -> Self {
        SignallingMessage::Candidate(candidate)
    }
}
