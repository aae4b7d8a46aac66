mod error;
pub mod media;
pub mod negotiation;
pub mod session;
pub mod signalling;

pub use error::{NegotiationError, SessionError, TransportError};
pub use media::{MediaEngine, MediaEvent, PeerConnectionMedia, TransportConfig};
pub use negotiation::{ConnectionRole, NegotiationEngine, NegotiationState};
pub use session::{Session, SessionNotice};
pub use signalling::{ChannelConfig, FrameReceiver, FrameSender, SignallingChannel, SignallingListener};

pub use callwire_core::{IceCandidate, SdpKind, SessionDescription, SignallingMessage};
