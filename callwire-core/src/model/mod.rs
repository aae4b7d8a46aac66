mod candidate;
mod description;
mod message;

pub use candidate::IceCandidate;
pub use description::{SdpKind, SessionDescription};
pub use message::SignallingMessage;
