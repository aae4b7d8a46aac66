pub mod codec;
mod error;
pub mod model;

pub use codec::{decode, encode};
pub use error::DecodeError;
pub use model::{IceCandidate, SdpKind, SessionDescription, SignallingMessage};
