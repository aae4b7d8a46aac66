mod engine;
mod role;
mod state;

pub use engine::NegotiationEngine;
pub use role::ConnectionRole;
pub use state::NegotiationState;
