mod config;
mod peer;
mod relay;
mod server;

pub use config::RelayConfig;
pub use peer::PeerId;
pub use relay::{RelayService, ws_handler};
pub use server::{router, serve, serve_listener};
