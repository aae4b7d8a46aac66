use std::net::SocketAddr;

pub const DEFAULT_PATH: &str = "/connect";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelayConfig {
    /// Address the HTTP listener binds to.
    pub bind: SocketAddr,
    /// Route that upgrades to WebSocket.
    pub path: String,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from(([0, 0, 0, 0], 8080)),
            path: DEFAULT_PATH.to_string(),
        }
    }
}
