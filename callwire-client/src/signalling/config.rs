/// Where the rendezvous relay lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelConfig {
    pub host: String,
    pub port: u16,
    pub path: String,
}

impl ChannelConfig {
    pub fn url(&self) -> String {
        let path = self.path.trim_start_matches('/');
        format!("ws://{}:{}/{}", self.host, self.port, path)
    }
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_owned(),
            port: 8080,
            path: "/connect".to_owned(),
        }
    }
}
