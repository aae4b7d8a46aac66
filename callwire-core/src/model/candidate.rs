use serde::{Deserialize, Deserializer, Serialize};

/// A network path proposed by one peer. The negotiation logic only routes it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IceCandidate {
    /// STUN/TURN server the candidate was gathered from; empty for host candidates.
    /// Its presence on the wire is what marks a frame as a candidate. `null` reads as empty.
    #[serde(deserialize_with = "null_as_empty")]
    pub server_url: String,
    pub sdp_mid: String,
    #[serde(rename = "sdpMLineIndex")]
    pub sdp_m_line_index: u16,
    #[serde(alias = "sdp")]
    pub candidate: String,
}

impl IceCandidate {
    pub fn new(
        sdp_mid: impl Into<String>,
        sdp_m_line_index: u16,
        candidate: impl Into<String>,
    ) -> Self {
        Self {
            server_url: String::new(),
            sdp_mid: sdp_mid.into(),
            sdp_m_line_index,
            candidate: candidate.into(),
        }
    }

    pub fn with_server_url(mut self, server_url: impl Into<String>) -> Self {
        self.server_url = server_url.into();
        self
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}
