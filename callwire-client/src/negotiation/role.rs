use callwire_core::SdpKind;
use std::fmt;

/// Which side of the call this endpoint plays. Fixed for the lifetime of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConnectionRole {
    Caller,
    Callee,
}

impl ConnectionRole {
    /// Kind of the description this role produces locally.
    pub fn local_kind(self) -> SdpKind {
        match self {
            ConnectionRole::Caller => SdpKind::Offer,
            ConnectionRole::Callee => SdpKind::Answer,
        }
    }

    /// Kind of the description this role accepts from the peer.
    pub fn remote_kind(self) -> SdpKind {
        match self {
            ConnectionRole::Caller => SdpKind::Answer,
            ConnectionRole::Callee => SdpKind::Offer,
        }
    }
}

impl fmt::Display for ConnectionRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConnectionRole::Caller => f.write_str("caller"),
            ConnectionRole::Callee => f.write_str("callee"),
        }
    }
}
