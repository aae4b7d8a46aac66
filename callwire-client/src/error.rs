use crate::negotiation::NegotiationState;
use callwire_core::SdpKind;
use thiserror::Error;

/// Protocol-contract violations of the negotiation state machine. Fatal to the call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NegotiationError {
    #[error("{operation} is not allowed in state {state:?}")]
    InvalidPhase {
        operation: &'static str,
        state: NegotiationState,
    },

    #[error("{0} description is already set")]
    AlreadySet(&'static str),

    #[error("expected {expected} description, got {actual}")]
    UnexpectedDescriptionKind { expected: SdpKind, actual: SdpKind },

    #[error("local {0} is not the one just created")]
    LocalMismatch(SdpKind),

    #[error("media engine failed: {0}")]
    Media(String),
}

impl NegotiationError {
    pub(crate) fn media(err: anyhow::Error) -> Self {
        NegotiationError::Media(format!("{:#}", err))
    }
}

/// Failures of the relay connection. Any of these ends the signalling channel.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    #[error("failed to connect to relay: {0}")]
    ConnectFailed(String),

    #[error("failed to send frame: {0}")]
    SendFailed(String),

    #[error("connection to relay lost: {0}")]
    ConnectionLost(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error(transparent)]
    Negotiation(#[from] NegotiationError),

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error("session has already ended")]
    Closed,
}
