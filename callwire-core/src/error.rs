use thiserror::Error;

/// Why an inbound frame could not be turned into a [`crate::SignallingMessage`].
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("frame matches no known message shape")]
    UnknownShape,

    #[error("malformed {shape} payload: {reason}")]
    MalformedPayload {
        shape: &'static str,
        reason: String,
    },
}

impl DecodeError {
    pub(crate) fn malformed(shape: &'static str, err: serde_json::Error) -> Self {
        DecodeError::MalformedPayload {
            shape,
            reason: err.to_string(),
        }
    }
}
