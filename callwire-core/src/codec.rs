//! Text encoding of [`SignallingMessage`]s, one JSON object per frame.
//!
//! Frames are told apart by their fields rather than an envelope tag: a `serverUrl`
//! field marks an ICE candidate, otherwise `type` must be `"OFFER"` or `"ANSWER"`.

use crate::error::DecodeError;
use crate::model::{IceCandidate, SdpKind, SessionDescription, SignallingMessage};
use serde_json::{Map, Value, json};

const CANDIDATE_DISCRIMINATOR: &str = "serverUrl";
const TYPE_FIELD: &str = "type";

pub fn encode(message: &SignallingMessage) -> String {
    let value = match message {
        SignallingMessage::Candidate(candidate) => json!({
            CANDIDATE_DISCRIMINATOR: candidate.server_url,
            "sdpMid": candidate.sdp_mid,
            "sdpMLineIndex": candidate.sdp_m_line_index,
            "candidate": candidate.candidate,
        }),
        SignallingMessage::Offer { sdp } => json!({
            TYPE_FIELD: SdpKind::Offer.to_string(),
            "sdp": sdp,
        }),
        SignallingMessage::Answer { sdp } => json!({
            TYPE_FIELD: SdpKind::Answer.to_string(),
            "sdp": sdp,
        }),
    };

    value.to_string()
}

/// Never panics; every failure comes back as a [`DecodeError`].
pub fn decode(text: &str) -> Result<SignallingMessage, DecodeError> {
    let value: Value =
        serde_json::from_str(text).map_err(|e| DecodeError::malformed("json", e))?;

    let Value::Object(object) = value else {
        return Err(DecodeError::UnknownShape);
    };

    if object.contains_key(CANDIDATE_DISCRIMINATOR) {
        return decode_candidate(object);
    }

    match object.get(TYPE_FIELD).and_then(Value::as_str) {
        Some("OFFER") | Some("ANSWER") => decode_description(object),
        _ => Err(DecodeError::UnknownShape),
    }
}

fn decode_candidate(object: Map<String, Value>) -> Result<SignallingMessage, DecodeError> {
    let candidate: IceCandidate = serde_json::from_value(Value::Object(object))
        .map_err(|e| DecodeError::malformed("candidate", e))?;
    Ok(SignallingMessage::Candidate(candidate))
}

fn decode_description(object: Map<String, Value>) -> Result<SignallingMessage, DecodeError> {
    let desc: SessionDescription = serde_json::from_value(Value::Object(object))
        .map_err(|e| DecodeError::malformed("description", e))?;
    Ok(desc.into())
}
