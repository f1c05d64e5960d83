use crate::model::SignalMessage;
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FrameError {
    #[error("malformed frame: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("frame has no \"type\" field")]
    MissingKind,

    #[error("unknown message kind '{0}'")]
    UnknownKind(String),
}

/// Parse one text frame into a [`SignalMessage`].
///
/// Unknown kinds are reported separately from broken frames so callers can
/// log them at a different level; both are meant to be dropped.
pub fn decode_frame(text: &str) -> Result<SignalMessage, FrameError> {
    let value: Value = serde_json::from_str(text)?;

    let kind = value
        .get("type")
        .and_then(Value::as_str)
        .ok_or(FrameError::MissingKind)?;

    if !SignalMessage::KINDS.contains(&kind) {
        return Err(FrameError::UnknownKind(kind.to_owned()));
    }

    Ok(serde_json::from_value(value)?)
}

pub fn encode_frame(msg: &SignalMessage) -> Result<String, FrameError> {
    Ok(serde_json::to_string(msg)?)
}
