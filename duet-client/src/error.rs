use duet_core::FrameError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("WebRTC engine error: {0}")]
    Engine(#[from] webrtc::Error),

    #[error("Websocket error: {0}")]
    WebSocket(#[from] tokio_tungstenite::tungstenite::Error),

    #[error(transparent)]
    Frame(#[from] FrameError),

    #[error("Session channel closed")]
    ChannelClosed,

    #[error("Negotiation failed: {0}")]
    Negotiation(String),
}
