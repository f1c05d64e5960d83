use crate::ClientError;
use duet_core::{FrameError, SignalMessage, decode_frame, encode_frame};
use futures::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, error, info, warn};

/// Open websocket to the signaling server, split into typed channels.
///
/// `outbound` is handed to the session as its sink; `inbound` yields the
/// server frames a client is expected to receive, and closes with the socket.
pub struct SignalingConnection {
    pub outbound: mpsc::UnboundedSender<SignalMessage>,
    pub inbound: mpsc::UnboundedReceiver<SignalMessage>,
    writer: JoinHandle<()>,
    reader: JoinHandle<()>,
}

impl SignalingConnection {
    pub fn abort(&self) {
        self.writer.abort();
        self.reader.abort();
    }
}

pub async fn connect(url: &str) -> Result<SignalingConnection, ClientError> {
    let (socket, _) = connect_async(url).await?;
    info!("Connected to signaling server at {}", url);

    let (mut sink, mut stream) = socket.split();
    let (outbound_tx, mut outbound_rx) = mpsc::unbounded_channel::<SignalMessage>();
    let (inbound_tx, inbound_rx) = mpsc::unbounded_channel();

    let writer = tokio::spawn(async move {
        while let Some(msg) = outbound_rx.recv().await {
            let text = match encode_frame(&msg) {
                Ok(text) => text,
                Err(e) => {
                    error!("Failed to serialize '{}': {}", msg.kind(), e);
                    continue;
                }
            };

            if let Err(e) = sink.send(Message::Text(text.into())).await {
                warn!("Signaling socket write failed: {}", e);
                break;
            }
        }

        let _ = sink.close().await;
    });

    let reader = tokio::spawn(async move {
        while let Some(frame) = stream.next().await {
            let msg = match frame {
                Ok(msg) => msg,
                Err(e) => {
                    warn!("Signaling socket error: {}", e);
                    break;
                }
            };

            match msg {
                Message::Text(text) => match decode_frame(&text) {
                    Ok(signal) if signal.accepted_by_client() => {
                        if inbound_tx.send(signal).is_err() {
                            break;
                        }
                    }
                    Ok(signal) => warn!("Unexpected '{}' from server", signal.kind()),
                    Err(FrameError::UnknownKind(kind)) => {
                        info!("Unknown message kind '{}' from server", kind)
                    }
                    Err(e) => warn!("Invalid frame from server: {}", e),
                },
                Message::Close(_) => break,
                _ => {}
            }
        }

        debug!("Signaling reader finished");
    });

    Ok(SignalingConnection {
        outbound: outbound_tx,
        inbound: inbound_rx,
        writer,
        reader,
    })
}
