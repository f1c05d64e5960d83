use std::net::SocketAddr;
use std::time::Duration;

use anyhow::{Context, Result};
use futures::{SinkExt, StreamExt};
use tokio::net::{TcpListener, TcpStream};
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};

use duet_core::{SignalMessage, decode_frame, encode_frame};
use duet_server::{ServerConfig, SignalingService, health, router};

use crate::integration::init_tracing;

type Client = WebSocketStream<MaybeTlsStream<TcpStream>>;

const RECV_TIMEOUT: Duration = Duration::from_secs(5);

async fn start_server() -> Result<(SocketAddr, SignalingService)> {
    let service = SignalingService::spawn(&ServerConfig::default());
    let app = router(service.clone());

    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    Ok((addr, service))
}

async fn connect(addr: SocketAddr) -> Result<Client> {
    let (ws, _) = connect_async(format!("ws://{addr}/ws"))
        .await
        .context("Failed to connect websocket")?;
    Ok(ws)
}

async fn send(client: &mut Client, msg: &SignalMessage) -> Result<()> {
    client
        .send(Message::Text(encode_frame(msg)?.into()))
        .await
        .context("Failed to send frame")
}

async fn recv(client: &mut Client) -> Result<SignalMessage> {
    loop {
        let frame = tokio::time::timeout(RECV_TIMEOUT, client.next())
            .await
            .context("Timeout waiting for frame")?
            .context("Socket closed")??;

        if let Message::Text(text) = frame {
            return Ok(decode_frame(&text)?);
        }
    }
}

#[tokio::test]
async fn test_websocket_signaling() {
    init_tracing();

    let (addr, service) = start_server().await.expect("Server failed to start");

    let mut a = connect(addr).await.expect("Client A failed");
    let mut b = connect(addr).await.expect("Client B failed");

    send(&mut a, &SignalMessage::MatchRequest { last_room_id: None })
        .await
        .unwrap();
    // Let A reach the pool first so it becomes the waiting side.
    while service.snapshot().await.map(|s| s.waiting) != Some(1) {
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    send(&mut b, &SignalMessage::MatchRequest { last_room_id: None })
        .await
        .unwrap();

    let a_matched = recv(&mut a).await.expect("A not matched");
    let b_matched = recv(&mut b).await.expect("B not matched");
    assert_eq!(a_matched, b_matched);
    let SignalMessage::Matched { room_id } = a_matched else {
        panic!("Expected matched, got {:?}", a_matched);
    };

    // Garbage and unknown kinds are dropped without closing the socket.
    a.send(Message::Text("definitely not json".into())).await.unwrap();
    a.send(Message::Text(r#"{"type":"wave"}"#.into())).await.unwrap();

    let offer = SignalMessage::Offer {
        room_id,
        sdp: "v=0\r\ns=-\r\n".to_string(),
    };
    send(&mut a, &offer).await.unwrap();
    assert_eq!(recv(&mut b).await.unwrap(), offer);

    let report = health(axum::extract::State(service.clone())).await.0;
    assert_eq!(report.message, "Server is healthy");
    assert_eq!(report.connections, 2);
    assert_eq!(report.rooms, 1);

    a.close(None).await.unwrap();
    assert_eq!(recv(&mut b).await.unwrap(), SignalMessage::PeerDisconnected);
}
