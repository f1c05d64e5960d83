use std::sync::Arc;
use std::time::Duration;

use duet_client::{CallStatus, ClientSession, ContextKind};
use duet_core::{RoomId, SignalMessage};
use tokio::sync::mpsc;

use crate::integration::init_tracing;
use crate::utils::{EngineCall, MockFactory};

const JOIN_TIMEOUT: Duration = Duration::from_secs(5);

#[tokio::test]
async fn test_hang_up_closes_contexts() {
    init_tracing();

    let factory = MockFactory::new();
    let (inbound_tx, inbound_rx) = mpsc::unbounded_channel();
    let (sent_tx, mut sent_rx) = mpsc::unbounded_channel::<SignalMessage>();
    let (session, handle) =
        ClientSession::new(Arc::new(factory.clone()), Arc::new(sent_tx), inbound_rx);
    let task = tokio::spawn(session.run());

    assert_eq!(
        sent_rx.recv().await,
        Some(SignalMessage::MatchRequest { last_room_id: None })
    );

    let room_id = RoomId::new();
    inbound_tx
        .send(SignalMessage::Matched { room_id })
        .unwrap();

    let mut status = handle.watch_status();
    status
        .wait_for(|s| *s == CallStatus::Negotiating { room_id })
        .await
        .unwrap();
    assert!(matches!(
        sent_rx.recv().await,
        Some(SignalMessage::Offer { .. })
    ));

    handle.hang_up().unwrap();
    tokio::time::timeout(JOIN_TIMEOUT, task)
        .await
        .expect("session did not stop")
        .unwrap();

    assert_eq!(handle.status(), CallStatus::Idle);
    assert!(
        factory
            .calls()
            .contains(&EngineCall::Close(ContextKind::Offerer))
    );
    assert!(handle.skip().is_err());
}

#[tokio::test]
async fn test_skip_command_rematches() {
    init_tracing();

    let factory = MockFactory::new();
    let (inbound_tx, inbound_rx) = mpsc::unbounded_channel();
    let (sent_tx, mut sent_rx) = mpsc::unbounded_channel::<SignalMessage>();
    let (session, handle) =
        ClientSession::new(Arc::new(factory.clone()), Arc::new(sent_tx), inbound_rx);
    tokio::spawn(session.run());

    let room_id = RoomId::new();
    inbound_tx
        .send(SignalMessage::Matched { room_id })
        .unwrap();
    handle
        .watch_status()
        .wait_for(|s| s.room_id() == Some(room_id))
        .await
        .unwrap();

    handle.skip().unwrap();
    handle
        .watch_status()
        .wait_for(|s| *s == CallStatus::Searching)
        .await
        .unwrap();

    let mut sent = Vec::new();
    while let Ok(msg) = sent_rx.try_recv() {
        sent.push(msg);
    }
    let tail = &sent[sent.len() - 2..];
    assert_eq!(
        tail,
        &[
            SignalMessage::SkipPeer { room_id },
            SignalMessage::MatchRequest {
                last_room_id: Some(room_id)
            },
        ]
    );
}

#[tokio::test]
async fn test_session_ends_with_signaling_channel() {
    init_tracing();

    let (inbound_tx, inbound_rx) = mpsc::unbounded_channel();
    let (sent_tx, _sent_rx) = mpsc::unbounded_channel::<SignalMessage>();
    let (session, handle) =
        ClientSession::new(Arc::new(MockFactory::new()), Arc::new(sent_tx), inbound_rx);
    let task = tokio::spawn(session.run());

    drop(inbound_tx);

    tokio::time::timeout(JOIN_TIMEOUT, task)
        .await
        .expect("session did not stop")
        .unwrap();
    assert_eq!(handle.status(), CallStatus::Idle);
}
