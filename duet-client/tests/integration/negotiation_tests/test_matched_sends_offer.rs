use duet_client::{CallStatus, ContextKind};
use duet_core::{RoomId, SignalMessage};

use crate::integration::init_tracing;
use crate::utils::{EngineCall, TestMachine};

#[tokio::test]
async fn test_start_requests_match() {
    init_tracing();

    let mut t = TestMachine::new();
    t.machine.start();

    assert_eq!(
        t.sent(),
        vec![SignalMessage::MatchRequest { last_room_id: None }]
    );
    assert_eq!(t.machine.status(), CallStatus::Searching);
}

#[tokio::test]
async fn test_matched_sends_offer() {
    init_tracing();

    let mut t = TestMachine::new();
    let room_id = RoomId::new();
    t.machine.start();
    t.sent();

    t.machine
        .handle_signal(SignalMessage::Matched { room_id })
        .await;

    assert_eq!(
        t.sent(),
        vec![SignalMessage::Offer {
            room_id,
            sdp: "v=0 mock-offer-0".to_string(),
        }]
    );
    assert_eq!(
        t.factory.calls(),
        vec![
            EngineCall::Created(ContextKind::Offerer),
            EngineCall::AttachLocalMedia(ContextKind::Offerer),
            EngineCall::CreateOffer(ContextKind::Offerer),
        ]
    );
    assert_eq!(t.machine.status(), CallStatus::Negotiating { room_id });
    assert!(!t.machine.has_context(ContextKind::Answerer));
}

#[tokio::test]
async fn test_engine_failure_sends_no_offer() {
    init_tracing();

    let mut t = TestMachine::new();
    t.factory.fail_create(true);
    let room_id = t.matched().await;

    assert!(t.sent().is_empty());
    assert!(!t.machine.has_context(ContextKind::Offerer));
    assert_eq!(t.machine.room_id(), Some(room_id));

    // An answer with no offering context is ignored.
    t.machine
        .handle_signal(SignalMessage::Answer {
            room_id,
            sdp: "v=0 stray".to_string(),
        })
        .await;

    assert!(t.factory.calls().is_empty());
    assert_eq!(t.machine.room_id(), Some(room_id));
}
