use std::sync::Arc;
use std::time::Duration;

use duet_client::{NegotiationMachine, StampedEvent};
use duet_core::{ConnectionRole, IceCandidate, RoomId, SignalMessage};
use tokio::sync::mpsc;

use crate::utils::MockFactory;

pub struct TestMachine {
    pub machine: NegotiationMachine,
    pub factory: MockFactory,
    pub sent_rx: mpsc::UnboundedReceiver<SignalMessage>,
    pub events_rx: mpsc::UnboundedReceiver<StampedEvent>,
}

impl TestMachine {
    pub fn new() -> Self {
        let factory = MockFactory::new();
        let (sent_tx, sent_rx) = mpsc::unbounded_channel();
        let (machine, events_rx) = NegotiationMachine::new(Arc::new(factory.clone()), Arc::new(sent_tx));

        Self {
            machine,
            factory,
            sent_rx,
            events_rx,
        }
    }

    /// Everything the machine sent since the last call.
    pub fn sent(&mut self) -> Vec<SignalMessage> {
        let mut out = Vec::new();
        while let Ok(msg) = self.sent_rx.try_recv() {
            out.push(msg);
        }
        out
    }

    /// Feed queued context events back into the machine.
    pub async fn pump_events(&mut self) {
        while let Ok(event) = self.events_rx.try_recv() {
            self.machine.handle_event(event).await;
        }
    }

    /// Start, get matched into a fresh room and discard the frames sent so far.
    pub async fn matched(&mut self) -> RoomId {
        let room_id = RoomId::new();
        self.machine.start();
        self.machine
            .handle_signal(SignalMessage::Matched { room_id })
            .await;
        self.sent();
        room_id
    }
}

pub fn candidate(n: u16) -> IceCandidate {
    IceCandidate {
        candidate: format!("candidate:{n} 1 udp 2122260223 192.168.1.{n} 5000{n} typ host"),
        sdp_mid: Some("0".to_string()),
        sdp_m_line_index: Some(0),
        username_fragment: None,
    }
}

pub fn remote_candidate(room_id: RoomId, n: u16, role: ConnectionRole) -> SignalMessage {
    SignalMessage::Candidate {
        room_id,
        candidate: candidate(n),
        connection_type: role,
    }
}

/// Poll `check` until it holds or a few seconds pass.
pub async fn eventually<F>(mut check: F) -> bool
where
    F: FnMut() -> bool,
{
    for _ in 0..100 {
        if check() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
    check()
}
