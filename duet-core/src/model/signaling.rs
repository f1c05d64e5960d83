use crate::model::room::RoomId;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IceServerConfig {
    pub urls: Vec<String>,
    pub username: Option<String>,
    pub credential: Option<String>,
}

/// Which of the recipient's two negotiation contexts a relayed candidate
/// belongs to. `Sender` candidates were gathered by the peer's offering
/// context, `Receiver` candidates by its answering context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionRole {
    Sender,
    Receiver,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SdpKind {
    Offer,
    Answer,
}

/// ICE candidate in the shape browsers produce with `RTCIceCandidate.toJSON()`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IceCandidate {
    pub candidate: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sdp_mid: Option<String>,
    #[serde(
        rename = "sdpMLineIndex",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub sdp_m_line_index: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username_fragment: Option<String>,
}

/// Every frame exchanged over the signaling channel.
///
/// `Offer`, `Answer` and `Candidate` travel client -> server -> peer and are
/// relayed untouched. `MatchRequest` and `SkipPeer` are client requests;
/// `Matched`, `PeerDisconnected` and `PeerSkipped` are server notifications.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case", rename_all_fields = "camelCase")]
pub enum SignalMessage {
    MatchRequest {
        /// Room that just ended for this client, so the matchmaker can try
        /// not to pair it with the same peer again right away.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        last_room_id: Option<RoomId>,
    },
    Matched {
        room_id: RoomId,
    },
    Offer {
        room_id: RoomId,
        sdp: String,
    },
    Answer {
        room_id: RoomId,
        sdp: String,
    },
    Candidate {
        room_id: RoomId,
        candidate: IceCandidate,
        connection_type: ConnectionRole,
    },
    SkipPeer {
        room_id: RoomId,
    },
    PeerDisconnected,
    PeerSkipped,
}

impl SignalMessage {
    pub const KINDS: [&'static str; 8] = [
        "match_request",
        "matched",
        "offer",
        "answer",
        "candidate",
        "skip_peer",
        "peer_disconnected",
        "peer_skipped",
    ];

    pub fn kind(&self) -> &'static str {
        match self {
            SignalMessage::MatchRequest { .. } => "match_request",
            SignalMessage::Matched { .. } => "matched",
            SignalMessage::Offer { .. } => "offer",
            SignalMessage::Answer { .. } => "answer",
            SignalMessage::Candidate { .. } => "candidate",
            SignalMessage::SkipPeer { .. } => "skip_peer",
            SignalMessage::PeerDisconnected => "peer_disconnected",
            SignalMessage::PeerSkipped => "peer_skipped",
        }
    }

    pub fn room_id(&self) -> Option<RoomId> {
        match self {
            SignalMessage::Matched { room_id }
            | SignalMessage::Offer { room_id, .. }
            | SignalMessage::Answer { room_id, .. }
            | SignalMessage::Candidate { room_id, .. }
            | SignalMessage::SkipPeer { room_id } => Some(*room_id),
            SignalMessage::MatchRequest { .. }
            | SignalMessage::PeerDisconnected
            | SignalMessage::PeerSkipped => None,
        }
    }

    /// Negotiation payloads the server forwards to the other room member.
    pub fn is_relayed(&self) -> bool {
        matches!(
            self,
            SignalMessage::Offer { .. }
                | SignalMessage::Answer { .. }
                | SignalMessage::Candidate { .. }
        )
    }

    /// Kinds a client may legitimately send to the server.
    pub fn accepted_by_server(&self) -> bool {
        self.is_relayed()
            || matches!(
                self,
                SignalMessage::MatchRequest { .. } | SignalMessage::SkipPeer { .. }
            )
    }

    /// Kinds a client expects to receive from the server.
    pub fn accepted_by_client(&self) -> bool {
        self.is_relayed()
            || matches!(
                self,
                SignalMessage::Matched { .. }
                    | SignalMessage::PeerDisconnected
                    | SignalMessage::PeerSkipped
            )
    }
}
