mod connection;
mod room;
mod signaling;

pub use connection::ConnectionId;
pub use room::RoomId;
pub use signaling::{ConnectionRole, IceCandidate, IceServerConfig, SdpKind, SignalMessage};
