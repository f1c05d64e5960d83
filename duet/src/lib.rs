pub use duet_core::{ConnectionId, RoomId};

pub mod model {
    pub use duet_core::model::*;
    pub use duet_core::{FrameError, decode_frame, encode_frame};
}

#[cfg(feature = "server")]
pub mod server {
    pub use duet_server::*;
}

#[cfg(feature = "client")]
pub mod client {
    pub use duet_client::*;
}
