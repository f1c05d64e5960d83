mod config;
mod http;
mod matchmaking;
mod registry;
mod room;
mod signaling;

pub use config::*;
pub use http::*;
pub use matchmaking::*;
pub use registry::*;
pub use room::*;
pub use signaling::*;
