mod config;
mod engine;
mod error;
mod negotiation;
mod session;
mod ws_transport;

pub use config::*;
pub use engine::*;
pub use error::*;
pub use negotiation::*;
pub use session::*;
pub use ws_transport::*;
