mod hub_command;
mod relay;
mod room;
mod room_store;
mod session_controller;

pub use hub_command::*;
pub use relay::*;
pub use room::*;
pub use room_store::*;
pub use session_controller::*;
