pub mod codec;
pub mod model;
pub mod utils;

pub use codec::{FrameError, decode_frame, encode_frame};
pub use model::*;
