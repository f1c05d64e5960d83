pub mod signal_helpers;

pub use mock_engine::*;
pub use signal_helpers::*;
