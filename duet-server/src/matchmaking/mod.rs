mod matchmaker;
mod waiting_pool;

pub use matchmaker::*;
pub use waiting_pool::*;
