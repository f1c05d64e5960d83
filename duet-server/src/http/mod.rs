mod health_check;
mod router;

pub use health_check::*;
pub use router::*;
