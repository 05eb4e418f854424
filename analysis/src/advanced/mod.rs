pub mod critical;
pub mod psychological;
pub mod types;

pub use critical::is_critical_position;
pub use psychological::compute_psychological_profile;
pub use types::*;
