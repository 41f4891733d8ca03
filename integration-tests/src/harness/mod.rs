pub mod fixtures;
pub mod tracing;

pub use self::fixtures::{FIXTURE_LOG, fixture_path};
pub use self::tracing::{CapturedEvent, capture_events};
