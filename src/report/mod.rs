//! Console reporting: per-stage progress marks and the run summary.
//!
//! We keep this code in one place so:
//! - the pipeline stays testable with reporting stubbed out
//! - output changes are localized

pub mod format;
pub mod progress;

pub use format::*;
pub use progress::*;
