//! Mathematical utilities: moving-average smoothing.

pub mod smooth;

pub use smooth::*;
