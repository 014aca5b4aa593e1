//! Data acquisition from the coronavirus dashboard API.

pub mod dashboard;

pub use dashboard::*;
