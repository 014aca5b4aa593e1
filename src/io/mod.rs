//! Input/output helpers.
//!
//! - output directory preparation (`dirs`)
//! - raw series CSV export (`export`)

pub mod dirs;
pub mod export;

pub use dirs::*;
pub use export::*;
