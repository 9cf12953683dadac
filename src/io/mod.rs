//! Output helpers.
//!
//! - HTML fragment and JSON card exports (`export`)

pub mod export;

pub use export::*;
