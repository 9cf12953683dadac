//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - the fixed loan products and their fallback rules (`LoanProduct`)
//! - normalized upstream data (`RateQuote`, `RateSet`)
//! - render-ready cards (`DisplayCard`)

pub mod types;

pub use types::*;
