//! `mortgage-rates` library crate.
//!
//! The binary (`rates`) is a thin wrapper around this library so that:
//!
//! - fetching and rendering are testable without spawning processes
//! - the renderer can be reused by other front-ends (static-site builds, etc.)

pub mod app;
pub mod chrome;
pub mod cli;
pub mod config;
pub mod data;
pub mod domain;
pub mod error;
pub mod io;
pub mod render;
pub mod tui;
