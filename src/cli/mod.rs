//! Command-line parsing for the mortgage rates widget.
//!
//! The goal of this module is to keep **argument parsing** and **command dispatch**
//! separate from fetching and rendering.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::config::ProviderKind;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "rates", version, about = "Current mortgage rates as cards (FRED or regional API)")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fetch rates and print the cards as a table.
    Show(FetchArgs),
    /// Fetch rates and emit the HTML fragment for the rates section.
    Html(HtmlArgs),
    /// Launch the interactive TUI.
    ///
    /// Uses the same fetch-then-render pipeline as `rates show`; the state
    /// selector re-runs it for the regional provider.
    Tui(FetchArgs),
}

/// Options shared by every command.
#[derive(Debug, Args, Clone)]
pub struct FetchArgs {
    /// Upstream provider (overrides RATES_PROVIDER).
    #[arg(short = 'p', long, value_enum)]
    pub provider: Option<ProviderKind>,

    /// Two-letter state code for the regional provider (overrides RATES_STATE).
    #[arg(short = 's', long)]
    pub state: Option<String>,

    /// API key for the selected provider (overrides FRED_API_KEY / RATES_API_KEY).
    #[arg(long)]
    pub api_key: Option<String>,
}

#[derive(Debug, Args, Clone)]
pub struct HtmlArgs {
    #[command(flatten)]
    pub fetch: FetchArgs,

    /// Write the fragment to a file instead of stdout.
    #[arg(short = 'o', long, value_name = "HTML")]
    pub out: Option<PathBuf>,

    /// Also export the cards as JSON.
    #[arg(long, value_name = "JSON")]
    pub json: Option<PathBuf>,
}
