//! Write the rendered section to disk.
//!
//! - HTML fragment for dropping into the marketing page
//! - JSON card list for other consumers (static-site builds, scripts)

use std::fs::File;
use std::io::Write;
use std::path::Path;

use serde::Serialize;

use crate::domain::DisplayCard;
use crate::error::AppError;
use crate::render::RatesSection;

/// JSON document written by `--json`.
#[derive(Debug, Serialize)]
pub struct CardsExport<'a> {
    pub tool: &'static str,
    pub provider: &'a str,
    pub region: Option<&'a str>,
    pub caption: Option<String>,
    pub cards: &'a [DisplayCard],
}

pub fn write_html(path: &Path, section: &RatesSection) -> Result<(), AppError> {
    let mut file = File::create(path)
        .map_err(|e| AppError::usage(format!("Failed to create HTML file '{}': {e}", path.display())))?;
    file.write_all(section.to_html().as_bytes())
        .map_err(|e| AppError::usage(format!("Failed to write HTML file '{}': {e}", path.display())))?;
    Ok(())
}

pub fn write_cards_json(
    path: &Path,
    section: &RatesSection,
    provider: &str,
    region: Option<&str>,
) -> Result<(), AppError> {
    let doc = CardsExport {
        tool: "mortgage-rates",
        provider,
        region,
        caption: section.caption().map(|c| c.text()),
        cards: section.cards(),
    };
    let file = File::create(path)
        .map_err(|e| AppError::usage(format!("Failed to create JSON file '{}': {e}", path.display())))?;
    serde_json::to_writer_pretty(file, &doc)
        .map_err(|e| AppError::usage(format!("Failed to write JSON file '{}': {e}", path.display())))?;
    Ok(())
}
