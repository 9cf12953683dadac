//! Plain-text rendering for terminal output.
//!
//! Formatting lives here so output changes stay localized.

use crate::config::ProviderKind;
use crate::domain::DisplayCard;
use crate::render::{RatesSection, View};

/// Format the section as a header, a card table, and the caption.
pub fn format_section(section: &RatesSection, provider: ProviderKind, region: Option<&str>) -> String {
    let mut out = String::new();

    out.push_str("=== Current Mortgage Rates ===\n");
    match region {
        Some(region) => out.push_str(&format!("Source: {} ({region})\n", provider.display_name())),
        None => out.push_str(&format!("Source: {}\n", provider.display_name())),
    }
    out.push('\n');

    if section.view() == View::Loading {
        out.push_str("Loading current rates...\n");
        return out;
    }

    out.push_str(&format_cards(section.cards()));

    if let Some(caption) = section.caption() {
        out.push('\n');
        out.push_str(&caption.text());
        out.push('\n');
    }
    if section.cards().iter().any(|c| c.estimated()) {
        out.push_str("* estimated\n");
    }

    out
}

/// Aligned table of cards.
pub fn format_cards(cards: &[DisplayCard]) -> String {
    let mut out = String::new();
    out.push_str(format!("  {:<22} {:>9} {:>9} {:>7}\n", "product", "rate", "apr", "points").trim_end());
    out.push('\n');
    out.push_str(format!("  {:-<22} {:-<9} {:-<9} {:-<7}\n", "", "", "", "").trim_end());
    out.push('\n');

    for card in cards {
        let marker = if card.featured { '>' } else { ' ' };
        let label = if card.estimated() {
            format!("{}*", card.label)
        } else {
            card.label.to_string()
        };
        let apr = card.apr.map(|v| format!("{v:.3}%")).unwrap_or_else(|| "-".to_string());
        let points = card.points.map(|v| format!("{v:.2}")).unwrap_or_else(|| "-".to_string());
        out.push_str(
            format!(
                "{marker} {:<22} {:>9} {:>9} {:>7}\n",
                label,
                card.formatted_rate(),
                apr,
                points
            )
            .trim_end(),
        );
        out.push('\n');
    }

    out
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::render::RatesOutcome;

    #[test]
    fn format_section_lists_every_card() {
        let mut section = RatesSection::new();
        section.render(&RatesOutcome::Demo, NaiveDate::from_ymd_opt(2024, 2, 1).unwrap());
        let text = format_section(&section, ProviderKind::Demo, None);

        assert!(text.starts_with("=== Current Mortgage Rates ===\nSource: Demo\n"));
        assert!(text.contains("> 30-Year Fixed*"));
        assert!(text.contains("6.850%"));
        assert!(text.contains("5/1 ARM*"));
        assert!(text.contains("Demo rates shown for illustration only."));
        assert!(text.ends_with("* estimated\n"));
        // header + rule + six rows
        assert_eq!(format_cards(section.cards()).lines().count(), 8);
    }

    #[test]
    fn format_section_while_loading() {
        let text = format_section(&RatesSection::new(), ProviderKind::Regional, Some("CA"));
        assert!(text.contains("Source: Regional (CA)"));
        assert!(text.ends_with("Loading current rates...\n"));
    }
}
