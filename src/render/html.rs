//! HTML fragment for the rates section.
//!
//! Element ids and classes match the marketing page's stylesheet:
//! `#rates-loading`, `#rates-grid`, `.rate-card`, `.rates-updated`.

use std::fmt::Write;

use crate::domain::DisplayCard;
use crate::render::{
    Caption, DEMO_CALL_TO_ACTION, DEMO_CALL_TO_ACTION_HREF, DEMO_CALL_TO_ACTION_TAIL,
    DEMO_DISCLAIMER, RatesSection, View,
};

impl RatesSection {
    /// Serialize the section. Whichever of loading/grid is not current gets `hidden`.
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        let hidden = |visible: bool| if visible { "" } else { " hidden" };

        let _ = writeln!(
            out,
            r#"<div id="rates-loading" class="rates-loading"{}>Loading current rates&hellip;</div>"#,
            hidden(self.view() == View::Loading)
        );
        let _ = writeln!(
            out,
            r#"<div id="rates-grid" class="rates-grid"{}>"#,
            hidden(self.view() == View::Grid)
        );
        for card in self.cards() {
            out.push_str(&card_html(card));
        }
        out.push_str("</div>\n");

        if let Some(caption) = self.caption() {
            let _ = writeln!(out, r#"<p class="rates-updated">{}</p>"#, caption_html(caption));
        }
        out
    }
}

fn card_html(card: &DisplayCard) -> String {
    let mut out = String::new();
    let class = if card.featured { "rate-card featured" } else { "rate-card" };
    let badge = if card.estimated() {
        r#" <span class="rate-estimated">*Est.</span>"#
    } else {
        ""
    };

    let _ = writeln!(out, r#"  <div class="{class}">"#);
    let _ = writeln!(
        out,
        r#"    <h3 class="rate-type">{}{badge}</h3>"#,
        escape_html(card.label)
    );
    let _ = writeln!(
        out,
        r#"    <div class="rate-value">{:.3}<span class="percent">%</span></div>"#,
        card.rate
    );
    if let Some(apr) = card.apr {
        let _ = writeln!(out, r#"    <div class="rate-apr">APR {apr:.3}%</div>"#);
    }
    if let Some(points) = card.points {
        let _ = writeln!(out, r#"    <div class="rate-points">Points {points:.2}</div>"#);
    }
    out.push_str("  </div>\n");
    out
}

fn caption_html(caption: &Caption) -> String {
    match caption {
        Caption::Observed { .. } => escape_html(&caption.text()),
        Caption::Demo => format!(
            r#"{} <a href="{DEMO_CALL_TO_ACTION_HREF}">{}</a> {}"#,
            escape_html(DEMO_DISCLAIMER),
            escape_html(DEMO_CALL_TO_ACTION),
            escape_html(DEMO_CALL_TO_ACTION_TAIL),
        ),
    }
}

/// Escape text for element content and double-quoted attributes.
pub fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}
