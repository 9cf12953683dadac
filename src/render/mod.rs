//! Rate rendering: cards, caption, and the rates section model.
//!
//! `RatesSection` stands in for the page's rates container. It is always
//! overwritten wholesale, never patched, so repeated renders (e.g. after a
//! region switch) cannot leave stale cards or a second caption behind.

use chrono::{Datelike, NaiveDate};

use crate::domain::{DateFraming, DisplayCard, LoanProduct, RateOrigin, RateSet, round3};

pub mod format;
pub mod html;

pub use format::format_section;

pub const DEMO_DISCLAIMER: &str = "Demo rates shown for illustration only.";
pub const DEMO_CALL_TO_ACTION: &str = "Contact us";
pub const DEMO_CALL_TO_ACTION_HREF: &str = "#contact";
pub const DEMO_CALL_TO_ACTION_TAIL: &str = "for a personalized quote.";

/// What the fetch produced.
#[derive(Debug, Clone, PartialEq)]
pub enum RatesOutcome {
    Live(RateSet),
    /// Total failure or no usable provider.
    Demo,
}

/// Freshness line shown under the grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Caption {
    Observed {
        attribution: String,
        framing: DateFraming,
        date: NaiveDate,
    },
    Demo,
}

impl Caption {
    /// Plain-text caption.
    pub fn text(&self) -> String {
        match self {
            Caption::Observed {
                attribution,
                framing,
                date,
            } => format!("{attribution} | {} {}", framing.prefix(), display_date(*date)),
            Caption::Demo => format!(
                "{DEMO_DISCLAIMER} {DEMO_CALL_TO_ACTION} {DEMO_CALL_TO_ACTION_TAIL}"
            ),
        }
    }
}

/// US-style short date, e.g. `1/5/2024`.
pub fn display_date(date: NaiveDate) -> String {
    format!("{}/{}/{}", date.month(), date.day(), date.year())
}

/// Which part of the section is visible. Loading and grid are exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Loading,
    Grid,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RatesSection {
    view: View,
    cards: Vec<DisplayCard>,
    caption: Option<Caption>,
}

impl Default for RatesSection {
    fn default() -> Self {
        Self::new()
    }
}

impl RatesSection {
    pub fn new() -> Self {
        Self {
            view: View::Loading,
            cards: Vec::new(),
            caption: None,
        }
    }

    pub fn view(&self) -> View {
        self.view
    }

    pub fn cards(&self) -> &[DisplayCard] {
        &self.cards
    }

    pub fn caption(&self) -> Option<&Caption> {
        self.caption.as_ref()
    }

    /// Reset to the loading state at the start of a fetch.
    pub fn begin_loading(&mut self) {
        self.view = View::Loading;
    }

    /// Replace the grid and caption with `outcome` and show the grid.
    pub fn render(&mut self, outcome: &RatesOutcome, today: NaiveDate) {
        let (cards, caption) = match outcome {
            RatesOutcome::Live(set) => (build_cards(set), observed_caption(set, today)),
            RatesOutcome::Demo => (demo_cards(), Caption::Demo),
        };
        self.cards = cards;
        self.caption = Some(caption);
        self.view = View::Grid;
    }
}

/// Project a rate set onto the six display cards.
pub fn build_cards(set: &RateSet) -> Vec<DisplayCard> {
    let base_30y = set.base_30y();

    LoanProduct::ALL
        .iter()
        .map(|&product| {
            let (rate, origin, apr, points) = match set.get(product) {
                Some(q) => (q.rate, RateOrigin::Reported, q.apr, q.points),
                None => match product.spread_over_30y() {
                    Some(spread) => ((base_30y + spread).max(0.0), RateOrigin::Derived, None, None),
                    None => (
                        product.default_rate().unwrap_or(base_30y),
                        RateOrigin::Default,
                        None,
                        None,
                    ),
                },
            };
            DisplayCard {
                product,
                label: product.label(),
                rate: round3(rate),
                featured: product.is_featured(),
                origin,
                apr: apr.map(round3),
                points,
            }
        })
        .collect()
}

/// The cards shown when no live data is available.
pub fn demo_cards() -> Vec<DisplayCard> {
    build_cards(&RateSet::new("", DateFraming::AsOf))
}

fn observed_caption(set: &RateSet, today: NaiveDate) -> Caption {
    let date = set
        .get(LoanProduct::ThirtyYearFixed)
        .and_then(|q| q.observed_date())
        .unwrap_or(today);
    Caption::Observed {
        attribution: set.attribution.clone(),
        framing: set.framing,
        date,
    }
}
