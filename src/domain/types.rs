//! Shared domain types.
//!
//! These types are intentionally kept small and serializable so they can be:
//!
//! - produced by any upstream provider
//! - projected into display cards
//! - exported to JSON

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Serialize};

/// 30-year base rate used when the upstream series is unavailable.
pub const DEFAULT_RATE_30Y: f64 = 6.85;
/// 15-year rate used when the upstream series is unavailable.
pub const DEFAULT_RATE_15Y: f64 = 6.10;
/// 5/1 ARM rate used when the upstream series is unavailable.
pub const DEFAULT_RATE_ARM: f64 = 6.35;

/// The six loan products shown on every render, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoanProduct {
    ThirtyYearFixed,
    FifteenYearFixed,
    Fha30,
    Va30,
    Jumbo30,
    Arm51,
}

impl LoanProduct {
    pub const ALL: [LoanProduct; 6] = [
        LoanProduct::ThirtyYearFixed,
        LoanProduct::FifteenYearFixed,
        LoanProduct::Fha30,
        LoanProduct::Va30,
        LoanProduct::Jumbo30,
        LoanProduct::Arm51,
    ];

    /// Card label.
    pub fn label(self) -> &'static str {
        match self {
            LoanProduct::ThirtyYearFixed => "30-Year Fixed",
            LoanProduct::FifteenYearFixed => "15-Year Fixed",
            LoanProduct::Fha30 => "FHA 30-Year Fixed",
            LoanProduct::Va30 => "VA 30-Year Fixed",
            LoanProduct::Jumbo30 => "Jumbo 30-Year Fixed",
            LoanProduct::Arm51 => "5/1 ARM",
        }
    }

    /// FRED series id, for the products FRED publishes.
    pub fn fred_series(self) -> Option<&'static str> {
        match self {
            LoanProduct::ThirtyYearFixed => Some("MORTGAGE30US"),
            LoanProduct::FifteenYearFixed => Some("MORTGAGE15US"),
            LoanProduct::Arm51 => Some("MORTGAGE5US"),
            _ => None,
        }
    }

    /// Key of this product in the regional rates payload.
    pub fn regional_key(self) -> &'static str {
        match self {
            LoanProduct::ThirtyYearFixed => "thirty_year_fixed",
            LoanProduct::FifteenYearFixed => "fifteen_year_fixed",
            LoanProduct::Fha30 => "fha_thirty_year",
            LoanProduct::Va30 => "va_thirty_year",
            LoanProduct::Jumbo30 => "jumbo_thirty_year",
            LoanProduct::Arm51 => "arm_5_1",
        }
    }

    /// Static default substituted when a base product is unavailable.
    pub fn default_rate(self) -> Option<f64> {
        match self {
            LoanProduct::ThirtyYearFixed => Some(DEFAULT_RATE_30Y),
            LoanProduct::FifteenYearFixed => Some(DEFAULT_RATE_15Y),
            LoanProduct::Arm51 => Some(DEFAULT_RATE_ARM),
            _ => None,
        }
    }

    /// Percentage-point offset over the 30-year base, for estimated products.
    pub fn spread_over_30y(self) -> Option<f64> {
        match self {
            LoanProduct::Fha30 => Some(-0.25),
            LoanProduct::Va30 => Some(-0.35),
            LoanProduct::Jumbo30 => Some(0.25),
            _ => None,
        }
    }

    pub fn is_featured(self) -> bool {
        self == LoanProduct::ThirtyYearFixed
    }
}

/// One upstream observation for a product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateQuote {
    /// Rate in percent.
    pub rate: f64,
    /// Provider-supplied date (`YYYY-MM-DD`) or timestamp (RFC 3339).
    pub observed: Option<String>,
    pub apr: Option<f64>,
    pub points: Option<f64>,
}

impl RateQuote {
    pub fn new(rate: f64, observed: Option<String>) -> Self {
        Self {
            rate,
            observed,
            apr: None,
            points: None,
        }
    }

    /// Calendar date of the observation, if the provider string parses.
    pub fn observed_date(&self) -> Option<NaiveDate> {
        let raw = self.observed.as_deref()?.trim();
        if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
            return Some(date);
        }
        DateTime::parse_from_rfc3339(raw)
            .ok()
            .map(|dt| dt.date_naive())
    }
}

/// How the caption frames the observation date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DateFraming {
    /// Weekly survey data ("Week of 1/5/2024").
    WeekOf,
    /// Point-in-time quotes ("As of 1/5/2024").
    AsOf,
}

impl DateFraming {
    pub fn prefix(self) -> &'static str {
        match self {
            DateFraming::WeekOf => "Week of",
            DateFraming::AsOf => "As of",
        }
    }
}

/// Normalized result of one fetch. Products absent from `quotes` are unavailable.
#[derive(Debug, Clone, PartialEq)]
pub struct RateSet {
    pub quotes: BTreeMap<LoanProduct, RateQuote>,
    pub attribution: String,
    pub framing: DateFraming,
}

impl RateSet {
    pub fn new(attribution: impl Into<String>, framing: DateFraming) -> Self {
        Self {
            quotes: BTreeMap::new(),
            attribution: attribution.into(),
            framing,
        }
    }

    /// Add a quote; quotes with an unusable rate leave the product unavailable.
    pub fn insert(&mut self, product: LoanProduct, quote: RateQuote) {
        if !is_usable_rate(quote.rate) {
            log::warn!("Dropping unusable {} rate {}", product.label(), quote.rate);
            return;
        }
        self.quotes.insert(product, quote);
    }

    pub fn get(&self, product: LoanProduct) -> Option<&RateQuote> {
        self.quotes.get(&product)
    }

    pub fn is_empty(&self) -> bool {
        self.quotes.is_empty()
    }

    /// The 30-year rate, or its default when the series is unavailable.
    pub fn base_30y(&self) -> f64 {
        self.get(LoanProduct::ThirtyYearFixed)
            .map(|q| q.rate)
            .unwrap_or(DEFAULT_RATE_30Y)
    }
}

/// Where a displayed rate came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RateOrigin {
    /// Published by the upstream provider.
    Reported,
    /// Computed from the 30-year base plus a fixed spread.
    Derived,
    /// Static default substituted for an unavailable series.
    Default,
}

/// Rendering-ready projection of one product.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DisplayCard {
    pub product: LoanProduct,
    pub label: &'static str,
    pub rate: f64,
    pub featured: bool,
    pub origin: RateOrigin,
    pub apr: Option<f64>,
    pub points: Option<f64>,
}

impl DisplayCard {
    pub fn estimated(&self) -> bool {
        self.origin != RateOrigin::Reported
    }

    /// Rate as shown to users, e.g. `6.500%`.
    pub fn formatted_rate(&self) -> String {
        format_percent(self.rate)
    }
}

/// Format a percentage with exactly three decimals.
pub fn format_percent(value: f64) -> String {
    format!("{value:.3}%")
}

/// Finite and non-negative.
pub fn is_usable_rate(value: f64) -> bool {
    value.is_finite() && value >= 0.0
}

/// Round to three decimals (the display precision).
pub fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn products_are_in_display_order_with_one_featured() {
        let labels: Vec<_> = LoanProduct::ALL.iter().map(|p| p.label()).collect();
        assert_eq!(
            labels,
            [
                "30-Year Fixed",
                "15-Year Fixed",
                "FHA 30-Year Fixed",
                "VA 30-Year Fixed",
                "Jumbo 30-Year Fixed",
                "5/1 ARM"
            ]
        );
        let featured: Vec<_> = LoanProduct::ALL.iter().filter(|p| p.is_featured()).collect();
        assert_eq!(featured, [&LoanProduct::ThirtyYearFixed]);
    }

    #[test]
    fn every_product_has_exactly_one_fallback_rule() {
        for product in LoanProduct::ALL {
            let has_default = product.default_rate().is_some();
            let has_spread = product.spread_over_30y().is_some();
            assert!(has_default ^ has_spread, "{product:?}");
        }
    }

    #[test]
    fn observed_date_accepts_dates_and_timestamps() {
        let q = RateQuote::new(6.5, Some("2024-01-05".to_string()));
        assert_eq!(q.observed_date(), NaiveDate::from_ymd_opt(2024, 1, 5));

        let q = RateQuote::new(6.5, Some("2024-03-11T14:30:00Z".to_string()));
        assert_eq!(q.observed_date(), NaiveDate::from_ymd_opt(2024, 3, 11));

        let q = RateQuote::new(6.5, Some("last tuesday".to_string()));
        assert_eq!(q.observed_date(), None);
        assert_eq!(RateQuote::new(6.5, None).observed_date(), None);
    }

    #[test]
    fn base_30y_falls_back_to_default() {
        let mut set = RateSet::new("test", DateFraming::AsOf);
        assert_eq!(set.base_30y(), DEFAULT_RATE_30Y);
        set.insert(LoanProduct::ThirtyYearFixed, RateQuote::new(6.5, None));
        assert_eq!(set.base_30y(), 6.5);
    }

    #[test]
    fn negative_and_non_finite_rates_are_unavailable() {
        let mut set = RateSet::new("test", DateFraming::AsOf);
        set.insert(LoanProduct::ThirtyYearFixed, RateQuote::new(-0.1, None));
        set.insert(LoanProduct::Arm51, RateQuote::new(f64::NAN, None));
        set.insert(LoanProduct::FifteenYearFixed, RateQuote::new(0.0, None));
        assert!(set.get(LoanProduct::ThirtyYearFixed).is_none());
        assert!(set.get(LoanProduct::Arm51).is_none());
        assert!(set.get(LoanProduct::FifteenYearFixed).is_some());
        assert_eq!(set.base_30y(), DEFAULT_RATE_30Y);
    }

    #[test]
    fn format_percent_uses_three_decimals() {
        assert_eq!(format_percent(6.5), "6.500%");
        assert_eq!(format_percent(6.85 - 0.35), "6.500%");
        assert_eq!(round3(6.5 - 0.35), 6.15);
    }
}
