//! Shared "fetch then render" logic used by the CLI and TUI front-ends.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! reset to loading -> fetch once -> render live data or the demo fallback
//!
//! The front-ends can then focus on presentation (printing vs widgets).

use chrono::{Local, NaiveDate};

use crate::data::RateProvider;
use crate::render::{RatesOutcome, RatesSection};

/// Run the provider once, folding a total failure into the demo outcome.
///
/// `None` means no usable provider (demo selected or key missing).
pub fn fetch_outcome(provider: Option<&dyn RateProvider>, region: Option<&str>) -> RatesOutcome {
    let Some(provider) = provider else {
        return RatesOutcome::Demo;
    };
    match provider.fetch_rates(region) {
        Ok(set) => {
            log::info!("Fetched {} of 6 products from {}", set.quotes.len(), provider.name());
            RatesOutcome::Live(set)
        }
        Err(err) => {
            log::error!("Error fetching rates from {}: {err}", provider.name());
            RatesOutcome::Demo
        }
    }
}

/// Reset the section, fetch, and render the result.
pub fn load_rates(
    section: &mut RatesSection,
    provider: Option<&dyn RateProvider>,
    region: Option<&str>,
    today: NaiveDate,
) -> RatesOutcome {
    section.begin_loading();
    let outcome = fetch_outcome(provider, region);
    section.render(&outcome, today);
    outcome
}

pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::data::http::testing::CannedTransport;
    use crate::data::{FredProvider, RegionalProvider};
    use crate::render::{Caption, View};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 2, 1).unwrap()
    }

    fn formatted(section: &RatesSection) -> Vec<String> {
        section.cards().iter().map(|c| c.formatted_rate()).collect()
    }

    #[test]
    fn partial_fred_batch_renders_live_cards() {
        let transport = CannedTransport::new()
            .respond(
                "MORTGAGE30US",
                200,
                r#"{"observations":[{"date":"2024-01-05","value":"6.50"}]}"#,
            )
            .respond(
                "MORTGAGE15US",
                200,
                r#"{"observations":[{"date":"2024-01-05","value":"5.80"}]}"#,
            )
            .respond("MORTGAGE5US", 503, "");
        let provider = FredProvider::new(Arc::new(transport), "https://fred.test", "k");

        let mut section = RatesSection::new();
        let outcome = load_rates(&mut section, Some(&provider), None, today());

        assert!(matches!(outcome, RatesOutcome::Live(_)));
        assert_eq!(section.view(), View::Grid);
        assert_eq!(
            formatted(&section),
            ["6.500%", "5.800%", "6.250%", "6.150%", "6.750%", "6.350%"]
        );
        assert!(section.caption().unwrap().text().contains("1/5/2024"));
    }

    #[test]
    fn network_failure_renders_demo_cards() {
        let provider = FredProvider::new(Arc::new(CannedTransport::new()), "https://fred.test", "k");

        let mut section = RatesSection::new();
        let outcome = load_rates(&mut section, Some(&provider), None, today());

        assert_eq!(outcome, RatesOutcome::Demo);
        assert_eq!(section.view(), View::Grid);
        assert_eq!(
            formatted(&section),
            ["6.850%", "6.100%", "6.600%", "6.500%", "7.100%", "6.350%"]
        );
        assert_eq!(section.caption(), Some(&Caption::Demo));
    }

    #[test]
    fn regional_status_error_renders_demo_cards() {
        let transport = CannedTransport::new().respond("/rates", 500, "oops");
        let provider = RegionalProvider::new(Arc::new(transport), "https://rates.test", "k", "CA");

        let mut section = RatesSection::new();
        load_rates(&mut section, Some(&provider), Some("CA"), today());
        assert_eq!(section.caption(), Some(&Caption::Demo));
    }

    #[test]
    fn missing_provider_skips_the_network() {
        let mut section = RatesSection::new();
        let outcome = load_rates(&mut section, None, None, today());
        assert_eq!(outcome, RatesOutcome::Demo);
        assert_eq!(section.cards().len(), 6);
    }

    #[test]
    fn region_switch_replaces_previous_render() {
        let ca = r#"{"thirty_year_fixed": {"rate": 6.5}, "timestamp": "2024-03-11"}"#;
        let transport = CannedTransport::new().respond("/rates", 200, ca);
        let provider = RegionalProvider::new(Arc::new(transport), "https://rates.test", "k", "CA");

        let mut section = RatesSection::new();
        load_rates(&mut section, Some(&provider), Some("CA"), today());
        load_rates(&mut section, Some(&provider), Some("TX"), today());

        assert_eq!(section.cards().len(), 6);
        assert_eq!(section.to_html().matches("rates-updated").count(), 1);
        assert!(section.caption().unwrap().text().starts_with("Market rates for TX"));
    }
}
