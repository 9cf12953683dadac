//! Commercial per-state rates API.
//!
//! One `GET {base}/rates?state=XX` authenticated by `x-api-key`. Unlike the FRED
//! batch there is a single request, so any transport or status failure fails the
//! whole fetch.

use std::sync::Arc;

use serde::Deserialize;

use crate::data::http::HttpTransport;
use crate::data::RateProvider;
use crate::domain::{DateFraming, LoanProduct, RateQuote, RateSet, is_usable_rate};
use crate::error::AppError;

pub struct RegionalProvider {
    transport: Arc<dyn HttpTransport>,
    base_url: String,
    api_key: String,
    default_state: String,
}

impl RegionalProvider {
    pub fn new(
        transport: Arc<dyn HttpTransport>,
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        default_state: impl Into<String>,
    ) -> Self {
        Self {
            transport,
            base_url: base_url.into(),
            api_key: api_key.into(),
            default_state: default_state.into(),
        }
    }
}

impl RateProvider for RegionalProvider {
    fn name(&self) -> &'static str {
        "Regional"
    }

    fn fetch_rates(&self, region: Option<&str>) -> Result<RateSet, AppError> {
        let state = crate::config::normalize_state(region.unwrap_or(&self.default_state))?;
        let url = format!("{}/rates", self.base_url.trim_end_matches('/'));

        log::info!("Fetching regional rates for {state}");
        let resp = self.transport.get(
            &url,
            &[("state", state.as_str())],
            &[("x-api-key", self.api_key.as_str())],
        )?;

        if !resp.is_success() {
            return Err(AppError::upstream(format!(
                "Rates API request for {state} failed with status {}.",
                resp.status
            )));
        }

        parse_rates(&state, &resp.body)
    }
}

#[derive(Debug, Deserialize)]
struct RegionalResponse {
    thirty_year_fixed: Option<ProductQuote>,
    fifteen_year_fixed: Option<ProductQuote>,
    fha_thirty_year: Option<ProductQuote>,
    va_thirty_year: Option<ProductQuote>,
    jumbo_thirty_year: Option<ProductQuote>,
    arm_5_1: Option<ProductQuote>,
    timestamp: Option<String>,
}

impl RegionalResponse {
    fn product(&self, product: LoanProduct) -> Option<&ProductQuote> {
        match product {
            LoanProduct::ThirtyYearFixed => self.thirty_year_fixed.as_ref(),
            LoanProduct::FifteenYearFixed => self.fifteen_year_fixed.as_ref(),
            LoanProduct::Fha30 => self.fha_thirty_year.as_ref(),
            LoanProduct::Va30 => self.va_thirty_year.as_ref(),
            LoanProduct::Jumbo30 => self.jumbo_thirty_year.as_ref(),
            LoanProduct::Arm51 => self.arm_5_1.as_ref(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ProductQuote {
    rate: f64,
    apr: Option<f64>,
    points: Option<f64>,
}

pub fn attribution_for(state: &str) -> String {
    format!("Market rates for {state}")
}

/// Parse a rates payload. Products missing from the payload are left unavailable.
pub fn parse_rates(state: &str, body: &str) -> Result<RateSet, AppError> {
    let parsed: RegionalResponse = serde_json::from_str(body)
        .map_err(|e| AppError::upstream(format!("Failed to parse rates response for {state}: {e}")))?;

    let mut set = RateSet::new(attribution_for(state), DateFraming::AsOf);
    for product in LoanProduct::ALL {
        let Some(q) = parsed.product(product) else {
            continue;
        };
        if !is_usable_rate(q.rate) {
            log::warn!("Ignoring unusable {} rate {} for {state}", product.regional_key(), q.rate);
            continue;
        }
        set.insert(
            product,
            RateQuote {
                rate: q.rate,
                observed: parsed.timestamp.clone(),
                apr: q.apr.filter(|v| v.is_finite()),
                points: q.points.filter(|v| v.is_finite()),
            },
        );
    }
    Ok(set)
}
