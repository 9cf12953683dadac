//! FRED API integration for the Freddie Mac weekly mortgage survey series.

use std::sync::Arc;

use serde::Deserialize;

use crate::data::gather::{Settled, settle_all};
use crate::data::http::HttpTransport;
use crate::data::RateProvider;
use crate::domain::{DateFraming, LoanProduct, RateQuote, RateSet, is_usable_rate};
use crate::error::AppError;

pub const ATTRIBUTION: &str = "Data from Freddie Mac Primary Mortgage Market Survey";

pub struct FredProvider {
    transport: Arc<dyn HttpTransport>,
    base_url: String,
    api_key: String,
}

impl FredProvider {
    pub fn new(transport: Arc<dyn HttpTransport>, base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            transport,
            base_url: base_url.into(),
            api_key: api_key.into(),
        }
    }

    fn observations_url(&self) -> String {
        format!("{}/series/observations", self.base_url.trim_end_matches('/'))
    }

    /// Latest observation for one series; `Ok(None)` when the series has no usable value.
    pub fn fetch_latest(&self, series_id: &str) -> Result<Option<RateQuote>, AppError> {
        let url = self.observations_url();
        let resp = self.transport.get(
            &url,
            &[
                ("series_id", series_id),
                ("api_key", self.api_key.as_str()),
                ("file_type", "json"),
                ("sort_order", "desc"),
                ("limit", "1"),
            ],
            &[],
        )?;

        if !resp.is_success() {
            let detail = error_message(&resp.body).unwrap_or_default();
            return Err(AppError::upstream(format!(
                "FRED request for {series_id} failed with status {}{detail}",
                resp.status
            )));
        }

        parse_latest(series_id, &resp.body)
    }
}

impl RateProvider for FredProvider {
    fn name(&self) -> &'static str {
        "FRED"
    }

    /// National series only; `region` is ignored.
    fn fetch_rates(&self, _region: Option<&str>) -> Result<RateSet, AppError> {
        let products: Vec<(LoanProduct, &'static str)> = LoanProduct::ALL
            .iter()
            .filter_map(|p| p.fred_series().map(|s| (*p, s)))
            .collect();

        let tasks: Vec<_> = products
            .iter()
            .map(|&(_, series_id)| move || self.fetch_latest(series_id))
            .collect();
        let settled = settle_all(tasks);

        if settled.iter().all(Settled::is_rejected) {
            let reasons: Vec<String> = settled
                .into_iter()
                .filter_map(|s| match s {
                    Settled::Rejected(reason) => Some(reason),
                    Settled::Fulfilled(_) => None,
                })
                .collect();
            return Err(AppError::upstream(format!(
                "All FRED series requests failed: {}",
                reasons.join("; ")
            )));
        }

        let mut set = RateSet::new(ATTRIBUTION, DateFraming::WeekOf);
        for ((product, series_id), result) in products.into_iter().zip(settled) {
            match result {
                Settled::Fulfilled(Some(quote)) => set.insert(product, quote),
                Settled::Fulfilled(None) => {
                    log::warn!("FRED series {series_id} returned no usable observation");
                }
                Settled::Rejected(reason) => {
                    log::warn!("FRED series {series_id} unavailable: {reason}");
                }
            }
        }
        Ok(set)
    }
}

#[derive(Debug, Deserialize)]
struct ObservationsResponse {
    #[serde(default)]
    observations: Vec<Observation>,
    error_code: Option<u16>,
    error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Observation {
    date: String,
    value: String,
}

/// Parse a `series/observations` body into its most recent quote.
pub fn parse_latest(series_id: &str, body: &str) -> Result<Option<RateQuote>, AppError> {
    let parsed: ObservationsResponse = serde_json::from_str(body)
        .map_err(|e| AppError::upstream(format!("Failed to parse FRED response for {series_id}: {e}")))?;

    if let Some(code) = parsed.error_code {
        return Err(AppError::upstream(format!(
            "FRED error {code} for {series_id}: {}",
            parsed.error_message.unwrap_or_default()
        )));
    }

    // sort_order=desc puts the latest observation first.
    let Some(obs) = parsed.observations.into_iter().next() else {
        return Ok(None);
    };
    Ok(parse_value(&obs.value).map(|rate| RateQuote::new(rate, Some(obs.date))))
}

fn parse_value(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    // FRED marks missing observations with ".".
    if trimmed == "." || trimmed.is_empty() {
        return None;
    }
    let v = trimmed.parse::<f64>().ok()?;
    if is_usable_rate(v) { Some(v) } else { None }
}

fn error_message(body: &str) -> Option<String> {
    let parsed: ObservationsResponse = serde_json::from_str(body).ok()?;
    parsed.error_message.map(|m| format!(": {m}"))
}
