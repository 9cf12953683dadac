//! Runtime configuration.
//!
//! Values come from the process environment (after loading `.env` via `dotenvy`)
//! and are then overridden by CLI flags. Providers receive the resolved values
//! through their constructors.

use std::time::Duration;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::error::AppError;

pub const DEFAULT_FRED_BASE_URL: &str = "https://api.stlouisfed.org/fred";
pub const DEFAULT_STATE: &str = "CA";
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 10;

/// State and territory codes the regional provider accepts, in selector order.
pub const STATES: [&str; 54] = [
    "AK", "AL", "AR", "AZ", "CA", "CO", "CT", "DC", "DE", "FL", "GA", "GU", "HI", "IA", "ID", "IL", "IN",
    "KS", "KY", "LA", "MA", "MD", "ME", "MI", "MN", "MO", "MS", "MT", "NC", "ND", "NE", "NH", "NJ", "NM",
    "NV", "NY", "OH", "OK", "OR", "PA", "PR", "RI", "SC", "SD", "TN", "TX", "UT", "VA", "VI", "VT", "WA",
    "WI", "WV", "WY",
];

/// Key values that integrators leave in place of a real key.
const PLACEHOLDER_KEYS: [&str; 3] = ["YOUR_FRED_API_KEY", "YOUR_API_KEY", "YOUR_HAPI_API_KEY"];

/// Which upstream supplies the rates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// St. Louis Fed weekly survey series (national).
    Fred,
    /// Commercial per-state rates API.
    Regional,
    /// Static demo rates; no network.
    Demo,
}

impl ProviderKind {
    pub fn display_name(self) -> &'static str {
        match self {
            ProviderKind::Fred => "FRED",
            ProviderKind::Regional => "Regional",
            ProviderKind::Demo => "Demo",
        }
    }

    /// Whether the provider takes a region code.
    pub fn is_regional(self) -> bool {
        self == ProviderKind::Regional
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub provider: ProviderKind,
    pub fred_api_key: Option<String>,
    pub fred_base_url: String,
    pub regional_api_key: Option<String>,
    pub regional_base_url: Option<String>,
    pub default_state: String,
    pub http_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            provider: ProviderKind::Fred,
            fred_api_key: None,
            fred_base_url: DEFAULT_FRED_BASE_URL.to_string(),
            regional_api_key: None,
            regional_base_url: None,
            default_state: DEFAULT_STATE.to_string(),
            http_timeout: Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
        }
    }
}

impl Config {
    /// Load `.env` (if any) and read configuration from the environment.
    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build a config from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Config::default();

        if let Some(raw) = lookup("RATES_PROVIDER") {
            config.provider = ProviderKind::from_str(raw.trim(), true).map_err(|_| {
                AppError::usage(format!(
                    "Invalid RATES_PROVIDER '{raw}' (expected fred, regional, or demo)."
                ))
            })?;
        }

        config.fred_api_key = usable_key(lookup("FRED_API_KEY"));
        config.regional_api_key = usable_key(lookup("RATES_API_KEY"));

        if let Some(url) = non_empty(lookup("FRED_BASE_URL")) {
            config.fred_base_url = url;
        }
        config.regional_base_url = non_empty(lookup("RATES_API_BASE_URL"));

        if let Some(state) = non_empty(lookup("RATES_STATE")) {
            config.default_state = normalize_state(&state)?;
        }

        if let Some(raw) = non_empty(lookup("RATES_HTTP_TIMEOUT_SECS")) {
            let secs = raw.parse::<u64>().map_err(|e| {
                AppError::usage(format!("Invalid RATES_HTTP_TIMEOUT_SECS '{raw}': {e}"))
            })?;
            if secs == 0 {
                return Err(AppError::usage("RATES_HTTP_TIMEOUT_SECS must be > 0."));
            }
            config.http_timeout = Duration::from_secs(secs);
        }

        Ok(config)
    }

    /// Region used when the caller does not pick one.
    pub fn resolve_region(&self, region: Option<&str>) -> Result<String, AppError> {
        match region {
            Some(code) => normalize_state(code),
            None => Ok(self.default_state.clone()),
        }
    }
}

/// Treat empty and placeholder keys as absent.
pub fn usable_key(raw: Option<String>) -> Option<String> {
    let key = non_empty(raw)?;
    if PLACEHOLDER_KEYS.iter().any(|p| key.eq_ignore_ascii_case(p)) {
        return None;
    }
    Some(key)
}

/// Upper-case a state code, rejecting anything not in `STATES`.
pub fn normalize_state(raw: &str) -> Result<String, AppError> {
    let code = raw.trim().to_ascii_uppercase();
    if STATES.contains(&code.as_str()) {
        Ok(code)
    } else {
        Err(AppError::usage(format!(
            "Invalid state code '{raw}' (expected a US state or territory code, e.g. CA)."
        )))
    }
}

fn non_empty(raw: Option<String>) -> Option<String> {
    raw.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name: &str| map.get(name).cloned()
    }

    #[test]
    fn defaults_when_environment_is_empty() {
        let config = Config::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config.provider, ProviderKind::Fred);
        assert_eq!(config.fred_api_key, None);
        assert_eq!(config.fred_base_url, DEFAULT_FRED_BASE_URL);
        assert_eq!(config.default_state, "CA");
        assert_eq!(config.http_timeout, Duration::from_secs(10));
    }

    #[test]
    fn reads_overrides() {
        let config = Config::from_lookup(lookup_from(&[
            ("RATES_PROVIDER", "Regional"),
            ("RATES_API_KEY", " abc123 "),
            ("RATES_API_BASE_URL", "https://rates.internal/v2"),
            ("RATES_STATE", "tx"),
            ("RATES_HTTP_TIMEOUT_SECS", "3"),
        ]))
        .unwrap();
        assert_eq!(config.provider, ProviderKind::Regional);
        assert_eq!(config.regional_api_key.as_deref(), Some("abc123"));
        assert_eq!(config.regional_base_url.as_deref(), Some("https://rates.internal/v2"));
        assert_eq!(config.default_state, "TX");
        assert_eq!(config.http_timeout, Duration::from_secs(3));
    }

    #[test]
    fn placeholder_keys_are_treated_as_missing() {
        assert_eq!(usable_key(Some("YOUR_FRED_API_KEY".to_string())), None);
        assert_eq!(usable_key(Some("your_api_key".to_string())), None);
        assert_eq!(usable_key(Some("   ".to_string())), None);
        assert_eq!(usable_key(Some("k-1".to_string())).as_deref(), Some("k-1"));
    }

    #[test]
    fn rejects_bad_values() {
        let err = Config::from_lookup(lookup_from(&[("RATES_PROVIDER", "zillow")])).unwrap_err();
        assert_eq!(err.exit_code(), 2);
        assert!(Config::from_lookup(lookup_from(&[("RATES_HTTP_TIMEOUT_SECS", "0")])).is_err());
        assert!(Config::from_lookup(lookup_from(&[("RATES_STATE", "Texas")])).is_err());
    }

    #[test]
    fn resolve_region_normalizes_or_defaults() {
        let config = Config::default();
        assert_eq!(config.resolve_region(None).unwrap(), "CA");
        assert_eq!(config.resolve_region(Some(" ny ")).unwrap(), "NY");
        assert!(config.resolve_region(Some("N1")).is_err());
    }

    #[test]
    fn only_known_state_codes_are_accepted() {
        assert_eq!(normalize_state("pr").unwrap(), "PR");
        assert_eq!(normalize_state("dc").unwrap(), "DC");
        let err = normalize_state("ZZ").unwrap_err();
        assert_eq!(err.exit_code(), 2);
        assert!(STATES.windows(2).all(|w| w[0] < w[1]));
    }
}
