//! Upstream rate providers.
//!
//! - FRED weekly survey series, fetched concurrently (`fred`)
//! - commercial per-state API (`regional`)
//! - the HTTP seam both use (`http`) and the settle-all combinator (`gather`)

use std::sync::Arc;

use crate::config::{Config, ProviderKind};
use crate::domain::RateSet;
use crate::error::AppError;

pub mod fred;
pub mod gather;
pub mod http;
pub mod regional;

pub use fred::FredProvider;
pub use http::{HttpResponse, HttpTransport, ReqwestTransport};
pub use regional::RegionalProvider;

pub trait RateProvider: Send + Sync {
    fn name(&self) -> &'static str;

    /// Fetch current rates. `Err` is a total failure; individual products that
    /// could not be fetched are simply absent from the returned set.
    fn fetch_rates(&self, region: Option<&str>) -> Result<RateSet, AppError>;
}

/// Build the configured provider over the real HTTP client.
///
/// Returns `Ok(None)` when the demo set should be shown instead (demo provider
/// selected, or the provider's key is missing or a placeholder).
pub fn build_provider(config: &Config) -> Result<Option<Box<dyn RateProvider>>, AppError> {
    if config.provider == ProviderKind::Demo {
        return Ok(None);
    }
    let transport: Arc<dyn HttpTransport> = Arc::new(ReqwestTransport::new(config.http_timeout)?);
    Ok(build_provider_with(config, transport))
}

/// Same as [`build_provider`] over an explicit transport.
pub fn build_provider_with(
    config: &Config,
    transport: Arc<dyn HttpTransport>,
) -> Option<Box<dyn RateProvider>> {
    match config.provider {
        ProviderKind::Demo => None,
        ProviderKind::Fred => {
            let Some(key) = &config.fred_api_key else {
                log::info!("FRED_API_KEY not set; showing demo rates");
                return None;
            };
            Some(Box::new(FredProvider::new(transport, config.fred_base_url.clone(), key.clone())))
        }
        ProviderKind::Regional => {
            let (Some(key), Some(base_url)) = (&config.regional_api_key, &config.regional_base_url) else {
                log::info!("RATES_API_KEY or RATES_API_BASE_URL not set; showing demo rates");
                return None;
            };
            Some(Box::new(RegionalProvider::new(
                transport,
                base_url.clone(),
                key.clone(),
                config.default_state.clone(),
            )))
        }
    }
}
