//! Minimal blocking HTTP seam used by the providers.
//!
//! Providers only ever issue GETs and read the body as text, so the trait is
//! just that. The production implementation wraps `reqwest::blocking::Client`;
//! tests swap in canned responses.

use std::time::Duration;

use reqwest::blocking::Client;

use crate::error::AppError;

/// Status and body of a completed request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

pub trait HttpTransport: Send + Sync {
    /// Issue a GET. `Err` means the request never produced a response.
    fn get(
        &self,
        url: &str,
        query: &[(&str, &str)],
        headers: &[(&str, &str)],
    ) -> Result<HttpResponse, AppError>;
}

pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    pub fn new(timeout: Duration) -> Result<Self, AppError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("mortgage-rates/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| AppError::upstream(format!("Failed to build HTTP client: {e}")))?;
        Ok(Self { client })
    }
}

impl HttpTransport for ReqwestTransport {
    fn get(
        &self,
        url: &str,
        query: &[(&str, &str)],
        headers: &[(&str, &str)],
    ) -> Result<HttpResponse, AppError> {
        let mut req = self.client.get(url).query(query);
        for (name, value) in headers {
            req = req.header(*name, *value);
        }

        // Query strings may carry an API key, so only the base URL is logged.
        log::debug!("GET {url}");
        let resp = req
            .send()
            .map_err(|e| AppError::upstream(format!("Request to {url} failed: {}", e.without_url())))?;

        let status = resp.status().as_u16();
        let body = resp
            .text()
            .map_err(|e| AppError::upstream(format!("Failed to read response from {url}: {}", e.without_url())))?;

        Ok(HttpResponse { status, body })
    }
}
