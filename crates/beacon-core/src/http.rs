//! Shared HTTP client construction for consistent timeout and TLS configuration.

use std::time::Duration;

use crate::config::HttpConfig;

/// Create an HTTP client configured from [`HttpConfig`].
///
/// Config: connect and request timeouts from `http`, rustls TLS,
/// `beacon/{version}` user-agent, redirect limit 10.
///
/// # Errors
///
/// Returns an error if the TLS backend cannot be initialized.
pub fn build_client(http: &HttpConfig) -> Result<reqwest::Client, reqwest::Error> {
    reqwest::Client::builder()
        .connect_timeout(Duration::from_secs(http.connect_timeout_secs))
        .timeout(Duration::from_secs(http.timeout_secs))
        .user_agent(concat!("beacon/", env!("CARGO_PKG_VERSION")))
        .redirect(reqwest::redirect::Policy::limited(10))
        .build()
}

/// Create an HTTP client with the default Beacon timeouts.
///
/// # Panics
///
/// Panics if the TLS backend cannot be initialized (should never happen with rustls).
#[must_use]
pub fn default_client() -> reqwest::Client {
    build_client(&HttpConfig::default()).expect("default HTTP client construction must not fail")
}
