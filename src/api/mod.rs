//! HTTP clients for the three providers

pub mod directory;
pub mod geocoder;
pub mod weather;

use std::time::Duration;

pub use directory::DirectoryClient;
pub use geocoder::GeocoderClient;
pub use weather::WeatherClient;

use crate::error::LookupError;

const USER_AGENT: &str = concat!("skyline/", env!("CARGO_PKG_VERSION"));

/// Shared client with a bounded request timeout. A hung provider becomes
/// the caller's "unavailable" error instead of a stuck task.
pub fn http_client(timeout: Duration) -> Result<reqwest::Client, LookupError> {
    reqwest::Client::builder()
        .timeout(timeout)
        .user_agent(USER_AGENT)
        .build()
        .map_err(|e| LookupError::Configuration(format!("failed to build HTTP client: {e}")))
}

/// Collapse runs of whitespace into single spaces and trim the ends
pub fn normalize_whitespace(input: &str) -> String {
    input.split_whitespace().collect::<Vec<_>>().join(" ")
}
