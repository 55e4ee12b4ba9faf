//! Provider endpoints, API keys and timeouts
//!
//! Built once at startup and handed to each client by value. Keys are
//! optional here; a client asks for its key on every request so that a
//! missing key surfaces as [`LookupError::Configuration`] at first use.

use std::time::Duration;

use crate::error::LookupError;

pub const DEFAULT_DIRECTORY_URL: &str = "https://api.countrystatecity.in/v1";
pub const DEFAULT_GEOCODING_URL: &str = "https://api.opencagedata.com/geocode/v1/json";
pub const DEFAULT_WEATHER_URL: &str = "https://api.openweathermap.org/data/2.5/weather";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Where one provider lives and how to authenticate against it
#[derive(Clone, Debug, PartialEq)]
pub struct Endpoint {
    pub base_url: String,
    pub api_key: Option<String>,
}

impl Endpoint {
    pub fn new(base_url: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.filter(|key| !key.trim().is_empty()),
        }
    }

    /// The API key, or a configuration error naming the provider
    pub fn require_key(&self, provider: &str) -> Result<&str, LookupError> {
        self.api_key
            .as_deref()
            .ok_or_else(|| LookupError::Configuration(format!("missing {provider} API key")))
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ApiConfig {
    pub directory: Endpoint,
    pub geocoding: Endpoint,
    pub weather: Endpoint,
    pub timeout: Duration,
}
