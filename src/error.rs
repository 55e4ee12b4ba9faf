//! Error kinds shared by the clients, the orchestrator and the reducer

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Everything that can go wrong between a selection and a weather reading.
///
/// Errors travel inside actions, so they stay plain data (cloneable,
/// serializable) and carry the provider message as a string.
#[derive(thiserror::Error, Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub enum LookupError {
    #[error("location directory unavailable: {0}")]
    DirectoryUnavailable(String),
    #[error("no location found for \"{0}\"")]
    NotFound(String),
    #[error("geocoding service unavailable: {0}")]
    GeocodingUnavailable(String),
    #[error("weather service unavailable: {0}")]
    WeatherUnavailable(String),
    #[error("choose a country, region and city before searching")]
    IncompleteSelection,
    #[error("configuration error: {0}")]
    Configuration(String),
}

impl LookupError {
    /// Short label for the status bar
    pub fn kind(&self) -> &'static str {
        match self {
            LookupError::DirectoryUnavailable(_) => "directory",
            LookupError::NotFound(_) => "not found",
            LookupError::GeocodingUnavailable(_) => "geocoding",
            LookupError::WeatherUnavailable(_) => "weather",
            LookupError::IncompleteSelection => "selection",
            LookupError::Configuration(_) => "config",
        }
    }
}
