//! Place name → coordinates

use serde::Deserialize;

use super::normalize_whitespace;
use crate::config::Endpoint;
use crate::error::LookupError;
use crate::state::Coordinate;

const PROVIDER: &str = "geocoding";

#[derive(Debug, Deserialize)]
struct GeocodingResponse {
    #[serde(default)]
    results: Vec<GeocodingResult>,
}

#[derive(Debug, Deserialize)]
struct GeocodingResult {
    geometry: Geometry,
}

#[derive(Debug, Deserialize)]
struct Geometry {
    lat: f64,
    lng: f64,
}

/// Build the free-text query sent to the provider
pub fn place_query(city: &str, region: &str, country: &str) -> String {
    [city, region, country]
        .iter()
        .map(|part| normalize_whitespace(part))
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(", ")
}

#[derive(Clone, Debug)]
pub struct GeocoderClient {
    http: reqwest::Client,
    endpoint: Endpoint,
}

impl GeocoderClient {
    pub fn new(http: reqwest::Client, endpoint: Endpoint) -> Self {
        Self { http, endpoint }
    }

    /// Resolve a city to coordinates. The first match wins; zero matches is
    /// [`LookupError::NotFound`].
    pub async fn resolve(
        &self,
        city: &str,
        region: &str,
        country: &str,
    ) -> Result<Coordinate, LookupError> {
        let key = self.endpoint.require_key(PROVIDER)?;
        let query = place_query(city, region, country);
        let url = format!(
            "{}?q={}&key={}&limit=1&no_annotations=1",
            self.endpoint.base_url,
            urlencoding::encode(&query),
            urlencoding::encode(key)
        );

        let unavailable = |e: reqwest::Error| {
            tracing::warn!(query = %query, error = %e, "geocoding request failed");
            LookupError::GeocodingUnavailable(e.to_string())
        };
        let data: GeocodingResponse = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(unavailable)?
            .error_for_status()
            .map_err(unavailable)?
            .json()
            .await
            .map_err(unavailable)?;

        let coordinate = data
            .results
            .into_iter()
            .next()
            .map(|result| Coordinate {
                latitude: result.geometry.lat,
                longitude: result.geometry.lng,
            })
            .ok_or_else(|| LookupError::NotFound(query.clone()))?;

        tracing::debug!(query = %query, ?coordinate, "geocoded");
        Ok(coordinate)
    }
}
