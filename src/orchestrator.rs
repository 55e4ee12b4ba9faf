//! Search orchestration: geocode the selection, then fetch its weather

use async_trait::async_trait;

use crate::api::{GeocoderClient, WeatherClient};
use crate::error::LookupError;
use crate::state::{AppState, Coordinate, WeatherReading};

/// A complete selection, reduced to the names the geocoder needs
#[derive(Clone, Debug, PartialEq)]
pub struct SearchRequest {
    pub city: String,
    /// Region display name
    pub region: String,
    /// Country code
    pub country: String,
}

impl SearchRequest {
    /// Fails with [`LookupError::IncompleteSelection`] unless a country,
    /// region and city are all chosen.
    pub fn from_state(state: &AppState) -> Result<Self, LookupError> {
        let country = state
            .selection
            .country
            .clone()
            .ok_or(LookupError::IncompleteSelection)?;
        let region = state
            .selected_region()
            .ok_or(LookupError::IncompleteSelection)?;
        let city = state
            .selected_city()
            .ok_or(LookupError::IncompleteSelection)?;
        Ok(Self {
            city: city.name.clone(),
            region: region.name.clone(),
            country,
        })
    }
}

#[async_trait]
pub trait Geocode: Send + Sync {
    async fn resolve(
        &self,
        city: &str,
        region: &str,
        country: &str,
    ) -> Result<Coordinate, LookupError>;
}

#[async_trait]
pub trait CurrentConditions: Send + Sync {
    async fn fetch_current(&self, at: Coordinate) -> Result<WeatherReading, LookupError>;
}

#[async_trait]
impl Geocode for GeocoderClient {
    async fn resolve(
        &self,
        city: &str,
        region: &str,
        country: &str,
    ) -> Result<Coordinate, LookupError> {
        GeocoderClient::resolve(self, city, region, country).await
    }
}

#[async_trait]
impl CurrentConditions for WeatherClient {
    async fn fetch_current(&self, at: Coordinate) -> Result<WeatherReading, LookupError> {
        WeatherClient::fetch_current(self, at).await
    }
}

/// Runs Geocoder → Weather for one request. Stops at the first failure and
/// never retries; superseding older searches is the reducer's job.
pub struct SearchOrchestrator {
    geocoder: Box<dyn Geocode>,
    weather: Box<dyn CurrentConditions>,
}

impl SearchOrchestrator {
    pub fn new(geocoder: Box<dyn Geocode>, weather: Box<dyn CurrentConditions>) -> Self {
        Self { geocoder, weather }
    }

    pub async fn search(&self, request: &SearchRequest) -> Result<WeatherReading, LookupError> {
        let coordinate = self
            .geocoder
            .resolve(&request.city, &request.region, &request.country)
            .await?;
        self.weather.fetch_current(coordinate).await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use super::*;

    struct FixedGeocoder(Option<Coordinate>);

    #[async_trait]
    impl Geocode for FixedGeocoder {
        async fn resolve(
            &self,
            city: &str,
            _region: &str,
            _country: &str,
        ) -> Result<Coordinate, LookupError> {
            self.0.ok_or_else(|| LookupError::NotFound(city.to_string()))
        }
    }

    struct CountingWeather(Arc<AtomicUsize>);

    #[async_trait]
    impl CurrentConditions for CountingWeather {
        async fn fetch_current(&self, _at: Coordinate) -> Result<WeatherReading, LookupError> {
            self.0.fetch_add(1, Ordering::SeqCst);
            Ok(WeatherReading {
                country_code: "IN".into(),
                temperature_kelvin: 300.0,
                ..Default::default()
            })
        }
    }

    fn request() -> SearchRequest {
        SearchRequest {
            city: "Jamalpur".into(),
            region: "Bihar".into(),
            country: "IN".into(),
        }
    }

    #[tokio::test]
    async fn test_search_geocodes_then_fetches() {
        let calls = Arc::new(AtomicUsize::new(0));
        let orchestrator = SearchOrchestrator::new(
            Box::new(FixedGeocoder(Some(Coordinate {
                latitude: 25.3,
                longitude: 86.5,
            }))),
            Box::new(CountingWeather(calls.clone())),
        );

        let reading = orchestrator.search(&request()).await.unwrap();
        assert_eq!(reading.country_code, "IN");
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_not_found_skips_weather() {
        let calls = Arc::new(AtomicUsize::new(0));
        let orchestrator = SearchOrchestrator::new(
            Box::new(FixedGeocoder(None)),
            Box::new(CountingWeather(calls.clone())),
        );

        let result = orchestrator.search(&request()).await;
        assert_eq!(result, Err(LookupError::NotFound("Jamalpur".into())));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }
}
