//! Effect runtime: performs declared effects and reports back as actions

use crate::action::Action;
use crate::api::{self, DirectoryClient, GeocoderClient, WeatherClient};
use crate::config::ApiConfig;
use crate::effect::Effect;
use crate::error::LookupError;
use crate::orchestrator::SearchOrchestrator;

/// Every client the effects need, built once from the configuration
pub struct Services {
    directory: DirectoryClient,
    search: SearchOrchestrator,
}

impl Services {
    pub fn new(config: &ApiConfig) -> Result<Self, LookupError> {
        let http = api::http_client(config.timeout)?;
        Ok(Self {
            directory: DirectoryClient::new(http.clone(), config.directory.clone()),
            search: SearchOrchestrator::new(
                Box::new(GeocoderClient::new(http.clone(), config.geocoding.clone())),
                Box::new(WeatherClient::new(http, config.weather.clone())),
            ),
        })
    }

    /// Task key an effect runs under. A newer task with the same key may
    /// replace an older one; staleness is still decided by generations.
    pub fn task_key(effect: &Effect) -> &'static str {
        match effect {
            Effect::LoadCountries => "countries",
            Effect::LoadRegions { .. } => "regions",
            Effect::LoadCities { .. } => "cities",
            Effect::Search { .. } => "search",
        }
    }

    /// Perform one effect and turn its outcome into the matching result action
    pub async fn run(&self, effect: Effect) -> Action {
        match effect {
            Effect::LoadCountries => match self.directory.fetch_countries().await {
                Ok(countries) => Action::CountriesDidLoad(countries),
                Err(error) => Action::CountriesDidError(error),
            },
            Effect::LoadRegions {
                country,
                generation,
            } => match self.directory.fetch_states(Some(&country)).await {
                Ok(regions) => Action::RegionsDidLoad {
                    generation,
                    regions,
                },
                Err(error) => Action::RegionsDidError { generation, error },
            },
            Effect::LoadCities {
                country,
                region,
                generation,
            } => match self
                .directory
                .fetch_cities(Some(&country), Some(&region))
                .await
            {
                Ok(cities) => Action::CitiesDidLoad { generation, cities },
                Err(error) => Action::CitiesDidError { generation, error },
            },
            Effect::Search {
                request,
                generation,
            } => {
                tracing::info!(
                    city = %request.city,
                    region = %request.region,
                    country = %request.country,
                    generation,
                    "searching"
                );
                match self.search.search(&request).await {
                    Ok(reading) => Action::SearchDidLoad {
                        generation,
                        reading,
                    },
                    Err(error) => Action::SearchDidError { generation, error },
                }
            }
        }
    }
}
