//! Country / state / city directory client

use serde::Deserialize;

use crate::config::Endpoint;
use crate::error::LookupError;
use crate::state::{City, Country, Region};

const PROVIDER: &str = "directory";
const API_KEY_HEADER: &str = "X-CSCAPI-KEY";

#[derive(Debug, Deserialize)]
struct DivisionEntry {
    #[serde(alias = "code")]
    iso2: Option<String>,
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CityEntry {
    name: Option<String>,
}

fn divisions(entries: Vec<DivisionEntry>) -> impl Iterator<Item = (String, String)> {
    entries.into_iter().filter_map(|entry| {
        let code = entry.iso2?.trim().to_string();
        let name = entry.name?.trim().to_string();
        (!code.is_empty() && !name.is_empty()).then_some((code, name))
    })
}

/// Lists administrative divisions from the directory provider
#[derive(Clone, Debug)]
pub struct DirectoryClient {
    http: reqwest::Client,
    endpoint: Endpoint,
}

impl DirectoryClient {
    pub fn new(http: reqwest::Client, endpoint: Endpoint) -> Self {
        Self { http, endpoint }
    }

    pub async fn fetch_countries(&self) -> Result<Vec<Country>, LookupError> {
        let url = format!("{}/countries", self.endpoint.base_url);
        let entries: Vec<DivisionEntry> = self.get_json(&url).await?;
        let countries: Vec<Country> = divisions(entries)
            .map(|(code, name)| Country { code, name })
            .collect();
        tracing::debug!(count = countries.len(), "loaded countries");
        Ok(countries)
    }

    /// Regions of `country`; empty without a request when the country is unset
    pub async fn fetch_states(&self, country: Option<&str>) -> Result<Vec<Region>, LookupError> {
        let Some(country) = country.filter(|c| !c.is_empty()) else {
            return Ok(Vec::new());
        };
        let url = format!(
            "{}/countries/{}/states",
            self.endpoint.base_url,
            urlencoding::encode(country)
        );
        let entries: Vec<DivisionEntry> = self.get_json(&url).await?;
        let regions: Vec<Region> = divisions(entries)
            .map(|(code, name)| Region { code, name })
            .collect();
        tracing::debug!(country, count = regions.len(), "loaded regions");
        Ok(regions)
    }

    /// Cities of a region; empty without a request when either code is unset
    pub async fn fetch_cities(
        &self,
        country: Option<&str>,
        region: Option<&str>,
    ) -> Result<Vec<City>, LookupError> {
        let (Some(country), Some(region)) = (
            country.filter(|c| !c.is_empty()),
            region.filter(|r| !r.is_empty()),
        ) else {
            return Ok(Vec::new());
        };
        let url = format!(
            "{}/countries/{}/states/{}/cities",
            self.endpoint.base_url,
            urlencoding::encode(country),
            urlencoding::encode(region)
        );
        let entries: Vec<CityEntry> = self.get_json(&url).await?;
        let cities: Vec<City> = entries
            .into_iter()
            .filter_map(|entry| entry.name)
            .map(|name| name.trim().to_string())
            .filter(|name| !name.is_empty())
            .map(|name| City { name })
            .collect();
        tracing::debug!(country, region, count = cities.len(), "loaded cities");
        Ok(cities)
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, url: &str) -> Result<T, LookupError> {
        let key = self.endpoint.require_key(PROVIDER)?;
        let unavailable = |e: reqwest::Error| {
            tracing::warn!(url, error = %e, "directory request failed");
            LookupError::DirectoryUnavailable(e.to_string())
        };
        let response = self
            .http
            .get(url)
            .header(API_KEY_HEADER, key)
            .send()
            .await
            .map_err(unavailable)?
            .error_for_status()
            .map_err(unavailable)?;
        response.json().await.map_err(unavailable)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_divisions_skip_incomplete_entries() {
        let entries: Vec<DivisionEntry> = serde_json::from_str(
            r#"[
                {"id": 1, "name": "Bihar", "iso2": "BR"},
                {"name": "No code"},
                {"name": " ", "iso2": "XX"},
                {"name": "Goa", "code": "GA"}
            ]"#,
        )
        .unwrap();

        let parsed: Vec<_> = divisions(entries).collect();
        assert_eq!(
            parsed,
            vec![
                ("BR".to_string(), "Bihar".to_string()),
                ("GA".to_string(), "Goa".to_string())
            ]
        );
    }
}
