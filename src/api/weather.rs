//! Current conditions for a coordinate

use serde::Deserialize;

use crate::config::Endpoint;
use crate::error::LookupError;
use crate::state::{Coordinate, WeatherReading};

const PROVIDER: &str = "weather";

/// Current-weather payload. Everything except the condition and the
/// temperature is optional and defaults to zero.
#[derive(Debug, Deserialize)]
struct WeatherResponse {
    #[serde(default)]
    name: String,
    #[serde(default)]
    sys: Sys,
    #[serde(default)]
    weather: Vec<Condition>,
    main: Main,
    #[serde(default)]
    wind: Wind,
    #[serde(default)]
    clouds: Clouds,
    #[serde(default)]
    rain: Precipitation,
}

#[derive(Debug, Default, Deserialize)]
struct Sys {
    #[serde(default)]
    country: String,
}

#[derive(Debug, Deserialize)]
struct Condition {
    #[serde(default)]
    main: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    icon: String,
}

#[derive(Debug, Deserialize)]
struct Main {
    temp: f64,
    feels_like: Option<f64>,
    temp_min: Option<f64>,
    temp_max: Option<f64>,
    pressure: Option<f64>,
    humidity: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
struct Wind {
    speed: Option<f64>,
    deg: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
struct Clouds {
    all: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
struct Precipitation {
    #[serde(rename = "1h")]
    one_hour: Option<f64>,
}

fn reading_from_response(
    data: WeatherResponse,
    at: Coordinate,
) -> Result<WeatherReading, LookupError> {
    let condition = data.weather.into_iter().next().ok_or_else(|| {
        LookupError::WeatherUnavailable("response has no weather condition".into())
    })?;

    Ok(WeatherReading {
        location_name: data.name,
        country_code: data.sys.country,
        coordinate: at,
        condition_main: condition.main,
        condition_description: condition.description,
        icon_code: condition.icon,
        temperature_kelvin: data.main.temp,
        feels_like_kelvin: data.main.feels_like.unwrap_or_default(),
        temp_min_kelvin: data.main.temp_min.unwrap_or_default(),
        temp_max_kelvin: data.main.temp_max.unwrap_or_default(),
        pressure_hpa: data.main.pressure.unwrap_or_default(),
        humidity_percent: data.main.humidity.unwrap_or_default(),
        wind_speed_ms: data.wind.speed.unwrap_or_default(),
        wind_direction_deg: data.wind.deg.unwrap_or_default(),
        cloudiness_percent: data.clouds.all.unwrap_or_default(),
        rain_1h_mm: data.rain.one_hour.unwrap_or_default(),
    })
}

#[derive(Clone, Debug)]
pub struct WeatherClient {
    http: reqwest::Client,
    endpoint: Endpoint,
}

impl WeatherClient {
    pub fn new(http: reqwest::Client, endpoint: Endpoint) -> Self {
        Self { http, endpoint }
    }

    pub async fn fetch_current(&self, at: Coordinate) -> Result<WeatherReading, LookupError> {
        let key = self.endpoint.require_key(PROVIDER)?;
        let url = format!(
            "{}?lat={}&lon={}&appid={}",
            self.endpoint.base_url,
            at.latitude,
            at.longitude,
            urlencoding::encode(key)
        );

        let unavailable = |e: reqwest::Error| {
            tracing::warn!(?at, error = %e, "weather request failed");
            LookupError::WeatherUnavailable(e.to_string())
        };
        let data: WeatherResponse = self
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

        let reading = reading_from_response(data, at)?;
        tracing::debug!(
            location = %reading.location_name,
            kelvin = reading.temperature_kelvin,
            "loaded current weather"
        );
        Ok(reading)
    }
}
