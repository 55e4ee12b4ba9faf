//! Full lookups against mock providers using wiremock.
//!
//! Effects are executed by the real `Services` and fed back through the
//! reducer until nothing is left to do, the same loop the runtime drives.

use std::collections::VecDeque;
use std::time::Duration;

use pretty_assertions::assert_eq;
use serde_json::json;
use skyline::{
    action::Action,
    api::{self, WeatherClient},
    config::{ApiConfig, Endpoint},
    effect::Effect,
    error::LookupError,
    orchestrator::SearchRequest,
    reducer::reducer,
    services::Services,
    state::{AppState, Coordinate, DefaultChoice},
};
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const DIRECTORY_KEY: &str = "directory-test-key";
const GEOCODING_KEY: &str = "geocoding-test-key";
const WEATHER_KEY: &str = "weather-test-key";

fn config_for(server: &MockServer) -> ApiConfig {
    let base = server.uri();
    ApiConfig {
        directory: Endpoint::new(format!("{base}/v1"), Some(DIRECTORY_KEY.into())),
        geocoding: Endpoint::new(format!("{base}/geocode/v1/json"), Some(GEOCODING_KEY.into())),
        weather: Endpoint::new(format!("{base}/data/2.5/weather"), Some(WEATHER_KEY.into())),
        timeout: Duration::from_secs(5),
    }
}

fn jamalpur_request() -> SearchRequest {
    SearchRequest {
        city: "Jamalpur".into(),
        region: "Bihar".into(),
        country: "IN".into(),
    }
}

fn jamalpur_weather() -> serde_json::Value {
    json!({
        "coord": {"lon": 86.49, "lat": 25.31},
        "weather": [{
            "id": 802,
            "main": "Clouds",
            "description": "scattered clouds",
            "icon": "03d"
        }],
        "main": {
            "temp": 300.15,
            "feels_like": 301.2,
            "temp_min": 299.0,
            "temp_max": 301.0,
            "pressure": 1008,
            "humidity": 62
        },
        "wind": {"speed": 3.6, "deg": 90},
        "clouds": {"all": 40},
        "rain": {"1h": 0.25},
        "sys": {"country": "IN"},
        "name": "Jamalpur"
    })
}

async fn mount_directory(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/v1/countries"))
        .and(header("X-CSCAPI-KEY", DIRECTORY_KEY))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 101, "name": "India", "iso2": "IN"},
            {"id": 153, "name": "Nepal", "iso2": "NP"}
        ])))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/v1/countries/IN/states"))
        .and(header("X-CSCAPI-KEY", DIRECTORY_KEY))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 4037, "name": "Bihar", "iso2": "BR"},
            {"id": 4039, "name": "Madhya Pradesh", "iso2": "MP"}
        ])))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/v1/countries/IN/states/BR/cities"))
        .and(header("X-CSCAPI-KEY", DIRECTORY_KEY))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 57589, "name": "Bhagalpur"},
            {"id": 57626, "name": "Jamalpur"},
            {"id": 57706, "name": "Patna"}
        ])))
        .mount(server)
        .await;
}

async fn mount_geocoder(server: &MockServer, results: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path("/geocode/v1/json"))
        .and(query_param("q", "Jamalpur, Bihar, IN"))
        .and(query_param("key", GEOCODING_KEY))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "results": results })))
        .mount(server)
        .await;
}

/// Dispatch `action`, run every effect it causes and feed the results back
async fn settle(services: &Services, state: &mut AppState, action: Action) {
    let mut queue = VecDeque::from([action]);
    while let Some(action) = queue.pop_front() {
        let result = reducer(state, action);
        for effect in result.effects {
            queue.push_back(services.run(effect).await);
        }
    }
}

#[tokio::test]
async fn test_lookup_jamalpur_bihar_india() {
    let server = MockServer::start().await;
    mount_directory(&server).await;
    mount_geocoder(&server, json!([{"geometry": {"lat": 25.31, "lng": 86.49}}])).await;
    Mock::given(method("GET"))
        .and(path("/data/2.5/weather"))
        .and(query_param("lat", "25.31"))
        .and(query_param("lon", "86.49"))
        .and(query_param("appid", WEATHER_KEY))
        .respond_with(ResponseTemplate::new(200).set_body_json(jamalpur_weather()))
        .expect(1)
        .mount(&server)
        .await;

    let services = Services::new(&config_for(&server)).unwrap();
    let mut state = AppState::new(
        DefaultChoice::Preferred("IN".into()),
        DefaultChoice::Preferred("Bihar".into()),
        DefaultChoice::Preferred("Jamalpur".into()),
    );

    settle(&services, &mut state, Action::Init).await;
    assert!(state.is_settled());
    assert_eq!(state.selected_region().map(|r| r.name.as_str()), Some("Bihar"));
    assert_eq!(state.city_name(), Some("Jamalpur"));

    settle(&services, &mut state, Action::SearchSubmit).await;

    let reading = state.reading.as_ref().expect("reading published");
    assert_eq!(reading.country_code, "IN");
    assert!(reading.temperature_kelvin > 0.0);
    assert_eq!(reading.location_name, "Jamalpur");
    assert_eq!(
        reading.coordinate,
        Coordinate {
            latitude: 25.31,
            longitude: 86.49,
        }
    );
    assert_eq!(reading.rain_1h_mm, 0.25);
    assert_eq!(state.search_error, None);
    assert!(!state.searching);
}

#[tokio::test]
async fn test_unknown_place_never_reaches_weather_provider() {
    let server = MockServer::start().await;
    mount_geocoder(&server, json!([])).await;
    Mock::given(method("GET"))
        .and(path("/data/2.5/weather"))
        .respond_with(ResponseTemplate::new(200).set_body_json(jamalpur_weather()))
        .expect(0)
        .mount(&server)
        .await;

    let services = Services::new(&config_for(&server)).unwrap();
    let action = services
        .run(Effect::Search {
            request: jamalpur_request(),
            generation: 7,
        })
        .await;

    assert_eq!(
        action,
        Action::SearchDidError {
            generation: 7,
            error: LookupError::NotFound("Jamalpur, Bihar, IN".into()),
        }
    );
}

#[tokio::test]
async fn test_missing_directory_key_is_configuration_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/countries"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(0)
        .mount(&server)
        .await;

    let mut config = config_for(&server);
    config.directory = Endpoint::new(format!("{}/v1", server.uri()), None);
    let services = Services::new(&config).unwrap();

    let action = services.run(Effect::LoadCountries).await;

    assert_eq!(
        action,
        Action::CountriesDidError(LookupError::Configuration(
            "missing directory API key".into()
        ))
    );
}

#[tokio::test]
async fn test_directory_failure_absorbed_into_list() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/countries"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let services = Services::new(&config_for(&server)).unwrap();
    let mut state = AppState::default();

    settle(&services, &mut state, Action::Init).await;

    assert!(state.countries.is_failed());
    assert!(state.country_list().is_empty());
    assert_eq!(state.selection.country, None);
    // Search errors are for the search flow only
    assert_eq!(state.search_error, None);
}

#[tokio::test]
async fn test_weather_rejection_reported_as_weather_unavailable() {
    let server = MockServer::start().await;
    mount_geocoder(&server, json!([{"geometry": {"lat": 25.31, "lng": 86.49}}])).await;
    Mock::given(method("GET"))
        .and(path("/data/2.5/weather"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "cod": 401,
            "message": "Invalid API key"
        })))
        .mount(&server)
        .await;

    let services = Services::new(&config_for(&server)).unwrap();
    let action = services
        .run(Effect::Search {
            request: jamalpur_request(),
            generation: 1,
        })
        .await;

    assert!(matches!(
        action,
        Action::SearchDidError {
            generation: 1,
            error: LookupError::WeatherUnavailable(_),
        }
    ));
}

#[tokio::test]
async fn test_slow_geocoder_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/geocode/v1/json"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"results": []}))
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let mut config = config_for(&server);
    config.timeout = Duration::from_millis(200);
    let services = Services::new(&config).unwrap();

    let action = services
        .run(Effect::Search {
            request: jamalpur_request(),
            generation: 1,
        })
        .await;

    assert!(matches!(
        action,
        Action::SearchDidError {
            error: LookupError::GeocodingUnavailable(_),
            ..
        }
    ));
}

#[tokio::test]
async fn test_missing_rain_reads_as_zero() {
    let server = MockServer::start().await;
    let mut body = jamalpur_weather();
    if let Some(fields) = body.as_object_mut() {
        fields.remove("rain");
    }
    Mock::given(method("GET"))
        .and(path("/data/2.5/weather"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(&server)
        .await;

    let config = config_for(&server);
    let client = WeatherClient::new(api::http_client(config.timeout).unwrap(), config.weather);

    let reading = client
        .fetch_current(Coordinate {
            latitude: 25.31,
            longitude: 86.49,
        })
        .await
        .unwrap();

    assert_eq!(reading.rain_1h_mm, 0.0);
    assert_eq!(reading.humidity_percent, 62.0);
    assert_eq!(reading.condition_description, "scattered clouds");
}
