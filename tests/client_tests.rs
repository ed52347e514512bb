//! HTTP client tests against mock geocoding and weather services

use weather_pipeline::config::{GeocoderConfig, WeatherConfig};
use weather_pipeline::{
    Geocoder, NominatimGeocoder, OpenWeatherMapClient, PipelineError, ResolvedLocation, UnitsMode,
    WeatherSource,
};
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn geocoder_for(server: &MockServer) -> GeocoderConfig {
    GeocoderConfig {
        base_url: server.uri(),
        ..GeocoderConfig::default()
    }
}

fn weather_for(server: &MockServer) -> WeatherConfig {
    WeatherConfig {
        base_url: server.uri(),
        ..WeatherConfig::default()
    }
}

fn london() -> ResolvedLocation {
    ResolvedLocation::new(51.5073219, -0.1276474, "London, England, United Kingdom".to_string())
}

fn weather_body() -> serde_json::Value {
    serde_json::json!({
        "weather": [{"id": 803, "main": "Clouds", "description": "broken clouds", "icon": "04d"}],
        "main": {"temp": 58.3, "feels_like": 57.1, "temp_min": 55.0, "temp_max": 60.1, "humidity": 77},
        "wind": {"speed": 9.22, "deg": 240},
        "name": "London"
    })
}

// The clients are blocking, so they run off the async test runtime.
async fn blocking<T: Send + 'static>(f: impl FnOnce() -> T + Send + 'static) -> T {
    tokio::task::spawn_blocking(f).await.unwrap()
}

#[tokio::test(flavor = "multi_thread")]
async fn test_geocode_match() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("q", "London, UK"))
        .and(query_param("format", "json"))
        .and(query_param("limit", "1"))
        .and(header("user-agent", "gitlab-weather-app"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            {
                "place_id": 1,
                "lat": "51.5073219",
                "lon": "-0.1276474",
                "display_name": "London, Greater London, England, United Kingdom"
            }
        ])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = geocoder_for(&mock_server);
    let result = blocking(move || NominatimGeocoder::new(&config)?.geocode("London, UK")).await;

    let location = result.unwrap().unwrap();
    assert_eq!(location.latitude, 51.507_321_9);
    assert_eq!(location.longitude, -0.127_647_4);
    assert_eq!(location.address, "London, Greater London, England, United Kingdom");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_geocode_no_match() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .mount(&mock_server)
        .await;

    let config = geocoder_for(&mock_server);
    let result = blocking(move || NominatimGeocoder::new(&config)?.geocode("Atlantis")).await;

    assert!(result.unwrap().is_none());
}

#[tokio::test(flavor = "multi_thread")]
async fn test_geocode_service_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&mock_server)
        .await;

    let config = geocoder_for(&mock_server);
    let result = blocking(move || NominatimGeocoder::new(&config)?.geocode("London")).await;

    let err = result.unwrap_err();
    assert_eq!(err.status().map(|s| s.as_u16()), Some(503));
    assert!(err.to_string().contains("503"));
}

#[test]
fn test_geocode_connection_refused_has_no_status() {
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    let config = GeocoderConfig {
        base_url: format!("http://127.0.0.1:{port}"),
        ..GeocoderConfig::default()
    };

    let err = NominatimGeocoder::new(&config)
        .unwrap()
        .geocode("London")
        .unwrap_err();

    assert!(matches!(err, PipelineError::Upstream { status: None, .. }));
    assert!(err.hint().is_none());
}

#[tokio::test(flavor = "multi_thread")]
async fn test_current_weather_imperial() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/weather"))
        .and(query_param("lat", "51.5073219"))
        .and(query_param("lon", "-0.1276474"))
        .and(query_param("appid", "test-key"))
        .and(query_param("units", "imperial"))
        .respond_with(ResponseTemplate::new(200).set_body_json(weather_body()))
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = weather_for(&mock_server);
    let result = blocking(move || {
        OpenWeatherMapClient::new(&config)?.current(&london(), "test-key", &UnitsMode::Imperial)
    })
    .await;

    let conditions = result.unwrap();
    assert_eq!(conditions.temperature, 58.3);
    assert_eq!(conditions.feels_like, 57.1);
    assert_eq!(conditions.humidity, 77.0);
    assert_eq!(conditions.description, "broken clouds");
    assert_eq!(conditions.wind_speed, 9.22);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_unknown_units_are_passed_through() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/weather"))
        .and(query_param("units", "standard"))
        .respond_with(ResponseTemplate::new(200).set_body_json(weather_body()))
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = weather_for(&mock_server);
    let result = blocking(move || {
        OpenWeatherMapClient::new(&config)?.current(
            &london(),
            "test-key",
            &UnitsMode::from_raw("standard"),
        )
    })
    .await;

    assert!(result.is_ok());
}

#[tokio::test(flavor = "multi_thread")]
async fn test_unauthorized_keeps_status_and_hides_key() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/weather"))
        .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
            "cod": 401,
            "message": "Invalid API key. Please see https://openweathermap.org/faq#error401 for more info."
        })))
        .mount(&mock_server)
        .await;

    let config = weather_for(&mock_server);
    let result = blocking(move || {
        OpenWeatherMapClient::new(&config)?.current(&london(), "super-secret-key", &UnitsMode::Metric)
    })
    .await;

    let err = result.unwrap_err();
    assert_eq!(err.status().map(|s| s.as_u16()), Some(401));
    assert!(err.hint().unwrap().contains("WEATHER_API_KEY"));
    assert!(!err.to_string().contains("super-secret-key"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_malformed_weather_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/weather"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"cod": 200})))
        .mount(&mock_server)
        .await;

    let config = weather_for(&mock_server);
    let result = blocking(move || {
        OpenWeatherMapClient::new(&config)?.current(&london(), "test-key", &UnitsMode::Metric)
    })
    .await;

    assert!(matches!(result, Err(PipelineError::Parse { .. })));
}
