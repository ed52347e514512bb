//! OpenWeatherMap current-conditions client

use std::time::Instant;

use reqwest::blocking::Client;
use serde::Deserialize;
use tracing::{debug, info, instrument, warn};

use crate::config::WeatherConfig;
use crate::models::{ResolvedLocation, UnitsMode};
use crate::{PipelineError, Result};

/// Raw values pulled out of a weather service response
#[derive(Debug, Clone, PartialEq)]
pub struct CurrentConditions {
    pub temperature: f64,
    pub feels_like: f64,
    pub humidity: f64,
    pub description: String,
    pub wind_speed: f64,
}

/// Source of current weather conditions for a coordinate pair
pub trait WeatherSource {
    fn current(
        &self,
        location: &ResolvedLocation,
        api_key: &str,
        units: &UnitsMode,
    ) -> Result<CurrentConditions>;
}

mod openweathermap {
    use super::{CurrentConditions, Deserialize};
    use crate::{PipelineError, Result};

    /// `/weather` response, reduced to the fields the pipeline reads
    #[derive(Debug, Deserialize)]
    pub struct CurrentResponse {
        pub main: Main,
        pub weather: Vec<Condition>,
        pub wind: Wind,
    }

    #[derive(Debug, Deserialize)]
    pub struct Main {
        pub temp: f64,
        pub feels_like: f64,
        pub humidity: f64,
    }

    #[derive(Debug, Deserialize)]
    pub struct Condition {
        pub description: String,
    }

    #[derive(Debug, Deserialize)]
    pub struct Wind {
        pub speed: f64,
    }

    impl TryFrom<CurrentResponse> for CurrentConditions {
        type Error = PipelineError;

        fn try_from(response: CurrentResponse) -> Result<Self> {
            let description = response
                .weather
                .into_iter()
                .next()
                .map(|condition| condition.description)
                .ok_or_else(|| PipelineError::parse("weather response has no conditions"))?;

            Ok(Self {
                temperature: response.main.temp,
                feels_like: response.main.feels_like,
                humidity: response.main.humidity,
                description,
                wind_speed: response.wind.speed,
            })
        }
    }
}

/// Blocking OpenWeatherMap client
pub struct OpenWeatherMapClient {
    client: Client,
    base_url: String,
}

impl OpenWeatherMapClient {
    pub fn new(config: &WeatherConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout())
            .user_agent(concat!("weather-pipeline/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }
}

impl WeatherSource for OpenWeatherMapClient {
    #[instrument(skip(self, api_key), fields(lat = location.latitude, lon = location.longitude))]
    fn current(
        &self,
        location: &ResolvedLocation,
        api_key: &str,
        units: &UnitsMode,
    ) -> Result<CurrentConditions> {
        debug!("Requesting {}/weather with units={}", self.base_url, units);
        let url = format!(
            "{}/weather?lat={}&lon={}&appid={}&units={}",
            self.base_url,
            location.latitude,
            location.longitude,
            urlencoding::encode(api_key),
            urlencoding::encode(units.as_str())
        );

        let start_time = Instant::now();
        let response = self.client.get(&url).send()?;
        let status = response.status();
        if status == reqwest::StatusCode::UNAUTHORIZED {
            warn!("Weather API rejected the API key (HTTP 401)");
        }
        let response = response.error_for_status()?;

        let body: openweathermap::CurrentResponse = response.json().map_err(|e| {
            PipelineError::parse(format!("invalid weather response: {}", e.without_url()))
        })?;
        let conditions = CurrentConditions::try_from(body)?;

        info!(
            "Retrieved current weather in {:.3}s",
            start_time.elapsed().as_secs_f64()
        );
        Ok(conditions)
    }
}
