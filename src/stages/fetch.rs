//! Stage 2: fetch current weather for the validated location

use std::io::Write;

use chrono::Utc;
use tracing::info;

use super::reported;
use crate::config::PipelineConfig;
use crate::handoff;
use crate::models::{ResolvedLocation, WeatherReading};
use crate::weather::WeatherSource;
use crate::Result;

pub(crate) const CONTEXT: &str = "Error fetching weather";

/// Read the location hand-off file and fetch weather for it.
///
/// Fails before any request when the hand-off file or the API key is missing.
pub fn fetch_weather<S, W>(config: &PipelineConfig, source: &S, out: &mut W) -> Result<WeatherReading>
where
    S: WeatherSource + ?Sized,
    W: Write,
{
    reported(out, CONTEXT, |out| {
        let location = handoff::read_location(&config.handoff.location_file)?;
        fetch(config, &location, source, out)
    })
}

/// Fetch weather for an already resolved location
pub fn fetch_for_location<S, W>(
    config: &PipelineConfig,
    location: &ResolvedLocation,
    source: &S,
    out: &mut W,
) -> Result<WeatherReading>
where
    S: WeatherSource + ?Sized,
    W: Write,
{
    reported(out, CONTEXT, |out| fetch(config, location, source, out))
}

fn fetch<S, W>(
    config: &PipelineConfig,
    location: &ResolvedLocation,
    source: &S,
    out: &mut W,
) -> Result<WeatherReading>
where
    S: WeatherSource + ?Sized,
    W: Write,
{
    let api_key = config.require_api_key()?;
    let units = &config.weather.units;

    writeln!(out, "🌤️  Fetching weather for: {}", location.address)?;
    writeln!(out, "   Coordinates: {}", location.format_coordinates())?;
    writeln!(out, "   Units: {units}")?;

    let conditions = source.current(location, api_key, units)?;

    let reading = WeatherReading {
        location: location.address.clone(),
        temperature: conditions.temperature,
        feels_like: conditions.feels_like,
        description: conditions.description,
        humidity: conditions.humidity,
        wind_speed: conditions.wind_speed,
        temp_unit: units.temperature_symbol().to_string(),
        speed_unit: units.speed_symbol().to_string(),
        timestamp: WeatherReading::format_timestamp(Utc::now()),
    };

    writeln!(out, "\n✅ Weather data retrieved successfully!")?;
    writeln!(out, "   Temperature: {}", reading.format_temperature())?;
    writeln!(out, "   Feels like: {}", reading.format_feels_like())?;
    writeln!(out, "   Conditions: {}", reading.description)?;
    writeln!(out, "   Humidity: {}%", reading.humidity)?;
    writeln!(out, "   Wind: {}", reading.format_wind())?;

    handoff::write_weather(&config.handoff.weather_file, &reading)?;
    info!("Saved weather data to {}", config.handoff.weather_file.display());
    Ok(reading)
}
