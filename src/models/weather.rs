//! Weather reading model, units mode and the nine-line hand-off format

use std::fmt;

use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::{PipelineError, Result};

/// Timestamp layout written to the weather hand-off file
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S UTC";

const HANDOFF_FIELDS: usize = 9;

/// Measurement system requested from the weather service
///
/// Anything other than `metric` or `imperial` is passed through verbatim and
/// reported in Kelvin, which is what the provider falls back to.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(from = "String")]
pub enum UnitsMode {
    #[default]
    Metric,
    Imperial,
    Standard(String),
}

impl UnitsMode {
    #[must_use]
    pub fn from_raw(raw: &str) -> Self {
        match raw {
            "metric" => UnitsMode::Metric,
            "imperial" => UnitsMode::Imperial,
            other => UnitsMode::Standard(other.to_string()),
        }
    }

    /// Value sent as the `units` query parameter
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            UnitsMode::Metric => "metric",
            UnitsMode::Imperial => "imperial",
            UnitsMode::Standard(raw) => raw,
        }
    }

    #[must_use]
    pub fn temperature_symbol(&self) -> &'static str {
        match self {
            UnitsMode::Metric => "°C",
            UnitsMode::Imperial => "°F",
            UnitsMode::Standard(_) => "K",
        }
    }

    #[must_use]
    pub fn speed_symbol(&self) -> &'static str {
        match self {
            UnitsMode::Imperial => "mph",
            UnitsMode::Metric | UnitsMode::Standard(_) => "m/s",
        }
    }
}

impl From<String> for UnitsMode {
    fn from(raw: String) -> Self {
        UnitsMode::from_raw(&raw)
    }
}

impl fmt::Display for UnitsMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Current conditions for a resolved location
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherReading {
    /// Canonical address the reading belongs to
    pub location: String,
    pub temperature: f64,
    pub feels_like: f64,
    /// Human-readable description of weather conditions
    pub description: String,
    /// Relative humidity in percent
    pub humidity: f64,
    pub wind_speed: f64,
    /// `°C`, `°F` or `K`
    pub temp_unit: String,
    /// `m/s` or `mph`
    pub speed_unit: String,
    /// UTC time the reading was taken, formatted with [`TIMESTAMP_FORMAT`]
    pub timestamp: String,
}

impl WeatherReading {
    /// Format a UTC instant the way the hand-off file stores it
    #[must_use]
    pub fn format_timestamp(time: DateTime<Utc>) -> String {
        time.format(TIMESTAMP_FORMAT).to_string()
    }

    /// Format temperature with unit
    #[must_use]
    pub fn format_temperature(&self) -> String {
        format!("{}{}", self.temperature, self.temp_unit)
    }

    #[must_use]
    pub fn format_feels_like(&self) -> String {
        format!("{}{}", self.feels_like, self.temp_unit)
    }

    /// Format wind information
    #[must_use]
    pub fn format_wind(&self) -> String {
        format!("{} {}", self.wind_speed, self.speed_unit)
    }

    /// Encode as nine newline-terminated lines in the fixed hand-off order
    #[must_use]
    pub fn to_handoff(&self) -> String {
        [
            self.location.clone(),
            self.temperature.to_string(),
            self.feels_like.to_string(),
            self.description.clone(),
            self.humidity.to_string(),
            self.wind_speed.to_string(),
            self.temp_unit.clone(),
            self.speed_unit.clone(),
            self.timestamp.clone(),
        ]
        .iter()
        .map(|field| format!("{field}\n"))
        .collect()
    }

    /// Decode the nine-line hand-off format
    pub fn from_handoff(contents: &str) -> Result<Self> {
        let lines: Vec<&str> = contents.lines().collect();
        if lines.len() != HANDOFF_FIELDS {
            return Err(PipelineError::parse(format!(
                "expected {HANDOFF_FIELDS} lines in weather data, got {}",
                lines.len()
            )));
        }

        let number = |index: usize, name: &str| -> Result<f64> {
            lines[index]
                .parse::<f64>()
                .map_err(|e| PipelineError::parse(format!("invalid {name} '{}': {e}", lines[index])))
        };

        Ok(Self {
            location: lines[0].to_string(),
            temperature: number(1, "temperature")?,
            feels_like: number(2, "feels_like")?,
            description: lines[3].to_string(),
            humidity: number(4, "humidity")?,
            wind_speed: number(5, "wind_speed")?,
            temp_unit: lines[6].to_string(),
            speed_unit: lines[7].to_string(),
            timestamp: lines[8].to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rstest::rstest;

    fn reading() -> WeatherReading {
        WeatherReading {
            location: "London, Greater London, England, United Kingdom".to_string(),
            temperature: 14.62,
            feels_like: 13.9,
            description: "light rain".to_string(),
            humidity: 82.0,
            wind_speed: 4.12,
            temp_unit: "°C".to_string(),
            speed_unit: "m/s".to_string(),
            timestamp: "2026-10-18 09:30:00 UTC".to_string(),
        }
    }

    #[rstest]
    #[case("metric", "°C", "m/s")]
    #[case("imperial", "°F", "mph")]
    #[case("standard", "K", "m/s")]
    #[case("kelvin", "K", "m/s")]
    #[case("Metric", "K", "m/s")]
    fn test_unit_symbols(#[case] raw: &str, #[case] temp: &str, #[case] speed: &str) {
        let units = UnitsMode::from_raw(raw);
        assert_eq!(units.temperature_symbol(), temp);
        assert_eq!(units.speed_symbol(), speed);
        assert_eq!(units.as_str(), raw);
    }

    #[test]
    fn test_default_units_is_metric() {
        assert_eq!(UnitsMode::default(), UnitsMode::Metric);
    }

    #[test]
    fn test_handoff_layout() {
        let text = reading().to_handoff();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines,
            vec![
                "London, Greater London, England, United Kingdom",
                "14.62",
                "13.9",
                "light rain",
                "82",
                "4.12",
                "°C",
                "m/s",
                "2026-10-18 09:30:00 UTC",
            ]
        );
        assert!(text.ends_with('\n'));
    }

    #[test]
    fn test_handoff_reads_back() {
        let original = reading();
        let parsed = WeatherReading::from_handoff(&original.to_handoff()).unwrap();
        assert_eq!(parsed, original);
    }

    #[test]
    fn test_handoff_wrong_line_count() {
        let err = WeatherReading::from_handoff("London\n14.6\n").unwrap_err();
        assert!(err.to_string().contains("expected 9 lines"));
    }

    #[test]
    fn test_handoff_bad_number() {
        let text = reading().to_handoff().replace("14.62", "warm");
        let err = WeatherReading::from_handoff(&text).unwrap_err();
        assert!(err.to_string().contains("temperature"));
    }

    #[test]
    fn test_timestamp_format() {
        let time = Utc.with_ymd_and_hms(2026, 1, 2, 3, 4, 5).unwrap();
        assert_eq!(WeatherReading::format_timestamp(time), "2026-01-02 03:04:05 UTC");
    }

    #[test]
    fn test_display_helpers() {
        let weather = reading();
        assert_eq!(weather.format_temperature(), "14.62°C");
        assert_eq!(weather.format_wind(), "4.12 m/s");
    }
}
