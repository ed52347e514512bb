//! Two-stage CI weather pipeline
//!
//! Stage 1 geocodes a free-text location and writes `validated_location.txt`;
//! stage 2 reads it, fetches current weather and writes `weather_data.txt`.

pub mod cli;
pub mod config;
pub mod error;
pub mod geocode;
pub mod handoff;
pub mod logging;
pub mod models;
pub mod stages;
pub mod weather;

// Re-export core types for public API
pub use config::PipelineConfig;
pub use error::PipelineError;
pub use geocode::{Geocoder, NominatimGeocoder};
pub use models::{ResolvedLocation, UnitsMode, WeatherReading};
pub use weather::{CurrentConditions, OpenWeatherMapClient, WeatherSource};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, PipelineError>;
