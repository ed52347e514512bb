//! Data models passed between the pipeline stages
//!
//! - Location: coordinates and canonical address from the geocoder
//! - Weather: current conditions and the units they are expressed in

pub mod location;
pub mod weather;

pub use location::ResolvedLocation;
pub use weather::{UnitsMode, WeatherReading};
