//! Resolved location model and its hand-off line format

use crate::{PipelineError, Result};

/// Coordinates and canonical address produced by the geocoder
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedLocation {
    /// Latitude in decimal degrees
    pub latitude: f64,
    /// Longitude in decimal degrees
    pub longitude: f64,
    /// Canonical display address, may contain commas
    pub address: String,
}

impl ResolvedLocation {
    #[must_use]
    pub fn new(latitude: f64, longitude: f64, address: String) -> Self {
        Self {
            latitude,
            longitude,
            address,
        }
    }

    /// Format location as coordinates string
    #[must_use]
    pub fn format_coordinates(&self) -> String {
        format!("{}, {}", self.latitude, self.longitude)
    }

    /// Encode as the `lat,lon,address` hand-off line, newline included
    #[must_use]
    pub fn to_handoff_line(&self) -> String {
        format!("{},{},{}\n", self.latitude, self.longitude, self.address)
    }

    /// Decode a hand-off line. Everything after the second comma is the address.
    pub fn from_handoff_line(line: &str) -> Result<Self> {
        let line = line.trim();
        let mut fields = line.splitn(3, ',');

        let (Some(lat), Some(lon)) = (fields.next(), fields.next()) else {
            return Err(PipelineError::parse(format!(
                "expected 'lat,lon,address', got '{line}'"
            )));
        };
        let address = fields.next().unwrap_or_default().to_string();

        let latitude = lat
            .trim()
            .parse::<f64>()
            .map_err(|e| PipelineError::parse(format!("invalid latitude '{lat}': {e}")))?;
        let longitude = lon
            .trim()
            .parse::<f64>()
            .map_err(|e| PipelineError::parse(format!("invalid longitude '{lon}': {e}")))?;

        Ok(Self::new(latitude, longitude, address))
    }
}
