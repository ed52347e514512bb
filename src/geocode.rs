//! Forward geocoding against Nominatim (OpenStreetMap)
//!
//! Resolves a free-text query to the single best match. Nominatim asks every
//! client to identify itself, so the configured user agent is always sent.

use std::time::Instant;

use reqwest::blocking::Client;
use serde::Deserialize;
use tracing::{debug, info, instrument, warn};

use crate::config::GeocoderConfig;
use crate::models::ResolvedLocation;
use crate::{PipelineError, Result};

/// Anything that can turn a free-text query into coordinates
pub trait Geocoder {
    /// Returns `Ok(None)` when the service has no match for `query`.
    fn geocode(&self, query: &str) -> Result<Option<ResolvedLocation>>;
}

#[derive(Debug, Deserialize)]
struct NominatimPlace {
    lat: String,
    lon: String,
    display_name: String,
}

impl TryFrom<NominatimPlace> for ResolvedLocation {
    type Error = PipelineError;

    fn try_from(place: NominatimPlace) -> Result<Self> {
        let latitude = place.lat.parse::<f64>().map_err(|e| {
            PipelineError::parse(format!("invalid latitude '{}' from geocoder: {e}", place.lat))
        })?;
        let longitude = place.lon.parse::<f64>().map_err(|e| {
            PipelineError::parse(format!("invalid longitude '{}' from geocoder: {e}", place.lon))
        })?;
        Ok(ResolvedLocation::new(latitude, longitude, place.display_name))
    }
}

/// Blocking Nominatim client
pub struct NominatimGeocoder {
    client: Client,
    base_url: String,
}

impl NominatimGeocoder {
    pub fn new(config: &GeocoderConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout())
            .user_agent(config.user_agent.as_str())
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }
}

impl Geocoder for NominatimGeocoder {
    #[instrument(skip(self))]
    fn geocode(&self, query: &str) -> Result<Option<ResolvedLocation>> {
        let url = format!(
            "{}/search?q={}&format=json&limit=1",
            self.base_url,
            urlencoding::encode(query)
        );
        debug!("Nominatim request URL: {}", url);

        let start_time = Instant::now();
        let response = self.client.get(&url).send()?.error_for_status()?;
        let places: Vec<NominatimPlace> = response
            .json()
            .map_err(|e| PipelineError::parse(format!("invalid geocoder response: {}", e.without_url())))?;

        let Some(place) = places.into_iter().next() else {
            warn!("No results found for location '{}'", query);
            return Ok(None);
        };

        let location = ResolvedLocation::try_from(place)?;
        info!(
            "Geocoded '{}' to {} in {:.3}s",
            query,
            location.format_coordinates(),
            start_time.elapsed().as_secs_f64()
        );
        Ok(Some(location))
    }
}
