//! Stage 1: resolve `LOCATION` to coordinates and write the location hand-off file

use std::io::Write;

use tracing::info;

use super::reported;
use crate::config::{LOCATION_VAR, PipelineConfig};
use crate::geocode::Geocoder;
use crate::handoff;
use crate::models::ResolvedLocation;
use crate::{PipelineError, Result};

const CONTEXT: &str = "Error validating location";

/// Validate the configured location query against the geocoder.
///
/// A missing query fails before the geocoder is touched. A miss or lookup
/// error leaves the hand-off file untouched.
pub fn validate_location<G, W>(
    config: &PipelineConfig,
    geocoder: &G,
    out: &mut W,
) -> Result<ResolvedLocation>
where
    G: Geocoder + ?Sized,
    W: Write,
{
    let query = match config.require_location() {
        Ok(query) => query,
        Err(err) => {
            tracing::error!("{CONTEXT}: {err}");
            writeln!(out, "ERROR: {LOCATION_VAR} variable not set")?;
            return Err(err);
        }
    };

    writeln!(out, "🌍 Validating location: {query}")?;

    let result = reported(out, CONTEXT, |out| resolve(config, geocoder, query, out));
    match &result {
        Ok(_) => writeln!(out, "\n✅ Location validation passed!")?,
        Err(_) => writeln!(out, "\n❌ Location validation failed!")?,
    }
    result
}

fn resolve<G, W>(
    config: &PipelineConfig,
    geocoder: &G,
    query: &str,
    out: &mut W,
) -> Result<ResolvedLocation>
where
    G: Geocoder + ?Sized,
    W: Write,
{
    let location = geocoder
        .geocode(query)?
        .ok_or_else(|| PipelineError::not_found(query))?;

    writeln!(out, "✅ Valid location found!")?;
    writeln!(out, "   Full name: {}", location.address)?;
    writeln!(out, "   Coordinates: {}", location.format_coordinates())?;

    handoff::write_location(&config.handoff.location_file, &location)?;
    info!(
        "Saved validated location to {}",
        config.handoff.location_file.display()
    );
    Ok(location)
}
