//! Hand-off files passed between pipeline stages
//!
//! Each run overwrites the previous files. Nothing is locked, so two
//! pipelines sharing a working directory will clobber each other.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use tracing::debug;

use crate::models::{ResolvedLocation, WeatherReading};
use crate::{PipelineError, Result};

/// Write the `lat,lon,address` line produced by the validator
pub fn write_location(path: &Path, location: &ResolvedLocation) -> Result<()> {
    write(path, &location.to_handoff_line())
}

/// Read the validator's output, reporting a missing file as a missing artifact
pub fn read_location(path: &Path) -> Result<ResolvedLocation> {
    ResolvedLocation::from_handoff_line(&read(path)?)
}

/// Write the nine-line weather file
pub fn write_weather(path: &Path, reading: &WeatherReading) -> Result<()> {
    write(path, &reading.to_handoff())
}

pub fn read_weather(path: &Path) -> Result<WeatherReading> {
    WeatherReading::from_handoff(&read(path)?)
}

fn read(path: &Path) -> Result<String> {
    match fs::read_to_string(path) {
        Ok(contents) => Ok(contents),
        Err(e) if e.kind() == ErrorKind::NotFound => {
            Err(PipelineError::missing_artifact(path.display().to_string()))
        }
        Err(e) => Err(e.into()),
    }
}

fn write(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, contents)?;
    debug!("Wrote {} bytes to {}", contents.len(), path.display());
    Ok(())
}
