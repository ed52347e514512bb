//! Start-up shared by the binaries

use std::path::PathBuf;

use anyhow::Result;
use tracing::debug;

use crate::{PipelineConfig, logging};

/// Load settings and initialise logging
pub fn bootstrap(config_path: Option<PathBuf>, verbose: bool) -> Result<PipelineConfig> {
    let config = PipelineConfig::load_from_path(config_path)?;
    logging::init(&config.logging, verbose)?;
    debug!(
        "weather-pipeline {} (units={}, handoff={}, {})",
        crate::VERSION,
        config.weather.units,
        config.handoff.location_file.display(),
        config.handoff.weather_file.display()
    );
    Ok(config)
}
