//! The two pipeline stages and the in-process combination of both
//!
//! Stages print their user-facing report to the writer they are given
//! (stdout in the binaries) and return the typed record they produced. Every
//! failure has already been reported to the writer by the time `Err` comes back.

pub mod fetch;
pub mod validate;

use std::io::Write;
use std::process::ExitCode;

use crate::config::PipelineConfig;
use crate::geocode::Geocoder;
use crate::models::WeatherReading;
use crate::weather::WeatherSource;
use crate::{PipelineError, Result};

pub use fetch::{fetch_for_location, fetch_weather};
pub use validate::validate_location;

/// Run the validator and the fetcher back to back, handing the resolved
/// location over directly instead of re-reading it from disk.
///
/// The API key is checked up front so a run that cannot fetch never touches
/// the geocoder or the location hand-off file.
pub fn run_pipeline<G, S, W>(
    config: &PipelineConfig,
    geocoder: &G,
    source: &S,
    out: &mut W,
) -> Result<WeatherReading>
where
    G: Geocoder + ?Sized,
    S: WeatherSource + ?Sized,
    W: Write,
{
    if let Err(err) = config.require_api_key() {
        tracing::error!("{}: {err}", fetch::CONTEXT);
        report_failure(out, fetch::CONTEXT, &err)?;
        return Err(err);
    }

    let location = validate_location(config, geocoder, out)?;
    writeln!(out)?;
    fetch_for_location(config, &location, source, out)
}

/// Process exit status for a stage result: 0 on success, 1 on any failure
#[must_use]
pub fn exit_code<T>(result: &Result<T>) -> ExitCode {
    match result {
        Ok(_) => ExitCode::SUCCESS,
        Err(_) => ExitCode::FAILURE,
    }
}

/// Print the diagnostic for a failed stage
pub fn report_failure<W: Write>(out: &mut W, context: &str, err: &PipelineError) -> Result<()> {
    match err {
        PipelineError::MissingConfig { .. } | PipelineError::MissingArtifact { .. } => {
            writeln!(out, "❌ ERROR: {err}")?;
        }
        PipelineError::NotFound { .. } => writeln!(out, "❌ {err}")?,
        _ => writeln!(out, "❌ {context}: {err}")?,
    }
    if let Some(hint) = err.hint() {
        writeln!(out, "   {hint}")?;
    }
    Ok(())
}

/// Run `body`, reporting its error (if any) before handing the result back
fn reported<T, W, F>(out: &mut W, context: &str, body: F) -> Result<T>
where
    W: Write,
    F: FnOnce(&mut W) -> Result<T>,
{
    let result = body(out);
    if let Err(err) = &result {
        tracing::error!("{context}: {err}");
        report_failure(out, context, err)?;
    }
    result
}
