//! Error types and handling for the weather pipeline

use reqwest::StatusCode;
use thiserror::Error;

/// Main error type shared by both pipeline stages
#[derive(Error, Debug)]
pub enum PipelineError {
    /// A required environment variable is unset or empty
    #[error("{variable} not set")]
    MissingConfig { variable: String, hint: String },

    /// The hand-off file of the previous stage does not exist
    #[error("{path} not found")]
    MissingArtifact { path: String },

    /// The geocoder returned no match for the query
    #[error("Invalid location: '{query}' could not be found")]
    NotFound { query: String },

    /// Network, timeout or HTTP status failure talking to a remote service
    #[error("{message}")]
    Upstream {
        message: String,
        status: Option<StatusCode>,
    },

    /// Malformed response body or hand-off file
    #[error("Parse error: {message}")]
    Parse { message: String },

    /// Invalid settings
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// I/O operation errors
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
}

impl PipelineError {
    /// Create a missing environment variable error
    pub fn missing_config<S: Into<String>, H: Into<String>>(variable: S, hint: H) -> Self {
        Self::MissingConfig {
            variable: variable.into(),
            hint: hint.into(),
        }
    }

    /// Create a missing hand-off file error
    pub fn missing_artifact<S: Into<String>>(path: S) -> Self {
        Self::MissingArtifact { path: path.into() }
    }

    /// Create a geocoding miss
    pub fn not_found<S: Into<String>>(query: S) -> Self {
        Self::NotFound {
            query: query.into(),
        }
    }

    /// Create an upstream error that never produced a response
    pub fn upstream<S: Into<String>>(message: S) -> Self {
        Self::Upstream {
            message: message.into(),
            status: None,
        }
    }

    /// Create an upstream error for a response with a failing status
    pub fn upstream_status<S: Into<String>>(message: S, status: StatusCode) -> Self {
        Self::Upstream {
            message: message.into(),
            status: Some(status),
        }
    }

    /// Create a new parse error
    pub fn parse<S: Into<String>>(message: S) -> Self {
        Self::Parse {
            message: message.into(),
        }
    }

    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// HTTP status of the failed response, if a response was received at all
    #[must_use]
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            PipelineError::Upstream { status, .. } => *status,
            _ => None,
        }
    }

    /// Follow-up advice printed under the error line, if any
    #[must_use]
    pub fn hint(&self) -> Option<String> {
        match self {
            PipelineError::MissingConfig { hint, .. } if !hint.is_empty() => Some(hint.clone()),
            PipelineError::MissingArtifact { .. } => {
                Some("Make sure the validate_location job ran successfully".to_string())
            }
            PipelineError::NotFound { .. } => {
                Some("Try using format: 'City, Country' (e.g., 'London, UK')".to_string())
            }
            PipelineError::Upstream { status, .. } if *status == Some(StatusCode::UNAUTHORIZED) => {
                Some("Check if your WEATHER_API_KEY is valid".to_string())
            }
            _ => None,
        }
    }
}

impl From<reqwest::Error> for PipelineError {
    fn from(err: reqwest::Error) -> Self {
        let status = err.status();
        // The request URL carries the API key as a query parameter.
        let message = err.without_url().to_string();
        match status {
            Some(status) => Self::upstream_status(message, status),
            None => Self::upstream(message),
        }
    }
}
