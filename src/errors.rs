use reqwest::StatusCode;
use thiserror::Error;

/// Why a single course check could not complete. The run loop logs these and
/// moves on to the next course.
#[derive(Debug, Error)]
pub enum CheckError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("{status} from {endpoint}")]
    HttpStatus { endpoint: String, status: StatusCode },
    #[error("response was not valid JSON: {0}")]
    MalformedResponse(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid yaml: {0}")]
    Yaml(#[from] yaml_rust::ScanError),
    #[error("{0} not found!")]
    MissingField(String),
    #[error("{field} is invalid: {reason}")]
    InvalidField { field: String, reason: String },
}
