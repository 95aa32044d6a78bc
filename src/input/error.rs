use thiserror::Error;

/// Failure to obtain a usable dictionary for one fetch attempt.
///
/// Every variant is recovered by the loader's retry and fallback policy.
#[derive(Error, Debug)]
pub enum FetchError {
    /// Connection, TLS or body transfer failure
    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),
    /// Non-2xx response
    #[error("Unexpected HTTP status {0}")]
    Status(u16),
    /// Failed to read a translation file
    #[error("Failed to read translation file: {0}")]
    Io(#[from] std::io::Error),
    /// Body is not valid JSON
    #[error("Failed to parse JSON: {0}")]
    Parse(#[from] serde_json::Error),
    /// Body is valid JSON but its top level is not an object
    #[error("Expected a JSON object at the top level, got {0}")]
    InvalidStructure(&'static str),
    /// The attempt did not finish within the configured timeout
    #[error("Timed out after {0} ms")]
    Timeout(u128),
}
