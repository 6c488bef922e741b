use std::path::PathBuf;
use std::time::Duration;

use serde_json::Value;

/// Errors that can occur when using libhyperspace.
///
/// Errors are organized by category:
/// - Configuration errors: detected at `build()` time
/// - Launch errors: failed to start hsd or open its output log
/// - Transport errors: the HTTP request never produced a response
/// - API errors: hsd answered with a non-2xx status
/// - Conversion errors: malformed currency amounts
#[derive(thiserror::Error, Debug)]
#[non_exhaustive]
pub enum Error {
    // -------------------------------------------------------------------------
    // Configuration errors (detected at build() time)
    // -------------------------------------------------------------------------
    /// Invalid configuration provided to builder.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    // -------------------------------------------------------------------------
    // Connection errors
    // -------------------------------------------------------------------------
    /// The daemon did not answer the liveness probe at connect time.
    ///
    /// This variant intentionally carries no address or cause, so callers
    /// can match on it directly.
    #[error("could not connect to the Hyperspace daemon")]
    CouldNotConnect,

    // -------------------------------------------------------------------------
    // Launch errors
    // -------------------------------------------------------------------------
    /// Failed to spawn the hsd process.
    #[error("failed to spawn hsd process: {0}")]
    ProcessSpawn(#[source] std::io::Error),

    /// Failed to open the file that receives hsd output.
    #[error("failed to open hsd output log at {}: {source}", .path.display())]
    OutputLog {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // -------------------------------------------------------------------------
    // IO errors
    // -------------------------------------------------------------------------
    /// IO error communicating with the hsd process.
    #[error("IO error: {0}")]
    Io(#[source] std::io::Error),

    // -------------------------------------------------------------------------
    // HTTP errors
    // -------------------------------------------------------------------------
    /// The request failed before a response was received
    /// (connection refused, DNS failure, reset).
    #[error("transport error: {0}")]
    Transport(#[source] reqwest::Error),

    /// Request exceeded its timeout.
    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    /// hsd answered with a status outside 200..=299.
    ///
    /// `body` is the parsed response body, passed through untouched.
    #[error("hsd API returned status {status}: {body}")]
    Api { status: u16, body: Value },

    /// Failed to parse JSON.
    #[error("failed to parse JSON: {message}")]
    JsonParse {
        message: String,
        #[source]
        source: serde_json::Error,
    },

    // -------------------------------------------------------------------------
    // Conversion errors
    // -------------------------------------------------------------------------
    /// A currency amount was not a valid decimal number.
    #[error("invalid amount {value:?}: {source}")]
    InvalidAmount {
        value: String,
        #[source]
        source: bigdecimal::ParseBigDecimalError,
    },
}

/// A specialized Result type for libhyperspace operations.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create a JSON parse error quoting the start of the offending body.
    pub fn json_parse(source: serde_json::Error, raw: &str) -> Self {
        Self::JsonParse {
            message: format!(
                "{source} in body: {}",
                raw.chars().take(100).collect::<String>()
            ),
            source,
        }
    }

    /// Create an IO error.
    pub fn io(source: std::io::Error) -> Self {
        Self::Io(source)
    }

    /// Check if this is the connect-time sentinel.
    pub fn is_could_not_connect(&self) -> bool {
        matches!(self, Error::CouldNotConnect)
    }

    /// Check if the request never reached a response.
    pub fn is_transport(&self) -> bool {
        matches!(self, Error::Transport(_) | Error::Timeout(_))
    }

    /// HTTP status of an API error.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Response body of an API error.
    pub fn response_body(&self) -> Option<&Value> {
        match self {
            Error::Api { body, .. } => Some(body),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::JsonParse {
            message: err.to_string(),
            source: err,
        }
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Error::Transport(err)
    }
}
