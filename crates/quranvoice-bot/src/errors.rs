//! Error types for the bot
//!
//! Every transport and store call is fallible; failures are logged at
//! the handler boundary and never terminate the dispatcher.

use teloxide::RequestError;
use thiserror::Error;
use tracing::{error, warn};

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for bot operations
#[derive(Debug, Error)]
pub enum Error {
    #[error("Catalog store error: {0}")]
    Store(#[from] rusqlite::Error),

    #[error("Telegram API error: {0}")]
    Telegram(#[from] RequestError),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Log a teloxide `RequestError` at the appropriate level.
///
/// - Flood control and network/I-O failures are transient → `warn!`
/// - Everything else (bad request, forbidden, parse errors) → `error!`
pub fn log_request_error(context: &str, err: &RequestError) {
    match err {
        RequestError::RetryAfter(secs) => {
            warn!("{}: flood control, retry after {:?}", context, secs.duration());
        }
        RequestError::Network(_) | RequestError::Io(_) => {
            warn!("{}: transient transport failure: {}", context, err);
        }
        _ => {
            error!("{}: {}", context, err);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_error_display() {
        let err = Error::Store(rusqlite::Error::QueryReturnedNoRows);
        assert!(err.to_string().starts_with("Catalog store error:"));
    }

    #[test]
    fn test_config_error_display() {
        let err = Error::Config("missing bot token".to_string());
        assert_eq!(err.to_string(), "Configuration error: missing bot token");
    }

    #[test]
    fn test_from_rusqlite_error() {
        let err: Error = rusqlite::Error::QueryReturnedNoRows.into();
        assert!(matches!(err, Error::Store(_)));
    }
}
