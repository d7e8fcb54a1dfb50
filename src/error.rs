//! Error types and handling for the skyvoice weather skill

use thiserror::Error;

/// Failures of the backing key-value store or of the cached payload.
///
/// Never fatal to a forecast request: the write-through service treats
/// a read failure as a miss and only logs a write failure.
#[derive(Error, Debug)]
pub enum StoreError {
    /// The store backend rejected or failed the operation
    #[error("Store backend error: {message}")]
    Backend { message: String },

    /// The store could not be reached at all
    #[error("Store unavailable: {message}")]
    Unavailable { message: String },

    #[error("Failed to encode forecast: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("Failed to parse forecast from store: {0}")]
    Decode(#[source] serde_json::Error),

    /// The stored record envelope (payload + expiry) is corrupt
    #[error("Corrupt store entry: {0}")]
    Envelope(#[from] postcard::Error),

    #[error("Store task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl StoreError {
    pub fn backend<S: Into<String>>(message: S) -> Self {
        Self::Backend {
            message: message.into(),
        }
    }

    pub fn unavailable<S: Into<String>>(message: S) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }
}

/// Failures talking to the upstream weather provider
#[derive(Error, Debug)]
pub enum ProviderError {
    /// Non-success status; status and body are kept for diagnostics
    #[error("bad status code from provider ({status}). body: {body}")]
    Status { status: u16, body: String },

    #[error("failed to get forecast from provider: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("failed to parse response from provider: {0}")]
    Decode(#[source] serde_json::Error),
}

impl ProviderError {
    /// HTTP status of the failed response, if the provider answered at all
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            ProviderError::Status { status, .. } => Some(*status),
            ProviderError::Transport(err) => err.status().map(|s| s.as_u16()),
            ProviderError::Decode(_) => None,
        }
    }
}

/// The only error a forecast lookup surfaces to its caller
#[derive(Error, Debug)]
pub enum ForecastError {
    #[error("failed to fetch forecast for {coordinate} from provider: {source}")]
    Provider {
        coordinate: String,
        #[source]
        source: ProviderError,
    },
}

/// Main error type for the skyvoice application
#[derive(Error, Debug)]
pub enum SkyvoiceError {
    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl SkyvoiceError {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_message() {
        let err = SkyvoiceError::config("missing provider token");
        assert!(matches!(err, SkyvoiceError::Config { .. }));
        assert_eq!(err.to_string(), "Configuration error: missing provider token");
    }

    #[test]
    fn test_provider_error_keeps_status_and_body() {
        let err = ForecastError::Provider {
            coordinate: "40.7:-74.0".to_string(),
            source: ProviderError::Status {
                status: 403,
                body: "daily usage limit exceeded".to_string(),
            },
        };
        let message = err.to_string();
        assert!(message.contains("40.7:-74.0"));
        assert!(message.contains("403"));
        assert!(message.contains("daily usage limit exceeded"));
    }

    #[test]
    fn test_store_error_from_postcard() {
        let err: StoreError = postcard::from_bytes::<u64>(&[]).unwrap_err().into();
        assert!(matches!(err, StoreError::Envelope(_)));
    }
}
