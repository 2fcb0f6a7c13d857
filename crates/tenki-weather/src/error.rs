//! Ingestion-specific error types.
//!
//! These cover the per-area failure modes of a sync pass: network and
//! HTTP trouble reaching the feed, and payloads that don't have the
//! expected shape. Store failures are systemic and travel separately
//! as `tenki_store::StoreError`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum WeatherError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Forecast feed returned HTTP {status}")]
    Http { status: u16 },

    #[error("Parse error: {0}")]
    Parse(String),
}

impl WeatherError {
    /// Whether retrying the same fetch later could plausibly succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Network(_) => true,
            Self::Http { status } => *status >= 500,
            Self::Parse(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_errors_are_retryable() {
        assert!(WeatherError::Http { status: 503 }.is_retryable());
        assert!(!WeatherError::Http { status: 404 }.is_retryable());
        assert!(!WeatherError::Parse("bad shape".into()).is_retryable());
    }
}
