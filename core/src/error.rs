//! Error types for the Zencoder client.
//!
//! # Design
//! Non-2xx statuses are not errors: they come back as ordinary `Response`
//! values. Errors are reserved for things the caller cannot get a `Response`
//! for: a client that could not be configured, a payload that could not be
//! encoded or decoded, or a round trip the transport could not complete.

use std::path::PathBuf;

use crate::http::HttpResponse;

/// Errors returned by the Zencoder client.
#[derive(Debug, thiserror::Error)]
pub enum ZencoderError {
    /// The client could not be configured (missing API key, conflicting
    /// endpoint settings, invalid proxy).
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The response carried a payload that is not valid JSON.
    ///
    /// The raw transport response and content are kept for inspection.
    #[error("failed to decode response body (HTTP {}): {source}", .response.status)]
    ResponseDecode {
        response: HttpResponse,
        content: Vec<u8>,
        #[source]
        source: serde_json::Error,
    },

    /// The request payload could not be encoded as JSON.
    #[error("failed to serialize request payload: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The HTTP round trip could not be completed.
    #[error("HTTP transport failed: {0}")]
    Transport(#[from] ureq::Error),

    /// The TLS client certificate could not be read.
    #[error("failed to read client certificate {}: {source}", .path.display())]
    Certificate {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, ZencoderError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn configuration_error_display() {
        let err = ZencoderError::Configuration("ZENCODER_API_KEY not set".to_string());
        assert_eq!(err.to_string(), "configuration error: ZENCODER_API_KEY not set");
    }

    #[test]
    fn decode_error_mentions_status() {
        let source = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err = ZencoderError::ResponseDecode {
            response: HttpResponse {
                status: 500,
                headers: Vec::new(),
                body: b"{".to_vec(),
            },
            content: b"{".to_vec(),
            source,
        };
        assert!(err.to_string().starts_with("failed to decode response body (HTTP 500)"));
        assert!(std::error::Error::source(&err).is_some());
    }
}
