//! # Gateway Error Types
//!
//! Typed error handling for the binga-rs gateway client.
//! All client operations return `Result<T, BingaError>`.

use thiserror::Error;

/// Core error type for all gateway operations
#[derive(Debug, Error)]
pub enum BingaError {
    /// Configuration errors (missing credentials, bad formatting input)
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Network/HTTP error communicating with the gateway
    #[error("Transport error: {message}")]
    Transport { message: String },

    /// Response body does not match the detected format
    #[error("Decode error: {message}")]
    Decode {
        message: String,
        /// Raw response body, kept for diagnostics
        body: String,
    },

    /// Well-formed gateway refusal, carrying the gateway's own code
    #[error("Gateway error [{code}]: {message}")]
    Gateway { code: i64, message: String },
}

impl BingaError {
    /// Build a `Gateway` error from a bare HTTP status, using the
    /// reason-phrase table. Used when the gateway answers with an error
    /// status but an empty or discriminator-less body.
    pub fn gateway_from_status(status: u16) -> Self {
        BingaError::Gateway {
            code: i64::from(status),
            message: reason_phrase(status).to_string(),
        }
    }

    /// The gateway's numeric code, if this is a `Gateway` error
    pub fn gateway_code(&self) -> Option<i64> {
        match self {
            BingaError::Gateway { code, .. } => Some(*code),
            _ => None,
        }
    }

    /// Returns true if this error came from the transport layer
    pub fn is_transport(&self) -> bool {
        matches!(self, BingaError::Transport { .. })
    }
}

/// Result type alias for gateway operations
pub type BingaResult<T> = Result<T, BingaError>;

/// Reason phrase for an HTTP status code, used as the error message when
/// the gateway answers with an empty body.
pub fn reason_phrase(status: u16) -> &'static str {
    match status {
        100 => "Continue",
        101 => "Switching Protocols",
        200 => "OK",
        201 => "Created",
        202 => "Accepted",
        203 => "Non-Authoritative Information",
        204 => "No Content",
        205 => "Reset Content",
        206 => "Partial Content",
        300 => "Multiple Choices",
        301 => "Moved Permanently",
        302 => "Found",
        303 => "See Other",
        304 => "Not Modified",
        305 => "Use Proxy",
        307 => "Temporary Redirect",
        400 => "Bad Request",
        401 => "Unauthorized",
        402 => "Payment Required",
        403 => "Forbidden",
        404 => "Not Found",
        405 => "Method Not Allowed",
        406 => "Not Acceptable",
        407 => "Proxy Authentication Required",
        408 => "Request Timeout",
        409 => "Conflict",
        410 => "Gone",
        411 => "Length Required",
        412 => "Precondition Failed",
        413 => "Request Entity Too Large",
        414 => "Request-URI Too Long",
        415 => "Unsupported Media Type",
        416 => "Requested Range Not Satisfiable",
        417 => "Expectation Failed",
        422 => "Unprocessable Entity",
        426 => "Upgrade Required",
        428 => "Precondition Required",
        429 => "Too Many Requests",
        431 => "Request Header Fields Too Large",
        500 => "Internal Server Error",
        501 => "Not Implemented",
        502 => "Bad Gateway",
        503 => "Service Unavailable",
        504 => "Gateway Timeout",
        505 => "HTTP Version Not Supported",
        511 => "Network Authentication Required",
        _ => "Unknown Error",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gateway_from_status() {
        let err = BingaError::gateway_from_status(404);
        assert_eq!(err.gateway_code(), Some(404));
        assert_eq!(err.to_string(), "Gateway error [404]: Not Found");
    }

    #[test]
    fn test_reason_phrase_fallback() {
        assert_eq!(reason_phrase(500), "Internal Server Error");
        assert_eq!(reason_phrase(418), "Unknown Error");
    }

    #[test]
    fn test_variant_helpers() {
        assert!(BingaError::Transport {
            message: "timeout".into()
        }
        .is_transport());
        assert!(!BingaError::Configuration("missing key".into()).is_transport());
        assert_eq!(
            BingaError::Configuration("missing key".into()).gateway_code(),
            None
        );
    }
}
