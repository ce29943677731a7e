//! Error types for board API operations.
//!
//! Every remote call fails in one of three ways: the request never got a
//! response, the service answered with a non-success status, or the body
//! could not be decoded. Callers decide whether a failure is fatal; this
//! crate only reports what happened.

use std::fmt;

/// Result type alias for board API operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Categories of board API errors.
///
/// Categories drive user-facing advice. Nothing in this crate retries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// The request did not complete (DNS, TLS, connection reset).
    Network,
    /// Credentials were rejected.
    Auth,
    /// The addressed object does not exist.
    NotFound,
    /// The service answered with some other non-success status.
    Rejected,
    /// The response body did not have the expected shape.
    Format,
}

impl ErrorCategory {
    /// Get a user-friendly description of this error category.
    #[must_use]
    pub fn description(&self) -> &'static str {
        match self {
            Self::Network => "Network connectivity issue",
            Self::Auth => "Credentials rejected",
            Self::NotFound => "Remote object not found",
            Self::Rejected => "Request rejected by the service",
            Self::Format => "Unexpected response format",
        }
    }

    /// Get actionable advice for resolving this error category.
    #[must_use]
    pub fn advice(&self) -> &'static str {
        match self {
            Self::Network => "Check your internet connection and run the command again",
            Self::Auth => "Check the API key and token (TRELLO_API_KEY / TRELLO_TOKEN)",
            Self::NotFound => "The object may have been deleted outside of trellis",
            Self::Rejected => "Check names, emails and roles in the manifest",
            Self::Format => "The API base URL may not point at the Trello REST API",
        }
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.description())
    }
}

/// Errors that can occur during board API operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// The request did not get a response.
    #[error("transport error: {message}")]
    Transport {
        /// Error message from the HTTP client.
        message: String,
    },

    /// The service answered with a non-success status code.
    #[error("HTTP {status} from {endpoint}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Endpoint path (without query string or credentials).
        endpoint: String,
    },

    /// The response body was not JSON carrying a string `id`.
    #[error("invalid response from {endpoint}: {message}")]
    Decode {
        /// Endpoint path (without query string or credentials).
        endpoint: String,
        /// Decoder message.
        message: String,
    },
}

impl Error {
    /// Create a transport error.
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    /// Create a decode error.
    pub fn decode(endpoint: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Decode {
            endpoint: endpoint.into(),
            message: message.into(),
        }
    }

    /// Get the error category.
    #[must_use]
    pub fn category(&self) -> ErrorCategory {
        match self {
            Error::Transport { .. } => ErrorCategory::Network,
            Error::Status { status, .. } => match status {
                401 | 403 => ErrorCategory::Auth,
                404 => ErrorCategory::NotFound,
                _ => ErrorCategory::Rejected,
            },
            Error::Decode { .. } => ErrorCategory::Format,
        }
    }
}

/// Convert a `ureq` error, attaching the endpoint for status failures.
pub(crate) fn from_ureq(err: ureq::Error, endpoint: &str) -> Error {
    match err {
        ureq::Error::StatusCode(status) => Error::Status {
            status,
            endpoint: endpoint.to_string(),
        },
        other => Error::transport(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_categories() {
        let status = |code| Error::Status {
            status: code,
            endpoint: "/boards".to_string(),
        };
        assert_eq!(status(401).category(), ErrorCategory::Auth);
        assert_eq!(status(403).category(), ErrorCategory::Auth);
        assert_eq!(status(404).category(), ErrorCategory::NotFound);
        assert_eq!(status(400).category(), ErrorCategory::Rejected);
        assert_eq!(status(500).category(), ErrorCategory::Rejected);
    }

    #[test]
    fn test_transport_category() {
        let err = Error::transport("connection refused");
        assert_eq!(err.category(), ErrorCategory::Network);
    }

    #[test]
    fn test_decode_category() {
        let err = Error::decode("/organizations", "missing field `id`");
        assert_eq!(err.category(), ErrorCategory::Format);
    }

    #[test]
    fn test_error_display() {
        let err = Error::Status {
            status: 404,
            endpoint: "/boards/abc".to_string(),
        };
        assert_eq!(err.to_string(), "HTTP 404 from /boards/abc");

        let err = Error::decode("/boards", "expected value at line 1 column 1");
        assert!(err.to_string().contains("/boards"));
        assert!(err.to_string().contains("expected value"));
    }

    #[test]
    fn test_category_advice_not_empty() {
        for category in [
            ErrorCategory::Network,
            ErrorCategory::Auth,
            ErrorCategory::NotFound,
            ErrorCategory::Rejected,
            ErrorCategory::Format,
        ] {
            assert!(!category.advice().is_empty());
            assert!(!category.description().is_empty());
        }
    }

    #[test]
    fn test_from_ureq_status() {
        let err = from_ureq(ureq::Error::StatusCode(401), "/organizations");
        assert_eq!(
            err,
            Error::Status {
                status: 401,
                endpoint: "/organizations".to_string()
            }
        );
    }
}
