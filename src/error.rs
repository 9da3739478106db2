//! Error types for geminichat.
//!
//! The chat driver only ever displays an [`Error`], so `Display` carries the
//! provider's own wording for API failures.  The variant and
//! [`ApiErrorKind`] are for the client's logs and for library callers.

use std::error;
use std::fmt;
use std::io;
use std::str::Utf8Error;
use std::sync::Arc;

type Source = Arc<dyn error::Error + Send + Sync>;

/// What an HTTP status from the Gemini API means.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ApiErrorKind {
    /// 400: the request was malformed.
    BadRequest,
    /// 401: the key was rejected.
    Unauthenticated,
    /// 403: the key lacks access.
    PermissionDenied,
    /// 404: unknown model or endpoint.
    NotFound,
    /// 408 or 504: a deadline passed.
    DeadlineExceeded,
    /// 429: quota or rate limit.
    ResourceExhausted,
    /// 500: the provider failed.
    Internal,
    /// 502 or 503: the provider is overloaded or down.
    Unavailable,
    /// Anything else.
    Other,
}

impl ApiErrorKind {
    /// Classify an HTTP status code.
    pub fn from_status(status_code: u16) -> Self {
        match status_code {
            400 => ApiErrorKind::BadRequest,
            401 => ApiErrorKind::Unauthenticated,
            403 => ApiErrorKind::PermissionDenied,
            404 => ApiErrorKind::NotFound,
            408 | 504 => ApiErrorKind::DeadlineExceeded,
            429 => ApiErrorKind::ResourceExhausted,
            500 => ApiErrorKind::Internal,
            502 | 503 => ApiErrorKind::Unavailable,
            _ => ApiErrorKind::Other,
        }
    }
}

/// The main error type for geminichat.
#[derive(Clone, Debug)]
pub enum Error {
    /// Gemini answered with an error status, or sent an error object mid-stream.
    Api {
        /// Classification of `status_code`.
        kind: ApiErrorKind,
        /// HTTP status code (or the `code` of an in-band error).
        status_code: u16,
        /// Canonical Google status string, e.g. `RESOURCE_EXHAUSTED`.
        status: Option<String>,
        /// The provider's message.
        message: String,
        /// Seconds from the `Retry-After` header, when present.
        retry_after: Option<u64>,
    },

    /// No usable API key; raised before any request is made.
    Credential {
        /// What is wrong with the key.
        message: String,
    },

    /// The request never got a complete answer.
    Transport {
        /// What failed.
        message: String,
        /// True when the client-side timeout fired.
        timed_out: bool,
        /// The HTTP client's error.
        source: Option<Source>,
    },

    /// A response body could not be decoded.
    Decode {
        /// What failed to decode.
        message: String,
        /// The JSON or UTF-8 error.
        source: Option<Source>,
    },

    /// The base URL is not a URL.
    Url {
        /// The parse error.
        source: url::ParseError,
    },

    /// Local I/O, such as binding the web server.
    Io {
        /// What was being attempted.
        message: String,
        /// The underlying error.
        source: Arc<io::Error>,
    },
}

impl Error {
    /// An error answer from Gemini, classified by `status_code`.
    pub fn api(
        status_code: u16,
        status: Option<String>,
        message: impl Into<String>,
        retry_after: Option<u64>,
    ) -> Self {
        Error::Api {
            kind: ApiErrorKind::from_status(status_code),
            status_code,
            status,
            message: message.into(),
            retry_after,
        }
    }

    /// A missing or malformed API key.
    pub fn credential(message: impl Into<String>) -> Self {
        Error::Credential {
            message: message.into(),
        }
    }

    /// A failed exchange with the server.
    pub fn transport(
        message: impl Into<String>,
        source: impl error::Error + Send + Sync + 'static,
    ) -> Self {
        Error::Transport {
            message: message.into(),
            timed_out: false,
            source: Some(Arc::new(source)),
        }
    }

    /// The client-side timeout fired.
    pub fn timed_out(message: impl Into<String>) -> Self {
        Error::Transport {
            message: message.into(),
            timed_out: true,
            source: None,
        }
    }

    /// A body that is not the JSON or UTF-8 it should be.
    pub fn decode(
        message: impl Into<String>,
        source: impl error::Error + Send + Sync + 'static,
    ) -> Self {
        Error::Decode {
            message: message.into(),
            source: Some(Arc::new(source)),
        }
    }

    /// Local I/O failure.
    pub fn io(message: impl Into<String>, source: io::Error) -> Self {
        Error::Io {
            message: message.into(),
            source: Arc::new(source),
        }
    }

    /// The API classification, for `Api` errors.
    pub fn api_kind(&self) -> Option<ApiErrorKind> {
        match self {
            Error::Api { kind, .. } => Some(*kind),
            _ => None,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Api {
                status_code,
                status,
                message,
                ..
            } => {
                if !message.is_empty() {
                    f.write_str(message)
                } else if let Some(status) = status {
                    write!(f, "{status_code} {status}")
                } else {
                    write!(f, "HTTP {status_code}")
                }
            }
            Error::Credential { message }
            | Error::Transport { message, .. }
            | Error::Decode { message, .. } => f.write_str(message),
            Error::Url { source } => write!(f, "invalid base URL: {source}"),
            Error::Io { message, source } => write!(f, "{message}: {source}"),
        }
    }
}

impl error::Error for Error {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            Error::Transport { source, .. } | Error::Decode { source, .. } => source
                .as_ref()
                .map(|e| e.as_ref() as &(dyn error::Error + 'static)),
            Error::Url { source } => Some(source),
            Error::Io { source, .. } => Some(source.as_ref()),
            Error::Api { .. } | Error::Credential { .. } => None,
        }
    }
}

impl From<url::ParseError> for Error {
    fn from(source: url::ParseError) -> Self {
        Error::Url { source }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::decode(format!("malformed JSON in response: {err}"), err)
    }
}

impl From<Utf8Error> for Error {
    fn from(err: Utf8Error) -> Self {
        Error::decode(format!("response is not UTF-8: {err}"), err)
    }
}

/// A specialized Result type for geminichat operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_classify() {
        assert_eq!(ApiErrorKind::from_status(400), ApiErrorKind::BadRequest);
        assert_eq!(ApiErrorKind::from_status(401), ApiErrorKind::Unauthenticated);
        assert_eq!(ApiErrorKind::from_status(429), ApiErrorKind::ResourceExhausted);
        assert_eq!(ApiErrorKind::from_status(504), ApiErrorKind::DeadlineExceeded);
        assert_eq!(ApiErrorKind::from_status(503), ApiErrorKind::Unavailable);
        assert_eq!(ApiErrorKind::from_status(499), ApiErrorKind::Other);
    }

    #[test]
    fn api_error_displays_provider_message() {
        let err = Error::api(429, Some("RESOURCE_EXHAUSTED".into()), "rate limited", Some(7));
        assert_eq!(err.to_string(), "rate limited");
        assert_eq!(err.api_kind(), Some(ApiErrorKind::ResourceExhausted));
        assert_eq!(format!("Error: {err}"), "Error: rate limited");
    }

    #[test]
    fn api_error_without_message_falls_back_to_status() {
        assert_eq!(
            Error::api(499, Some("CANCELLED".into()), "", None).to_string(),
            "499 CANCELLED"
        );
        assert_eq!(Error::api(418, None, "", None).to_string(), "HTTP 418");
    }

    #[test]
    fn json_errors_convert() {
        let err: Error = serde_json::from_str::<u32>("not json").unwrap_err().into();
        assert!(matches!(err, Error::Decode { .. }));
        assert!(error::Error::source(&err).is_some());
        assert_eq!(err.api_kind(), None);
    }

    #[test]
    fn io_error_keeps_cause() {
        let err = Error::io(
            "could not bind 127.0.0.1:1",
            io::Error::new(io::ErrorKind::AddrInUse, "in use"),
        );
        assert_eq!(err.to_string(), "could not bind 127.0.0.1:1: in use");
    }
}
