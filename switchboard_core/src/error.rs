use std::sync::Arc;

/// Represents a result type for operations in the Switchboard SDK.
///
/// This `Result` type is a standard Rust `Result` type where the error variant is defined by the
/// switchboard-specific [`Error`] enum.
pub type Result<T> = std::result::Result<T, Error>;

/// Enum representing possible errors that can occur in the Switchboard SDK.
///
/// Flag evaluation itself never produces an error: malformed conditions, unknown operators,
/// invalid regular expressions, disabled configurations, and unknown keys all degrade to ordinary
/// [`EvaluationResult`](crate::flags::EvaluationResult)s. The variants here cover configuration
/// synchronization only.
#[derive(thiserror::Error, Debug, Clone)]
#[non_exhaustive]
pub enum Error {
    /// Invalid base URL configuration.
    #[error("invalid base_url configuration")]
    InvalidBaseUrl(#[source] url::ParseError),

    /// The request was unauthorized, possibly due to an invalid API token.
    #[error("unauthorized, api_token is likely invalid")]
    Unauthorized,

    /// Indicates that the poller thread panicked. This should normally never happen.
    #[error("poller thread panicked")]
    PollerThreadPanicked,

    /// An I/O error.
    #[error(transparent)]
    // std::io::Error is not clonable, so we're wrapping it in an Arc.
    Io(Arc<std::io::Error>),

    /// Network error.
    #[error(transparent)]
    Network(Arc<reqwest::Error>),
}

impl From<std::io::Error> for Error {
    fn from(value: std::io::Error) -> Self {
        Self::Io(Arc::new(value))
    }
}

impl From<reqwest::Error> for Error {
    fn from(value: reqwest::Error) -> Self {
        Error::Network(Arc::new(value.without_url()))
    }
}
