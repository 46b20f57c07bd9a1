// SPDX-License-Identifier: MPL-2.0
use std::fmt;

#[derive(Debug, Clone)]
pub enum Error {
    Io(String),
    Config(String),
    Http(HttpError),
    Decode(String),
}

/// Failures while talking to the search server.
/// Used to pick a user-facing, localized message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HttpError {
    /// The server could not be reached (DNS, refused connection, TLS).
    Connect(String),

    /// The request did not complete in the configured time.
    Timeout,

    /// The server answered with a non-success status code.
    Status(u16),

    /// The configured base URL or a route could not be turned into a URL.
    InvalidUrl(String),

    /// Anything else reported by the HTTP stack.
    Other(String),
}

impl HttpError {
    /// Returns the i18n message key for this error type.
    pub fn i18n_key(&self) -> &'static str {
        match self {
            HttpError::Connect(_) => "error-server-unreachable",
            HttpError::Timeout => "error-server-timeout",
            HttpError::Status(413) => "error-server-upload-too-large",
            HttpError::Status(_) => "error-server-status",
            HttpError::InvalidUrl(_) => "error-server-url",
            HttpError::Other(_) => "error-server-general",
        }
    }
}

impl Error {
    /// Returns the i18n message key shown to the user for this error.
    pub fn i18n_key(&self) -> &'static str {
        match self {
            Error::Io(_) => "error-io",
            Error::Config(_) => "error-config",
            Error::Http(e) => e.i18n_key(),
            Error::Decode(_) => "error-server-response",
        }
    }
}

impl fmt::Display for HttpError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HttpError::Connect(msg) => write!(f, "Connection failed: {}", msg),
            HttpError::Timeout => write!(f, "Request timed out"),
            HttpError::Status(code) => write!(f, "Unexpected HTTP status: {}", code),
            HttpError::InvalidUrl(msg) => write!(f, "Invalid URL: {}", msg),
            HttpError::Other(msg) => write!(f, "{}", msg),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Io(e) => write!(f, "I/O Error: {}", e),
            Error::Config(e) => write!(f, "Config Error: {}", e),
            Error::Http(e) => write!(f, "HTTP Error: {}", e),
            Error::Decode(e) => write!(f, "Decode Error: {}", e),
        }
    }
}

impl std::error::Error for Error {}

impl From<HttpError> for Error {
    fn from(err: HttpError) -> Self {
        Error::Http(err)
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err.to_string())
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for Error {
    fn from(err: toml::ser::Error) -> Self {
        Error::Config(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Decode(err.to_string())
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            return Error::Http(HttpError::Timeout);
        }
        if let Some(status) = err.status() {
            return Error::Http(HttpError::Status(status.as_u16()));
        }
        if err.is_connect() {
            return Error::Http(HttpError::Connect(err.to_string()));
        }
        if err.is_decode() {
            return Error::Decode(err.to_string());
        }
        if err.is_builder() {
            return Error::Http(HttpError::InvalidUrl(err.to_string()));
        }
        Error::Http(HttpError::Other(err.to_string()))
    }
}

pub type Result<T> = std::result::Result<T, Error>;
