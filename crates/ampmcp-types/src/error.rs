use std::fmt;

/// Result type for ampmcp operations
pub type Result<T> = std::result::Result<T, Error>;

/// Where the message of a `Remote` error was extracted from.
///
/// Non-2xx responses are interpreted with a three-level fallback: a parsed
/// JSON field, the raw body text, or the HTTP status line when the body
/// cannot be read at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoteMessageSource {
    ParsedBody,
    RawBody,
    StatusLine,
}

/// Error types that can occur while serving analytics calls
#[derive(Debug)]
pub enum Error {
    /// Missing or invalid credentials at startup
    Config(String),
    /// Input rejected before any network call was attempted
    Validation(String),
    /// Non-2xx response from the Amplitude API
    Remote {
        status: u16,
        message: String,
        source: RemoteMessageSource,
    },
    /// Network failure or malformed response body
    Transport(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Config(msg) => write!(f, "Configuration error: {}", msg),
            Error::Validation(msg) => write!(f, "Invalid input: {}", msg),
            Error::Remote { message, .. } => write!(f, "Amplitude API error: {}", message),
            Error::Transport(msg) => write!(f, "Transport error: {}", msg),
        }
    }
}

impl std::error::Error for Error {}
