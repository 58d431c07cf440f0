//! Error taxonomy shared by the client and the workflow

use thiserror::Error;

/// Boxed error that can cross thread boundaries.
pub type BoxedError = Box<dyn std::error::Error + Send + Sync>;

/// Result alias defaulting to the crate [`Error`].
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Coarse classification of an [`Error`], handy for matching and logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    InvalidInput,
    Configuration,
    Transport,
    Service,
    Validation,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::InvalidInput => "invalid_input",
            ErrorKind::Configuration => "configuration",
            ErrorKind::Transport => "transport",
            ErrorKind::Service => "service",
            ErrorKind::Validation => "validation",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
pub enum Error {
    /// Prompt missing, not a string, or blank after trimming.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Client could not be constructed (missing API key, bad base URL).
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The request never completed: connect failure, timeout, truncated body.
    #[error("transport error: {message}")]
    Transport {
        message: String,
        timeout: bool,
        #[source]
        source: Option<BoxedError>,
    },

    /// The service answered, but with a failure status or an error payload.
    #[error("{}", service_display(.status, .message))]
    Service { status: Option<u16>, message: String },

    /// The service answered with success but the body is not a crush result.
    #[error("validation error: {message}")]
    Validation {
        message: String,
        #[source]
        source: Option<BoxedError>,
    },
}

fn service_display(status: &Option<u16>, message: &str) -> String {
    match status {
        Some(status) => format!("service error (HTTP {status}): {message}"),
        None => format!("service error: {message}"),
    }
}

impl Error {
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Error::InvalidInput(message.into())
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Error::Configuration(message.into())
    }

    pub fn transport(message: impl Into<String>) -> Self {
        Error::Transport {
            message: message.into(),
            timeout: false,
            source: None,
        }
    }

    pub fn timeout(message: impl Into<String>) -> Self {
        Error::Transport {
            message: message.into(),
            timeout: true,
            source: None,
        }
    }

    pub fn service(status: Option<u16>, message: impl Into<String>) -> Self {
        Error::Service {
            status,
            message: message.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Error::Validation {
            message: message.into(),
            source: None,
        }
    }

    /// Attach an underlying cause. No-op for variants that carry no source.
    pub fn with_source(mut self, cause: impl Into<BoxedError>) -> Self {
        match &mut self {
            Error::Transport { source, .. } | Error::Validation { source, .. } => {
                *source = Some(cause.into());
            }
            _ => {}
        }
        self
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::InvalidInput(_) => ErrorKind::InvalidInput,
            Error::Configuration(_) => ErrorKind::Configuration,
            Error::Transport { .. } => ErrorKind::Transport,
            Error::Service { .. } => ErrorKind::Service,
            Error::Validation { .. } => ErrorKind::Validation,
        }
    }

    /// Remote-call failures may be masked by a fallback result; input and
    /// configuration errors never are.
    pub fn is_fallback_eligible(&self) -> bool {
        matches!(
            self.kind(),
            ErrorKind::Transport | ErrorKind::Service | ErrorKind::Validation
        )
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, Error::Transport { timeout: true, .. })
    }

    /// HTTP status reported by the service, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Service { status, .. } => *status,
            _ => None,
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(error: serde_json::Error) -> Self {
        Error::validation(error.to_string()).with_source(error)
    }
}
