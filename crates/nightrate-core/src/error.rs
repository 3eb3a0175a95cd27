use thiserror::Error;

/// Error classification for the fetch path.
///
/// The request surface matches on this exhaustively when mapping failures
/// to externally visible outcomes, so the set is closed: every failure the
/// fetch sequence can produce is exactly one of these kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuoteErrorKind {
    Transport,
    Model,
    Format,
    RateLimited,
    CircuitOpen,
}

/// Failure raised by the quote fetch path.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum QuoteError {
    /// Network-level failure after retries were exhausted.
    #[error("transport failure: {message}")]
    Transport { message: String },

    /// The model was reachable but answered with an application-level error
    /// payload or an unexpected HTTP status.
    #[error("{message}")]
    Model { status: Option<u16>, message: String },

    /// The response violates the model contract.
    #[error("invalid pricing data: {message}")]
    Format { message: String },

    /// HTTP 429 from the model; never retried internally.
    #[error("{message}")]
    RateLimited { message: String },

    /// Rejected locally without a network call: recent failures exceeded
    /// the threshold and the reset window has not elapsed.
    #[error("{message}")]
    CircuitOpen { message: String },
}

impl QuoteError {
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    pub fn model(status: Option<u16>, message: impl Into<String>) -> Self {
        Self::Model {
            status,
            message: message.into(),
        }
    }

    pub fn format(message: impl Into<String>) -> Self {
        Self::Format {
            message: message.into(),
        }
    }

    pub fn rate_limited(message: impl Into<String>) -> Self {
        Self::RateLimited {
            message: message.into(),
        }
    }

    pub fn circuit_open(message: impl Into<String>) -> Self {
        Self::CircuitOpen {
            message: message.into(),
        }
    }

    pub const fn kind(&self) -> QuoteErrorKind {
        match self {
            Self::Transport { .. } => QuoteErrorKind::Transport,
            Self::Model { .. } => QuoteErrorKind::Model,
            Self::Format { .. } => QuoteErrorKind::Format,
            Self::RateLimited { .. } => QuoteErrorKind::RateLimited,
            Self::CircuitOpen { .. } => QuoteErrorKind::CircuitOpen,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Self::Transport { message }
            | Self::Model { message, .. }
            | Self::Format { message }
            | Self::RateLimited { message }
            | Self::CircuitOpen { message } => message,
        }
    }

    /// HTTP status carried by status-derived model errors.
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Model { status, .. } => *status,
            _ => None,
        }
    }

    /// Whether the caller may reasonably retry later. Contract violations
    /// and application-level model errors are not retryable.
    pub const fn retryable(&self) -> bool {
        matches!(
            self,
            Self::Transport { .. } | Self::RateLimited { .. } | Self::CircuitOpen { .. }
        )
    }

    /// Stable machine-readable code for logs and wire mapping.
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Transport { .. } => "quote.transport",
            Self::Model { .. } => "quote.model",
            Self::Format { .. } => "quote.format",
            Self::RateLimited { .. } => "quote.rate_limited",
            Self::CircuitOpen { .. } => "quote.circuit_open",
        }
    }
}
