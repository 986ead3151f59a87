use std::time::Duration;

/// How the retry layer should treat a failed call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// Timeouts, dropped connections, 5xx: worth another attempt.
    Transient,
    /// The provider asked us to slow down.
    RateLimited,
    /// Auth failures, bad requests, unusable payloads: retrying will not help.
    Terminal,
}

#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    #[error("connection failed: {0}")]
    Connection(String),

    #[error("provider rate limited the request")]
    RateLimited { retry_after: Option<Duration> },

    #[error("provider returned HTTP {status}: {message}")]
    Status { status: u16, message: String },

    #[error("malformed provider response: {0}")]
    MalformedResponse(String),

    #[error("provider returned an empty completion")]
    EmptyResponse,

    #[error("provider error: {0}")]
    Provider(String),
}

impl LlmError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Timeout(_) | Self::Connection(_) => ErrorKind::Transient,
            Self::RateLimited { .. } => ErrorKind::RateLimited,
            Self::Status { status, .. } => kind_for_status(*status),
            Self::MalformedResponse(_) | Self::EmptyResponse | Self::Provider(_) => {
                ErrorKind::Terminal
            }
        }
    }

    /// Server-suggested wait before the next attempt, if any.
    pub fn retry_after(&self) -> Option<Duration> {
        match self {
            Self::RateLimited { retry_after } => *retry_after,
            _ => None,
        }
    }

    /// Build the error for a non-success HTTP status.
    pub fn from_status(status: u16, body: &str, retry_after: Option<Duration>) -> Self {
        if status == 429 {
            return Self::RateLimited { retry_after };
        }

        Self::Status {
            status,
            message: body.chars().take(200).collect(),
        }
    }

    pub(crate) fn from_reqwest(source: &reqwest::Error, timeout: Duration) -> Self {
        if source.is_timeout() {
            return Self::Timeout(timeout);
        }

        if let Some(status) = source.status() {
            return Self::from_status(status.as_u16(), &source.to_string(), None);
        }

        if source.is_connect() || source.is_request() || source.is_body() {
            return Self::Connection(source.to_string());
        }

        if source.is_decode() {
            return Self::MalformedResponse(source.to_string());
        }

        Self::Provider(source.to_string())
    }
}

fn kind_for_status(status: u16) -> ErrorKind {
    match status {
        429 => ErrorKind::RateLimited,
        408 | 500..=599 => ErrorKind::Transient,
        _ => ErrorKind::Terminal,
    }
}
