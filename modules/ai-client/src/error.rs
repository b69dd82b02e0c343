use thiserror::Error;

pub type Result<T> = std::result::Result<T, AiError>;

/// Failure taxonomy for the scoring/embedding API.
///
/// Callers decide retry policy from `is_transient()`: rate limits, server
/// errors, and connection problems are worth retrying; auth and request
/// errors are not, and a malformed 200 means the model ignored the tool
/// contract; retrying with the same prompt rarely helps.
#[derive(Debug, Error)]
pub enum AiError {
    #[error("rate limited (429): {0}")]
    RateLimited(String),

    #[error("server error ({status}): {message}")]
    Server { status: u16, message: String },

    #[error("connection error: {0}")]
    Connection(String),

    #[error("request timed out")]
    Timeout,

    #[error("authentication rejected ({status}): {message}")]
    Auth { status: u16, message: String },

    #[error("bad request ({status}): {message}")]
    Request { status: u16, message: String },

    #[error("response missing expected tool call")]
    ToolCallMissing,

    #[error("tool call arguments did not match schema: {0}")]
    SchemaMismatch(String),

    #[error("response missing embedding data")]
    EmbeddingMissing,
}

impl AiError {
    /// Classify an HTTP error status plus body text.
    pub fn from_status(status: u16, message: String) -> Self {
        match status {
            429 => AiError::RateLimited(message),
            500..=599 => AiError::Server { status, message },
            401 | 403 => AiError::Auth { status, message },
            _ => AiError::Request { status, message },
        }
    }

    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            AiError::RateLimited(_)
                | AiError::Server { .. }
                | AiError::Connection(_)
                | AiError::Timeout
        )
    }
}

impl From<reqwest::Error> for AiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            AiError::Timeout
        } else {
            AiError::Connection(err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn retryable_statuses_are_transient() {
        assert!(AiError::from_status(429, String::new()).is_transient());
        assert!(AiError::from_status(500, String::new()).is_transient());
        assert!(AiError::from_status(503, String::new()).is_transient());
        assert!(AiError::Timeout.is_transient());
        assert!(AiError::Connection("reset".into()).is_transient());
    }

    #[test]
    fn fatal_statuses_are_not_transient() {
        assert!(!AiError::from_status(401, String::new()).is_transient());
        assert!(!AiError::from_status(400, String::new()).is_transient());
        assert!(!AiError::from_status(404, String::new()).is_transient());
        assert!(!AiError::ToolCallMissing.is_transient());
        assert!(!AiError::SchemaMismatch("x".into()).is_transient());
    }
}
