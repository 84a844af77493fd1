use thiserror::Error;

/// Caller mistakes and driver failures. Losing a game is never an error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SnakeError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error("session task aborted: {0}")]
    SessionAborted(String),
}

impl SnakeError {
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }
}

pub type SnakeResult<T> = Result<T, SnakeError>;
