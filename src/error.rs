use thiserror::Error;

/// Errors surfaced by the orchestration layer and its collaborators.
#[derive(Error, Debug)]
pub enum ChoresError {
    #[error("Credentials error: {0}")]
    Credentials(String),

    #[error("Work item {id} is a {actual}, expected a {expected}")]
    TypeMismatch {
        id: u64,
        expected: String,
        actual: String,
    },

    #[error("HTTP error: {0}")]
    Transport(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<reqwest::Error> for ChoresError {
    fn from(err: reqwest::Error) -> Self {
        ChoresError::Transport(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ChoresError>;
