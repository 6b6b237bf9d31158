use thiserror::Error;

#[derive(Debug, Error)]
pub enum PromptyError {
    #[error("Empty prompt: please enter a prompt to analyze")]
    EmptyPrompt,

    #[error("Invalid response format: {0}")]
    InvalidResponse(String),

    #[error("Request failed: {0}")]
    Transport(String),

    #[error("HTTP error! status: {status} - {body}")]
    HttpStatus { status: u16, body: String },

    #[error("Analysis service reported failure: {0}")]
    RemoteFailure(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(String),

    #[error("History entry not found: {0}")]
    UnknownHistoryEntry(String),
}

pub type Result<T> = std::result::Result<T, PromptyError>;

impl From<rusqlite::Error> for PromptyError {
    fn from(err: rusqlite::Error) -> Self {
        PromptyError::Storage(err.to_string())
    }
}

impl From<PromptyError> for String {
    fn from(err: PromptyError) -> Self {
        err.to_string()
    }
}
