use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
    #[error("File {file_name} is {size} bytes, limit is {limit} bytes")]
    FileTooLarge {
        file_name: String,
        size: usize,
        limit: usize,
    },
    #[error("No text could be extracted from {file_type} file {file_name}")]
    EmptyDocument { file_name: String, file_type: String },
    #[error("Market insights unavailable: {0}")]
    InsightsUnavailable(String),
}

impl CoreError {
    pub fn is_client_error(&self) -> bool {
        match self {
            CoreError::InvalidRequest(_)
            | CoreError::FileTooLarge { .. }
            | CoreError::EmptyDocument { .. } => true,
            CoreError::InsightsUnavailable(_) => false,
        }
    }
}
