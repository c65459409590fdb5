use thiserror::Error;

use crate::storage::{StorageError, StorageErrorConversion};

#[derive(Debug, Error, Clone)]
pub enum SessionError {
    /// An empty or otherwise invalid key was passed to an accessor
    #[error("Validation error: {0}")]
    Validation(String),

    /// The underlying session could not be activated
    #[error("Activation error: {0}")]
    Activation(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Json conversion(Serde) error: {0}")]
    Serde(String),

    #[error("Config error: {0}")]
    Config(String),
}

impl From<serde_json::Error> for SessionError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serde(err.to_string())
    }
}

impl StorageErrorConversion<SessionError> for SessionError {
    fn convert_storage_error(error: StorageError) -> SessionError {
        match error {
            StorageError::Activation(msg) => SessionError::Activation(msg),
            StorageError::Serde(msg) => SessionError::Serde(msg),
            StorageError::Storage(msg) => SessionError::Storage(msg),
        }
    }
}
