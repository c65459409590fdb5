use thiserror::Error;

use crate::utils::UtilError;

#[derive(Debug, Error, Clone)]
pub enum StorageError {
    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Activation error: {0}")]
    Activation(String),

    #[error("Json conversion(Serde) error: {0}")]
    Serde(String),
}

impl From<serde_json::Error> for StorageError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serde(err.to_string())
    }
}

impl From<UtilError> for StorageError {
    fn from(err: UtilError) -> Self {
        Self::Storage(err.to_string())
    }
}

/// Maps store failures into a caller's own error type.
pub trait StorageErrorConversion<E> {
    fn convert_storage_error(error: StorageError) -> E;
}
