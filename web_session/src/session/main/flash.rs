use serde::{Serialize, de::DeserializeOwned};

use crate::session::errors::SessionError;
use crate::session::types::{FLASH_DATA_KEY, FlashSegment};
use crate::storage::{SessionStore, StorageErrorConversion};

use super::key::validate_key;
use super::manager::SessionManager;

impl<S: SessionStore> SessionManager<S> {
    /// Store a value to be read exactly once, typically on the next request.
    pub fn set_flash<T>(&mut self, key: &str, value: &T) -> Result<(), SessionError>
    where
        T: Serialize + ?Sized,
    {
        validate_key(key, self.config.strict_keys)?;
        let value = serde_json::to_value(value)?;
        self.ensure_active()?;

        let mut segment = self.load_flash_segment()?;
        segment.insert(key, value);
        self.store
            .set_entry(FLASH_DATA_KEY, segment.into())
            .map_err(SessionError::convert_storage_error)
    }

    /// Read a flash value and remove it in the same call.
    ///
    /// The key is removed whether or not a value was found, so a second call
    /// always returns `None`. A value that fails to deserialize as `T` is
    /// still consumed.
    pub fn get_flash<T>(&mut self, key: &str) -> Result<Option<T>, SessionError>
    where
        T: DeserializeOwned,
    {
        validate_key(key, self.config.strict_keys)?;
        self.ensure_active()?;

        let mut segment = self.load_flash_segment()?;
        let Some(value) = segment.take(key) else {
            return Ok(None);
        };

        let written = if segment.is_empty() {
            self.store.unset_entry(FLASH_DATA_KEY)
        } else {
            self.store.set_entry(FLASH_DATA_KEY, segment.into())
        };
        written.map_err(SessionError::convert_storage_error)?;
        tracing::debug!("Flash value '{}' consumed", key);

        Ok(Some(serde_json::from_value(value)?))
    }

    pub fn get_flash_or<T>(&mut self, key: &str, default: T) -> Result<T, SessionError>
    where
        T: DeserializeOwned,
    {
        Ok(self.get_flash(key)?.unwrap_or(default))
    }

    fn load_flash_segment(&self) -> Result<FlashSegment, SessionError> {
        self.store
            .get_entry(FLASH_DATA_KEY)
            .map(FlashSegment::from)
            .map_err(SessionError::convert_storage_error)
    }
}
