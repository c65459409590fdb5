use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;
use std::collections::HashMap;

use crate::session::config::{SESSION_CONFIG, SessionConfig};
use crate::session::errors::SessionError;
use crate::storage::{SessionStore, StorageErrorConversion};

use super::key::{validate_key, validate_keys};

/// Per-request view of one client's session state.
///
/// Every accessor activates the underlying session on first use and enforces
/// the idle timeout at that point. Keys are validated before the store is
/// touched, so a rejected key never activates or mutates anything.
///
/// ```
/// use web_session::{MemorySessionBackend, SessionConfig, SessionManager};
///
/// let backend = MemorySessionBackend::new();
/// let mut session = SessionManager::new(backend.store(), SessionConfig::default()).unwrap();
///
/// session.set("user_id", &42).unwrap();
/// assert_eq!(session.get::<u32>("user_id").unwrap(), Some(42));
///
/// session.set_flash("msg", "saved").unwrap();
/// assert_eq!(session.get_flash::<String>("msg").unwrap().as_deref(), Some("saved"));
/// assert_eq!(session.get_flash::<String>("msg").unwrap(), None);
/// ```
#[derive(Debug)]
pub struct SessionManager<S: SessionStore> {
    pub(super) store: S,
    pub(super) config: SessionConfig,
}

impl<S: SessionStore> SessionManager<S> {
    /// Wrap `store` with the given configuration.
    ///
    /// If the store was already activated by the transport, the idle timeout is
    /// enforced right away and a stale session is replaced. Otherwise the check
    /// runs when the first accessor activates the session.
    pub fn new(store: S, config: SessionConfig) -> Result<Self, SessionError> {
        config.validate()?;

        let mut manager = Self { store, config };
        if manager.store.is_active() {
            manager.check_timeout()?;
        }
        Ok(manager)
    }

    /// Wrap `store` with the process-wide [`SESSION_CONFIG`].
    pub fn from_env(store: S) -> Result<Self, SessionError> {
        Self::new(store, SESSION_CONFIG.clone())
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    /// Whether the underlying session is active. Never activates.
    pub fn is_started(&self) -> bool {
        self.store.is_active()
    }

    /// Activate the session now instead of on first access.
    pub fn start(&mut self) -> Result<(), SessionError> {
        self.ensure_active()
    }

    /// Identifier of the session, activating it if needed.
    pub fn session_id(&mut self) -> Result<String, SessionError> {
        self.ensure_active()?;
        self.store
            .session_id()
            .map(str::to_owned)
            .ok_or_else(|| SessionError::Storage("Active session has no identifier".to_string()))
    }

    pub fn set<T>(&mut self, key: &str, value: &T) -> Result<(), SessionError>
    where
        T: Serialize + ?Sized,
    {
        validate_key(key, self.config.strict_keys)?;
        let value = serde_json::to_value(value)?;

        self.ensure_active()?;
        self.store
            .set_entry(key, value)
            .map_err(SessionError::convert_storage_error)
    }

    /// Store several entries. Every key is validated, then every value
    /// serialized, before the first write.
    pub fn set_many<I, K, V>(&mut self, entries: I) -> Result<(), SessionError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Serialize,
    {
        let entries: Vec<(K, V)> = entries.into_iter().collect();
        validate_keys(
            entries.iter().map(|(key, _)| key.as_ref()),
            self.config.strict_keys,
        )?;
        let entries = entries
            .into_iter()
            .map(|(key, value)| -> Result<(K, Value), SessionError> {
                Ok((key, serde_json::to_value(value)?))
            })
            .collect::<Result<Vec<_>, _>>()?;

        self.ensure_active()?;
        for (key, value) in entries {
            self.store
                .set_entry(key.as_ref(), value)
                .map_err(SessionError::convert_storage_error)?;
        }
        Ok(())
    }

    /// Stored value for `key` deserialized as `T`, or `None` when absent.
    pub fn get<T>(&mut self, key: &str) -> Result<Option<T>, SessionError>
    where
        T: DeserializeOwned,
    {
        validate_key(key, self.config.strict_keys)?;
        self.ensure_active()?;

        let value = self
            .store
            .get_entry(key)
            .map_err(SessionError::convert_storage_error)?;
        Ok(value.map(serde_json::from_value).transpose()?)
    }

    pub fn get_or<T>(&mut self, key: &str, default: T) -> Result<T, SessionError>
    where
        T: DeserializeOwned,
    {
        Ok(self.get(key)?.unwrap_or(default))
    }

    /// Resolve each requested key to its stored value or `default`.
    ///
    /// The result holds exactly the requested keys.
    pub fn some<K>(&mut self, keys: &[K], default: Value) -> Result<HashMap<String, Value>, SessionError>
    where
        K: AsRef<str>,
    {
        validate_keys(keys.iter().map(AsRef::as_ref), self.config.strict_keys)?;
        self.ensure_active()?;

        let mut values = HashMap::with_capacity(keys.len());
        for key in keys {
            let key = key.as_ref();
            let value = self
                .store
                .get_entry(key)
                .map_err(SessionError::convert_storage_error)?
                .unwrap_or_else(|| default.clone());
            values.insert(key.to_string(), value);
        }
        Ok(values)
    }

    /// Whether an entry exists for `key`, including one holding `null`.
    pub fn has(&mut self, key: &str) -> Result<bool, SessionError> {
        validate_key(key, self.config.strict_keys)?;
        self.ensure_active()?;

        Ok(self
            .store
            .get_entry(key)
            .map_err(SessionError::convert_storage_error)?
            .is_some())
    }

    pub fn remove(&mut self, key: &str) -> Result<(), SessionError> {
        validate_key(key, self.config.strict_keys)?;
        self.ensure_active()?;

        self.store
            .unset_entry(key)
            .map_err(SessionError::convert_storage_error)
    }

    /// Remove every entry, flash values included. The session stays active
    /// under the same identifier.
    #[tracing::instrument(skip(self))]
    pub fn clear(&mut self) -> Result<(), SessionError> {
        self.ensure_active()?;

        self.store
            .clear_all()
            .map_err(SessionError::convert_storage_error)?;
        tracing::debug!("Session cleared");
        Ok(())
    }

    /// Discard the session state and identifier. The next accessor starts a
    /// fresh, empty session.
    #[tracing::instrument(skip(self))]
    pub fn destroy(&mut self) -> Result<(), SessionError> {
        self.ensure_active()?;

        self.store
            .invalidate()
            .map_err(SessionError::convert_storage_error)?;
        tracing::debug!("Session destroyed");
        Ok(())
    }
}
