use chrono::Utc;

use crate::session::errors::SessionError;
use crate::session::types::{LAST_ACTIVITY_KEY, LastActivity, json_type_name};
use crate::storage::{SessionStore, StorageErrorConversion};

use super::manager::SessionManager;

impl<S: SessionStore> SessionManager<S> {
    /// Activate the session if it is not active yet, then enforce the idle timeout.
    ///
    /// Idempotent: an already active session is left untouched, so the clock is
    /// read at most once per activation.
    pub(super) fn ensure_active(&mut self) -> Result<(), SessionError> {
        if self.store.is_active() {
            return Ok(());
        }
        self.activate_store()?;
        self.check_timeout()
    }

    fn activate_store(&mut self) -> Result<(), SessionError> {
        let params = self.config.cookie_params();
        self.store.activate(&params).map_err(|e| {
            tracing::error!("Failed to activate session '{}': {}", params.name, e);
            SessionError::convert_storage_error(e)
        })?;
        tracing::debug!("Session '{}' activated", params.name);
        Ok(())
    }

    pub(super) fn check_timeout(&mut self) -> Result<(), SessionError> {
        self.check_timeout_at(Utc::now().timestamp())
    }

    /// Destroy and recreate the session when its last activity is older than
    /// the timeout, then stamp `now` as the new last activity.
    pub(super) fn check_timeout_at(&mut self, now: i64) -> Result<(), SessionError> {
        let stored = self
            .store
            .get_entry(LAST_ACTIVITY_KEY)
            .map_err(SessionError::convert_storage_error)?;

        let last_activity = match stored.map(LastActivity::try_from) {
            Some(Ok(activity)) => Some(activity),
            Some(Err(other)) => {
                tracing::warn!(
                    "Ignoring malformed {} entry of type {}",
                    LAST_ACTIVITY_KEY,
                    json_type_name(&other)
                );
                None
            }
            None => None,
        };

        if let Some(activity) = last_activity {
            if activity.is_stale(now, self.config.timeout) {
                tracing::info!(
                    idle_seconds = now - activity.0,
                    timeout = self.config.timeout,
                    "Session idle timeout exceeded, starting a fresh session"
                );
                self.store
                    .invalidate()
                    .map_err(SessionError::convert_storage_error)?;
                self.activate_store()?;
            }
        }

        self.store
            .set_entry(LAST_ACTIVITY_KEY, LastActivity(now).into())
            .map_err(SessionError::convert_storage_error)
    }
}
