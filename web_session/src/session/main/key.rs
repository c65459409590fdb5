use crate::session::errors::SessionError;

/// Reject empty keys when `strict` is set; permissive mode accepts anything.
pub(super) fn validate_key(key: &str, strict: bool) -> Result<(), SessionError> {
    if strict && key.is_empty() {
        return Err(SessionError::Validation(
            "Session key must be a non-empty string".to_string(),
        ));
    }
    Ok(())
}

/// Validate every key before any of them is used.
pub(super) fn validate_keys<'a, I>(keys: I, strict: bool) -> Result<(), SessionError>
where
    I: IntoIterator<Item = &'a str>,
{
    keys.into_iter().try_for_each(|key| validate_key(key, strict))
}
