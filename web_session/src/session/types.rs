use serde_json::{Map, Value};

/// Reserved entry holding the flash segment
pub(super) const FLASH_DATA_KEY: &str = "flash_data";

/// Reserved entry holding the last activity timestamp
pub(super) const LAST_ACTIVITY_KEY: &str = "LAST_ACTIVITY";

/// Seconds since the Unix epoch of the last access that passed the timeout check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) struct LastActivity(pub(super) i64);

impl LastActivity {
    /// Whether more than `timeout` seconds have elapsed between this activity and `now`.
    pub(super) fn is_stale(&self, now: i64, timeout: u64) -> bool {
        let timeout = i64::try_from(timeout).unwrap_or(i64::MAX);
        now.saturating_sub(self.0) > timeout
    }
}

impl From<LastActivity> for Value {
    fn from(activity: LastActivity) -> Self {
        Value::from(activity.0)
    }
}

impl TryFrom<Value> for LastActivity {
    type Error = Value;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        value.as_i64().map(LastActivity).ok_or(value)
    }
}

/// The flash sub-mapping stored under [`FLASH_DATA_KEY`].
#[derive(Debug, Clone, Default, PartialEq)]
pub(super) struct FlashSegment {
    entries: Map<String, Value>,
}

impl FlashSegment {
    pub(super) fn insert(&mut self, key: &str, value: Value) {
        self.entries.insert(key.to_string(), value);
    }

    /// Remove and return the entry for `key`.
    pub(super) fn take(&mut self, key: &str) -> Option<Value> {
        self.entries.remove(key)
    }

    pub(super) fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl From<FlashSegment> for Value {
    fn from(segment: FlashSegment) -> Self {
        Value::Object(segment.entries)
    }
}

impl From<Option<Value>> for FlashSegment {
    fn from(value: Option<Value>) -> Self {
        match value {
            Some(Value::Object(entries)) => Self { entries },
            Some(other) => {
                tracing::warn!(
                    "Ignoring malformed flash segment of type {}",
                    json_type_name(&other)
                );
                Self::default()
            }
            None => Self::default(),
        }
    }
}

pub(super) fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
