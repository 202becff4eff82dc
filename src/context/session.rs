use dashmap::DashMap;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;

/// Values stored for one session
pub type SessionValues = HashMap<String, Value>;

/// Per-visitor key/value state carried across requests by a cookie.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Session {
    id: String,
    values: SessionValues,
    fresh: bool,
    dirty: bool,
}

impl Session {
    /// A brand new session; its cookie has not been sent yet
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            values: SessionValues::new(),
            fresh: true,
            dirty: false,
        }
    }

    /// A session whose id the client already holds
    #[must_use]
    pub fn restore(id: impl Into<String>, values: SessionValues) -> Self {
        Self {
            id: id.into(),
            values,
            fresh: false,
            dirty: false,
        }
    }

    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    /// Deserialize a stored value, `None` if missing or of another shape
    #[must_use]
    pub fn get_as<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        self.values
            .get(key)
            .and_then(|v| serde_json::from_value(v.clone()).ok())
    }

    /// Store a serializable value
    ///
    /// # Errors
    ///
    /// Fails if `value` cannot be represented as JSON.
    pub fn set<T: Serialize>(&mut self, key: impl Into<String>, value: &T) -> serde_json::Result<()> {
        let value = serde_json::to_value(value)?;
        self.set_value(key, value);
        Ok(())
    }

    pub fn set_value(&mut self, key: impl Into<String>, value: Value) {
        self.values.insert(key.into(), value);
        self.dirty = true;
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        let removed = self.values.remove(key);
        if removed.is_some() {
            self.dirty = true;
        }
        removed
    }

    pub fn clear(&mut self) {
        if !self.values.is_empty() {
            self.values.clear();
            self.dirty = true;
        }
    }

    #[must_use]
    pub fn values(&self) -> &SessionValues {
        &self.values
    }

    /// Whether the client has not received this session's cookie yet
    #[must_use]
    pub fn is_fresh(&self) -> bool {
        self.fresh
    }

    /// Whether the session changed since it was loaded
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }
}

/// Backing storage for sessions.
pub trait SessionStore: Send + Sync {
    fn load(&self, id: &str) -> Option<SessionValues>;
    fn save(&self, id: &str, values: &SessionValues);
    fn remove(&self, id: &str);
}

/// Process-local session store
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    sessions: DashMap<String, SessionValues>,
}

impl MemorySessionStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

impl SessionStore for MemorySessionStore {
    fn load(&self, id: &str) -> Option<SessionValues> {
        self.sessions.get(id).map(|entry| entry.value().clone())
    }

    fn save(&self, id: &str, values: &SessionValues) {
        if values.is_empty() {
            self.sessions.remove(id);
        } else {
            self.sessions.insert(id.to_string(), values.clone());
        }
    }

    fn remove(&self, id: &str) {
        self.sessions.remove(id);
    }
}
