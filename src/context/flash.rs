use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::warn;

use super::session::Session;

/// Session key flash messages are kept under between requests
pub const FLASH_KEY: &str = "_flash";

/// One-shot messages that survive exactly one more request.
///
/// Loading a flash from a session removes it there; [`Flash::persist`] writes it
/// back so the next request can show it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Flash {
    data: BTreeMap<String, Vec<String>>,
}

impl Flash {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Take the pending flash out of `session`
    pub fn from_session(session: &mut Session) -> Self {
        match session.remove(FLASH_KEY) {
            Some(value) => serde_json::from_value(value).unwrap_or_else(|e| {
                warn!(session_id = %session.id(), error = %e, "Discarding malformed flash data");
                Self::default()
            }),
            None => Self::default(),
        }
    }

    /// Append a message under `key`
    pub fn add(&mut self, key: impl Into<String>, message: impl Into<String>) {
        self.data.entry(key.into()).or_default().push(message.into());
    }

    /// Replace all messages under `key`
    pub fn set(&mut self, key: impl Into<String>, messages: Vec<String>) {
        self.data.insert(key.into(), messages);
    }

    #[must_use]
    pub fn get(&self, key: &str) -> &[String] {
        self.data.get(key).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn delete(&mut self, key: &str) {
        self.data.remove(key);
    }

    pub fn clear(&mut self) {
        self.data.clear();
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.data.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    /// Write the pending messages into `session` for the next request.
    pub fn persist(&self, session: &mut Session) {
        if self.data.is_empty() {
            session.remove(FLASH_KEY);
            return;
        }
        match serde_json::to_value(&self.data) {
            Ok(value) => session.set_value(FLASH_KEY, value),
            Err(e) => warn!(session_id = %session.id(), error = %e, "Failed to persist flash"),
        }
    }
}
