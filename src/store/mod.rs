pub mod file;

pub use file::FileStore;

use std::collections::HashMap;

use parking_lot::Mutex;
use serde_json::Value;

use crate::error::Result;

/// Key under which the candidate directory is persisted.
pub const CANDIDATES_KEY: &str = "candidates";
/// Key under which the interview map is persisted.
pub const INTERVIEWS_KEY: &str = "interviews";

/// Durable key-value gateway.
///
/// Only the whitelisted top-level keys (`candidates`, `interviews`) are
/// ever written. Everything else the session holds (timer activity, the
/// answer draft, the in-flight flag, the current-interview pointer) is
/// transient and comes back idle after a reload.
pub trait DurableStore: Send + Sync {
    fn put(&self, key: &str, value: &Value) -> Result<()>;
    fn get(&self, key: &str) -> Result<Option<Value>>;
}

/// In-memory store for tests and ephemeral runs.
#[derive(Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, Value>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DurableStore for MemoryStore {
    fn put(&self, key: &str, value: &Value) -> Result<()> {
        self.entries.lock().insert(key.to_string(), value.clone());
        Ok(())
    }

    fn get(&self, key: &str) -> Result<Option<Value>> {
        Ok(self.entries.lock().get(key).cloned())
    }
}
