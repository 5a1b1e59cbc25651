use std::cell::RefCell;
use std::collections::HashMap;

use anyhow::Result;

use crate::store::KeyValueStore;

/// Process-local store. Nothing is written to disk.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RefCell<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entry(key: &str, value: &str) -> Self {
        let store = Self::new();
        store
            .entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        store
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn get_missing_key_is_none() {
        let store = MemoryStore::new();
        assert_eq!(store.get("learned").unwrap(), None);
    }

    #[test]
    fn set_overwrites_previous_value() {
        let store = MemoryStore::with_entry("learned", "{}");
        store.set("learned", r#"{"abate":true}"#).unwrap();
        assert_eq!(
            store.get("learned").unwrap().as_deref(),
            Some(r#"{"abate":true}"#)
        );
    }
}
