pub mod json_store;
pub mod memory;
pub mod schema;

use std::rc::Rc;

use anyhow::Result;

/// String-keyed storage that survives restarts.
///
/// Values are opaque strings; callers own the encoding.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Rc<S> {
    fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        (**self).set(key, value)
    }
}

pub use json_store::JsonFileStore;
pub use memory::MemoryStore;
