use std::collections::BTreeMap;

use anyhow::Result;

use crate::store::KeyValueStore;

/// Key holding the learned flags.
pub const LEARNED_KEY: &str = "learned";

/// Word -> learned flag, as persisted.
pub type LearnedData = BTreeMap<String, bool>;

/// Read the persisted learned flags.
///
/// Returns an empty map when nothing was stored. Unreadable or malformed data
/// is logged and also treated as empty.
pub fn read_learned(store: &dyn KeyValueStore) -> LearnedData {
    match store.get(LEARNED_KEY) {
        Ok(Some(content)) => match serde_json::from_str(&content) {
            Ok(data) => data,
            Err(err) => {
                tracing::warn!(%err, "discarding malformed learned-state data");
                LearnedData::new()
            }
        },
        Ok(None) => LearnedData::new(),
        Err(err) => {
            tracing::warn!(error = %err, "could not read learned-state data");
            LearnedData::new()
        }
    }
}

pub fn write_learned(store: &dyn KeyValueStore, data: &LearnedData) -> Result<()> {
    let json = serde_json::to_string(data)?;
    store.set(LEARNED_KEY, &json)
}
