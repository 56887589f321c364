// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Last saved document snapshot.

use kliros_core::error::Result;
use serde_json::Value;

use crate::keys;
use crate::kv::KvStore;

/// The schedule as last saved from the admin editor.
pub struct SnapshotStore<S> {
    store: S,
}

impl<S: KvStore> SnapshotStore<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn load(&self) -> Result<Option<Value>> {
        match self.store.get(keys::SCHEDULE_DATA)? {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    pub fn save(&self, document: &Value) -> Result<()> {
        let json = serde_json::to_string(document)?;
        self.store.set(keys::SCHEDULE_DATA, &json)
    }

    pub fn clear(&self) -> Result<()> {
        self.store.remove(keys::SCHEDULE_DATA)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kv::MemoryStore;
    use serde_json::json;

    #[test]
    fn save_load_clear() {
        let store = MemoryStore::new();
        let snapshots = SnapshotStore::new(&store);
        assert_eq!(snapshots.load().unwrap(), None);

        snapshots.save(&json!({"services": []})).unwrap();
        assert_eq!(snapshots.load().unwrap(), Some(json!({"services": []})));

        snapshots.clear().unwrap();
        assert_eq!(snapshots.load().unwrap(), None);
    }
}
