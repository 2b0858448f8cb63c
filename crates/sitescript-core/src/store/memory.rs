//! Process-local store. Nothing survives the process; used as the test fake
//! and by embedders that persist elsewhere.

use std::collections::HashMap;

use tokio::sync::RwLock;

use super::{ScriptRecord, ScriptStore, StoreError};
use crate::host_key::HostKey;

#[derive(Debug, Default)]
pub struct MemoryStore {
    scripts: RwLock<HashMap<HostKey, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ScriptStore for MemoryStore {
    async fn get(&self, key: &HostKey) -> Result<ScriptRecord, StoreError> {
        let scripts = self.scripts.read().await;
        Ok(scripts
            .get(key)
            .map(|s| ScriptRecord::new(s.as_str()))
            .unwrap_or_default())
    }

    async fn put(&self, key: &HostKey, record: ScriptRecord) -> Result<(), StoreError> {
        self.scripts
            .write()
            .await
            .insert(key.clone(), record.into_source());
        Ok(())
    }

    async fn hosts(&self) -> Result<Vec<HostKey>, StoreError> {
        let mut hosts: Vec<HostKey> = self.scripts.read().await.keys().cloned().collect();
        hosts.sort();
        Ok(hosts)
    }

    async fn entries(&self) -> Result<Vec<(HostKey, ScriptRecord)>, StoreError> {
        let mut entries: Vec<(HostKey, ScriptRecord)> = self
            .scripts
            .read()
            .await
            .iter()
            .map(|(k, v)| (k.clone(), ScriptRecord::new(v.as_str())))
            .collect();
        entries.sort_by(|a, b| a.0.cmp(&b.0));
        Ok(entries)
    }
}
