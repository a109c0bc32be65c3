// In-memory model storage (non-durable)
use crate::application::model_storage::ModelStorage;
use anyhow::{Result, anyhow};
use std::collections::HashMap;
use std::sync::Mutex;

#[derive(Debug, Default)]
pub struct MemoryModelStorage {
    slots: Mutex<HashMap<String, String>>,
}

impl MemoryModelStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ModelStorage for MemoryModelStorage {
    fn read(&self, key: &str) -> Result<Option<String>> {
        let slots = self.slots.lock().map_err(|_| anyhow!("memory storage lock poisoned"))?;
        Ok(slots.get(key).cloned())
    }

    fn write(&self, key: &str, document: &str) -> Result<()> {
        let mut slots = self.slots.lock().map_err(|_| anyhow!("memory storage lock poisoned"))?;
        slots.insert(key.to_string(), document.to_string());
        Ok(())
    }
}
