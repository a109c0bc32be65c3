// File-backed model storage: one JSON file per key
use crate::application::model_storage::ModelStorage;
use anyhow::{Context, Result};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct FileModelStorage {
    directory: PathBuf,
}

impl FileModelStorage {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    fn slot_path(&self, key: &str) -> PathBuf {
        // Keys become file names, keep them to a safe character set.
        let file_name: String = key
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
            .collect();
        self.directory.join(format!("{}.json", file_name))
    }
}

impl ModelStorage for FileModelStorage {
    fn read(&self, key: &str) -> Result<Option<String>> {
        let path = self.slot_path(key);
        match fs::read_to_string(&path) {
            Ok(text) => Ok(Some(text)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e).with_context(|| format!("Failed to read {}", path.display())),
        }
    }

    fn write(&self, key: &str, document: &str) -> Result<()> {
        fs::create_dir_all(&self.directory)
            .with_context(|| format!("Failed to create {}", self.directory.display()))?;

        // Write beside the slot and rename, so a crash never leaves a half-written slot.
        let path = self.slot_path(key);
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, document).with_context(|| format!("Failed to write {}", tmp.display()))?;
        fs::rename(&tmp, &path).with_context(|| format!("Failed to replace {}", path.display()))?;

        tracing::debug!("Persisted {} bytes to {}", document.len(), path.display());
        Ok(())
    }
}
