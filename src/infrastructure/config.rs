use crate::application::model_store::DEFAULT_STORAGE_KEY;
use crate::domain::dashboard::ViewSettings;
use serde::Deserialize;

pub const DEFAULT_CONFIG_FILE: &str = "config/modeler";

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub server: ServerSettings,
    pub storage: StorageSettings,
    #[serde(default)]
    pub view: ViewSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerSettings {
    pub bind: String,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    File,
    Memory,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StorageSettings {
    pub backend: StorageBackend,
    pub directory: String,
    pub key: String,
}

pub fn load_app_config() -> anyhow::Result<AppConfig> {
    load_app_config_from(DEFAULT_CONFIG_FILE)
}

/// Built-in defaults, overridden by the (optional) file at `path`.
pub fn load_app_config_from(path: &str) -> anyhow::Result<AppConfig> {
    let settings = config::Config::builder()
        .set_default("server.bind", "127.0.0.1:8080")?
        .set_default("storage.backend", "file")?
        .set_default("storage.directory", ".modeler")?
        .set_default("storage.key", DEFAULT_STORAGE_KEY)?
        .add_source(config::File::with_name(path).required(false))
        .build()?;

    Ok(settings.try_deserialize()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::units::{CpuUnit, MemoryUnit};

    #[test]
    fn test_defaults_without_file() {
        let config = load_app_config_from("does/not/exist").unwrap();

        assert_eq!(config.server.bind, "127.0.0.1:8080");
        assert_eq!(config.storage.backend, StorageBackend::File);
        assert_eq!(config.storage.key, "k8s-cluster-growth-model-v1");
        assert_eq!(config.view, ViewSettings::default());
    }

    #[test]
    fn test_file_overrides_defaults() {
        let dir = std::env::temp_dir().join(format!("modeler-config-{}", uuid::Uuid::new_v4().simple()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("modeler.toml");
        std::fs::write(
            &path,
            "[storage]\nbackend = \"memory\"\n\n[view]\ncpu_unit = \"millicores\"\nmemory_unit = \"MiB\"\nstack_by_workload = false\n",
        )
        .unwrap();

        let config = load_app_config_from(path.to_str().unwrap()).unwrap();

        assert_eq!(config.storage.backend, StorageBackend::Memory);
        assert_eq!(config.storage.directory, ".modeler");
        assert_eq!(config.view.cpu_unit, CpuUnit::Millicores);
        assert_eq!(config.view.memory_unit, MemoryUnit::MiB);
        assert!(!config.view.stack_by_workload);

        std::fs::remove_dir_all(dir).unwrap();
    }
}
