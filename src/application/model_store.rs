// Model store - Owns the current model, applies user edits and writes them through
use crate::application::model_storage::ModelStorage;
use crate::domain::model::{CapacityField, Cluster, Model, Workload, WorkloadUpdate};
use crate::infrastructure::document_codec::{self, ImportError};
use std::sync::Arc;

pub const DEFAULT_STORAGE_KEY: &str = "k8s-cluster-growth-model-v1";

/// Every edit builds a new `Model` and swaps it in, so a snapshot handed out earlier never
/// changes underneath its reader.
pub struct ModelStore {
    storage: Arc<dyn ModelStorage>,
    key: String,
    model: Arc<Model>,
}

impl ModelStore {
    /// Load the persisted model, falling back to the seed when the slot is empty or unreadable.
    pub fn restore(storage: Arc<dyn ModelStorage>, key: impl Into<String>) -> Self {
        let key = key.into();
        let model = match storage.read(&key) {
            Ok(Some(text)) => match document_codec::decode(&text) {
                Ok(model) => {
                    tracing::info!(
                        "Restored model with {} clusters and {} workloads",
                        model.clusters.len(),
                        model.workload_count()
                    );
                    model
                }
                Err(e) => {
                    tracing::warn!("Stored model under {} is unreadable, using seed: {}", key, e);
                    Model::seed()
                }
            },
            Ok(None) => {
                tracing::info!("No stored model under {}, using seed", key);
                Model::seed()
            }
            Err(e) => {
                tracing::warn!("Failed to read stored model, using seed: {:#}", e);
                Model::seed()
            }
        };

        Self {
            storage,
            key,
            model: Arc::new(model),
        }
    }

    pub fn snapshot(&self) -> Arc<Model> {
        self.model.clone()
    }

    /// Write the current model to storage. Failures are logged and otherwise ignored.
    pub fn persist(&self) {
        let result = document_codec::encode(&self.model)
            .map_err(anyhow::Error::from)
            .and_then(|text| self.storage.write(&self.key, &text));
        if let Err(e) = result {
            tracing::warn!("Failed to persist model under {}: {:#}", self.key, e);
        }
    }

    fn commit(&mut self, next: Model) {
        self.model = Arc::new(next);
        self.persist();
    }

    /// Apply `edit` to a copy of the model; commit only if it reports a change.
    fn update<F>(&mut self, edit: F) -> bool
    where
        F: FnOnce(&mut Model) -> bool,
    {
        let mut next = Model::clone(&self.model);
        if edit(&mut next) {
            self.commit(next);
            true
        } else {
            false
        }
    }

    pub fn add_cluster(&mut self) -> String {
        let cluster = Cluster::new(format!("cluster-{}", self.model.clusters.len() + 1));
        let id = cluster.id.clone();
        self.update(|m| {
            m.clusters.push(cluster);
            true
        });
        tracing::debug!("Added cluster {}", id);
        id
    }

    pub fn remove_cluster(&mut self, cluster_id: &str) -> bool {
        let removed = self.update(|m| {
            let before = m.clusters.len();
            m.clusters.retain(|c| c.id != cluster_id);
            m.clusters.len() != before
        });
        self.trace_edit("remove cluster", cluster_id, removed);
        removed
    }

    pub fn rename_cluster(&mut self, cluster_id: &str, name: &str) -> bool {
        let renamed = self.update(|m| match m.cluster_mut(cluster_id) {
            Some(cluster) => {
                cluster.name = name.to_string();
                true
            }
            None => false,
        });
        self.trace_edit("rename cluster", cluster_id, renamed);
        renamed
    }

    pub fn set_cluster_capacity(&mut self, cluster_id: &str, field: CapacityField, value: f64) -> bool {
        let updated = self.update(|m| match m.cluster_mut(cluster_id) {
            Some(cluster) => {
                cluster.set_capacity(field, value);
                true
            }
            None => false,
        });
        self.trace_edit("set capacity", cluster_id, updated);
        updated
    }

    /// Returns the new workload's id, or `None` if the cluster does not exist.
    pub fn add_workload(&mut self, cluster_id: &str) -> Option<String> {
        let mut created = None;
        self.update(|m| match m.cluster_mut(cluster_id) {
            Some(cluster) => {
                let workload =
                    Workload::with_default_values(format!("workload-{}", cluster.workloads.len() + 1));
                created = Some(workload.id.clone());
                cluster.workloads.push(workload);
                true
            }
            None => false,
        });
        self.trace_edit("add workload", cluster_id, created.is_some());
        created
    }

    pub fn remove_workload(&mut self, cluster_id: &str, workload_id: &str) -> bool {
        let removed = self.update(|m| match m.cluster_mut(cluster_id) {
            Some(cluster) => {
                let before = cluster.workloads.len();
                cluster.workloads.retain(|w| w.id != workload_id);
                cluster.workloads.len() != before
            }
            None => false,
        });
        self.trace_edit("remove workload", workload_id, removed);
        removed
    }

    pub fn set_workload_field(
        &mut self,
        cluster_id: &str,
        workload_id: &str,
        update: WorkloadUpdate,
    ) -> bool {
        let updated = self.update(|m| {
            match m.cluster_mut(cluster_id).and_then(|c| c.workload_mut(workload_id)) {
                Some(workload) => {
                    workload.apply(update);
                    true
                }
                None => false,
            }
        });
        self.trace_edit("update workload", workload_id, updated);
        updated
    }

    pub fn move_workload(
        &mut self,
        source_cluster_id: &str,
        source_index: usize,
        dest_cluster_id: &str,
        dest_index: usize,
    ) -> bool {
        let moved = self.update(|m| {
            m.move_workload(source_cluster_id, source_index, dest_cluster_id, dest_index)
        });
        tracing::debug!(
            "Move {}[{}] -> {}[{}]: applied={}",
            source_cluster_id,
            source_index,
            dest_cluster_id,
            dest_index,
            moved
        );
        moved
    }

    pub fn replace_model(&mut self, model: Model) {
        tracing::info!("Replacing model with {} clusters", model.clusters.len());
        self.commit(model);
    }

    /// Parse an imported document and, if valid, make it the current model.
    /// On rejection the current model is left as it was.
    pub fn import_document(&mut self, text: &str) -> Result<(), ImportError> {
        let model = document_codec::decode(text).inspect_err(|e| {
            tracing::warn!("Import rejected: {}", e);
        })?;
        self.replace_model(model);
        Ok(())
    }

    pub fn export_document(&self) -> Result<String, serde_json::Error> {
        document_codec::export_document(&self.model)
    }

    fn trace_edit(&self, action: &str, id: &str, applied: bool) {
        if applied {
            tracing::debug!("{} {}", action, id);
        } else {
            tracing::debug!("{} {}: no matching id, ignored", action, id);
        }
    }
}
