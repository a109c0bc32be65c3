// Export / import of the model as a JSON document
use serde_json::Value;
use std::collections::HashSet;
use thiserror::Error;

use crate::domain::model::Model;

pub const EXPORT_FILE_NAME: &str = "k8s-cluster-growth.json";

#[derive(Debug, Error)]
pub enum ImportError {
    #[error("malformed JSON: {0}")]
    Parse(#[source] serde_json::Error),
    #[error("Invalid format: expected a list of clusters, found {found}")]
    NotASequence { found: &'static str },
    #[error("invalid cluster entry: {0}")]
    Schema(#[source] serde_json::Error),
    #[error("duplicate {kind} id {id:?}")]
    DuplicateId { kind: &'static str, id: String },
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}

/// Cluster ids are unique across the model, and so are workload ids.
fn check_unique_ids(model: &Model) -> Result<(), ImportError> {
    let mut clusters = HashSet::new();
    let mut workloads = HashSet::new();
    for cluster in &model.clusters {
        if !clusters.insert(cluster.id.as_str()) {
            return Err(ImportError::DuplicateId {
                kind: "cluster",
                id: cluster.id.clone(),
            });
        }
        for workload in &cluster.workloads {
            if !workloads.insert(workload.id.as_str()) {
                return Err(ImportError::DuplicateId {
                    kind: "workload",
                    id: workload.id.clone(),
                });
            }
        }
    }
    Ok(())
}

/// Compact form used for the persisted slot.
pub fn encode(model: &Model) -> Result<String, serde_json::Error> {
    serde_json::to_string(model)
}

/// Human-readable form offered as a download.
pub fn export_document(model: &Model) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(model)
}

/// Parse a document back into a model.
///
/// The top level must be a list. Every cluster needs an `id`, `name` and `workloads`; every
/// workload needs `id`, `name` and numeric `cpuCores`, `memoryGiB` and `replicas`. Numbers are
/// clamped the same way user input is. A cluster id or workload id may appear only once.
pub fn decode(text: &str) -> Result<Model, ImportError> {
    let value: Value = serde_json::from_str(text).map_err(ImportError::Parse)?;
    if !value.is_array() {
        return Err(ImportError::NotASequence {
            found: kind_of(&value),
        });
    }
    let model: Model = serde_json::from_value(value).map_err(ImportError::Schema)?;
    check_unique_ids(&model)?;
    Ok(model)
}
