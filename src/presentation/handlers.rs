// HTTP request handlers
use crate::application::model_store::ModelStore;
use crate::domain::dashboard::{Dashboard, ViewSettings};
use crate::domain::model::{CapacityField, Model, WorkloadUpdate, parse_quantity};
use crate::domain::units::{CpuUnit, MemoryUnit};
use crate::infrastructure::document_codec::EXPORT_FILE_NAME;
use crate::presentation::app_state::AppState;
use crate::presentation::error::ApiError;
use axum::{
    body::Body,
    extract::{Path, Query, State},
    http::{header, Response, StatusCode},
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Debug, Deserialize)]
pub struct DashboardQuery {
    pub cpu_unit: Option<CpuUnit>,
    pub memory_unit: Option<MemoryUnit>,
    pub stack: Option<bool>,
}

impl DashboardQuery {
    fn resolve(&self, defaults: ViewSettings) -> ViewSettings {
        ViewSettings {
            cpu_unit: self.cpu_unit.unwrap_or(defaults.cpu_unit),
            memory_unit: self.memory_unit.unwrap_or(defaults.memory_unit),
            stack_by_workload: self.stack.unwrap_or(defaults.stack_by_workload),
        }
    }
}

/// Form inputs arrive either as JSON numbers or as raw text.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum InputValue {
    Number(f64),
    Text(String),
}

impl InputValue {
    fn as_number(&self) -> f64 {
        match self {
            InputValue::Number(n) => *n,
            InputValue::Text(s) => parse_quantity(s),
        }
    }

    fn into_text(self) -> String {
        match self {
            InputValue::Number(n) => n.to_string(),
            InputValue::Text(s) => s,
        }
    }
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub enum WorkloadField {
    #[serde(rename = "name")]
    Name,
    #[serde(rename = "cpuCores")]
    CpuCores,
    #[serde(rename = "memoryGiB")]
    MemoryGiB,
    #[serde(rename = "replicas")]
    Replicas,
}

#[derive(Debug, Deserialize)]
pub struct RenameRequest {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct CapacityRequest {
    pub field: CapacityField,
    pub value: InputValue,
}

#[derive(Debug, Deserialize)]
pub struct WorkloadFieldRequest {
    pub field: WorkloadField,
    pub value: InputValue,
}

impl WorkloadFieldRequest {
    fn into_update(self) -> WorkloadUpdate {
        match self.field {
            WorkloadField::Name => WorkloadUpdate::Name(self.value.into_text()),
            WorkloadField::CpuCores => WorkloadUpdate::CpuCores(self.value.as_number()),
            WorkloadField::MemoryGiB => WorkloadUpdate::MemoryGiB(self.value.as_number()),
            WorkloadField::Replicas => WorkloadUpdate::Replicas(self.value.as_number()),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct MoveRequest {
    pub source_cluster_id: String,
    pub source_index: usize,
    pub dest_cluster_id: String,
    pub dest_index: usize,
}

#[derive(Debug, Serialize)]
pub struct MutationResponse {
    pub applied: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_id: Option<String>,
    pub model: Model,
}

impl MutationResponse {
    fn new(applied: bool, created_id: Option<String>, model: &Model) -> Json<Self> {
        Json(Self {
            applied,
            created_id,
            model: model.clone(),
        })
    }
}

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "ok"
}

pub async fn get_model(State(state): State<Arc<AppState>>) -> Result<Json<Model>, ApiError> {
    let snapshot = state.read(ModelStore::snapshot)?;
    Ok(Json(Model::clone(&snapshot)))
}

/// Totals, utilization and both charts for the requested view settings
pub async fn get_dashboard(
    Query(query): Query<DashboardQuery>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<Dashboard>, ApiError> {
    let settings = query.resolve(state.dashboard_service.defaults());
    let snapshot = state.read(ModelStore::snapshot)?;
    Ok(Json(state.dashboard_service.get_dashboard(&snapshot, settings)))
}

pub async fn add_cluster(
    State(state): State<Arc<AppState>>,
) -> Result<Json<MutationResponse>, ApiError> {
    state
        .edit(|store| {
            let id = store.add_cluster();
            MutationResponse::new(true, Some(id), &store.snapshot())
        })
        .await
}

pub async fn remove_cluster(
    Path(cluster_id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<MutationResponse>, ApiError> {
    state
        .edit(move |store| {
            let applied = store.remove_cluster(&cluster_id);
            MutationResponse::new(applied, None, &store.snapshot())
        })
        .await
}

pub async fn rename_cluster(
    Path(cluster_id): Path<String>,
    State(state): State<Arc<AppState>>,
    Json(request): Json<RenameRequest>,
) -> Result<Json<MutationResponse>, ApiError> {
    state
        .edit(move |store| {
            let applied = store.rename_cluster(&cluster_id, &request.name);
            MutationResponse::new(applied, None, &store.snapshot())
        })
        .await
}

pub async fn set_cluster_capacity(
    Path(cluster_id): Path<String>,
    State(state): State<Arc<AppState>>,
    Json(request): Json<CapacityRequest>,
) -> Result<Json<MutationResponse>, ApiError> {
    let value = request.value.as_number();
    state
        .edit(move |store| {
            let applied = store.set_cluster_capacity(&cluster_id, request.field, value);
            MutationResponse::new(applied, None, &store.snapshot())
        })
        .await
}

pub async fn add_workload(
    Path(cluster_id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<MutationResponse>, ApiError> {
    state
        .edit(move |store| {
            let created = store.add_workload(&cluster_id);
            MutationResponse::new(created.is_some(), created, &store.snapshot())
        })
        .await
}

pub async fn remove_workload(
    Path((cluster_id, workload_id)): Path<(String, String)>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<MutationResponse>, ApiError> {
    state
        .edit(move |store| {
            let applied = store.remove_workload(&cluster_id, &workload_id);
            MutationResponse::new(applied, None, &store.snapshot())
        })
        .await
}

pub async fn set_workload_field(
    Path((cluster_id, workload_id)): Path<(String, String)>,
    State(state): State<Arc<AppState>>,
    Json(request): Json<WorkloadFieldRequest>,
) -> Result<Json<MutationResponse>, ApiError> {
    let update = request.into_update();
    state
        .edit(move |store| {
            let applied = store.set_workload_field(&cluster_id, &workload_id, update);
            MutationResponse::new(applied, None, &store.snapshot())
        })
        .await
}

pub async fn move_workload(
    State(state): State<Arc<AppState>>,
    Json(request): Json<MoveRequest>,
) -> Result<Json<MutationResponse>, ApiError> {
    state
        .edit(move |store| {
            let applied = store.move_workload(
                &request.source_cluster_id,
                request.source_index,
                &request.dest_cluster_id,
                request.dest_index,
            );
            MutationResponse::new(applied, None, &store.snapshot())
        })
        .await
}

/// Download the model as a pretty-printed JSON file
pub async fn export_model(State(state): State<Arc<AppState>>) -> Result<Response<Body>, ApiError> {
    let document = state
        .read(ModelStore::export_document)?
        .map_err(ApiError::Export)?;

    let response = Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "application/json")
        .header(
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", EXPORT_FILE_NAME),
        )
        .body(Body::from(document))?;
    Ok(response)
}

/// Replace the whole model with an uploaded document
pub async fn import_model(
    State(state): State<Arc<AppState>>,
    body: String,
) -> Result<Json<MutationResponse>, ApiError> {
    let response = state
        .edit(move |store| {
            store
                .import_document(&body)
                .map(|()| MutationResponse::new(true, None, &store.snapshot()))
        })
        .await??;
    Ok(response)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::dashboard_service::DashboardService;
    use crate::application::model_storage::ModelStorage;
    use crate::application::model_store::{DEFAULT_STORAGE_KEY, ModelStore};
    use crate::domain::chart::ChartValues;
    use crate::infrastructure::memory_storage::MemoryModelStorage;
    use axum::response::IntoResponse;
    use std::sync::Mutex;
    use std::thread::{self, ThreadId};

    /// Records which thread each write arrives on.
    #[derive(Default)]
    struct ThreadRecordingStorage {
        writers: Mutex<Vec<ThreadId>>,
    }

    impl ModelStorage for ThreadRecordingStorage {
        fn read(&self, _key: &str) -> anyhow::Result<Option<String>> {
            Ok(Some("[]".to_string()))
        }

        fn write(&self, _key: &str, _document: &str) -> anyhow::Result<()> {
            self.writers.lock().unwrap().push(thread::current().id());
            Ok(())
        }
    }

    fn state_over(storage: Arc<dyn ModelStorage>) -> Arc<AppState> {
        let store = ModelStore::restore(storage, DEFAULT_STORAGE_KEY);
        Arc::new(AppState::new(store, DashboardService::new(ViewSettings::default())))
    }

    fn state_with(document: &str) -> Arc<AppState> {
        let storage = Arc::new(MemoryModelStorage::new());
        storage.write(DEFAULT_STORAGE_KEY, document).unwrap();
        state_over(storage)
    }

    fn no_overrides() -> DashboardQuery {
        DashboardQuery {
            cpu_unit: None,
            memory_unit: None,
            stack: None,
        }
    }

    #[tokio::test]
    async fn test_edit_flow_updates_dashboard() {
        let state = state_with("[]");

        let Json(added) = add_cluster(State(state.clone())).await.unwrap();
        let cluster_id = added.created_id.unwrap();
        let Json(added) = add_workload(Path(cluster_id.clone()), State(state.clone()))
            .await
            .unwrap();
        let workload_id = added.created_id.unwrap();

        for (field, value) in [
            (WorkloadField::CpuCores, InputValue::Text("2".to_string())),
            (WorkloadField::MemoryGiB, InputValue::Number(4.0)),
            (WorkloadField::Replicas, InputValue::Number(5.0)),
        ] {
            let Json(response) = set_workload_field(
                Path((cluster_id.clone(), workload_id.clone())),
                State(state.clone()),
                Json(WorkloadFieldRequest { field, value }),
            )
            .await
            .unwrap();
            assert!(response.applied);
        }

        let Json(dashboard) = get_dashboard(Query(no_overrides()), State(state.clone()))
            .await
            .unwrap();
        assert_eq!(dashboard.tiles[0].value.text, "10.00 cores");
        assert_eq!(dashboard.tiles[1].value.text, "20.00 GiB");

        let query = DashboardQuery {
            cpu_unit: Some(CpuUnit::Millicores),
            memory_unit: None,
            stack: Some(false),
        };
        let Json(dashboard) = get_dashboard(Query(query), State(state)).await.unwrap();
        assert_eq!(dashboard.tiles[0].value.text, "10000 m");
        assert!(matches!(dashboard.charts[0].rows[0].values, ChartValues::Total { total } if total == 10_000.0));
    }

    #[tokio::test]
    async fn test_bad_numeric_input_is_clamped() {
        let state = state_with("[]");
        let Json(added) = add_cluster(State(state.clone())).await.unwrap();
        let cluster_id = added.created_id.unwrap();

        let Json(response) = set_cluster_capacity(
            Path(cluster_id),
            State(state),
            Json(CapacityRequest {
                field: CapacityField::MaxCpuCores,
                value: InputValue::Text("not a number".to_string()),
            }),
        )
        .await
        .unwrap();

        assert!(response.applied);
        assert_eq!(response.model.clusters[0].max_cpu_cores, Some(0.0));
    }

    #[tokio::test]
    async fn test_unknown_cluster_is_not_an_error() {
        let state = state_with("[]");
        let Json(response) = remove_cluster(Path("missing".to_string()), State(state))
            .await
            .unwrap();
        assert!(!response.applied);
        assert!(response.model.clusters.is_empty());
    }

    #[tokio::test]
    async fn test_import_rejects_object() {
        let state = state_with("[]");
        let Json(added) = add_cluster(State(state.clone())).await.unwrap();
        assert!(added.applied);

        let err = import_model(State(state.clone()), "{\"a\": 1}".to_string())
            .await
            .err()
            .unwrap();
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);

        let Json(model) = get_model(State(state)).await.unwrap();
        assert_eq!(model.clusters.len(), 1);
    }

    #[tokio::test]
    async fn test_export_then_import() {
        let source = state_with("[]");
        let Json(added) = add_cluster(State(source.clone())).await.unwrap();
        let Json(renamed) = rename_cluster(
            Path(added.created_id.unwrap()),
            State(source.clone()),
            Json(RenameRequest {
                name: "edge".to_string(),
            }),
        )
        .await
        .unwrap();
        assert!(renamed.applied);

        let response = export_model(State(source.clone())).await.unwrap();
        assert_eq!(
            response.headers()[header::CONTENT_DISPOSITION],
            "attachment; filename=\"k8s-cluster-growth.json\""
        );
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let document = String::from_utf8(bytes.to_vec()).unwrap();

        let target = state_with("[]");
        let Json(imported) = import_model(State(target.clone()), document).await.unwrap();
        let Json(original) = get_model(State(source)).await.unwrap();
        assert_eq!(imported.model, original);
        assert_eq!(imported.model.clusters[0].name, "edge");
    }

    #[tokio::test]
    async fn test_move_endpoint() {
        let state = state_with("[]");
        let Json(a) = add_cluster(State(state.clone())).await.unwrap();
        let Json(b) = add_cluster(State(state.clone())).await.unwrap();
        let (a, b) = (a.created_id.unwrap(), b.created_id.unwrap());
        let Json(added) = add_workload(Path(a.clone()), State(state.clone())).await.unwrap();
        assert!(added.applied);

        let Json(response) = move_workload(
            State(state),
            Json(MoveRequest {
                source_cluster_id: a,
                source_index: 0,
                dest_cluster_id: b,
                dest_index: 0,
            }),
        )
        .await
        .unwrap();

        assert!(response.applied);
        assert!(response.model.clusters[0].workloads.is_empty());
        assert_eq!(response.model.clusters[1].workloads.len(), 1);
    }

    #[tokio::test]
    async fn test_edits_persist_off_the_runtime_thread() {
        let storage = Arc::new(ThreadRecordingStorage::default());
        let state = state_over(storage.clone());

        let Json(added) = add_cluster(State(state.clone())).await.unwrap();
        assert!(added.applied);
        let Json(model) = get_model(State(state)).await.unwrap();
        assert_eq!(model.clusters.len(), 1);

        let writers = storage.writers.lock().unwrap();
        assert_eq!(writers.len(), 1);
        assert_ne!(writers[0], thread::current().id());
    }

    #[tokio::test]
    async fn test_import_rejects_duplicate_cluster_ids() {
        let state = state_with("[]");
        let document = r#"[
            {"id":"dup","name":"A","maxCpuCores":10,"workloads":[]},
            {"id":"dup","name":"B","maxCpuCores":99,"workloads":[]}]"#;

        let err = import_model(State(state.clone()), document.to_string())
            .await
            .err()
            .unwrap();
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);

        let Json(model) = get_model(State(state)).await.unwrap();
        assert!(model.clusters.is_empty());
    }
}
