// Application state for HTTP handlers
use crate::application::dashboard_service::DashboardService;
use crate::application::model_store::ModelStore;
use crate::presentation::error::ApiError;
use std::sync::{Arc, Mutex, MutexGuard};

pub struct AppState {
    model_store: Mutex<ModelStore>,
    pub dashboard_service: DashboardService,
}

impl AppState {
    pub fn new(model_store: ModelStore, dashboard_service: DashboardService) -> Self {
        Self {
            model_store: Mutex::new(model_store),
            dashboard_service,
        }
    }

    fn lock_store(&self) -> Result<MutexGuard<'_, ModelStore>, ApiError> {
        self.model_store.lock().map_err(|_| ApiError::StoreUnavailable)
    }

    /// Run a read-only query against the store. Reads never touch storage.
    pub fn read<T>(&self, query: impl FnOnce(&ModelStore) -> T) -> Result<T, ApiError> {
        let store = self.lock_store()?;
        Ok(query(&*store))
    }

    /// Run an edit on the blocking pool, since a committed edit writes through to storage.
    pub async fn edit<T, F>(self: &Arc<Self>, apply: F) -> Result<T, ApiError>
    where
        F: FnOnce(&mut ModelStore) -> T + Send + 'static,
        T: Send + 'static,
    {
        let state = Arc::clone(self);
        tokio::task::spawn_blocking(move || {
            let mut store = state.lock_store()?;
            Ok(apply(&mut *store))
        })
        .await?
    }
}
