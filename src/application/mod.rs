// Application layer - Use cases over the model
pub mod dashboard_service;
pub mod model_storage;
pub mod model_store;
