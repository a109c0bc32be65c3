// Infrastructure layer - External dependencies and adapters
pub mod config;
pub mod document_codec;
pub mod file_storage;
pub mod memory_storage;
