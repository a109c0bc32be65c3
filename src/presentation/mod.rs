// Presentation layer - Local HTTP JSON adapter
pub mod app_state;
pub mod error;
pub mod handlers;
