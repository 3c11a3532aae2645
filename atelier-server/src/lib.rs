//! Atelier Server Library - REST API for handmade-marketplace listing integrity
//!
//! This library exposes the server components for use in integration tests.
//! The main binary uses these same components.

pub mod catalog;
pub mod config;
pub mod error;
pub mod handlers;
pub mod multipart;
pub mod openapi;
pub mod routes;
pub mod session;
pub mod state;
pub mod validation;

pub use catalog::{AuditLogRecord, CatalogError, CatalogStore, ListingRecord};
pub use config::Config;
pub use error::ApiError;
pub use openapi::ApiDoc;
pub use routes::{create_router, create_router_with_config};
pub use session::SessionStore;
pub use state::AppState;
