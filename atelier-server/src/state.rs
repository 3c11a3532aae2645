//! Application state module
//!
//! Defines shared state accessible across all request handlers.

use std::sync::Arc;

use atelier_core::{ImageClassifier, TextClassifier};

use crate::catalog::CatalogStore;
use crate::session::SessionStore;

/// Application state containing shared resources.
#[derive(Clone)]
pub struct AppState {
    /// Listing catalog (PostgreSQL or in-memory)
    pub catalog: Arc<CatalogStore>,
    /// In-flight authoring sessions
    pub sessions: Arc<SessionStore>,
    /// Text integrity classifier
    pub text_classifier: Arc<dyn TextClassifier>,
    /// Image integrity classifier
    pub image_classifier: Arc<dyn ImageClassifier>,
    /// Human-readable classifier backend name, reported by /ready
    pub classifier_name: &'static str,
    /// Maximum accepted image upload size in bytes
    pub max_file_size: usize,
}
