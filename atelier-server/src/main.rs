//! Atelier Server - REST API for handmade-marketplace listing integrity
//!
//! Screens every listing before it goes live: AI text and image integrity
//! scans at authoring time, an append-only audit trail, and a human review
//! queue for whatever the scans flag.

use std::sync::Arc;

use atelier_server::{create_router_with_config, AppState, CatalogStore, Config, SessionStore};

use atelier_core::{GeminiClassifier, MockImageClassifier, MockTextClassifier};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let config = Config::from_env();

    let catalog = match CatalogStore::from_env().await {
        Ok(catalog) => Arc::new(catalog),
        Err(e) => {
            tracing::error!(error = %e, "Failed to initialize catalog storage");
            std::process::exit(1);
        }
    };

    // Classifier selection: Gemini when configured, mocks only when
    // explicitly allowed (development)
    let state = match GeminiClassifier::from_env() {
        Ok(classifier) => {
            tracing::info!("Using Gemini classifiers");
            let classifier = Arc::new(classifier);
            AppState {
                catalog,
                sessions: Arc::new(SessionStore::new()),
                text_classifier: classifier.clone(),
                image_classifier: classifier,
                classifier_name: "gemini",
                max_file_size: config.max_file_size_mb * 1024 * 1024,
            }
        }
        Err(e) if config.allow_mock_classifiers => {
            tracing::warn!(error = %e, "Gemini not configured, using mock classifiers");
            AppState {
                catalog,
                sessions: Arc::new(SessionStore::new()),
                text_classifier: Arc::new(MockTextClassifier::approving()),
                image_classifier: Arc::new(MockImageClassifier::safe()),
                classifier_name: "mock",
                max_file_size: config.max_file_size_mb * 1024 * 1024,
            }
        }
        Err(e) => {
            tracing::error!(
                error = %e,
                "Gemini not configured; set GEMINI_API_KEY or ALLOW_MOCK_CLASSIFIERS=true"
            );
            std::process::exit(1);
        }
    };

    let app = create_router_with_config(&config, state);
    let addr = config.socket_addr();

    tracing::info!("Atelier server listening on http://{}", addr);

    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!(error = %e, "Failed to bind {}", addr);
            std::process::exit(1);
        }
    };

    if let Err(e) = axum::serve(listener, app).await {
        tracing::error!(error = %e, "Server error");
        std::process::exit(1);
    }
}
