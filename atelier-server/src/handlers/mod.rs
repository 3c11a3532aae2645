//! HTTP request handlers
//!
//! This module contains all the request handlers for the API endpoints.

pub mod authoring;
pub mod health;
pub mod listings;
pub mod review;

pub use crate::state::AppState;
pub use authoring::{
    open_session, publish, submit_image, ImageScanResponse, OpenSessionRequest,
    OpenSessionResponse, PublishRequest, PublishResponse,
};
pub use health::{health, ready, HealthResponse, ReadyResponse};
pub use listings::{
    delete_listing, get_listing, list_listings, list_seller_listings, report_listing,
    DeleteResponse, ReportRequest,
};
pub use review::{list_queue, review_action, ReviewActionRequest};
