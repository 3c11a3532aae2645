//! Listing authoring handlers
//!
//! The authoring flow runs in three steps: open a session, submit each
//! photo for an integrity scan, then publish the draft. The text scan and
//! the final status decision happen at publish time; every scan outcome
//! lands in the listing's audit trail, fail-open cases included.

use axum::{
    extract::{Multipart, Path, State},
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::instrument;
use utoipa::ToSchema;
use uuid::Uuid;

use atelier_core::{
    classify_image_fail_open, classify_text_fail_open, decide, AuditTrail, Category, ImageOutcome,
    Listing,
};

use crate::error::ApiError;
use crate::multipart::MultipartFields;
use crate::session::SessionStore;
use crate::state::AppState;
use crate::validation::validate_draft;

/// Body for opening an authoring session
#[derive(Deserialize, ToSchema)]
pub struct OpenSessionRequest {
    #[schema(value_type = String)]
    pub seller_id: Uuid,
}

/// Response for a freshly opened session
#[derive(Serialize, ToSchema)]
pub struct OpenSessionResponse {
    #[schema(value_type = String)]
    pub session_id: Uuid,
    /// Seconds until the session expires
    #[schema(example = 1800)]
    pub expires_in_secs: u64,
}

/// POST /authoring/sessions - Open an authoring session
///
/// A session accumulates image-scan outcomes for one draft. Expired
/// sessions are swept opportunistically on every open.
#[utoipa::path(
    post,
    path = "/authoring/sessions",
    tag = "Authoring",
    request_body = OpenSessionRequest,
    responses(
        (status = 200, description = "Session opened", body = OpenSessionResponse)
    )
)]
pub async fn open_session(
    State(state): State<AppState>,
    Json(body): Json<OpenSessionRequest>,
) -> Json<OpenSessionResponse> {
    state.sessions.cleanup_expired();
    let session_id = state.sessions.open(body.seller_id);

    tracing::debug!(session_id = %session_id, seller_id = %body.seller_id, "Authoring session opened");

    Json(OpenSessionResponse {
        session_id,
        expires_in_secs: SessionStore::expiry_secs(),
    })
}

/// Response for one image submission
#[derive(Serialize, ToSchema)]
pub struct ImageScanResponse {
    /// Whether the image joined the draft's photo sequence
    pub accepted: bool,
    /// Whether the scan raised a quality concern (accepted anyway)
    pub flagged: bool,
    /// Scan reason, present when flagged, rejected, or failed open
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    /// Stored reference for the accepted image
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(example = "images/550e8400-e29b-41d4-a716-446655440000.webp")]
    pub image_ref: Option<String>,
    /// Count of images accepted so far this session
    pub images_accepted: usize,
}

/// POST /authoring/sessions/{id}/images - Submit a photo for scanning
///
/// Accepts multipart/form-data with a single **file** field (image/*).
/// Images are scanned one at a time in submission order. A prohibited
/// image is rejected outright; a stock-photo-like image is accepted but
/// flags the session; a scan that cannot run fails open and accepts.
#[utoipa::path(
    post,
    path = "/authoring/sessions/{id}/images",
    tag = "Authoring",
    request_body(
        content_type = "multipart/form-data",
        description = "Candidate listing photo"
    ),
    params(("id" = Uuid, Path, description = "Authoring session id")),
    responses(
        (status = 200, description = "Scan outcome", body = ImageScanResponse),
        (status = 400, description = "Missing file, wrong type, or too large"),
        (status = 404, description = "Unknown or expired session")
    )
)]
#[instrument(level = "debug", skip(state, multipart), fields(session_id = %id))]
pub async fn submit_image(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    mut multipart: Multipart,
) -> Result<Json<ImageScanResponse>, ApiError> {
    // Reject unknown sessions before reading the upload
    state
        .sessions
        .seller_of(id)
        .ok_or_else(|| ApiError::not_found(format!("Authoring session {} not found", id)))?;

    let fields = MultipartFields::parse(&mut multipart, state.max_file_size).await?;
    let file = fields.require_file()?;
    let mime_type = file
        .content_type
        .as_deref()
        .unwrap_or("image/jpeg")
        .to_string();

    // Classify outside any session lock
    let verdict = classify_image_fail_open(&*state.image_classifier, &file.data, &mime_type).await;

    let image_ref = format!("images/{}.{}", Uuid::new_v4(), extension_for(&mime_type));

    let recorded = state.sessions.with_session(id, |scan| {
        let outcome = scan.record_image_scan(&image_ref, &verdict);
        (outcome, scan.accepted_images().len())
    });

    let (outcome, images_accepted) = recorded
        .ok_or_else(|| ApiError::not_found(format!("Authoring session {} not found", id)))?;

    let reason = if verdict.reason.is_empty() {
        None
    } else {
        Some(verdict.reason.clone())
    };

    let response = match outcome {
        ImageOutcome::Accepted => ImageScanResponse {
            accepted: true,
            flagged: false,
            reason,
            image_ref: Some(image_ref),
            images_accepted,
        },
        ImageOutcome::AcceptedFlagged => ImageScanResponse {
            accepted: true,
            flagged: true,
            reason,
            image_ref: Some(image_ref),
            images_accepted,
        },
        ImageOutcome::Rejected => ImageScanResponse {
            accepted: false,
            flagged: false,
            reason,
            image_ref: None,
            images_accepted,
        },
    };

    Ok(Json(response))
}

/// Body for publishing a draft
#[derive(Deserialize, ToSchema)]
pub struct PublishRequest {
    /// Existing listing to edit; omit when creating
    #[schema(value_type = Option<String>)]
    pub listing_id: Option<Uuid>,
    #[schema(value_type = String)]
    pub seller_id: Uuid,
    #[schema(example = "Clay & Kiln")]
    pub seller_name: String,
    #[schema(example = "Hand-thrown stoneware mug")]
    pub title: String,
    pub description: String,
    #[schema(example = 42.0)]
    pub price: f64,
    /// Marketplace category display name
    #[schema(value_type = String, example = "Home & Living")]
    pub category: Category,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Response for a publish action
#[derive(Serialize, ToSchema)]
pub struct PublishResponse {
    #[schema(value_type = String)]
    pub id: Uuid,
    /// Resulting status: "approved" or "pending_review"
    #[schema(example = "approved")]
    pub status: String,
    /// Blocking reason when queued for review
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    /// Stored revision of the new record
    pub revision: i64,
}

/// POST /authoring/sessions/{id}/publish - Publish the draft
///
/// Runs the text scan, combines it with the session's image signals, and
/// stores the listing with the decided status. Editing an existing listing
/// keeps its prior images (the session's accepted images are appended) and
/// its full audit trail. The session is consumed only after the record is
/// stored; a failed publish leaves it reusable.
#[utoipa::path(
    post,
    path = "/authoring/sessions/{id}/publish",
    tag = "Authoring",
    request_body = PublishRequest,
    params(("id" = Uuid, Path, description = "Authoring session id")),
    responses(
        (status = 200, description = "Listing stored", body = PublishResponse),
        (status = 400, description = "Invalid draft"),
        (status = 403, description = "Session belongs to another seller"),
        (status = 404, description = "Unknown or expired session"),
        (status = 409, description = "Listing changed concurrently, retry")
    )
)]
#[instrument(level = "debug", skip(state, body), fields(session_id = %id))]
pub async fn publish(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<PublishRequest>,
) -> Result<Json<PublishResponse>, ApiError> {
    let owner = state
        .sessions
        .seller_of(id)
        .ok_or_else(|| ApiError::not_found(format!("Authoring session {} not found", id)))?;
    if owner != body.seller_id {
        return Err(ApiError::unauthorized(
            "Authoring session belongs to another seller",
        ));
    }

    validate_draft(&body.title, &body.description, body.price)?;

    // Existing listing when editing: source of prior images, trail, revision
    let prior = match body.listing_id {
        Some(listing_id) => {
            let listing = state.catalog.get(listing_id).await?.ok_or_else(|| {
                ApiError::not_found(format!("Listing {} not found", listing_id))
            })?;
            if listing.seller_id != body.seller_id {
                return Err(ApiError::unauthorized(
                    "Only the owning seller may edit a listing",
                ));
            }
            Some(listing)
        }
        None => None,
    };

    // Peek at the session without consuming it; classification can fail
    let scan = state
        .sessions
        .with_session(id, |scan| scan.clone())
        .ok_or_else(|| ApiError::not_found(format!("Authoring session {} not found", id)))?;

    let mut images: Vec<String> = prior
        .as_ref()
        .map(|l| l.images.clone())
        .unwrap_or_default();
    images.extend(scan.accepted_images().iter().cloned());

    if images.is_empty() {
        return Err(ApiError::bad_request(
            "A listing requires at least one accepted image",
        ));
    }

    let text_verdict =
        classify_text_fail_open(&*state.text_classifier, &body.title, &body.description).await;

    let prior_trail = prior
        .as_ref()
        .map(|l| l.moderation_logs.clone())
        .unwrap_or_else(AuditTrail::new);
    let decision = decide(&text_verdict, &scan, &prior_trail);

    let now = Utc::now();
    let listing = match prior {
        Some(existing) => Listing {
            seller_name: body.seller_name,
            title: body.title,
            description: body.description,
            price: body.price,
            category: body.category,
            images,
            tags: body.tags,
            moderation_status: decision.status,
            moderation_reason: decision.reason.clone(),
            moderation_logs: decision.trail,
            is_flagged: decision.status.is_blocked(),
            updated_at: now,
            ..existing
        },
        None => Listing {
            id: Uuid::new_v4(),
            seller_id: body.seller_id,
            seller_name: body.seller_name,
            title: body.title,
            description: body.description,
            price: body.price,
            category: body.category,
            images,
            tags: body.tags,
            moderation_status: decision.status,
            moderation_reason: decision.reason.clone(),
            moderation_logs: decision.trail,
            is_flagged: decision.status.is_blocked(),
            revision: 0,
            created_at: now,
            updated_at: now,
        },
    };

    let editing = body.listing_id.is_some();
    let stored = if editing {
        state.catalog.update(listing).await?
    } else {
        state.catalog.create(listing).await?
    };

    // Stored successfully, the session is spent
    state.sessions.take(id);

    tracing::info!(
        listing_id = %stored.id,
        status = %stored.moderation_status,
        "Listing published"
    );

    Ok(Json(PublishResponse {
        id: stored.id,
        status: stored.moderation_status.as_str().to_string(),
        reason: stored.moderation_reason,
        revision: stored.revision,
    }))
}

/// File extension for a stored image reference.
fn extension_for(mime_type: &str) -> &str {
    match mime_type.to_lowercase().as_str() {
        "image/jpeg" | "image/jpg" => "jpg",
        "image/png" => "png",
        "image/webp" => "webp",
        "image/gif" => "gif",
        "image/avif" => "avif",
        _ => "bin",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extension_for_known_types() {
        assert_eq!(extension_for("image/jpeg"), "jpg");
        assert_eq!(extension_for("IMAGE/PNG"), "png");
        assert_eq!(extension_for("image/webp"), "webp");
    }

    #[test]
    fn test_extension_for_unknown_type() {
        assert_eq!(extension_for("image/x-exotic"), "bin");
    }
}
