//! Manual moderation handlers
//!
//! The review queue and the moderator action endpoint.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Deserialize;
use tracing::instrument;
use utoipa::ToSchema;
use uuid::Uuid;

use atelier_core::ReviewVerdict;

use crate::catalog::ListingRecord;
use crate::error::ApiError;
use crate::state::AppState;

/// GET /moderation/queue - Review queue
///
/// Pending and flagged listings, most recently updated first. Approved and
/// rejected listings never appear; a moderator works the queue top-down.
#[utoipa::path(
    get,
    path = "/moderation/queue",
    tag = "Moderation",
    responses(
        (status = 200, description = "Listings awaiting review", body = [ListingRecord])
    )
)]
pub async fn list_queue(
    State(state): State<AppState>,
) -> Result<Json<Vec<ListingRecord>>, ApiError> {
    let listings = state.catalog.list_queue().await?;
    Ok(Json(listings.into_iter().map(Into::into).collect()))
}

/// Body for a moderator action
#[derive(Deserialize, ToSchema)]
pub struct ReviewActionRequest {
    /// "approved" or "rejected"
    #[schema(value_type = String, example = "approved")]
    pub verdict: ReviewVerdict,
    /// Mandatory written justification; an empty reason is rejected and
    /// the listing is left untouched
    #[schema(example = "Verified the maker's process photos")]
    pub reason: String,
}

/// POST /moderation/{id}/action - Apply a moderator verdict
///
/// Approval restores the listing to public view and clears the blocking
/// reason; rejection is terminal for the current authoring cycle. Either
/// way the verdict and its reason land in the audit trail.
#[utoipa::path(
    post,
    path = "/moderation/{id}/action",
    tag = "Moderation",
    request_body = ReviewActionRequest,
    params(("id" = Uuid, Path, description = "Listing id")),
    responses(
        (status = 200, description = "Verdict applied", body = ListingRecord),
        (status = 400, description = "Empty reason"),
        (status = 404, description = "No such listing"),
        (status = 409, description = "Listing changed concurrently, retry")
    )
)]
#[instrument(level = "debug", skip(state, body), fields(listing_id = %id))]
pub async fn review_action(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<ReviewActionRequest>,
) -> Result<Json<ListingRecord>, ApiError> {
    // Validate before touching storage so a bad request stays a no-op
    if body.reason.trim().is_empty() {
        return Err(ApiError::bad_request(
            "A manual review requires a non-empty reason",
        ));
    }

    let mut listing = state
        .catalog
        .get(id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("Listing {} not found", id)))?;

    listing.apply_manual_review(body.verdict, &body.reason)?;

    let stored = state.catalog.update(listing).await?;
    tracing::info!(
        listing_id = %id,
        verdict = body.verdict.as_str(),
        "Manual review applied"
    );

    Ok(Json(stored.into()))
}
