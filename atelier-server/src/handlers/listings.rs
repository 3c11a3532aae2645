//! Catalog and report handlers
//!
//! Public listing reads, the seller's own-listings view, listing deletion,
//! and the community integrity report endpoint.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::instrument;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::catalog::ListingRecord;
use crate::error::ApiError;
use crate::state::AppState;

/// GET /listings - Public catalog
///
/// Approved listings only, most recent first. Blocked and pending listings
/// never appear here regardless of who asks.
#[utoipa::path(
    get,
    path = "/listings",
    tag = "Catalog",
    responses(
        (status = 200, description = "Approved listings, newest first", body = [ListingRecord])
    )
)]
pub async fn list_listings(
    State(state): State<AppState>,
) -> Result<Json<Vec<ListingRecord>>, ApiError> {
    let listings = state.catalog.list_public().await?;
    Ok(Json(listings.into_iter().map(Into::into).collect()))
}

/// GET /listings/{id} - Fetch one listing
#[utoipa::path(
    get,
    path = "/listings/{id}",
    tag = "Catalog",
    params(("id" = Uuid, Path, description = "Listing id")),
    responses(
        (status = 200, description = "Listing found", body = ListingRecord),
        (status = 404, description = "No such listing")
    )
)]
pub async fn get_listing(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ListingRecord>, ApiError> {
    let listing = state
        .catalog
        .get(id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("Listing {} not found", id)))?;

    Ok(Json(listing.into()))
}

/// GET /sellers/{seller_id}/listings - Seller dashboard view
///
/// All of a seller's listings regardless of moderation status, so blocked
/// listings stay visible to their owner with status and reason.
#[utoipa::path(
    get,
    path = "/sellers/{seller_id}/listings",
    tag = "Catalog",
    params(("seller_id" = Uuid, Path, description = "Seller id")),
    responses(
        (status = 200, description = "Seller's listings, newest first", body = [ListingRecord])
    )
)]
pub async fn list_seller_listings(
    State(state): State<AppState>,
    Path(seller_id): Path<Uuid>,
) -> Result<Json<Vec<ListingRecord>>, ApiError> {
    let listings = state.catalog.list_for_seller(seller_id).await?;
    Ok(Json(listings.into_iter().map(Into::into).collect()))
}

/// Owner assertion for destructive listing operations
#[derive(Debug, Deserialize)]
pub struct OwnerQuery {
    pub seller_id: Uuid,
}

/// Response for listing deletion
#[derive(Serialize, ToSchema)]
pub struct DeleteResponse {
    pub deleted: bool,
}

/// DELETE /listings/{id}?seller_id= - Remove a listing
///
/// Only the owning seller may delete. Deletion is allowed in every
/// moderation status; a rejected listing can still be withdrawn.
#[utoipa::path(
    delete,
    path = "/listings/{id}",
    tag = "Catalog",
    params(
        ("id" = Uuid, Path, description = "Listing id"),
        ("seller_id" = Uuid, Query, description = "Requesting seller")
    ),
    responses(
        (status = 200, description = "Listing removed", body = DeleteResponse),
        (status = 403, description = "Requester does not own the listing"),
        (status = 404, description = "No such listing")
    )
)]
#[instrument(level = "debug", skip(state), fields(listing_id = %id))]
pub async fn delete_listing(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(owner): Query<OwnerQuery>,
) -> Result<Json<DeleteResponse>, ApiError> {
    let listing = state
        .catalog
        .get(id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("Listing {} not found", id)))?;

    if listing.seller_id != owner.seller_id {
        return Err(ApiError::unauthorized(
            "Only the owning seller may delete a listing",
        ));
    }

    let deleted = state.catalog.delete(id).await?;
    tracing::info!(listing_id = %id, "Listing deleted");

    Ok(Json(DeleteResponse { deleted }))
}

/// Body for a community integrity report
#[derive(Deserialize, ToSchema)]
pub struct ReportRequest {
    /// Reporter's reason; must not be empty
    #[schema(example = "Identical item appears on three other storefronts")]
    pub reason: String,
}

/// POST /listings/{id}/report - File a community integrity report
///
/// Flags the listing and pulls it from public view pending review. A
/// rejected listing keeps its status and terminal reason; the report is
/// still recorded in the audit trail.
#[utoipa::path(
    post,
    path = "/listings/{id}/report",
    tag = "Moderation",
    request_body = ReportRequest,
    params(("id" = Uuid, Path, description = "Listing id")),
    responses(
        (status = 200, description = "Report recorded", body = ListingRecord),
        (status = 400, description = "Empty reason"),
        (status = 404, description = "No such listing"),
        (status = 409, description = "Listing changed concurrently, retry")
    )
)]
#[instrument(level = "debug", skip(state, body), fields(listing_id = %id))]
pub async fn report_listing(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<ReportRequest>,
) -> Result<Json<ListingRecord>, ApiError> {
    let mut listing = state
        .catalog
        .get(id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("Listing {} not found", id)))?;

    listing.apply_report(&body.reason)?;

    let stored = state.catalog.update(listing).await?;
    tracing::info!(listing_id = %id, status = %stored.moderation_status, "Report applied");

    Ok(Json(stored.into()))
}
