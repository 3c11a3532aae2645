//! Catalog storage port.
//!
//! The catalog is the single store of listing records. Two backends are
//! selected at startup:
//!
//! - **PostgreSQL** (production): persisted via sqlx, chosen when
//!   `DATABASE_URL` is set.
//! - **In-memory** (development/tests): a dashmap, chosen otherwise.
//!
//! All writes are whole-record upserts guarded by an optimistic `revision`
//! counter; a mismatch surfaces as [`CatalogError::Conflict`] rather than a
//! silent overwrite, which resolves the seller-edit vs. moderator-action
//! race the workflow otherwise leaves open.

mod memory;
mod postgres;

pub use memory::MemoryCatalog;
pub use postgres::PostgresCatalog;

use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use atelier_core::{AuditEntry, Listing, ModerationStatus};

/// Catalog storage errors
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("Database connection error: {0}")]
    Connection(String),

    #[error("Database migration error: {0}")]
    Migration(String),

    #[error("Query error: {0}")]
    Query(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("listing {0} not found")]
    NotFound(Uuid),

    #[error("revision conflict on listing {id}: expected {expected}, found {found}")]
    Conflict { id: Uuid, expected: i64, found: i64 },
}

/// Listing DTO for API responses.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ListingRecord {
    /// Unique listing identifier
    #[schema(value_type = String, example = "550e8400-e29b-41d4-a716-446655440000")]
    pub id: Uuid,

    /// Owning seller
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
    #[schema(example = "Home & Living")]
    pub category: String,

    /// Ordered image references
    pub images: Vec<String>,

    pub tags: Vec<String>,

    /// Trust status: approved, pending_review, flagged, or rejected
    #[schema(example = "approved")]
    pub moderation_status: String,

    /// Blocking reason, absent while approved
    #[serde(skip_serializing_if = "Option::is_none")]
    pub moderation_reason: Option<String>,

    /// Append-only compliance history
    pub moderation_logs: Vec<AuditLogRecord>,

    pub is_flagged: bool,

    /// Optimistic concurrency counter
    pub revision: i64,

    #[schema(value_type = String, example = "2026-08-01T10:00:00Z")]
    pub created_at: DateTime<Utc>,

    #[schema(value_type = String, example = "2026-08-01T10:00:00Z")]
    pub updated_at: DateTime<Utc>,
}

/// Audit entry DTO for API responses.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AuditLogRecord {
    #[schema(value_type = String, example = "2026-08-01T10:00:00Z")]
    pub timestamp: DateTime<Utc>,

    /// ai_text_scan, ai_image_scan, manual_review, or user_report
    #[schema(example = "ai_text_scan")]
    pub kind: String,

    #[schema(example = "flagged")]
    pub status: String,

    pub reason: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(example = 0.82)]
    pub confidence: Option<f64>,
}

impl From<&AuditEntry> for AuditLogRecord {
    fn from(entry: &AuditEntry) -> Self {
        Self {
            timestamp: entry.timestamp,
            kind: entry.kind.as_str().to_string(),
            status: entry.status.clone(),
            reason: entry.reason.clone(),
            confidence: entry.confidence,
        }
    }
}

impl From<Listing> for ListingRecord {
    fn from(listing: Listing) -> Self {
        let category = serde_json::to_value(listing.category)
            .ok()
            .and_then(|v| v.as_str().map(str::to_string))
            .unwrap_or_default();

        Self {
            id: listing.id,
            seller_id: listing.seller_id,
            seller_name: listing.seller_name,
            title: listing.title,
            description: listing.description,
            price: listing.price,
            category,
            images: listing.images,
            tags: listing.tags,
            moderation_status: listing.moderation_status.as_str().to_string(),
            moderation_reason: listing.moderation_reason,
            moderation_logs: listing.moderation_logs.entries().iter().map(Into::into).collect(),
            is_flagged: listing.is_flagged,
            revision: listing.revision,
            created_at: listing.created_at,
            updated_at: listing.updated_at,
        }
    }
}

/// Catalog storage backend
enum CatalogBackend {
    /// PostgreSQL storage (production)
    Postgres(PostgresCatalog),
    /// In-memory storage (development/tests)
    Memory(MemoryCatalog),
}

/// Unified catalog store over the selected backend.
pub struct CatalogStore {
    backend: CatalogBackend,
}

impl CatalogStore {
    /// Create a catalog with the PostgreSQL backend
    pub async fn with_postgres(database_url: &str) -> Result<Self, CatalogError> {
        let store = PostgresCatalog::connect(database_url).await?;
        store.migrate().await?;

        Ok(Self {
            backend: CatalogBackend::Postgres(store),
        })
    }

    /// Create a catalog with the in-memory backend (development/tests)
    pub fn in_memory() -> Self {
        tracing::warn!("Using in-memory catalog - listings will be lost on restart!");
        Self {
            backend: CatalogBackend::Memory(MemoryCatalog::new()),
        }
    }

    /// Create a catalog from the environment.
    ///
    /// Uses PostgreSQL if `DATABASE_URL` is set, otherwise falls back to
    /// in-memory.
    pub async fn from_env() -> Result<Self, CatalogError> {
        match std::env::var("DATABASE_URL") {
            Ok(url) if !url.is_empty() => {
                tracing::info!("Using PostgreSQL catalog storage");
                Self::with_postgres(&url).await
            }
            _ => {
                tracing::warn!("DATABASE_URL not set, using in-memory catalog");
                Ok(Self::in_memory())
            }
        }
    }

    /// Check if using persistent storage
    pub fn is_persistent(&self) -> bool {
        matches!(self.backend, CatalogBackend::Postgres(_))
    }

    /// Check backend health (always Ok for the memory backend)
    pub async fn check_health(&self) -> Result<(), CatalogError> {
        match &self.backend {
            CatalogBackend::Postgres(pg) => pg.check_health().await,
            CatalogBackend::Memory(_) => Ok(()),
        }
    }

    /// Insert a new listing. The stored record starts at revision 1.
    pub async fn create(&self, listing: Listing) -> Result<Listing, CatalogError> {
        match &self.backend {
            CatalogBackend::Postgres(pg) => pg.create(listing).await,
            CatalogBackend::Memory(mem) => mem.create(listing),
        }
    }

    /// Whole-record update guarded by the listing's current revision.
    ///
    /// The stored revision must equal `listing.revision`; on success the
    /// returned record carries `revision + 1`.
    pub async fn update(&self, listing: Listing) -> Result<Listing, CatalogError> {
        match &self.backend {
            CatalogBackend::Postgres(pg) => pg.update(listing).await,
            CatalogBackend::Memory(mem) => mem.update(listing),
        }
    }

    /// Fetch a listing by id
    pub async fn get(&self, id: Uuid) -> Result<Option<Listing>, CatalogError> {
        match &self.backend {
            CatalogBackend::Postgres(pg) => pg.get(id).await,
            CatalogBackend::Memory(mem) => Ok(mem.get(id)),
        }
    }

    /// Hard-delete a listing; returns whether a record was removed
    pub async fn delete(&self, id: Uuid) -> Result<bool, CatalogError> {
        match &self.backend {
            CatalogBackend::Postgres(pg) => pg.delete(id).await,
            CatalogBackend::Memory(mem) => Ok(mem.delete(id)),
        }
    }

    /// Public catalog: approved listings only, most recent first
    pub async fn list_public(&self) -> Result<Vec<Listing>, CatalogError> {
        match &self.backend {
            CatalogBackend::Postgres(pg) => pg.list_public().await,
            CatalogBackend::Memory(mem) => Ok(mem.list_public()),
        }
    }

    /// All of a seller's listings regardless of status, most recent first
    pub async fn list_for_seller(&self, seller_id: Uuid) -> Result<Vec<Listing>, CatalogError> {
        match &self.backend {
            CatalogBackend::Postgres(pg) => pg.list_for_seller(seller_id).await,
            CatalogBackend::Memory(mem) => Ok(mem.list_for_seller(seller_id)),
        }
    }

    /// Review queue: pending_review + flagged listings, most recently
    /// updated first, ties broken by insertion order
    pub async fn list_queue(&self) -> Result<Vec<Listing>, CatalogError> {
        match &self.backend {
            CatalogBackend::Postgres(pg) => pg.list_queue().await,
            CatalogBackend::Memory(mem) => Ok(mem.list_queue()),
        }
    }
}

impl std::fmt::Debug for CatalogStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let backend = match &self.backend {
            CatalogBackend::Postgres(_) => "PostgreSQL",
            CatalogBackend::Memory(_) => "Memory",
        };
        f.debug_struct("CatalogStore").field("backend", &backend).finish()
    }
}

/// Shorthand used by queue/public filters.
pub(crate) fn in_queue(status: ModerationStatus) -> bool {
    status.requires_review()
}
