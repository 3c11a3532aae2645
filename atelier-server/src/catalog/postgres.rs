//! PostgreSQL implementation of the catalog.

use chrono::{DateTime, Utc};
use sqlx::postgres::PgPoolOptions;
use sqlx::{FromRow, PgPool};
use std::str::FromStr;
use uuid::Uuid;

use atelier_core::{AuditTrail, Category, Listing, ModerationStatus};

use super::CatalogError;

/// PostgreSQL-backed catalog.
#[derive(Clone)]
pub struct PostgresCatalog {
    pool: PgPool,
}

/// Row type for database queries.
#[derive(FromRow)]
struct ListingRow {
    id: Uuid,
    seller_id: Uuid,
    seller_name: String,
    title: String,
    description: String,
    price: f64,
    category: String,
    images: serde_json::Value,
    tags: serde_json::Value,
    moderation_status: String,
    moderation_reason: Option<String>,
    moderation_logs: serde_json::Value,
    is_flagged: bool,
    revision: i64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<ListingRow> for Listing {
    type Error = CatalogError;

    fn try_from(row: ListingRow) -> Result<Self, CatalogError> {
        let category = Category::from_str(&row.category)
            .map_err(|e| CatalogError::Serialization(e.to_string()))?;
        let moderation_status = ModerationStatus::from_str(&row.moderation_status)
            .map_err(|e| CatalogError::Serialization(e.to_string()))?;
        let images: Vec<String> = serde_json::from_value(row.images)
            .map_err(|e| CatalogError::Serialization(e.to_string()))?;
        let tags: Vec<String> = serde_json::from_value(row.tags)
            .map_err(|e| CatalogError::Serialization(e.to_string()))?;
        let moderation_logs: AuditTrail = serde_json::from_value(row.moderation_logs)
            .map_err(|e| CatalogError::Serialization(e.to_string()))?;

        Ok(Listing {
            id: row.id,
            seller_id: row.seller_id,
            seller_name: row.seller_name,
            title: row.title,
            description: row.description,
            price: row.price,
            category,
            images,
            tags,
            moderation_status,
            moderation_reason: row.moderation_reason,
            moderation_logs,
            is_flagged: row.is_flagged,
            revision: row.revision,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

const LISTING_COLUMNS: &str = "id, seller_id, seller_name, title, description, price, category, \
     images, tags, moderation_status, moderation_reason, moderation_logs, \
     is_flagged, revision, created_at, updated_at";

impl PostgresCatalog {
    /// Connect to the database with the given URL.
    pub async fn connect(database_url: &str) -> Result<Self, CatalogError> {
        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect(database_url)
            .await
            .map_err(|e| CatalogError::Connection(e.to_string()))?;

        Ok(Self { pool })
    }

    /// Create a catalog from an existing pool (for testing).
    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Apply the catalog schema. Idempotent.
    pub async fn migrate(&self) -> Result<(), CatalogError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS listings (
                id UUID PRIMARY KEY,
                seller_id UUID NOT NULL,
                seller_name TEXT NOT NULL,
                title TEXT NOT NULL,
                description TEXT NOT NULL,
                price DOUBLE PRECISION NOT NULL,
                category TEXT NOT NULL,
                images JSONB NOT NULL DEFAULT '[]',
                tags JSONB NOT NULL DEFAULT '[]',
                moderation_status TEXT NOT NULL,
                moderation_reason TEXT,
                moderation_logs JSONB NOT NULL DEFAULT '[]',
                is_flagged BOOLEAN NOT NULL DEFAULT FALSE,
                revision BIGINT NOT NULL DEFAULT 1,
                created_at TIMESTAMPTZ NOT NULL,
                updated_at TIMESTAMPTZ NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(|e| CatalogError::Migration(e.to_string()))?;

        sqlx::query(
            r#"
            CREATE INDEX IF NOT EXISTS idx_listings_queue
            ON listings (updated_at DESC)
            WHERE moderation_status IN ('pending_review', 'flagged')
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(|e| CatalogError::Migration(e.to_string()))?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_listings_seller ON listings (seller_id, created_at DESC)",
        )
        .execute(&self.pool)
        .await
        .map_err(|e| CatalogError::Migration(e.to_string()))?;

        tracing::info!("Catalog schema applied");

        Ok(())
    }

    /// Verify database connectivity.
    pub async fn check_health(&self) -> Result<(), CatalogError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| CatalogError::Connection(e.to_string()))?;
        Ok(())
    }

    /// Insert a new listing at revision 1.
    pub async fn create(&self, listing: Listing) -> Result<Listing, CatalogError> {
        let images = serde_json::to_value(&listing.images)
            .map_err(|e| CatalogError::Serialization(e.to_string()))?;
        let tags = serde_json::to_value(&listing.tags)
            .map_err(|e| CatalogError::Serialization(e.to_string()))?;
        let logs = serde_json::to_value(&listing.moderation_logs)
            .map_err(|e| CatalogError::Serialization(e.to_string()))?;

        let row: ListingRow = sqlx::query_as(&format!(
            r#"
            INSERT INTO listings ({LISTING_COLUMNS})
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, 1, $14, $15)
            RETURNING {LISTING_COLUMNS}
            "#,
        ))
        .bind(listing.id)
        .bind(listing.seller_id)
        .bind(&listing.seller_name)
        .bind(&listing.title)
        .bind(&listing.description)
        .bind(listing.price)
        .bind(listing.category.as_str())
        .bind(&images)
        .bind(&tags)
        .bind(listing.moderation_status.as_str())
        .bind(&listing.moderation_reason)
        .bind(&logs)
        .bind(listing.is_flagged)
        .bind(listing.created_at)
        .bind(listing.updated_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| CatalogError::Query(e.to_string()))?;

        tracing::debug!(listing_id = %listing.id, "Stored listing");

        row.try_into()
    }

    /// Whole-record update guarded by the caller's revision.
    pub async fn update(&self, listing: Listing) -> Result<Listing, CatalogError> {
        let images = serde_json::to_value(&listing.images)
            .map_err(|e| CatalogError::Serialization(e.to_string()))?;
        let tags = serde_json::to_value(&listing.tags)
            .map_err(|e| CatalogError::Serialization(e.to_string()))?;
        let logs = serde_json::to_value(&listing.moderation_logs)
            .map_err(|e| CatalogError::Serialization(e.to_string()))?;

        let row: Option<ListingRow> = sqlx::query_as(&format!(
            r#"
            UPDATE listings SET
                seller_name = $3,
                title = $4,
                description = $5,
                price = $6,
                category = $7,
                images = $8,
                tags = $9,
                moderation_status = $10,
                moderation_reason = $11,
                moderation_logs = $12,
                is_flagged = $13,
                revision = revision + 1,
                updated_at = $14
            WHERE id = $1 AND revision = $2
            RETURNING {LISTING_COLUMNS}
            "#,
        ))
        .bind(listing.id)
        .bind(listing.revision)
        .bind(&listing.seller_name)
        .bind(&listing.title)
        .bind(&listing.description)
        .bind(listing.price)
        .bind(listing.category.as_str())
        .bind(&images)
        .bind(&tags)
        .bind(listing.moderation_status.as_str())
        .bind(&listing.moderation_reason)
        .bind(&logs)
        .bind(listing.is_flagged)
        .bind(listing.updated_at)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| CatalogError::Query(e.to_string()))?;

        match row {
            Some(row) => row.try_into(),
            // Distinguish a missing record from a stale revision
            None => {
                let found: Option<i64> =
                    sqlx::query_scalar("SELECT revision FROM listings WHERE id = $1")
                        .bind(listing.id)
                        .fetch_optional(&self.pool)
                        .await
                        .map_err(|e| CatalogError::Query(e.to_string()))?;

                match found {
                    Some(found) => Err(CatalogError::Conflict {
                        id: listing.id,
                        expected: listing.revision,
                        found,
                    }),
                    None => Err(CatalogError::NotFound(listing.id)),
                }
            }
        }
    }

    /// Fetch a listing by id.
    pub async fn get(&self, id: Uuid) -> Result<Option<Listing>, CatalogError> {
        let row: Option<ListingRow> = sqlx::query_as(&format!(
            "SELECT {LISTING_COLUMNS} FROM listings WHERE id = $1",
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| CatalogError::Query(e.to_string()))?;

        row.map(TryInto::try_into).transpose()
    }

    /// Delete a listing by id.
    pub async fn delete(&self, id: Uuid) -> Result<bool, CatalogError> {
        let result = sqlx::query("DELETE FROM listings WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| CatalogError::Query(e.to_string()))?;

        Ok(result.rows_affected() > 0)
    }

    /// Approved listings, newest first.
    pub async fn list_public(&self) -> Result<Vec<Listing>, CatalogError> {
        let rows: Vec<ListingRow> = sqlx::query_as(&format!(
            r#"
            SELECT {LISTING_COLUMNS} FROM listings
            WHERE moderation_status = 'approved'
            ORDER BY created_at DESC
            "#,
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| CatalogError::Query(e.to_string()))?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    /// All of a seller's listings regardless of status, newest first.
    pub async fn list_for_seller(&self, seller_id: Uuid) -> Result<Vec<Listing>, CatalogError> {
        let rows: Vec<ListingRow> = sqlx::query_as(&format!(
            r#"
            SELECT {LISTING_COLUMNS} FROM listings
            WHERE seller_id = $1
            ORDER BY created_at DESC
            "#,
        ))
        .bind(seller_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| CatalogError::Query(e.to_string()))?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    /// Review queue: pending and flagged listings, most recently updated
    /// first.
    pub async fn list_queue(&self) -> Result<Vec<Listing>, CatalogError> {
        let rows: Vec<ListingRow> = sqlx::query_as(&format!(
            r#"
            SELECT {LISTING_COLUMNS} FROM listings
            WHERE moderation_status IN ('pending_review', 'flagged')
            ORDER BY updated_at DESC, revision DESC
            "#,
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| CatalogError::Query(e.to_string()))?;

        rows.into_iter().map(TryInto::try_into).collect()
    }
}
