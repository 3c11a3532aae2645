//! In-memory catalog backend.
//!
//! Backs development and test runs. Revision semantics match the
//! PostgreSQL backend exactly so the optimistic-concurrency behavior can
//! be exercised without a database.

use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use uuid::Uuid;

use atelier_core::{Listing, ModerationStatus};

use super::CatalogError;

struct StoredListing {
    listing: Listing,
    /// Monotonic insertion sequence, used as the queue tie-breaker
    seq: u64,
}

/// Dashmap-backed listing store.
#[derive(Default)]
pub struct MemoryCatalog {
    listings: DashMap<Uuid, StoredListing>,
    next_seq: AtomicU64,
}

impl MemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create(&self, mut listing: Listing) -> Result<Listing, CatalogError> {
        if self.listings.contains_key(&listing.id) {
            return Err(CatalogError::Query(format!(
                "listing {} already exists",
                listing.id
            )));
        }
        listing.revision = 1;
        let seq = self.next_seq.fetch_add(1, Ordering::Relaxed);
        self.listings.insert(
            listing.id,
            StoredListing {
                listing: listing.clone(),
                seq,
            },
        );
        Ok(listing)
    }

    pub fn update(&self, mut listing: Listing) -> Result<Listing, CatalogError> {
        let mut entry = self
            .listings
            .get_mut(&listing.id)
            .ok_or(CatalogError::NotFound(listing.id))?;

        let found = entry.listing.revision;
        if found != listing.revision {
            return Err(CatalogError::Conflict {
                id: listing.id,
                expected: listing.revision,
                found,
            });
        }

        listing.revision += 1;
        entry.listing = listing.clone();
        Ok(listing)
    }

    pub fn get(&self, id: Uuid) -> Option<Listing> {
        self.listings.get(&id).map(|e| e.listing.clone())
    }

    pub fn delete(&self, id: Uuid) -> bool {
        self.listings.remove(&id).is_some()
    }

    pub fn list_public(&self) -> Vec<Listing> {
        let mut rows: Vec<(u64, Listing)> = self
            .listings
            .iter()
            .filter(|e| e.listing.moderation_status == ModerationStatus::Approved)
            .map(|e| (e.seq, e.listing.clone()))
            .collect();
        rows.sort_by(|a, b| b.1.created_at.cmp(&a.1.created_at).then(b.0.cmp(&a.0)));
        rows.into_iter().map(|(_, l)| l).collect()
    }

    pub fn list_for_seller(&self, seller_id: Uuid) -> Vec<Listing> {
        let mut rows: Vec<(u64, Listing)> = self
            .listings
            .iter()
            .filter(|e| e.listing.seller_id == seller_id)
            .map(|e| (e.seq, e.listing.clone()))
            .collect();
        rows.sort_by(|a, b| b.1.created_at.cmp(&a.1.created_at).then(b.0.cmp(&a.0)));
        rows.into_iter().map(|(_, l)| l).collect()
    }

    pub fn list_queue(&self) -> Vec<Listing> {
        let mut rows: Vec<(u64, Listing)> = self
            .listings
            .iter()
            .filter(|e| super::in_queue(e.listing.moderation_status))
            .map(|e| (e.seq, e.listing.clone()))
            .collect();
        rows.sort_by(|a, b| b.1.updated_at.cmp(&a.1.updated_at).then(b.0.cmp(&a.0)));
        rows.into_iter().map(|(_, l)| l).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use atelier_core::{AuditTrail, Category};
    use chrono::{Duration, Utc};

    fn sample(status: ModerationStatus, created_offset_secs: i64) -> Listing {
        let at = Utc::now() + Duration::seconds(created_offset_secs);
        Listing {
            id: Uuid::new_v4(),
            seller_id: Uuid::new_v4(),
            seller_name: "Clay & Kiln".into(),
            title: "Hand-thrown stoneware mug".into(),
            description: "Wheel-thrown, wood-fired.".into(),
            price: 42.0,
            category: Category::Home,
            images: vec!["images/mug.jpg".into()],
            tags: vec![],
            moderation_status: status,
            moderation_reason: None,
            moderation_logs: AuditTrail::new(),
            is_flagged: status.is_blocked(),
            revision: 0,
            created_at: at,
            updated_at: at,
        }
    }

    #[test]
    fn test_create_starts_at_revision_one() {
        let catalog = MemoryCatalog::new();
        let stored = catalog.create(sample(ModerationStatus::Approved, 0)).unwrap();
        assert_eq!(stored.revision, 1);
    }

    #[test]
    fn test_update_bumps_revision_and_detects_conflicts() {
        let catalog = MemoryCatalog::new();
        let stored = catalog.create(sample(ModerationStatus::Approved, 0)).unwrap();

        let fresh = catalog.update(stored.clone()).unwrap();
        assert_eq!(fresh.revision, 2);

        // a second writer still holding revision 1 must conflict
        let err = catalog.update(stored).unwrap_err();
        assert!(matches!(
            err,
            CatalogError::Conflict {
                expected: 1,
                found: 2,
                ..
            }
        ));
    }

    #[test]
    fn test_public_list_excludes_blocked_and_pending() {
        let catalog = MemoryCatalog::new();
        catalog.create(sample(ModerationStatus::Approved, 0)).unwrap();
        catalog.create(sample(ModerationStatus::PendingReview, 1)).unwrap();
        catalog.create(sample(ModerationStatus::Flagged, 2)).unwrap();
        catalog.create(sample(ModerationStatus::Rejected, 3)).unwrap();

        let public = catalog.list_public();
        assert_eq!(public.len(), 1);
        assert_eq!(public[0].moderation_status, ModerationStatus::Approved);
    }

    #[test]
    fn test_queue_is_ordered_by_recency() {
        let catalog = MemoryCatalog::new();
        let a = catalog.create(sample(ModerationStatus::PendingReview, 0)).unwrap();
        let b = catalog.create(sample(ModerationStatus::Flagged, 60)).unwrap();

        let queue = catalog.list_queue();
        assert_eq!(queue.len(), 2);
        assert_eq!(queue[0].id, b.id, "newer listing first");
        assert_eq!(queue[1].id, a.id);
    }

    #[test]
    fn test_update_missing_listing_is_not_found() {
        let catalog = MemoryCatalog::new();
        let err = catalog.update(sample(ModerationStatus::Approved, 0)).unwrap_err();
        assert!(matches!(err, CatalogError::NotFound(_)));
    }
}
