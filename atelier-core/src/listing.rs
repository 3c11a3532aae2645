//! Listing entity and its moderation state machine.
//!
//! A listing's trust state moves through four statuses:
//!
//! - `Approved`: publicly visible, no blocking reason
//! - `PendingReview`: auto-queued by the decision engine
//! - `Flagged`: at least one user report or manual touch
//! - `Rejected`: terminal manual decision for the current authoring cycle
//!
//! The automatic decision engine ([`crate::decision`]) only ever produces
//! `Approved` or `PendingReview`; `Flagged` and `Rejected` are reachable
//! exclusively through the manual and report transitions defined here.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::audit::{AuditEntry, AuditKind, AuditTrail};
use crate::error::{CoreError, Result};

/// Closed set of marketplace categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "Jewelry & Accessories")]
    Jewelry,
    #[serde(rename = "Home & Living")]
    Home,
    #[serde(rename = "Wedding & Party")]
    Wedding,
    #[serde(rename = "Clothing & Shoes")]
    Clothing,
    #[serde(rename = "Craft Supplies & Tools")]
    Craft,
    #[serde(rename = "Art & Collectibles")]
    Art,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Jewelry => "Jewelry & Accessories",
            Self::Home => "Home & Living",
            Self::Wedding => "Wedding & Party",
            Self::Clothing => "Clothing & Shoes",
            Self::Craft => "Craft Supplies & Tools",
            Self::Art => "Art & Collectibles",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "Jewelry & Accessories" => Ok(Self::Jewelry),
            "Home & Living" => Ok(Self::Home),
            "Wedding & Party" => Ok(Self::Wedding),
            "Clothing & Shoes" => Ok(Self::Clothing),
            "Craft Supplies & Tools" => Ok(Self::Craft),
            "Art & Collectibles" => Ok(Self::Art),
            other => Err(CoreError::Validation(format!("unknown category '{other}'"))),
        }
    }
}

/// Trust/visibility state of a listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModerationStatus {
    Approved,
    PendingReview,
    Flagged,
    Rejected,
}

impl ModerationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Approved => "approved",
            Self::PendingReview => "pending_review",
            Self::Flagged => "flagged",
            Self::Rejected => "rejected",
        }
    }

    /// Whether this status puts the listing in the human review queue.
    pub fn requires_review(&self) -> bool {
        matches!(self, Self::PendingReview | Self::Flagged)
    }

    /// Whether this status blocks the listing from the public catalog.
    pub fn is_blocked(&self) -> bool {
        matches!(self, Self::Flagged | Self::Rejected)
    }
}

impl fmt::Display for ModerationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ModerationStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "approved" => Ok(Self::Approved),
            "pending_review" => Ok(Self::PendingReview),
            "flagged" => Ok(Self::Flagged),
            "rejected" => Ok(Self::Rejected),
            other => Err(CoreError::Validation(format!(
                "unknown moderation status '{other}'"
            ))),
        }
    }
}

/// A moderator's verdict on a queued listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewVerdict {
    Approved,
    Rejected,
}

impl ReviewVerdict {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }
}

/// A single product entry in the catalog, owned by one seller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Listing {
    pub id: Uuid,
    pub seller_id: Uuid,
    pub seller_name: String,
    pub title: String,
    pub description: String,
    /// Non-negative price in the marketplace currency
    pub price: f64,
    pub category: Category,
    /// Ordered image references; an approved listing always has at least one
    pub images: Vec<String>,
    pub tags: Vec<String>,
    pub moderation_status: ModerationStatus,
    /// Blocking reason; always `None` while approved
    pub moderation_reason: Option<String>,
    /// Append-only compliance history
    pub moderation_logs: AuditTrail,
    /// Derived convenience flag: `status ∈ {flagged, rejected}`
    pub is_flagged: bool,
    /// Optimistic concurrency counter, bumped on every persisted write
    pub revision: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Listing {
    /// Recompute `is_flagged` from the status. Called after every
    /// transition so the flag can never drift from the status.
    fn reconcile_flag(&mut self) {
        self.is_flagged = self.moderation_status.is_blocked();
    }

    /// Whether the owning seller may still edit this listing in the
    /// current review cycle. A rejected listing is terminal; only a fresh
    /// publish through the decision pipeline produces a new status.
    pub fn seller_can_edit(&self) -> bool {
        self.moderation_status != ModerationStatus::Rejected
    }

    /// Apply a moderator verdict with a mandatory reason.
    ///
    /// An empty or whitespace-only reason is a validation error and leaves
    /// the listing untouched with no status change or audit entry. Approval
    /// clears the blocking reason (the moderator's wording survives in the
    /// audit entry); rejection records the reason and is terminal for the
    /// cycle.
    pub fn apply_manual_review(&mut self, verdict: ReviewVerdict, reason: &str) -> Result<()> {
        let reason = reason.trim();
        if reason.is_empty() {
            return Err(CoreError::Validation(
                "a manual review requires a non-empty reason".into(),
            ));
        }

        let entry = AuditEntry::new(AuditKind::ManualReview, verdict.as_str(), reason);
        match verdict {
            ReviewVerdict::Approved => {
                self.moderation_status = ModerationStatus::Approved;
                self.moderation_reason = None;
            }
            ReviewVerdict::Rejected => {
                self.moderation_status = ModerationStatus::Rejected;
                self.moderation_reason = Some(reason.to_string());
            }
        }
        self.updated_at = entry.timestamp;
        self.moderation_logs.append(entry);
        self.reconcile_flag();
        Ok(())
    }

    /// Apply a user integrity report.
    ///
    /// Moves an approved or pending listing to `Flagged` and overwrites the
    /// current reason. Idempotent with respect to status: reporting an
    /// already-flagged listing only refreshes the reason, and a rejected
    /// listing is never downgraded (its status and terminal reason are
    /// kept, though the report is still logged).
    pub fn apply_report(&mut self, reason: &str) -> Result<()> {
        let reason = reason.trim();
        if reason.is_empty() {
            return Err(CoreError::Validation(
                "an integrity report requires a non-empty reason".into(),
            ));
        }

        let entry = AuditEntry::new(AuditKind::UserReport, "flagged", reason);
        if self.moderation_status != ModerationStatus::Rejected {
            self.moderation_status = ModerationStatus::Flagged;
            self.moderation_reason = Some(reason.to_string());
        }
        self.updated_at = entry.timestamp;
        self.moderation_logs.append(entry);
        self.reconcile_flag();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_listing(status: ModerationStatus) -> Listing {
        let now = Utc::now();
        let mut listing = Listing {
            id: Uuid::new_v4(),
            seller_id: Uuid::new_v4(),
            seller_name: "Clay & Kiln".into(),
            title: "Hand-thrown stoneware mug".into(),
            description: "Wheel-thrown, wood-fired, one of a kind.".into(),
            price: 42.0,
            category: Category::Home,
            images: vec!["images/mug.jpg".into()],
            tags: vec!["ceramics".into()],
            moderation_status: status,
            moderation_reason: None,
            moderation_logs: AuditTrail::new(),
            is_flagged: false,
            revision: 1,
            created_at: now,
            updated_at: now,
        };
        listing.reconcile_flag();
        listing
    }

    #[test]
    fn test_manual_approve_clears_reason_and_logs_once() {
        let mut listing = sample_listing(ModerationStatus::PendingReview);
        listing.moderation_reason = Some("factory language".into());

        listing
            .apply_manual_review(ReviewVerdict::Approved, "Verified artisan quality")
            .unwrap();

        assert_eq!(listing.moderation_status, ModerationStatus::Approved);
        assert_eq!(listing.moderation_reason, None);
        assert!(!listing.is_flagged);
        assert_eq!(listing.moderation_logs.len(), 1);
        let entry = listing.moderation_logs.last().unwrap();
        assert_eq!(entry.kind, AuditKind::ManualReview);
        assert_eq!(entry.status, "approved");
    }

    #[test]
    fn test_manual_reject_is_terminal_and_flagged() {
        let mut listing = sample_listing(ModerationStatus::PendingReview);

        listing
            .apply_manual_review(ReviewVerdict::Rejected, "Violates handmade policy")
            .unwrap();

        assert_eq!(listing.moderation_status, ModerationStatus::Rejected);
        assert_eq!(
            listing.moderation_reason.as_deref(),
            Some("Violates handmade policy")
        );
        assert!(listing.is_flagged);
        assert!(!listing.seller_can_edit());
    }

    #[test]
    fn test_empty_reason_is_a_noop() {
        let mut listing = sample_listing(ModerationStatus::PendingReview);

        let err = listing
            .apply_manual_review(ReviewVerdict::Approved, "   ")
            .unwrap_err();
        assert!(matches!(err, CoreError::Validation(_)));

        assert_eq!(listing.moderation_status, ModerationStatus::PendingReview);
        assert!(listing.moderation_logs.is_empty());
    }

    #[test]
    fn test_report_flags_an_approved_listing() {
        let mut listing = sample_listing(ModerationStatus::Approved);

        listing
            .apply_report("User reported as non-handmade/mass-produced.")
            .unwrap();

        assert_eq!(listing.moderation_status, ModerationStatus::Flagged);
        assert!(listing.is_flagged);
        assert_eq!(listing.moderation_logs.len(), 1);
        assert_eq!(
            listing.moderation_logs.last().unwrap().kind,
            AuditKind::UserReport
        );
    }

    #[test]
    fn test_report_never_downgrades_rejected() {
        let mut listing = sample_listing(ModerationStatus::Rejected);
        listing.is_flagged = true;
        listing.moderation_reason = Some("Violates handmade policy".into());

        listing.apply_report("looks mass-produced to me").unwrap();

        assert_eq!(listing.moderation_status, ModerationStatus::Rejected);
        assert_eq!(
            listing.moderation_reason.as_deref(),
            Some("Violates handmade policy")
        );
        // the report itself is still part of the history
        assert_eq!(listing.moderation_logs.len(), 1);
    }

    #[test]
    fn test_repeated_reports_are_idempotent_for_status() {
        let mut listing = sample_listing(ModerationStatus::Approved);

        listing.apply_report("first report").unwrap();
        listing.apply_report("second report").unwrap();

        assert_eq!(listing.moderation_status, ModerationStatus::Flagged);
        assert_eq!(listing.moderation_reason.as_deref(), Some("second report"));
        assert_eq!(listing.moderation_logs.len(), 2);
    }

    #[test]
    fn test_status_round_trips_through_str() {
        for status in [
            ModerationStatus::Approved,
            ModerationStatus::PendingReview,
            ModerationStatus::Flagged,
            ModerationStatus::Rejected,
        ] {
            assert_eq!(status.as_str().parse::<ModerationStatus>().unwrap(), status);
        }
        assert!("banned".parse::<ModerationStatus>().is_err());
    }

    #[test]
    fn test_category_serializes_to_display_names() {
        let json = serde_json::to_value(Category::Jewelry).unwrap();
        assert_eq!(json, "Jewelry & Accessories");
    }
}
