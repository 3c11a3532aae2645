//! Moderation decision engine and authoring-session signal accumulator.
//!
//! [`ScanSession`] carries the per-session state the authoring flow
//! accumulates image by image: accepted image references, the
//! was-any-image-flagged bit, and the audit entries the scans produced.
//! It is explicit state threaded into [`decide`], never ambient.
//!
//! [`decide`] is the pure combination step. It runs once per publish, after
//! the text check and every image check have settled (or failed open), and
//! maps their signals to exactly one of two statuses:
//!
//! - `PendingReview` when the text looks mass-produced or any image was
//!   flagged this session, with the text reason or a fixed image-quality
//!   reason respectively;
//! - `Approved` otherwise, with no reason.
//!
//! `Flagged` and `Rejected` are never produced here; those transitions
//! belong to manual review and user reports (see [`crate::listing`]).

use crate::audit::{AuditEntry, AuditKind, AuditTrail};
use crate::classifier::{ImageVerdict, TextVerdict};
use crate::listing::ModerationStatus;

/// Fixed reason used when images, not text, triggered the review.
pub const IMAGE_QUALITY_REVIEW_REASON: &str =
    "Queued for manual review: image integrity scan raised quality concerns.";

/// Outcome of an image submission within a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageOutcome {
    /// Image joined the session's accepted sequence
    Accepted,
    /// Image joined the sequence but raised the session flag
    AcceptedFlagged,
    /// Prohibited content; the image never joins the sequence
    Rejected,
}

/// Explicit accumulator for one listing-authoring session.
///
/// Images are processed one at a time in user-visible order; cancelling an
/// in-progress image simply never calls [`ScanSession::record_image_scan`]
/// for it, leaving previously accepted images untouched.
#[derive(Debug, Clone, Default)]
pub struct ScanSession {
    accepted_images: Vec<String>,
    image_flagged: bool,
    entries: Vec<AuditEntry>,
}

impl ScanSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one image scan verdict.
    ///
    /// Unsafe images are rejected outright; the attempted scan still lands
    /// in the session log so it reaches the listing's audit trail at
    /// publish. Flagged images are accepted but raise the session flag the
    /// decision engine must honor. Clean scans with a non-empty reason
    /// (the fail-open "service unavailable" case) are recorded too; a
    /// silent skipped scan is never allowed.
    pub fn record_image_scan(&mut self, image_ref: &str, verdict: &ImageVerdict) -> ImageOutcome {
        if !verdict.safe {
            self.entries.push(AuditEntry::new(
                AuditKind::AiImageScan,
                "rejected",
                verdict.reason.clone(),
            ));
            return ImageOutcome::Rejected;
        }

        if verdict.flagged {
            self.image_flagged = true;
            self.entries.push(AuditEntry::new(
                AuditKind::AiImageScan,
                "flagged",
                verdict.reason.clone(),
            ));
            self.accepted_images.push(image_ref.to_string());
            return ImageOutcome::AcceptedFlagged;
        }

        if !verdict.reason.is_empty() {
            self.entries.push(AuditEntry::new(
                AuditKind::AiImageScan,
                "approved",
                verdict.reason.clone(),
            ));
        }
        self.accepted_images.push(image_ref.to_string());
        ImageOutcome::Accepted
    }

    /// Image references accepted so far, in submission order.
    pub fn accepted_images(&self) -> &[String] {
        &self.accepted_images
    }

    /// Whether any image was flagged this session.
    pub fn image_flagged(&self) -> bool {
        self.image_flagged
    }

    /// Audit entries produced by this session's scans, in execution order.
    pub fn entries(&self) -> &[AuditEntry] {
        &self.entries
    }
}

/// Final status + reason + full new audit trail for a publish action.
#[derive(Debug, Clone)]
pub struct Decision {
    pub status: ModerationStatus,
    pub reason: Option<String>,
    pub trail: AuditTrail,
}

/// Combine the publish-time text verdict with the session's image signals
/// and the listing's prior trail.
///
/// The prior entries are carried over untouched; this session's entries
/// follow in the order the checks executed, ending with the text scan.
/// The text scan is always recorded, including the fail-open case, so
/// the trail never silently skips a check.
pub fn decide(text: &TextVerdict, session: &ScanSession, prior: &AuditTrail) -> Decision {
    let mut trail = prior.clone();
    trail.extend(session.entries().iter().cloned());

    let text_label = if text.likely_mass_produced {
        "flagged"
    } else {
        "approved"
    };
    trail.append(
        AuditEntry::new(AuditKind::AiTextScan, text_label, text.reason.clone())
            .with_confidence(text.confidence),
    );

    let (status, reason) = if text.likely_mass_produced {
        (ModerationStatus::PendingReview, Some(text.reason.clone()))
    } else if session.image_flagged() {
        (
            ModerationStatus::PendingReview,
            Some(IMAGE_QUALITY_REVIEW_REASON.to_string()),
        )
    } else {
        (ModerationStatus::Approved, None)
    };

    Decision {
        status,
        reason,
        trail,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::SERVICE_UNAVAILABLE_REASON;

    fn clean_text() -> TextVerdict {
        TextVerdict {
            likely_mass_produced: false,
            confidence: 0.05,
            reason: String::new(),
        }
    }

    fn safe_image() -> ImageVerdict {
        ImageVerdict {
            safe: true,
            flagged: false,
            reason: String::new(),
        }
    }

    #[test]
    fn test_clean_publish_is_approved_with_no_reason() {
        let mut session = ScanSession::new();
        session.record_image_scan("images/a.jpg", &safe_image());

        let decision = decide(&clean_text(), &session, &AuditTrail::new());

        assert_eq!(decision.status, ModerationStatus::Approved);
        assert_eq!(decision.reason, None);
        // only the text scan is recorded for a fully clean session
        assert_eq!(decision.trail.len(), 1);
        assert_eq!(decision.trail.entries()[0].kind, AuditKind::AiTextScan);
        assert_eq!(decision.trail.entries()[0].status, "approved");
    }

    #[test]
    fn test_mass_produced_text_queues_for_review_with_text_reason() {
        let session = ScanSession::new();
        let text = TextVerdict {
            likely_mass_produced: true,
            confidence: 0.82,
            reason: "generic factory packaging language".into(),
        };

        let decision = decide(&text, &session, &AuditTrail::new());

        assert_eq!(decision.status, ModerationStatus::PendingReview);
        assert_eq!(
            decision.reason.as_deref(),
            Some("generic factory packaging language")
        );
        let entry = decision.trail.last().unwrap();
        assert_eq!(entry.kind, AuditKind::AiTextScan);
        assert_eq!(entry.status, "flagged");
        assert_eq!(entry.confidence, Some(0.82));
    }

    #[test]
    fn test_flagged_image_alone_queues_for_review() {
        let mut session = ScanSession::new();
        let outcome = session.record_image_scan(
            "images/a.jpg",
            &ImageVerdict {
                safe: true,
                flagged: true,
                reason: "resembles stock photography".into(),
            },
        );
        assert_eq!(outcome, ImageOutcome::AcceptedFlagged);

        let decision = decide(&clean_text(), &session, &AuditTrail::new());

        assert_eq!(decision.status, ModerationStatus::PendingReview);
        assert_eq!(decision.reason.as_deref(), Some(IMAGE_QUALITY_REVIEW_REASON));
        // image entry first, then text entry, in execution order
        assert_eq!(decision.trail.len(), 2);
        assert_eq!(decision.trail.entries()[0].kind, AuditKind::AiImageScan);
        assert_eq!(decision.trail.entries()[1].kind, AuditKind::AiTextScan);
    }

    #[test]
    fn test_mass_produced_reason_wins_over_image_reason() {
        let mut session = ScanSession::new();
        session.record_image_scan(
            "images/a.jpg",
            &ImageVerdict {
                safe: true,
                flagged: true,
                reason: "resembles stock photography".into(),
            },
        );
        let text = TextVerdict {
            likely_mass_produced: true,
            confidence: 0.9,
            reason: "wholesale lot language".into(),
        };

        let decision = decide(&text, &session, &AuditTrail::new());

        assert_eq!(decision.status, ModerationStatus::PendingReview);
        assert_eq!(decision.reason.as_deref(), Some("wholesale lot language"));
    }

    #[test]
    fn test_unsafe_image_is_excluded_but_logged() {
        let mut session = ScanSession::new();
        session.record_image_scan("images/ok.jpg", &safe_image());
        let outcome = session.record_image_scan(
            "images/bad.jpg",
            &ImageVerdict {
                safe: false,
                flagged: false,
                reason: "prohibited content".into(),
            },
        );
        assert_eq!(outcome, ImageOutcome::Rejected);

        assert_eq!(session.accepted_images(), ["images/ok.jpg"]);
        assert!(!session.image_flagged());

        let decision = decide(&clean_text(), &session, &AuditTrail::new());
        assert_eq!(decision.status, ModerationStatus::Approved);
        let rejected_entries: Vec<_> = decision
            .trail
            .entries()
            .iter()
            .filter(|e| e.status == "rejected")
            .collect();
        assert_eq!(rejected_entries.len(), 1);
        assert_eq!(rejected_entries[0].reason, "prohibited content");
    }

    #[test]
    fn test_fail_open_scan_is_recorded_not_skipped() {
        let mut session = ScanSession::new();
        session.record_image_scan(
            "images/a.jpg",
            &ImageVerdict::service_unavailable("connection refused"),
        );

        let decision = decide(
            &TextVerdict::service_unavailable("connection refused"),
            &session,
            &AuditTrail::new(),
        );

        assert_eq!(decision.status, ModerationStatus::Approved);
        assert_eq!(decision.trail.len(), 2);
        for entry in decision.trail.entries() {
            assert!(entry.reason.contains(SERVICE_UNAVAILABLE_REASON));
        }
    }

    #[test]
    fn test_prior_trail_is_carried_over_and_only_grows() {
        let mut prior = AuditTrail::new();
        prior.append(AuditEntry::new(
            AuditKind::ManualReview,
            "approved",
            "earlier cycle",
        ));

        let decision = decide(&clean_text(), &ScanSession::new(), &prior);

        assert_eq!(decision.trail.len(), prior.len() + 1);
        assert_eq!(decision.trail.entries()[0], prior.entries()[0]);
    }
}
