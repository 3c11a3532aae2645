//! Atelier Core - Moderation domain library for a handmade-goods marketplace
//!
//! This crate holds the trust/integrity workflow that governs marketplace
//! listings: the moderation state machine, the append-only audit trail, the
//! AI-assisted classifier ports (text and image), and the pure decision
//! engine that combines their signals at publish time.
//!
//! # Example
//!
//! ```
//! use atelier_core::{decide, AuditTrail, ImageVerdict, ModerationStatus, ScanSession, TextVerdict};
//!
//! let mut session = ScanSession::new();
//! session.record_image_scan(
//!     "images/mug.jpg",
//!     &ImageVerdict { safe: true, flagged: false, reason: String::new() },
//! );
//!
//! let text = TextVerdict {
//!     likely_mass_produced: false,
//!     confidence: 0.1,
//!     reason: String::new(),
//! };
//! let decision = decide(&text, &session, &AuditTrail::new());
//! assert_eq!(decision.status, ModerationStatus::Approved);
//! ```

pub mod audit;
pub mod classifier;
pub mod decision;
pub mod error;
pub mod listing;

// Re-export main types for convenience
pub use audit::{AuditEntry, AuditKind, AuditTrail};
pub use classifier::{
    classify_image_fail_open, classify_text_fail_open, GeminiClassifier, GeminiConfig,
    ImageClassifier, ImageVerdict, MockImageClassifier, MockTextClassifier, TextClassifier,
    TextVerdict, SERVICE_UNAVAILABLE_REASON,
};
pub use decision::{decide, Decision, ImageOutcome, ScanSession, IMAGE_QUALITY_REVIEW_REASON};
pub use error::{CoreError, Result};
pub use listing::{Category, Listing, ModerationStatus, ReviewVerdict};
