//! Classifier ports for AI-assisted integrity checks.
//!
//! Two independent checks feed the decision engine:
//!
//! - a text check over title + description ([`TextClassifier`]) returning a
//!   mass-production likelihood, and
//! - a per-image check ([`ImageClassifier`]) returning a safety/authenticity
//!   verdict.
//!
//! Both checks **fail open**: when the backing service is unreachable or
//! misconfigured, authoring must not be blocked, but the fact that the scan
//! did not occur is always recorded in the audit trail. The
//! [`classify_text_fail_open`] / [`classify_image_fail_open`] helpers apply
//! that policy at the orchestration boundary so the decision engine only
//! ever sees well-formed verdicts.

mod gemini;
mod mock;

pub use gemini::{GeminiClassifier, GeminiConfig};
pub use mock::{MockImageClassifier, MockTextClassifier};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Fixed reason prefix recorded when a check could not run.
pub const SERVICE_UNAVAILABLE_REASON: &str = "Integrity check service unavailable; check skipped";

/// Verdict of the text-based mass-production check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextVerdict {
    pub likely_mass_produced: bool,
    /// Confidence in [0, 1]. Values outside the range are clamped on
    /// ingestion from the classifier response.
    pub confidence: f64,
    pub reason: String,
}

impl TextVerdict {
    /// Fail-open verdict used when the classifier cannot be reached.
    pub fn service_unavailable(detail: &str) -> Self {
        Self {
            likely_mass_produced: false,
            confidence: 0.0,
            reason: format!("{SERVICE_UNAVAILABLE_REASON} ({detail})"),
        }
    }

    pub fn clamped(mut self) -> Self {
        self.confidence = self.confidence.clamp(0.0, 1.0);
        self
    }
}

/// Verdict of the per-image integrity check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageVerdict {
    /// `false` means prohibited content: the image must be rejected outright
    pub safe: bool,
    /// `true` means plausibly non-artisanal (stock-photo-like) but allowed
    pub flagged: bool,
    /// Required when `!safe` or `flagged`, may be empty otherwise
    pub reason: String,
}

impl ImageVerdict {
    /// Fail-open verdict used when the classifier cannot be reached.
    pub fn service_unavailable(detail: &str) -> Self {
        Self {
            safe: true,
            flagged: false,
            reason: format!("{SERVICE_UNAVAILABLE_REASON} ({detail})"),
        }
    }
}

/// Text classifier over listing title + description.
#[async_trait]
pub trait TextClassifier: Send + Sync {
    async fn classify_listing_text(&self, title: &str, description: &str) -> Result<TextVerdict>;
}

/// Image classifier over a single candidate photo.
#[async_trait]
pub trait ImageClassifier: Send + Sync {
    async fn classify_image(&self, image: &[u8], mime_type: &str) -> Result<ImageVerdict>;
}

/// Run the text check with the fail-open policy applied.
///
/// Exactly one attempt; an error becomes a permissive verdict whose reason
/// names the outage so it lands in the audit trail.
pub async fn classify_text_fail_open(
    classifier: &dyn TextClassifier,
    title: &str,
    description: &str,
) -> TextVerdict {
    match classifier.classify_listing_text(title, description).await {
        Ok(verdict) => verdict.clamped(),
        Err(e) => {
            tracing::warn!(error = %e, "text integrity check failed, failing open");
            TextVerdict::service_unavailable(&e.to_string())
        }
    }
}

/// Run the image check with the fail-open policy applied.
pub async fn classify_image_fail_open(
    classifier: &dyn ImageClassifier,
    image: &[u8],
    mime_type: &str,
) -> ImageVerdict {
    match classifier.classify_image(image, mime_type).await {
        Ok(verdict) => verdict,
        Err(e) => {
            tracing::warn!(error = %e, "image integrity check failed, failing open");
            ImageVerdict::service_unavailable(&e.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_text_fail_open_is_permissive_but_recorded() {
        let classifier = MockTextClassifier::unavailable();
        let verdict = classify_text_fail_open(&classifier, "Mug", "A mug").await;

        assert!(!verdict.likely_mass_produced);
        assert_eq!(verdict.confidence, 0.0);
        assert!(verdict.reason.contains(SERVICE_UNAVAILABLE_REASON));
    }

    #[tokio::test]
    async fn test_image_fail_open_is_permissive_but_recorded() {
        let classifier = MockImageClassifier::unavailable();
        let verdict = classify_image_fail_open(&classifier, b"\xff\xd8", "image/jpeg").await;

        assert!(verdict.safe);
        assert!(!verdict.flagged);
        assert!(verdict.reason.contains(SERVICE_UNAVAILABLE_REASON));
    }

    #[tokio::test]
    async fn test_out_of_range_confidence_is_clamped() {
        let classifier = MockTextClassifier::flagging("wholesale language", 12.0);
        let verdict = classify_text_fail_open(&classifier, "Bulk mugs", "Lot of 500").await;

        assert!(verdict.likely_mass_produced);
        assert_eq!(verdict.confidence, 1.0);
    }
}
