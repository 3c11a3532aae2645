//! Append-only audit trail for listing moderation history.
//!
//! Every AI scan, manual review, and user report against a listing leaves an
//! immutable [`AuditEntry`]. Entries are owned exclusively by their listing,
//! are never mutated after creation, and the trail only ever grows.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// What produced an audit entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditKind {
    /// Text classifier ran over title + description at publish time
    AiTextScan,
    /// Image classifier ran over a candidate photo at authoring time
    AiImageScan,
    /// A human moderator issued a verdict
    ManualReview,
    /// An authenticated viewer reported the listing
    UserReport,
}

impl AuditKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AiTextScan => "ai_text_scan",
            Self::AiImageScan => "ai_image_scan",
            Self::ManualReview => "manual_review",
            Self::UserReport => "user_report",
        }
    }
}

/// One immutable record of a check or action taken against a listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditEntry {
    /// When the check or action happened. Non-decreasing within a trail.
    pub timestamp: DateTime<Utc>,
    pub kind: AuditKind,
    /// Informational status label ("approved", "flagged", "rejected", ...)
    pub status: String,
    pub reason: String,
    /// Classifier confidence in [0, 1], absent for manual actions
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
}

impl AuditEntry {
    /// Create an entry stamped with the current time.
    pub fn new(kind: AuditKind, status: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            timestamp: Utc::now(),
            kind,
            status: status.into(),
            reason: reason.into(),
            confidence: None,
        }
    }

    /// Attach a classifier confidence score, clamped to [0, 1].
    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.confidence = Some(confidence.clamp(0.0, 1.0));
        self
    }
}

/// Chronological, append-only sequence of [`AuditEntry`] values.
///
/// Appending an entry whose timestamp precedes the current trail head clamps
/// it to the head's timestamp: a wall-clock regression must never reorder or
/// drop an entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AuditTrail(Vec<AuditEntry>);

impl AuditTrail {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry, enforcing monotonically non-decreasing timestamps.
    pub fn append(&mut self, mut entry: AuditEntry) {
        if let Some(last) = self.0.last() {
            if entry.timestamp < last.timestamp {
                entry.timestamp = last.timestamp;
            }
        }
        self.0.push(entry);
    }

    /// Append every entry of `entries` in order.
    pub fn extend(&mut self, entries: impl IntoIterator<Item = AuditEntry>) {
        for entry in entries {
            self.append(entry);
        }
    }

    pub fn entries(&self) -> &[AuditEntry] {
        &self.0
    }

    pub fn last(&self) -> Option<&AuditEntry> {
        self.0.last()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_append_grows_trail() {
        let mut trail = AuditTrail::new();
        assert!(trail.is_empty());

        trail.append(AuditEntry::new(AuditKind::AiTextScan, "approved", ""));
        trail.append(AuditEntry::new(AuditKind::ManualReview, "approved", "ok"));

        assert_eq!(trail.len(), 2);
        assert_eq!(trail.entries()[0].kind, AuditKind::AiTextScan);
        assert_eq!(trail.last().unwrap().kind, AuditKind::ManualReview);
    }

    #[test]
    fn test_timestamp_regression_is_clamped() {
        let mut trail = AuditTrail::new();
        let now = Utc::now();

        let mut first = AuditEntry::new(AuditKind::AiImageScan, "flagged", "stock photo");
        first.timestamp = now;
        trail.append(first);

        let mut stale = AuditEntry::new(AuditKind::AiTextScan, "approved", "");
        stale.timestamp = now - Duration::seconds(30);
        trail.append(stale);

        let entries = trail.entries();
        assert_eq!(entries[1].timestamp, entries[0].timestamp);
    }

    #[test]
    fn test_confidence_is_clamped() {
        let entry = AuditEntry::new(AuditKind::AiTextScan, "flagged", "x").with_confidence(1.7);
        assert_eq!(entry.confidence, Some(1.0));

        let entry = AuditEntry::new(AuditKind::AiTextScan, "flagged", "x").with_confidence(-0.2);
        assert_eq!(entry.confidence, Some(0.0));
    }

    #[test]
    fn test_serde_round_trip_is_transparent() {
        let mut trail = AuditTrail::new();
        trail.append(
            AuditEntry::new(AuditKind::AiTextScan, "flagged", "factory language")
                .with_confidence(0.82),
        );

        let json = serde_json::to_value(&trail).unwrap();
        assert!(json.is_array(), "trail should serialize as a bare array");
        assert_eq!(json[0]["type"], serde_json::Value::Null); // field is named "kind"
        assert_eq!(json[0]["kind"], "ai_text_scan");
        assert_eq!(json[0]["confidence"], 0.82);

        let back: AuditTrail = serde_json::from_value(json).unwrap();
        assert_eq!(back, trail);
    }
}
