//! Deterministic mock classifiers for tests and keyless development.
//!
//! Each mock serves scripted verdicts in FIFO order and falls back to a
//! default verdict once the script runs dry. `unavailable()` constructs a
//! mock whose every call errors, for exercising the fail-open policy.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;

use super::{ImageClassifier, ImageVerdict, TextClassifier, TextVerdict};
use crate::error::{CoreError, Result};

enum Scripted<T> {
    Verdict(T),
    Unavailable,
}

/// Mock text classifier with a scriptable verdict queue.
pub struct MockTextClassifier {
    script: Mutex<VecDeque<Scripted<TextVerdict>>>,
    default: Scripted<TextVerdict>,
}

impl MockTextClassifier {
    /// Every call returns a clean verdict.
    pub fn approving() -> Self {
        Self {
            script: Mutex::new(VecDeque::new()),
            default: Scripted::Verdict(TextVerdict {
                likely_mass_produced: false,
                confidence: 0.1,
                reason: String::new(),
            }),
        }
    }

    /// Every call flags the text as likely mass-produced.
    pub fn flagging(reason: &str, confidence: f64) -> Self {
        Self {
            script: Mutex::new(VecDeque::new()),
            default: Scripted::Verdict(TextVerdict {
                likely_mass_produced: true,
                confidence,
                reason: reason.to_string(),
            }),
        }
    }

    /// Every call fails as if the service were down.
    pub fn unavailable() -> Self {
        Self {
            script: Mutex::new(VecDeque::new()),
            default: Scripted::Unavailable,
        }
    }

    /// Queue a one-shot verdict ahead of the default.
    pub fn push(&self, verdict: TextVerdict) {
        self.script
            .lock()
            .expect("mock script lock")
            .push_back(Scripted::Verdict(verdict));
    }
}

#[async_trait]
impl TextClassifier for MockTextClassifier {
    async fn classify_listing_text(&self, _title: &str, _description: &str) -> Result<TextVerdict> {
        let scripted = self.script.lock().expect("mock script lock").pop_front();
        match scripted.as_ref().unwrap_or(&self.default) {
            Scripted::Verdict(v) => Ok(v.clone()),
            Scripted::Unavailable => Err(CoreError::ClassifierUnavailable(
                "mock text classifier configured as unavailable".into(),
            )),
        }
    }
}

/// Mock image classifier with a scriptable verdict queue.
pub struct MockImageClassifier {
    script: Mutex<VecDeque<Scripted<ImageVerdict>>>,
    default: Scripted<ImageVerdict>,
}

impl MockImageClassifier {
    /// Every call returns a safe, unflagged verdict.
    pub fn safe() -> Self {
        Self {
            script: Mutex::new(VecDeque::new()),
            default: Scripted::Verdict(ImageVerdict {
                safe: true,
                flagged: false,
                reason: String::new(),
            }),
        }
    }

    /// Every call flags the image as plausibly non-artisanal.
    pub fn flagging(reason: &str) -> Self {
        Self {
            script: Mutex::new(VecDeque::new()),
            default: Scripted::Verdict(ImageVerdict {
                safe: true,
                flagged: true,
                reason: reason.to_string(),
            }),
        }
    }

    /// Every call rejects the image outright as prohibited content.
    pub fn rejecting(reason: &str) -> Self {
        Self {
            script: Mutex::new(VecDeque::new()),
            default: Scripted::Verdict(ImageVerdict {
                safe: false,
                flagged: false,
                reason: reason.to_string(),
            }),
        }
    }

    /// Every call fails as if the service were down.
    pub fn unavailable() -> Self {
        Self {
            script: Mutex::new(VecDeque::new()),
            default: Scripted::Unavailable,
        }
    }

    /// Queue a one-shot verdict ahead of the default.
    pub fn push(&self, verdict: ImageVerdict) {
        self.script
            .lock()
            .expect("mock script lock")
            .push_back(Scripted::Verdict(verdict));
    }
}

#[async_trait]
impl ImageClassifier for MockImageClassifier {
    async fn classify_image(&self, _image: &[u8], _mime_type: &str) -> Result<ImageVerdict> {
        let scripted = self.script.lock().expect("mock script lock").pop_front();
        match scripted.as_ref().unwrap_or(&self.default) {
            Scripted::Verdict(v) => Ok(v.clone()),
            Scripted::Unavailable => Err(CoreError::ClassifierUnavailable(
                "mock image classifier configured as unavailable".into(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_scripted_verdicts_run_before_default() {
        let mock = MockImageClassifier::safe();
        mock.push(ImageVerdict {
            safe: false,
            flagged: false,
            reason: "prohibited content".into(),
        });

        let first = mock.classify_image(b"a", "image/png").await.unwrap();
        assert!(!first.safe);

        let second = mock.classify_image(b"b", "image/png").await.unwrap();
        assert!(second.safe);
    }

    #[tokio::test]
    async fn test_unavailable_mock_errors() {
        let mock = MockTextClassifier::unavailable();
        let err = mock.classify_listing_text("t", "d").await.unwrap_err();
        assert!(matches!(err, CoreError::ClassifierUnavailable(_)));
    }
}
