//! Request validation module
//!
//! Provides validation utilities for image uploads and listing drafts.

use crate::error::ApiError;

/// Allowed MIME type prefixes for listing photos
const ALLOWED_MIME_PREFIXES: &[&str] = &["image/"];

/// Default max image size in bytes (10 MB)
pub const DEFAULT_MAX_FILE_SIZE: usize = 10 * 1024 * 1024;

/// Maximum listing title length
pub const MAX_TITLE_LEN: usize = 140;

/// Maximum listing description length
pub const MAX_DESCRIPTION_LEN: usize = 5000;

/// Validates the Content-Type of an uploaded image
///
/// Only image/* types (image/jpeg, image/png, image/webp, etc.) are
/// accepted; listings carry photos, not arbitrary media.
pub fn validate_content_type(content_type: Option<&str>) -> Result<(), ApiError> {
    match content_type {
        Some(ct) => {
            let ct_lower = ct.to_lowercase();
            if ALLOWED_MIME_PREFIXES
                .iter()
                .any(|prefix| ct_lower.starts_with(prefix))
            {
                Ok(())
            } else {
                Err(ApiError::bad_request(format!(
                    "Unsupported Content-Type: '{}'. Allowed types: image/*",
                    ct
                )))
            }
        }
        None => Err(ApiError::bad_request(
            "Missing Content-Type on image upload",
        )),
    }
}

/// Validates the size of an uploaded image
///
/// Returns an error if the file exceeds the maximum size.
pub fn validate_file_size(size: usize, max_size: usize) -> Result<(), ApiError> {
    if size > max_size {
        let max_mb = max_size / (1024 * 1024);
        let actual_mb = size / (1024 * 1024);
        Err(ApiError::bad_request(format!(
            "File too large: {} MB exceeds maximum of {} MB",
            actual_mb, max_mb
        )))
    } else {
        Ok(())
    }
}

/// Validates the text fields of a listing draft before publication
pub fn validate_draft(title: &str, description: &str, price: f64) -> Result<(), ApiError> {
    if title.trim().is_empty() {
        return Err(ApiError::bad_request("Listing title must not be empty"));
    }
    if title.len() > MAX_TITLE_LEN {
        return Err(ApiError::bad_request(format!(
            "Listing title exceeds {} characters",
            MAX_TITLE_LEN
        )));
    }
    if description.trim().is_empty() {
        return Err(ApiError::bad_request(
            "Listing description must not be empty",
        ));
    }
    if description.len() > MAX_DESCRIPTION_LEN {
        return Err(ApiError::bad_request(format!(
            "Listing description exceeds {} characters",
            MAX_DESCRIPTION_LEN
        )));
    }
    if !price.is_finite() || price < 0.0 {
        return Err(ApiError::bad_request("Price must be a non-negative number"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_content_type_image() {
        assert!(validate_content_type(Some("image/jpeg")).is_ok());
        assert!(validate_content_type(Some("image/png")).is_ok());
        assert!(validate_content_type(Some("image/webp")).is_ok());
        assert!(validate_content_type(Some("IMAGE/JPEG")).is_ok()); // case insensitive
    }

    #[test]
    fn test_validate_content_type_rejected() {
        assert!(validate_content_type(Some("text/html")).is_err());
        assert!(validate_content_type(Some("application/json")).is_err());
        assert!(validate_content_type(Some("video/mp4")).is_err());
        assert!(validate_content_type(None).is_err());
    }

    #[test]
    fn test_validate_file_size_ok() {
        let max = 10 * 1024 * 1024; // 10 MB
        assert!(validate_file_size(1024, max).is_ok()); // 1 KB
        assert!(validate_file_size(max, max).is_ok()); // exactly max
    }

    #[test]
    fn test_validate_file_size_too_large() {
        let max = 10 * 1024 * 1024; // 10 MB
        assert!(validate_file_size(max + 1, max).is_err());
        assert!(validate_file_size(20 * 1024 * 1024, max).is_err());
    }

    #[test]
    fn test_validate_draft_ok() {
        assert!(validate_draft("Hand-thrown mug", "Stoneware, 350ml.", 42.0).is_ok());
    }

    #[test]
    fn test_validate_draft_allows_free_listing() {
        assert!(validate_draft("Seconds sale mug", "Small glaze blemish.", 0.0).is_ok());
    }

    #[test]
    fn test_validate_draft_rejects_empty_fields() {
        assert!(validate_draft("", "desc", 10.0).is_err());
        assert!(validate_draft("   ", "desc", 10.0).is_err());
        assert!(validate_draft("title", "", 10.0).is_err());
    }

    #[test]
    fn test_validate_draft_rejects_bad_price() {
        assert!(validate_draft("title", "desc", -5.0).is_err());
        assert!(validate_draft("title", "desc", f64::NAN).is_err());
        assert!(validate_draft("title", "desc", f64::INFINITY).is_err());
    }

    #[test]
    fn test_validate_draft_rejects_oversized_text() {
        assert!(validate_draft(&"x".repeat(MAX_TITLE_LEN + 1), "desc", 10.0).is_err());
        assert!(validate_draft("title", &"x".repeat(MAX_DESCRIPTION_LEN + 1), 10.0).is_err());
    }
}
