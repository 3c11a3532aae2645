//! Multipart form parsing helpers
//!
//! Provides reusable abstractions for parsing multipart/form-data image
//! uploads in the authoring flow.

use axum::extract::Multipart;

use crate::error::ApiError;
use crate::validation::{validate_content_type, validate_file_size};

/// Represents an image uploaded via multipart form
#[derive(Debug, Clone)]
pub struct FileField {
    /// File data bytes
    pub data: Vec<u8>,
    /// Content-Type from the multipart field (if provided)
    pub content_type: Option<String>,
}

/// Parsed multipart form fields
///
/// The authoring upload form carries a single "file" field; any other
/// fields are ignored.
#[derive(Debug)]
pub struct MultipartFields {
    file: Option<FileField>,
}

impl MultipartFields {
    /// Parse the file field from a multipart request
    ///
    /// The "file" field's Content-Type must be image/* and its payload must
    /// fit within `max_file_size` bytes.
    pub async fn parse(
        multipart: &mut Multipart,
        max_file_size: usize,
    ) -> Result<Self, ApiError> {
        let mut file: Option<FileField> = None;

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| ApiError::bad_request(format!("Failed to parse multipart: {}", e)))?
        {
            if field.name() != Some("file") {
                continue;
            }

            let content_type = field.content_type().map(|s| s.to_string());

            validate_content_type(content_type.as_deref())?;

            let data = field
                .bytes()
                .await
                .map_err(|e| ApiError::bad_request(format!("Failed to read file: {}", e)))?
                .to_vec();

            validate_file_size(data.len(), max_file_size)?;

            file = Some(FileField { data, content_type });
        }

        Ok(Self { file })
    }

    /// Get the file field (required)
    ///
    /// Returns an error if no file was uploaded.
    pub fn require_file(&self) -> Result<&FileField, ApiError> {
        self.file.as_ref().ok_or_else(|| {
            ApiError::bad_request("No file provided. Use 'file' field in multipart form.")
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_file_missing() {
        let fields = MultipartFields { file: None };

        assert!(fields.require_file().is_err());
    }

    #[test]
    fn test_require_file_present() {
        let fields = MultipartFields {
            file: Some(FileField {
                data: vec![1, 2, 3],
                content_type: Some("image/png".to_string()),
            }),
        };

        let file = fields.require_file().unwrap();
        assert_eq!(file.data.len(), 3);
        assert_eq!(file.content_type.as_deref(), Some("image/png"));
    }
}
