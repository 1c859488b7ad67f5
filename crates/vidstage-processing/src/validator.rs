//! Media type validation for incoming uploads.

/// The only container/codec combination the pipeline ingests.
pub const ACCEPTED_MEDIA_TYPE: &str = "video/mp4";

/// Validation errors for declared media types
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("Media type is required")]
    MissingMediaType,

    #[error("Invalid content type: {content_type} (allowed: {allowed:?})")]
    InvalidContentType {
        content_type: String,
        allowed: Vec<String>,
    },
}

/// Strip parameters (`; codecs=...`) and normalize case, the way a
/// `Content-Type` header value is parsed into its bare media type.
pub fn normalize_media_type(raw: &str) -> String {
    raw.split(';').next().unwrap_or("").trim().to_lowercase()
}

/// Declared media type validator
pub struct MediaValidator {
    allowed_content_types: Vec<String>,
}

impl Default for MediaValidator {
    fn default() -> Self {
        Self::new(vec![ACCEPTED_MEDIA_TYPE.to_string()])
    }
}

impl MediaValidator {
    pub fn new(allowed_content_types: Vec<String>) -> Self {
        Self {
            allowed_content_types: allowed_content_types
                .iter()
                .map(|ct| normalize_media_type(ct))
                .collect(),
        }
    }

    /// Validate a declared content type, returning its normalized form.
    pub fn validate_content_type(&self, content_type: &str) -> Result<String, ValidationError> {
        let normalized = normalize_media_type(content_type);
        if normalized.is_empty() {
            return Err(ValidationError::MissingMediaType);
        }

        if !self
            .allowed_content_types
            .iter()
            .any(|ct| ct == &normalized)
        {
            return Err(ValidationError::InvalidContentType {
                content_type: content_type.to_string(),
                allowed: self.allowed_content_types.clone(),
            });
        }

        Ok(normalized)
    }
}
