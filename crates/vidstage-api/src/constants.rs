/// Prefix for all API routes.
pub const API_PREFIX: &str = "/api";

/// Multipart field carrying the video bytes.
pub const VIDEO_FIELD: &str = "video";
