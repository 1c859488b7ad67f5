//! Storage key generation for processed videos.
//!
//! Key format: `{orientation}/{id}{extension}`, where `id` is 32 CSPRNG bytes
//! encoded as URL-safe base64 without padding.

use std::fmt::{Display, Formatter, Result as FmtResult};

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use rand::RngCore;
use vidstage_core::Orientation;

const RANDOM_ID_BYTES: usize = 32;
const FALLBACK_EXTENSION: &str = ".bin";

/// Generated storage location of a processed asset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetKey {
    pub random_id: String,
    pub extension: String,
    pub orientation: Orientation,
}

impl AssetKey {
    /// Relative key under which the object is stored.
    pub fn storage_key(&self) -> String {
        format!(
            "{}/{}{}",
            self.orientation.name(),
            self.random_id,
            self.extension
        )
    }
}

impl Display for AssetKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(&self.storage_key())
    }
}

/// File extension for a media type: `.` plus the subtype, or `.bin` when the
/// value is not a `type/subtype` pair.
pub fn extension_for(media_type: &str) -> String {
    let parts: Vec<&str> = media_type.split('/').collect();
    match parts.as_slice() {
        [_, subtype] if !subtype.is_empty() => format!(".{}", subtype),
        _ => FALLBACK_EXTENSION.to_string(),
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct KeyGenerator;

impl KeyGenerator {
    pub fn new() -> Self {
        Self
    }

    /// Never fails. Orientation is supplied after classification.
    pub fn generate_key(&self, media_type: &str, orientation: Orientation) -> AssetKey {
        let mut bytes = [0u8; RANDOM_ID_BYTES];
        rand::rng().fill_bytes(&mut bytes);

        AssetKey {
            random_id: URL_SAFE_NO_PAD.encode(bytes),
            extension: extension_for(media_type),
            orientation,
        }
    }
}
