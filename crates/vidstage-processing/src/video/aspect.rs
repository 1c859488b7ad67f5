//! Orientation classification from probed dimensions.

use std::path::Path;
use std::sync::Arc;

use vidstage_core::Orientation;

use super::probe::{MediaProbe, ProbeError};

/// Bucket `(width, height)` into an orientation using exact 16:9 integer math.
///
/// Division truncates, so only dimensions that hit the ratio exactly after
/// truncation count: `(1920, 1080)` is landscape, `(1920, 1081)` is other.
pub fn classify_dimensions(width: u32, height: u32) -> Orientation {
    let (w, h) = (u64::from(width), u64::from(height));
    if w == 16 * h / 9 {
        Orientation::Landscape
    } else if h == 16 * w / 9 {
        Orientation::Portrait
    } else {
        Orientation::Other
    }
}

/// Probes a staged file and classifies its first video stream.
#[derive(Clone)]
pub struct AspectClassifier {
    probe: Arc<dyn MediaProbe>,
}

impl AspectClassifier {
    pub fn new(probe: Arc<dyn MediaProbe>) -> Self {
        Self { probe }
    }

    pub async fn classify(&self, path: &Path) -> Result<Orientation, ProbeError> {
        let dims = self.probe.probe(path).await?;
        let orientation = classify_dimensions(dims.width, dims.height);
        tracing::debug!(
            width = dims.width,
            height = dims.height,
            orientation = %orientation,
            "Classified video orientation"
        );
        Ok(orientation)
    }
}
