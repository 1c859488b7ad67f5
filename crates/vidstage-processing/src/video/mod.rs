//! Video inspection and container rewriting

pub mod aspect;
pub mod probe;
pub mod remux;
mod tool;

#[cfg(all(test, unix))]
pub(crate) mod test_support;

pub use aspect::{classify_dimensions, AspectClassifier};
pub use probe::{parse_probe_output, FfprobeProbe, MediaProbe, ProbeError, VideoDimensions};
pub use remux::{remux_output_path, FfmpegRemuxer, RemuxError, RemuxedFile, Remuxer};
