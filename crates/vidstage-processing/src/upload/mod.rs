//! Upload pipeline

pub mod error;
pub mod keys;
pub mod pipeline;
pub mod types;

pub use error::PipelineError;
pub use keys::{extension_for, AssetKey, KeyGenerator};
pub use pipeline::UploadPipeline;
pub use types::{ByteStream, PipelineState, UploadRequest, UploadResult};
