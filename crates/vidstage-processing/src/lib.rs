//! Vidstage Processing Library
//!
//! The video ingestion pipeline: stage the uploaded bytes on local disk,
//! classify the frame orientation with ffprobe, remux for fast-start playback
//! with ffmpeg, and store the result under a generated key.

pub mod staging;
pub mod upload;
pub mod validator;
pub mod video;

pub use staging::{StagedFile, StagingArea};
pub use upload::{
    AssetKey, ByteStream, KeyGenerator, PipelineError, PipelineState, UploadPipeline,
    UploadRequest, UploadResult,
};
pub use validator::{MediaValidator, ValidationError, ACCEPTED_MEDIA_TYPE};
pub use video::{
    classify_dimensions, AspectClassifier, FfmpegRemuxer, FfprobeProbe, MediaProbe, ProbeError,
    RemuxError, RemuxedFile, Remuxer, VideoDimensions,
};
