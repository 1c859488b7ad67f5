//! Vidstage Core Library
//!
//! This crate provides the domain models, error types, configuration and
//! repository seams shared across all vidstage components.

pub mod config;
pub mod error;
pub mod models;
pub mod repository;
pub mod storage_types;

// Re-export commonly used types
pub use config::{BaseConfig, Config, IngestConfig};
pub use error::{AppError, ErrorMetadata, LogLevel};
pub use models::{Orientation, Video};
pub use repository::VideoRepository;
pub use storage_types::StorageBackend;
// Note: Storage, StorageError, StorageResult live in vidstage-storage
