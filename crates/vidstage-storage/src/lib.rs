//! Vidstage Storage Library
//!
//! This crate provides the durable object store abstraction and its S3 and
//! local filesystem implementations.
//!
//! # Storage key format
//!
//! Processed videos are stored under orientation-prefixed keys:
//!
//! - `landscape/{id}.mp4`
//! - `portrait/{id}.mp4`
//! - `other/{id}.mp4`
//!
//! Keys must not contain `..` or a leading `/`. Every backend validates keys
//! through the `keys` module so the rule stays consistent.

pub mod factory;
pub(crate) mod keys;
#[cfg(feature = "storage-local")]
pub mod local;
#[cfg(feature = "storage-s3")]
pub mod s3;
pub mod traits;

// Re-export commonly used types
pub use factory::create_storage;
#[cfg(feature = "storage-local")]
pub use local::LocalStorage;
#[cfg(feature = "storage-s3")]
pub use s3::S3Storage;
pub use traits::{join_public_url, Storage, StorageError, StorageResult};
pub use vidstage_core::StorageBackend;
