//! Vidstage API Library
//!
//! HTTP intake for video uploads: authenticates the caller, checks ownership
//! of the target video record, runs the ingestion pipeline over the streamed
//! multipart body and persists the resulting public URL.

pub mod auth;
pub mod constants;
pub mod error;
pub mod handlers;
pub mod setup;
pub mod state;
pub mod telemetry;

pub use error::{ErrorResponse, HttpAppError};
pub use state::AppState;
