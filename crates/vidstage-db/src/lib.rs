//! Vidstage Database Layer
//!
//! Postgres-backed repositories for video records.

pub mod db;

pub use db::{setup_database, PgVideoRepository};
