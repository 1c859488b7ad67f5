//! Database repositories and pool setup

pub mod pool;
pub mod video;

pub use pool::setup_database;
pub use video::PgVideoRepository;
