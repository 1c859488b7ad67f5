//! Data models shared by the pipeline, the record store and the HTTP layer.

mod orientation;
mod video;

pub use orientation::*;
pub use video::*;
