//! The compression engine.
//!
//! From the session driver's point of view this is a black box: bytes and
//! options in, compressed bytes out, progress percentages on the side, with
//! a cancellation handle for superseded jobs.

mod compress;
mod engine;
pub mod formats;

pub use compress::{compress, CompressedImage};
pub use engine::{spawn_compression, CancelHandle, CompressionJob, EngineEvent};
