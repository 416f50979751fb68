//! Core application types and state management.
//!
//! This module contains the fundamental types used throughout the application:
//! - [`AppState`]: Application state managed by Tauri
//! - [`SessionState`] / [`SessionSnapshot`]: the single compression session
//! - [`CompressionOptions`]: user-editable engine options
//! - [`PreviewStore`]: in-memory preview registry (the object-URL analog)

mod options;
mod preview;
mod progress;
mod session;
mod state;

pub use options::CompressionOptions;
pub use preview::{PreviewStore, PreviewUrl, PREVIEW_SCHEME};
pub use progress::{ProgressUpdate, PROGRESS_EVENT, SESSION_EVENT};
pub use session::{
    ImageView, InputImage, OutputImage, OutputView, SessionPhase, SessionSnapshot, SessionState,
};
pub use state::AppState;
