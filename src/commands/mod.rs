//! Tauri command handlers for the frontend.
//!
//! This module exposes the commands invoked from the webview:
//! - [`select_files`]: capture a file and drive one compression
//! - [`reset_session`]: revoke previews and clear the session
//! - [`set_options`] / [`get_options`]: the options editor binding
//! - [`get_session`]: snapshot for initial render
//! - [`mark_input_loaded`] / [`mark_output_loaded`]: image-load notifications
//! - [`export_output`]: save the compressed bytes to disk
//! - [`supported_extensions`]: picker dialog filter

mod session;

pub use session::*;
