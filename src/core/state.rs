//! Application state management for Tauri.

use std::sync::Arc;
use parking_lot::Mutex;

use crate::core::options::CompressionOptions;
use crate::core::preview::PreviewStore;
use crate::core::session::SessionState;
use crate::processing::CancelHandle;

/// Application state managed by Tauri.
///
/// Everything sits behind short-lived synchronous locks; no lock is ever held
/// across an await point, so the async command handlers cannot deadlock on
/// each other.
#[derive(Clone, Default)]
pub struct AppState {
    session: Arc<Mutex<SessionState>>,
    previews: Arc<PreviewStore>,
    options: Arc<Mutex<CompressionOptions>>,
    /// Cancellation handle for the in-flight compression, if any.
    active: Arc<Mutex<Option<CancelHandle>>>,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn session(&self) -> &Mutex<SessionState> {
        &self.session
    }

    pub fn previews(&self) -> &PreviewStore {
        &self.previews
    }

    pub fn options(&self) -> CompressionOptions {
        *self.options.lock()
    }

    pub fn set_options(&self, options: CompressionOptions) {
        *self.options.lock() = options;
    }

    /// Installs the new job's cancellation handle, cancelling any job it
    /// supersedes.
    pub fn set_active(&self, handle: CancelHandle) {
        let previous = self.active.lock().replace(handle);
        if let Some(prev) = previous {
            prev.cancel();
        }
    }

    /// Cancels and forgets the in-flight job, if any.
    pub fn cancel_active(&self) {
        let previous = self.active.lock().take();
        if let Some(prev) = previous {
            prev.cancel();
        }
    }

    /// Forgets the active handle if it belongs to the finished job. A handle
    /// installed by a newer request stays put.
    pub fn clear_active(&self, handle: &CancelHandle) {
        let mut active = self.active.lock();
        if active.as_ref().is_some_and(|h| h.same_job(handle)) {
            *active = None;
        }
    }
}
