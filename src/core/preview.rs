//! In-memory preview registry: the object-URL analog.
//!
//! Image bytes shown in the webview are registered here and addressed with
//! `preview://<id>` URLs served through a custom URI scheme (see `main.rs`).
//! A URL stays valid until explicitly revoked; revoking frees the bytes.
//! Nothing here expires on its own, so every transition that discards a URL
//! must revoke it or the bytes live for the rest of the process.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use parking_lot::Mutex;

/// URI scheme the webview uses to fetch registered bytes.
pub const PREVIEW_SCHEME: &str = "preview";

/// Handle to bytes registered in a [`PreviewStore`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PreviewUrl {
    id: u64,
    url: String,
}

impl PreviewUrl {
    fn new(id: u64) -> Self {
        Self {
            id,
            url: format!("{PREVIEW_SCHEME}://{id}"),
        }
    }

    /// Numeric id, as addressed by the URI scheme handler.
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn as_str(&self) -> &str {
        &self.url
    }
}

struct PreviewEntry {
    bytes: Arc<Vec<u8>>,
    mime: &'static str,
}

/// Registry of preview bytes keyed by id.
#[derive(Default)]
pub struct PreviewStore {
    entries: Mutex<HashMap<u64, PreviewEntry>>,
    next_id: AtomicU64,
}

impl PreviewStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `bytes` and returns a fresh URL for them.
    pub fn create(&self, bytes: Arc<Vec<u8>>, mime: &'static str) -> PreviewUrl {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.entries.lock().insert(id, PreviewEntry { bytes, mime });
        PreviewUrl::new(id)
    }

    /// Releases the bytes behind `url`. Revoking an unknown or already
    /// revoked URL is a no-op.
    pub fn revoke(&self, url: &PreviewUrl) {
        self.entries.lock().remove(&url.id());
    }

    /// Bytes and mime type for a registered id, used by the URI scheme handler.
    pub fn get(&self, id: u64) -> Option<(Arc<Vec<u8>>, &'static str)> {
        self.entries
            .lock()
            .get(&id)
            .map(|e| (e.bytes.clone(), e.mime))
    }

    /// Bytes behind a URL, used when exporting the compressed output.
    pub fn bytes(&self, url: &PreviewUrl) -> Option<Arc<Vec<u8>>> {
        self.entries.lock().get(&url.id()).map(|e| e.bytes.clone())
    }

    /// Number of live (unrevoked) URLs.
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn urls_resolve_until_revoked() {
        let store = PreviewStore::new();
        let url = store.create(Arc::new(vec![1, 2, 3]), "image/jpeg");

        assert!(url.as_str().starts_with("preview://"));
        let (bytes, mime) = store.get(url.id()).expect("registered");
        assert_eq!(bytes.as_slice(), &[1, 2, 3]);
        assert_eq!(mime, "image/jpeg");

        store.revoke(&url);
        assert!(store.get(url.id()).is_none());
        assert!(store.is_empty());

        // revoking twice is a no-op
        store.revoke(&url);
    }

    #[test]
    fn each_registration_gets_a_distinct_url() {
        let store = PreviewStore::new();
        let a = store.create(Arc::new(vec![0]), "image/png");
        let b = store.create(Arc::new(vec![0]), "image/png");
        assert_ne!(a, b);
        assert_eq!(store.len(), 2);
    }
}
