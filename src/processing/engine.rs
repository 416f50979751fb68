//! Cancellable compression jobs.
//!
//! [`spawn_compression`] dispatches the blocking pipeline onto tokio's
//! blocking pool and hands back a [`CompressionJob`]: a stream of progress
//! events, a cancellation handle, and the eventual result. The progress
//! channel closes exactly when the pipeline returns, which is what lets
//! [`CompressionJob::next_event`] turn the channel plus the join handle into
//! a single ordered event stream.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::core::CompressionOptions;
use crate::utils::{CompressorError, CompressorResult};
use super::compress::{compress, CompressedImage};

/// Shared flag asking a running compression to stop at its next milestone.
///
/// Cloning yields another handle to the same job; cancelling any clone
/// cancels the job.
#[derive(Debug, Clone, Default)]
pub struct CancelHandle(Arc<AtomicBool>);

impl CancelHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }

    /// Whether two handles control the same job.
    pub fn same_job(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

/// What a [`CompressionJob`] yields next.
#[derive(Debug)]
pub enum EngineEvent {
    /// A percentage from the engine's progress side-channel.
    Progress(f64),
    /// The job finished; no further events follow.
    Done(CompressorResult<CompressedImage>),
}

/// Handle to an in-flight compression.
pub struct CompressionJob {
    progress: mpsc::UnboundedReceiver<f64>,
    handle: JoinHandle<CompressorResult<CompressedImage>>,
    cancel: CancelHandle,
}

impl CompressionJob {
    pub fn cancel_handle(&self) -> CancelHandle {
        self.cancel.clone()
    }

    /// Next progress event, or the final result once the progress channel
    /// closes. Must not be called again after [`EngineEvent::Done`].
    pub async fn next_event(&mut self) -> EngineEvent {
        match self.progress.recv().await {
            Some(value) => EngineEvent::Progress(value),
            None => {
                let result = match (&mut self.handle).await {
                    Ok(res) => res,
                    Err(e) => Err(CompressorError::processing(format!(
                        "Compression task panicked: {e}"
                    ))),
                };
                EngineEvent::Done(result)
            }
        }
    }
}

/// Spawns the blocking pipeline for `bytes` with `options`.
pub fn spawn_compression(bytes: Arc<Vec<u8>>, options: CompressionOptions) -> CompressionJob {
    let (tx, rx) = mpsc::unbounded_channel();
    let cancel = CancelHandle::new();
    let flag = cancel.clone();

    let handle = tokio::task::spawn_blocking(move || {
        let mut report = |value: f64| {
            // the receiver may be gone if the caller dropped the job
            let _ = tx.send(value);
        };
        let result = compress(&bytes, &options, &flag, &mut report);
        if let Err(e) = &result {
            debug!("compression ended with error: {e}");
        }
        result
    });

    CompressionJob {
        progress: rx,
        handle,
        cancel,
    }
}
