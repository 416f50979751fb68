//! Event names and payloads emitted to the frontend.

use serde::Serialize;

/// Event carrying the latest progress percentage during a compression.
pub const PROGRESS_EVENT: &str = "compression-progress";

/// Event carrying a full session snapshot after every state transition.
pub const SESSION_EVENT: &str = "session-updated";

/// Payload for the transient progress text next to the file picker.
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressUpdate {
    /// Latest value delivered by the engine's progress side-channel.
    /// Forwarded verbatim: neither smoothed nor clamped here.
    pub percentage: f64,
}
