//! The single compression session, modeled as a tagged state machine.
//!
//! Phases follow `Empty → InputCaptured → Compressing → OutputReady`, with
//! `Failed` reachable from a running compression and `Reset` returning to
//! `Empty` from anywhere. Illegal combinations (output without input,
//! progress outside a running compression) are unrepresentable.
//!
//! Every transition that discards preview URLs hands them back to the caller,
//! which owns revoking them against the [`PreviewStore`](crate::core::PreviewStore).
//! A generation counter distinguishes the current compression request from
//! superseded ones so stale progress and results are never applied.

use serde::Serialize;
use crate::core::preview::PreviewUrl;

/// Input-side image data, present in every non-empty phase.
#[derive(Debug, Clone)]
pub struct InputImage {
    /// Source size in megabytes, two decimals
    pub size_mb: String,
    /// Preview URL for the original bytes
    pub url: PreviewUrl,
    /// Original file name, recorded for download naming
    pub file_name: Option<String>,
    /// Whether the webview reported the preview image fully rendered
    pub loaded: bool,
}

/// Output-side image data, present once a compression completes.
#[derive(Debug, Clone)]
pub struct OutputImage {
    /// Compressed size in megabytes, two decimals
    pub size_mb: String,
    /// Preview URL for the compressed bytes
    pub url: PreviewUrl,
    /// Suggested download file name
    pub file_name: String,
    /// Whether the webview reported the preview image fully rendered
    pub loaded: bool,
}

#[derive(Debug, Clone)]
enum Phase {
    Empty,
    InputCaptured { input: InputImage },
    Compressing { input: InputImage, progress: f64 },
    OutputReady { input: InputImage, output: OutputImage },
    Failed { input: InputImage, message: String },
}

/// The one logical session plus its request-generation counter.
#[derive(Debug)]
pub struct SessionState {
    phase: Phase,
    generation: u64,
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionState {
    pub fn new() -> Self {
        Self {
            phase: Phase::Empty,
            generation: 0,
        }
    }

    /// Captures a new input image, superseding whatever occupied the session.
    ///
    /// Returns the new request's generation token together with the preview
    /// URLs held by the previous occupant; the caller must revoke those.
    pub fn capture_input(&mut self, input: InputImage) -> (u64, Vec<PreviewUrl>) {
        self.generation += 1;
        let stale = self.held_urls();
        self.phase = Phase::InputCaptured { input };
        (self.generation, stale)
    }

    /// Moves `InputCaptured → Compressing` for the given request.
    pub fn start_compression(&mut self, generation: u64) -> bool {
        if generation != self.generation {
            return false;
        }
        match &self.phase {
            Phase::InputCaptured { input } => {
                self.phase = Phase::Compressing {
                    input: input.clone(),
                    progress: 0.0,
                };
                true
            }
            _ => false,
        }
    }

    /// Overwrites the progress percentage for the given request.
    ///
    /// Stale tokens and non-compressing phases are ignored; returns whether
    /// the value was applied.
    pub fn set_progress(&mut self, generation: u64, value: f64) -> bool {
        if generation != self.generation {
            return false;
        }
        match &mut self.phase {
            Phase::Compressing { progress, .. } => {
                *progress = value;
                true
            }
            _ => false,
        }
    }

    /// Records the compressed output for the given request.
    ///
    /// Returns `false` when the request was superseded; the caller still owns
    /// the output's preview URL in that case and must revoke it.
    pub fn complete(&mut self, generation: u64, output: OutputImage) -> bool {
        if generation != self.generation {
            return false;
        }
        match &self.phase {
            Phase::Compressing { input, .. } => {
                self.phase = Phase::OutputReady {
                    input: input.clone(),
                    output,
                };
                true
            }
            _ => false,
        }
    }

    /// Records an engine failure for the given request.
    pub fn fail(&mut self, generation: u64, message: impl Into<String>) -> bool {
        if generation != self.generation {
            return false;
        }
        match &self.phase {
            Phase::Compressing { input, .. } | Phase::InputCaptured { input } => {
                self.phase = Phase::Failed {
                    input: input.clone(),
                    message: message.into(),
                };
                true
            }
            _ => false,
        }
    }

    /// Clears the session, returning every preview URL that must be revoked.
    ///
    /// Bumps the generation so any in-flight request becomes stale. Resetting
    /// an empty session returns nothing and changes nothing else.
    pub fn reset(&mut self) -> Vec<PreviewUrl> {
        self.generation += 1;
        let urls = self.held_urls();
        self.phase = Phase::Empty;
        urls
    }

    /// Image-load notification for the input preview.
    pub fn mark_input_loaded(&mut self) {
        match &mut self.phase {
            Phase::InputCaptured { input }
            | Phase::Compressing { input, .. }
            | Phase::OutputReady { input, .. }
            | Phase::Failed { input, .. } => input.loaded = true,
            Phase::Empty => {}
        }
    }

    /// Image-load notification for the output preview.
    pub fn mark_output_loaded(&mut self) {
        if let Phase::OutputReady { output, .. } = &mut self.phase {
            output.loaded = true;
        }
    }

    /// Preview URL of the compressed output, when one is ready.
    pub fn output_url(&self) -> Option<PreviewUrl> {
        match &self.phase {
            Phase::OutputReady { output, .. } => Some(output.url.clone()),
            _ => None,
        }
    }

    fn held_urls(&self) -> Vec<PreviewUrl> {
        match &self.phase {
            Phase::Empty => Vec::new(),
            Phase::InputCaptured { input }
            | Phase::Compressing { input, .. }
            | Phase::Failed { input, .. } => vec![input.url.clone()],
            Phase::OutputReady { input, output } => {
                vec![input.url.clone(), output.url.clone()]
            }
        }
    }

    /// Render-ready view of the current phase.
    pub fn snapshot(&self) -> SessionSnapshot {
        match &self.phase {
            Phase::Empty => SessionSnapshot {
                phase: SessionPhase::Empty,
                ..SessionSnapshot::empty()
            },
            Phase::InputCaptured { input } => SessionSnapshot {
                phase: SessionPhase::InputCaptured,
                input: Some(input.view()),
                ..SessionSnapshot::empty()
            },
            Phase::Compressing { input, progress } => SessionSnapshot {
                phase: SessionPhase::Compressing,
                progress: Some(*progress),
                input: Some(input.view()),
                ..SessionSnapshot::empty()
            },
            Phase::OutputReady { input, output } => SessionSnapshot {
                phase: SessionPhase::OutputReady,
                input: Some(input.view()),
                output: Some(output.view()),
                ..SessionSnapshot::empty()
            },
            Phase::Failed { input, message } => SessionSnapshot {
                phase: SessionPhase::Failed,
                input: Some(input.view()),
                error: Some(message.clone()),
                ..SessionSnapshot::empty()
            },
        }
    }
}

impl InputImage {
    fn view(&self) -> ImageView {
        ImageView {
            size_mb: self.size_mb.clone(),
            object_url: self.url.as_str().to_string(),
            loaded: self.loaded,
        }
    }
}

impl OutputImage {
    fn view(&self) -> OutputView {
        OutputView {
            size_mb: self.size_mb.clone(),
            object_url: self.url.as_str().to_string(),
            file_name: self.file_name.clone(),
            loaded: self.loaded,
        }
    }
}

/// Phase discriminant serialized to the webview.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SessionPhase {
    Empty,
    InputCaptured,
    Compressing,
    OutputReady,
    Failed,
}

/// Render-ready session view sent with every `session-updated` event.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    pub phase: SessionPhase,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub progress: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input: Option<ImageView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<OutputView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SessionSnapshot {
    fn empty() -> Self {
        Self {
            phase: SessionPhase::Empty,
            progress: None,
            input: None,
            output: None,
            error: None,
        }
    }
}

/// Input-side view within a snapshot.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageView {
    #[serde(rename = "sizeMB")]
    pub size_mb: String,
    pub object_url: String,
    pub loaded: bool,
}

/// Output-side view within a snapshot.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OutputView {
    #[serde(rename = "sizeMB")]
    pub size_mb: String,
    pub object_url: String,
    pub file_name: String,
    pub loaded: bool,
}
