//! Tauri command handlers for the compression session.

use std::sync::Arc;
use tauri::{AppHandle, Emitter, State};
use tracing::{debug, warn};

use crate::core::{
    AppState, CompressionOptions, InputImage, OutputImage, ProgressUpdate, SessionSnapshot,
    PROGRESS_EVENT, SESSION_EVENT,
};
use crate::processing::formats::{mime_for, sniff_format, SUPPORTED_EXTENSIONS};
use crate::processing::{spawn_compression, CompressedImage, EngineEvent};
use crate::utils::{
    download_file_name, file_name, file_size, format_size_mb, CompressorError, CompressorResult,
};

/// Returns the current session snapshot.
#[tauri::command]
pub async fn get_session(state: State<'_, AppState>) -> CompressorResult<SessionSnapshot> {
    Ok(state.session().lock().snapshot())
}

/// Overwrites the compression options with whatever the editor holds.
///
/// No validation happens here: out-of-range values are forwarded to the
/// engine, which rejects them when a compression actually runs.
#[tauri::command]
pub async fn set_options(
    state: State<'_, AppState>,
    options: CompressionOptions,
) -> CompressorResult<()> {
    debug!(
        "options updated: maxSizeMB={}, maxWidthOrHeight={}",
        options.max_size_mb, options.max_width_or_height
    );
    state.set_options(options);
    Ok(())
}

/// Returns the current compression options.
#[tauri::command]
pub async fn get_options(state: State<'_, AppState>) -> CompressorResult<CompressionOptions> {
    Ok(state.options())
}

/// File extensions offered by the picker dialog.
#[tauri::command]
pub fn supported_extensions() -> Vec<String> {
    SUPPORTED_EXTENSIONS.iter().map(|e| e.to_string()).collect()
}

/// Captures the selected file and drives one full compression.
///
/// An empty selection is a no-op. The input preview becomes visible as soon
/// as the file is read; the compressed output (or a failure message) follows
/// when the engine resolves. A selection made while a previous compression
/// is still running supersedes it: the old job is cancelled and its
/// remaining progress events and result are ignored.
#[tauri::command]
pub async fn select_files(
    app: AppHandle,
    state: State<'_, AppState>,
    paths: Vec<String>,
) -> CompressorResult<SessionSnapshot> {
    let Some(path) = paths.into_iter().next() else {
        debug!("empty selection, nothing to do");
        return Ok(state.session().lock().snapshot());
    };

    let size = file_size(&path).await?;
    let bytes = Arc::new(
        tokio::fs::read(&path)
            .await
            .map_err(|e| CompressorError::Io(format!("Cannot read '{path}': {e}")))?,
    );
    let name = file_name(&path);
    debug!("selected '{path}' ({size} bytes)");

    // Serve the preview even when the bytes won't decode; a broken image in
    // the input slot mirrors what the engine rejects below.
    let mime = sniff_format(&bytes)
        .map(mime_for)
        .unwrap_or("application/octet-stream");
    let input_url = state.previews().create(bytes.clone(), mime);

    let options = state.options();
    let generation = {
        let mut session = state.session().lock();
        let (generation, stale) = session.capture_input(InputImage {
            size_mb: format_size_mb(size),
            url: input_url,
            file_name: name.clone(),
            loaded: false,
        });
        for url in &stale {
            state.previews().revoke(url);
        }
        session.start_compression(generation);
        generation
    };
    emit_session(&app, &state);

    let mut job = spawn_compression(bytes, options);
    let cancel = job.cancel_handle();
    state.set_active(cancel.clone());

    loop {
        match job.next_event().await {
            EngineEvent::Progress(value) => {
                let applied = state.session().lock().set_progress(generation, value);
                if applied {
                    let _ = app.emit(PROGRESS_EVENT, ProgressUpdate { percentage: value });
                    emit_session(&app, &state);
                }
            }
            EngineEvent::Done(Ok(compressed)) => {
                apply_output(&state, generation, name.as_deref(), compressed);
                break;
            }
            EngineEvent::Done(Err(error)) => {
                let message = error.to_string();
                let applied = state.session().lock().fail(generation, message.clone());
                if applied {
                    warn!("compression failed: {message}");
                } else {
                    debug!("stale compression error ignored: {message}");
                }
                break;
            }
        }
    }

    state.clear_active(&cancel);
    emit_session(&app, &state);
    Ok(state.session().lock().snapshot())
}

/// Revokes every held preview URL and returns the session to empty.
///
/// Also cancels any in-flight compression; its late result is stale by
/// construction. Resetting an already-empty session is a no-op.
#[tauri::command]
pub async fn reset_session(
    app: AppHandle,
    state: State<'_, AppState>,
) -> CompressorResult<SessionSnapshot> {
    state.cancel_active();
    let urls = state.session().lock().reset();
    for url in &urls {
        state.previews().revoke(url);
    }
    debug!("session reset ({} preview(s) revoked)", urls.len());
    emit_session(&app, &state);
    Ok(state.session().lock().snapshot())
}

/// Image-load notification for the input preview slot.
#[tauri::command]
pub async fn mark_input_loaded(
    app: AppHandle,
    state: State<'_, AppState>,
) -> CompressorResult<SessionSnapshot> {
    state.session().lock().mark_input_loaded();
    emit_session(&app, &state);
    Ok(state.session().lock().snapshot())
}

/// Image-load notification for the output preview slot.
#[tauri::command]
pub async fn mark_output_loaded(
    app: AppHandle,
    state: State<'_, AppState>,
) -> CompressorResult<SessionSnapshot> {
    state.session().lock().mark_output_loaded();
    emit_session(&app, &state);
    Ok(state.session().lock().snapshot())
}

/// Writes the compressed bytes to `dest_path`, returning the written path.
///
/// The frontend picks `dest_path` through a save dialog seeded with the
/// suggested download name from the session snapshot.
#[tauri::command]
pub async fn export_output(
    state: State<'_, AppState>,
    dest_path: String,
) -> CompressorResult<String> {
    let url = state
        .session()
        .lock()
        .output_url()
        .ok_or_else(|| CompressorError::processing("No compressed output to export"))?;
    let bytes = state
        .previews()
        .bytes(&url)
        .ok_or_else(|| CompressorError::processing("Output preview was revoked"))?;

    tokio::fs::write(&dest_path, bytes.as_slice())
        .await
        .map_err(|e| CompressorError::Io(format!("Cannot write '{dest_path}': {e}")))?;
    debug!("exported output to {dest_path}");
    Ok(dest_path)
}

/// Installs the compressed output into the session, or revokes the freshly
/// created preview when the request was superseded meanwhile.
fn apply_output(
    state: &AppState,
    generation: u64,
    original_name: Option<&str>,
    compressed: CompressedImage,
) {
    let CompressedImage {
        bytes,
        format,
        width,
        height,
    } = compressed;

    let size_mb = format_size_mb(bytes.len() as u64);
    let url = state.previews().create(Arc::new(bytes), format.mime_type());
    let output = OutputImage {
        size_mb,
        url: url.clone(),
        file_name: download_file_name(original_name),
        loaded: false,
    };

    let applied = state.session().lock().complete(generation, output);
    if applied {
        debug!("output ready: {width}×{height}");
    } else {
        // a superseded result must not leak its preview bytes
        state.previews().revoke(&url);
        debug!("stale compression result discarded");
    }
}

fn emit_session(app: &AppHandle, state: &State<'_, AppState>) {
    let snapshot = state.session().lock().snapshot();
    let _ = app.emit(SESSION_EVENT, snapshot);
}
