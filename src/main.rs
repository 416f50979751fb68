// Prevents additional console window on Windows in release, DO NOT REMOVE!!
#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

// This is the primary entry point for the Image Compressor application.
// The lib.rs file serves only as a public API for external consumers.

mod commands;
mod core;
mod processing;
mod utils;

use tracing::{debug, info};
use tauri::Manager;
use tauri::http::{header::CONTENT_TYPE, Request, Response, StatusCode};
use crate::core::{AppState, PREVIEW_SCHEME};
use crate::commands::{
    export_output, get_options, get_session, mark_input_loaded, mark_output_loaded,
    reset_session, select_files, set_options, supported_extensions,
};

fn main() {
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_file(false)         // Remove file path
        .with_line_number(false)  // Remove line numbers
        .with_thread_ids(false)   // Remove thread IDs
        .with_thread_names(false) // Remove thread names
        .with_target(false)       // Remove module path
        .with_ansi(true)         // Keep colored output
        .with_writer(std::io::stdout)
        .compact();              // Use compact formatter instead of pretty

    subscriber.init();

    info!("=== Application Starting ===");

    let app = tauri::Builder::default()
        .plugin(tauri_plugin_dialog::init())
        .register_uri_scheme_protocol(PREVIEW_SCHEME, |ctx, request| {
            match ctx.app_handle().try_state::<AppState>() {
                Some(state) => serve_preview(state.inner(), &request),
                None => not_found(),
            }
        })
        .invoke_handler(tauri::generate_handler![
            select_files,
            reset_session,
            set_options,
            get_options,
            get_session,
            mark_input_loaded,
            mark_output_loaded,
            export_output,
            supported_extensions,
        ])
        .setup(|app| {
            app.manage(AppState::new());
            debug!("✓ AppState initialized");
            Ok(())
        })
        .build(tauri::generate_context!())
        .expect("error while building tauri application");

    info!("Starting application event loop...");
    app.run(|_app_handle, event| {
        if let tauri::RunEvent::Exit = event {
            info!("Application exiting");
        }
    });
}

/// Serves registered preview bytes for `preview://<id>` requests.
///
/// The webview builds these URLs with `convertFileSrc(id, "preview")`, so the
/// id arrives as the request path.
fn serve_preview(state: &AppState, request: &Request<Vec<u8>>) -> Response<Vec<u8>> {
    let id = request.uri().path().trim_start_matches('/').parse::<u64>().ok();

    match id.and_then(|id| state.previews().get(id)) {
        Some((bytes, mime)) => Response::builder()
            .header(CONTENT_TYPE, mime)
            .body(bytes.as_ref().clone())
            .unwrap_or_else(|_| Response::new(Vec::new())),
        None => not_found(),
    }
}

fn not_found() -> Response<Vec<u8>> {
    Response::builder()
        .status(StatusCode::NOT_FOUND)
        .body(Vec::new())
        .unwrap_or_else(|_| Response::new(Vec::new()))
}
