//! Session state machine and preview lifecycle, driven the way the command
//! layer drives them: every transition that hands back URLs revokes them
//! against the store.

use std::sync::Arc;

use image_compressor_lib::core::{
    InputImage, OutputImage, PreviewStore, SessionPhase, SessionState,
};
use image_compressor_lib::utils::format_size_mb;

fn input_image(store: &PreviewStore, name: &str) -> InputImage {
    InputImage {
        size_mb: format_size_mb(5 * 1_048_576),
        url: store.create(Arc::new(vec![1, 2, 3]), "image/jpeg"),
        file_name: Some(name.to_string()),
        loaded: false,
    }
}

fn output_image(store: &PreviewStore, file_name: &str) -> OutputImage {
    OutputImage {
        size_mb: format_size_mb(1_048_576 / 2),
        url: store.create(Arc::new(vec![4, 5]), "image/jpeg"),
        file_name: file_name.to_string(),
        loaded: false,
    }
}

#[test]
fn full_flow_reaches_output_ready() {
    let store = PreviewStore::new();
    let mut session = SessionState::new();

    assert_eq!(session.snapshot().phase, SessionPhase::Empty);
    assert!(session.snapshot().input.is_none());
    assert!(session.snapshot().output.is_none());

    let (generation, stale) = session.capture_input(input_image(&store, "cat.jpg"));
    assert!(stale.is_empty());

    let snapshot = session.snapshot();
    assert_eq!(snapshot.phase, SessionPhase::InputCaptured);
    let input = snapshot.input.expect("input captured");
    assert_eq!(input.size_mb, "5.00");
    assert!(snapshot.output.is_none());
    assert!(snapshot.progress.is_none());

    assert!(session.start_compression(generation));
    assert!(session.set_progress(generation, 42.0));
    assert_eq!(session.snapshot().progress, Some(42.0));

    assert!(session.complete(generation, output_image(&store, "cat-compressed.jpg")));

    let snapshot = session.snapshot();
    assert_eq!(snapshot.phase, SessionPhase::OutputReady);
    assert!(snapshot.progress.is_none());
    let input = snapshot.input.expect("input still present");
    let output = snapshot.output.expect("output present");
    assert_eq!(output.size_mb, "0.50");
    assert_eq!(output.file_name, "cat-compressed.jpg");
    assert_ne!(input.object_url, output.object_url);
}

#[test]
fn reset_revokes_every_url_and_is_idempotent() {
    let store = PreviewStore::new();
    let mut session = SessionState::new();

    let (generation, _) = session.capture_input(input_image(&store, "cat.jpg"));
    session.start_compression(generation);
    session.complete(generation, output_image(&store, "cat-compressed.jpg"));
    assert_eq!(store.len(), 2);

    let urls = session.reset();
    assert_eq!(urls.len(), 2);
    for url in &urls {
        store.revoke(url);
    }
    assert!(store.is_empty());
    assert_eq!(session.snapshot().phase, SessionPhase::Empty);
    assert!(session.snapshot().input.is_none());

    // second reset: nothing held, nothing returned, still empty
    assert!(session.reset().is_empty());
    assert_eq!(session.snapshot().phase, SessionPhase::Empty);
}

#[test]
fn superseded_requests_are_ignored() {
    let store = PreviewStore::new();
    let mut session = SessionState::new();

    let (first, _) = session.capture_input(input_image(&store, "one.jpg"));
    session.start_compression(first);

    // a new selection supersedes the running request and hands back its URLs
    let (second, stale) = session.capture_input(input_image(&store, "two.jpg"));
    assert_eq!(stale.len(), 1);
    for url in &stale {
        store.revoke(url);
    }
    session.start_compression(second);

    // stragglers from the first request change nothing
    assert!(!session.set_progress(first, 99.0));
    assert_eq!(session.snapshot().progress, Some(0.0));

    let late_output = output_image(&store, "one-compressed.jpg");
    let late_url = late_output.url.clone();
    assert!(!session.complete(first, late_output));
    store.revoke(&late_url);

    assert_eq!(session.snapshot().phase, SessionPhase::Compressing);
    assert!(!session.fail(first, "decode error"));

    // the current request still completes normally
    assert!(session.complete(second, output_image(&store, "two-compressed.jpg")));
    assert_eq!(session.snapshot().phase, SessionPhase::OutputReady);
}

#[test]
fn reset_invalidates_the_in_flight_request() {
    let store = PreviewStore::new();
    let mut session = SessionState::new();

    let (generation, _) = session.capture_input(input_image(&store, "cat.jpg"));
    session.start_compression(generation);
    for url in session.reset() {
        store.revoke(&url);
    }

    assert!(!session.set_progress(generation, 50.0));
    assert!(!session.complete(generation, output_image(&store, "x.jpg")));
    assert_eq!(session.snapshot().phase, SessionPhase::Empty);
}

#[test]
fn engine_failure_surfaces_a_message_and_clears_progress() {
    let store = PreviewStore::new();
    let mut session = SessionState::new();

    let (generation, _) = session.capture_input(input_image(&store, "broken.bin"));
    session.start_compression(generation);
    session.set_progress(generation, 10.0);

    assert!(session.fail(generation, "Decode error: not an image"));

    let snapshot = session.snapshot();
    assert_eq!(snapshot.phase, SessionPhase::Failed);
    assert!(snapshot.progress.is_none());
    assert!(snapshot.output.is_none());
    let message = snapshot.error.expect("failure message");
    assert!(!message.is_empty());

    // reset recovers
    for url in session.reset() {
        store.revoke(&url);
    }
    assert_eq!(session.snapshot().phase, SessionPhase::Empty);
    assert!(store.is_empty());
}

#[test]
fn progress_reflects_the_latest_value_verbatim() {
    let store = PreviewStore::new();
    let mut session = SessionState::new();

    let (generation, _) = session.capture_input(input_image(&store, "cat.jpg"));
    session.start_compression(generation);

    // neither clamped nor forced monotonic
    session.set_progress(generation, 12.5);
    session.set_progress(generation, 7.0);
    assert_eq!(session.snapshot().progress, Some(7.0));
}

#[test]
fn load_notifications_flip_the_flags() {
    let store = PreviewStore::new();
    let mut session = SessionState::new();

    let (generation, _) = session.capture_input(input_image(&store, "cat.jpg"));
    assert!(!session.snapshot().input.expect("input").loaded);

    session.mark_input_loaded();
    assert!(session.snapshot().input.expect("input").loaded);

    // output notification is meaningless before output exists
    session.mark_output_loaded();

    session.start_compression(generation);
    session.complete(generation, output_image(&store, "cat-compressed.jpg"));
    assert!(!session.snapshot().output.expect("output").loaded);

    session.mark_output_loaded();
    assert!(session.snapshot().output.expect("output").loaded);
}

#[test]
fn output_url_is_only_exposed_when_ready() {
    let store = PreviewStore::new();
    let mut session = SessionState::new();

    assert!(session.output_url().is_none());
    let (generation, _) = session.capture_input(input_image(&store, "cat.jpg"));
    session.start_compression(generation);
    assert!(session.output_url().is_none());

    let output = output_image(&store, "cat-compressed.jpg");
    let expected = output.url.clone();
    session.complete(generation, output);
    assert_eq!(session.output_url(), Some(expected));
}
