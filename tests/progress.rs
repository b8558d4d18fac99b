//! Progress and cancellation tests.

use std::time::Duration;

use frameloom::{CancellationToken, OperationType, ProgressInfo};

// ── CancellationToken ──────────────────────────────────────────────

#[test]
fn cancellation_token_default_not_cancelled() {
    let token = CancellationToken::new();
    assert!(!token.is_cancelled());
}

#[test]
fn cancellation_token_cancel() {
    let token = CancellationToken::new();
    token.cancel();
    assert!(token.is_cancelled());
}

#[test]
fn cancellation_token_clone_shares_state() {
    let token = CancellationToken::new();
    let clone = token.clone();
    assert!(!clone.is_cancelled());

    token.cancel();
    assert!(clone.is_cancelled());
}

#[test]
fn cancellation_token_default_trait() {
    let token = CancellationToken::default();
    assert!(!token.is_cancelled());
}

// ── ProgressInfo ───────────────────────────────────────────────────

fn info(current: u64, total: Option<u64>, completed: bool) -> ProgressInfo {
    ProgressInfo {
        operation: OperationType::VideoAssembly,
        current,
        total,
        percentage: total.map(|t| (current as f32 / t as f32) * 100.0),
        elapsed: Duration::from_millis(5),
        completed,
    }
}

#[test]
fn status_text_while_working() {
    assert_eq!(info(3, Some(120), false).to_string(), "processing frame 3/120");
}

#[test]
fn status_text_without_total() {
    assert_eq!(info(7, None, false).to_string(), "processing frame 7");
}

#[test]
fn status_text_on_completion() {
    assert_eq!(
        info(120, Some(120), true).to_string(),
        "assembly completed (120 frames)",
    );
}

#[test]
fn operation_type_debug() {
    assert_eq!(format!("{:?}", OperationType::FrameExtraction), "FrameExtraction");
    assert_eq!(format!("{:?}", OperationType::VideoAssembly), "VideoAssembly");
}
