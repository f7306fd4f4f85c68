use thiserror::Error;

/// Failures while mounting the overlay surface. None of these may escape
/// into the host page; the wasm supervisor logs and retries or abandons.
#[derive(Debug, Error)]
pub enum MountError {
    #[error("no window object available")]
    NoWindow,
    #[error("no document available")]
    NoDocument,
    #[error("2d canvas context unavailable")]
    ContextUnavailable,
    #[error("failed to create overlay canvas: {0}")]
    CanvasCreation(String),
}

/// Result of one mount attempt, consumed by the supervisor loop.
#[derive(Debug)]
pub enum InitOutcome<T> {
    /// Surface mounted and animating.
    Mounted(T),
    /// `document.body` not available yet; try again after a short delay.
    RetryLater,
    /// Unrecoverable for this attempt; log and abandon (or retry once on
    /// the auto-start path).
    Failed(MountError),
}
