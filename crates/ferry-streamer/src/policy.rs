use std::time::Duration;

/// Caller-set knobs for a transfer. Immutable while `send` runs; the
/// caller may reconfigure between transfers on the same streamer.
#[derive(Debug, Clone)]
pub struct TransferPolicy {
    /// Filename suggested in `Content-Disposition`; the file's base name
    /// when unset.
    pub disposition_override: Option<String>,
    /// Bytes read and written per loop iteration.
    pub chunk_bytes: usize,
    /// Pause inserted after each chunk. Zero disables throttling.
    pub delay: Duration,
    /// Skips the content-type probe when set.
    pub content_type_override: Option<String>,
}

impl Default for TransferPolicy {
    fn default() -> Self {
        Self {
            disposition_override: None,
            chunk_bytes: 40960,
            delay: Duration::from_millis(100),
            content_type_override: None,
        }
    }
}
