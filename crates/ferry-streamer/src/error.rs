use std::io;
use std::path::PathBuf;

/// Failures surfaced by [`crate::FileStreamer::send`].
///
/// A client disconnect is deliberately not represented here: it is a
/// normal early-termination path, reported through
/// [`crate::TransferState::TruncatedByDisconnect`].
#[derive(Debug, thiserror::Error)]
pub enum StreamError {
    /// The path failed the existence/readability check. Nothing has been
    /// written to the sink when this is returned.
    #[error("file not found or inaccessible: {}", path.display())]
    NotReadable { path: PathBuf },

    /// The file passed the readability check but could not be opened.
    /// Opening happens before the head is emitted, so the response is
    /// still clean.
    #[error("cannot open file for streaming: {source}")]
    OpenFailed { source: io::Error },

    /// The request named a byte range the file cannot satisfy.
    #[error("range {start}-{end} not satisfiable for size {size}")]
    RangeNotSatisfiable { start: u64, end: u64, size: u64 },

    /// Read or seek failure after the transfer started.
    #[error("i/o error during transfer: {0}")]
    Io(#[from] io::Error),
}
