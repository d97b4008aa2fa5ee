//! Throttled, range-aware HTTP file streaming.
//!
//! The core is [`FileStreamer`]: it interprets an optional `Range` header
//! into a byte window, emits the response head (content type, disposition,
//! range and cache headers), then streams the file in fixed-size chunks
//! with a pause after each one, stopping promptly when the client goes
//! away. A completion hook fires only when end-of-file is reached.
//!
//! The streamer writes into a [`ResponseSink`], the seam to the host HTTP
//! layer. [`ChannelSink`] bridges a transfer onto an axum response body;
//! tests plug in their own sinks.

pub mod error;
pub mod headers;
pub mod policy;
pub mod probe;
pub mod range;
pub mod sink;
pub mod streamer;

// Re-export key types for convenience.
pub use error::StreamError;
pub use headers::{ResponseHead, build_head};
pub use policy::TransferPolicy;
pub use probe::{DefaultMimeProbe, MimeProbe};
pub use range::RangeWindow;
pub use sink::{ChannelSink, ResponseSink};
pub use streamer::{
    CompletionHook, FileStreamer, TransferOutcome, TransferRequest, TransferState,
};
