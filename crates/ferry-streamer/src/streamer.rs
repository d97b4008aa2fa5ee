use std::io::SeekFrom;
use std::path::Path;
use std::time::Duration;

use bytes::Bytes;
use tokio::fs;
use tokio::io::{AsyncReadExt, AsyncSeekExt};
use tracing::{debug, warn};

use crate::error::StreamError;
use crate::headers::build_head;
use crate::policy::TransferPolicy;
use crate::probe::{DefaultMimeProbe, MimeProbe};
use crate::range::RangeWindow;
use crate::sink::ResponseSink;

/// Bytes read from the file's head for content sniffing.
const SNIFF_LEN: usize = 64;

/// Completion hook, invoked once, synchronously, after the final flush of
/// a transfer that reached end-of-file. Never invoked on disconnect or on
/// a mid-file window.
pub type CompletionHook = Box<dyn FnOnce() + Send>;

/// Per-request inputs to [`FileStreamer::send`].
pub struct TransferRequest {
    /// Raw `Range` header value, if the request carried one.
    pub range: Option<String>,
    /// Emit an attachment `Content-Disposition` header.
    pub with_disposition: bool,
    /// Fires only when the transfer reaches end-of-file.
    pub on_complete: Option<CompletionHook>,
}

impl Default for TransferRequest {
    fn default() -> Self {
        Self {
            range: None,
            with_disposition: true,
            on_complete: None,
        }
    }
}

/// How a transfer ended and how much it moved.
#[derive(Debug)]
pub struct TransferOutcome {
    pub bytes_sent: u64,
    pub state: TransferState,
}

/// Terminal state of the transfer loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferState {
    /// End-of-file was reached; the completion hook (if any) has fired.
    Completed,
    /// The client went away mid-stream. Not an error.
    TruncatedByDisconnect,
    /// A mid-file window was delivered in full; end-of-file was never
    /// reached, so no completion hook fires.
    TruncatedByWindow,
}

/// Streams a file to a [`ResponseSink`] in throttled chunks, honoring a
/// single `bytes=START-END` range.
///
/// One streamer handles any number of sequential transfers; the policy
/// set through the `set_*` methods applies to every subsequent `send`.
pub struct FileStreamer {
    policy: TransferPolicy,
    probe: Box<dyn MimeProbe>,
}

impl FileStreamer {
    pub fn new() -> Self {
        Self::with_probe(Box::new(DefaultMimeProbe))
    }

    /// Streamer with a caller-supplied content-type probe.
    pub fn with_probe(probe: Box<dyn MimeProbe>) -> Self {
        Self {
            policy: TransferPolicy::default(),
            probe,
        }
    }

    pub fn policy(&self) -> &TransferPolicy {
        &self.policy
    }

    /// Filename to suggest in `Content-Disposition`; `None` restores the
    /// file's own base name.
    pub fn set_disposition_name(&mut self, name: Option<String>) {
        self.policy.disposition_override = name;
    }

    /// Throttle: pause `delay` after each chunk of `chunk_bytes`.
    pub fn set_throttle(&mut self, delay: Duration, chunk_bytes: usize) {
        self.policy.delay = delay;
        self.policy.chunk_bytes = chunk_bytes;
    }

    /// Fixed content type; `None` restores probing.
    pub fn set_content_type(&mut self, content_type: Option<String>) {
        self.policy.content_type_override = content_type;
    }

    /// Stream `path` to `sink`.
    ///
    /// Interprets the request's range against the file size, emits the
    /// response head, then loops: read up to a chunk (clipped to the
    /// window), write, flush, pause. The loop stops at the end of the
    /// window, at end-of-file, or as soon as the client is gone. The file
    /// handle is released on every exit path.
    ///
    /// # Errors
    /// - [`StreamError::NotReadable`] — missing file or not a regular
    ///   file; nothing has been sent.
    /// - [`StreamError::RangeNotSatisfiable`] — the range check failed;
    ///   nothing has been sent.
    /// - [`StreamError::OpenFailed`] — the open failed after the
    ///   readability check; the open happens before the head goes out, so
    ///   still nothing has been sent.
    /// - [`StreamError::Io`] — read or seek failure mid-transfer.
    pub async fn send<S: ResponseSink>(
        &self,
        path: &Path,
        req: TransferRequest,
        sink: &mut S,
    ) -> Result<TransferOutcome, StreamError> {
        let meta = fs::metadata(path).await.map_err(|_| StreamError::NotReadable {
            path: path.to_path_buf(),
        })?;
        if !meta.is_file() {
            return Err(StreamError::NotReadable {
                path: path.to_path_buf(),
            });
        }
        let size = meta.len();

        let window = RangeWindow::interpret(req.range.as_deref(), size)?;

        // Open before the head goes out: a failed open must never follow
        // already-sent headers.
        let mut file = fs::File::open(path)
            .await
            .map_err(|e| StreamError::OpenFailed { source: e })?;

        let content_type = match &self.policy.content_type_override {
            Some(t) => Some(t.clone()),
            None => {
                let mut head_buf = [0u8; SNIFF_LEN];
                let n = file.read(&mut head_buf).await?;
                self.probe.probe(path, &head_buf[..n])
            }
        };

        file.seek(SeekFrom::Start(window.start)).await?;

        let disposition = if req.with_disposition {
            Some(
                self.policy
                    .disposition_override
                    .clone()
                    .unwrap_or_else(|| base_name(path)),
            )
        } else {
            None
        };

        sink.disable_buffering();
        sink.disable_compression();
        sink.send_head(build_head(&window, content_type.as_deref(), disposition.as_deref()));

        let chunk_bytes = self.policy.chunk_bytes.max(1);
        if self.policy.chunk_bytes == 0 {
            warn!("chunk size 0 would never advance; reading 1 byte per iteration");
        }

        let content_length = window.content_length();
        let mut buf = vec![0u8; chunk_bytes];
        let mut sent: u64 = 0;

        let state = loop {
            if sink.is_aborted() {
                break TransferState::TruncatedByDisconnect;
            }
            if sent >= content_length {
                break if window.reaches_end() {
                    TransferState::Completed
                } else {
                    TransferState::TruncatedByWindow
                };
            }

            // clip the final read to the window: bytes past `end` are
            // never read, let alone written
            let want = chunk_bytes.min((content_length - sent) as usize);
            let n = file.read(&mut buf[..want]).await?;
            if n == 0 {
                break TransferState::Completed;
            }

            if sink.write(Bytes::copy_from_slice(&buf[..n])).await.is_err() {
                break TransferState::TruncatedByDisconnect;
            }
            if sink.flush().await.is_err() {
                break TransferState::TruncatedByDisconnect;
            }
            sent += n as u64;

            if !self.policy.delay.is_zero() {
                tokio::time::sleep(self.policy.delay).await;
            }
        };

        // after the final flush, before the handle is released
        if state == TransferState::Completed {
            if let Some(hook) = req.on_complete {
                hook();
            }
        }

        debug!("transfer finished: {} bytes, {:?}", sent, state);
        Ok(TransferOutcome {
            bytes_sent: sent,
            state,
        })
    }
}

impl Default for FileStreamer {
    fn default() -> Self {
        Self::new()
    }
}

fn base_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}
