use std::io;

use bytes::Bytes;
use futures_util::SinkExt;
use futures_channel::mpsc;
use tokio::sync::oneshot;

use crate::headers::ResponseHead;

/// Where a transfer's bytes go: the seam between the loop and the host
/// HTTP layer.
///
/// A failed `write` and a true `is_aborted` mean the same thing — the
/// client has gone away — and terminate the transfer early without
/// raising an error. Hosts that sit behind an output-buffering or
/// transparent-compression layer unhook them in `disable_buffering` /
/// `disable_compression`; both default to no-ops.
pub trait ResponseSink {
    /// Unhook any buffering layer between the sink and the socket.
    fn disable_buffering(&mut self) {}

    /// Unhook any transparent compression layer that would corrupt
    /// Content-Length accounting.
    fn disable_compression(&mut self) {}

    /// Emit status and headers. Called exactly once, before any body byte.
    fn send_head(&mut self, head: ResponseHead);

    /// Write one chunk of body bytes.
    fn write(&mut self, chunk: Bytes) -> impl Future<Output = io::Result<()>> + Send;

    /// Push written bytes toward the client.
    fn flush(&mut self) -> impl Future<Output = io::Result<()>> + Send;

    /// Cheap disconnect poll, checked once per loop iteration.
    fn is_aborted(&self) -> bool;
}

/// Bridges a transfer onto an axum response.
///
/// The head travels over a oneshot; body chunks rendezvous through a
/// zero-capacity channel, so each chunk is in the HTTP layer's hands
/// before the loop moves on. A dropped receiver reads as a disconnect.
pub struct ChannelSink {
    head_tx: Option<oneshot::Sender<ResponseHead>>,
    body_tx: mpsc::Sender<io::Result<Bytes>>,
}

impl ChannelSink {
    /// Returns the sink plus the receiving halves: the head for building
    /// the response, the body for `Body::from_stream`.
    pub fn new() -> (
        Self,
        oneshot::Receiver<ResponseHead>,
        mpsc::Receiver<io::Result<Bytes>>,
    ) {
        let (head_tx, head_rx) = oneshot::channel();
        let (body_tx, body_rx) = mpsc::channel(0);
        (
            Self {
                head_tx: Some(head_tx),
                body_tx,
            },
            head_rx,
            body_rx,
        )
    }
}

impl ResponseSink for ChannelSink {
    fn send_head(&mut self, head: ResponseHead) {
        if let Some(tx) = self.head_tx.take() {
            let _ = tx.send(head);
        }
    }

    async fn write(&mut self, chunk: Bytes) -> io::Result<()> {
        self.body_tx
            .send(Ok(chunk))
            .await
            .map_err(|_| io::Error::new(io::ErrorKind::BrokenPipe, "client disconnected"))
    }

    async fn flush(&mut self) -> io::Result<()> {
        // zero-capacity channel: every accepted chunk has already been
        // handed over, nothing is buffered here
        Ok(())
    }

    fn is_aborted(&self) -> bool {
        self.body_tx.is_closed()
    }
}
