use crate::error::StreamError;

/// Inclusive byte window of the file selected for one transfer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RangeWindow {
    /// First byte offset to stream.
    pub start: u64,
    /// Last byte offset to stream, inclusive.
    pub end: u64,
    /// True when the request asked for a sub-range (status 206).
    pub partial: bool,
    size: u64,
}

impl RangeWindow {
    /// Window covering the whole file.
    pub fn full(size: u64) -> Self {
        Self {
            start: 0,
            end: size.saturating_sub(1),
            partial: false,
            size,
        }
    }

    /// Interpret an optional `Range` header value against the file size.
    ///
    /// Only the first range of a comma-separated list is honored; the rest
    /// are silently ignored. An empty or non-numeric start token means
    /// byte 0 (a `bytes=-500` suffix request is *not* treated as "last 500
    /// bytes"), and an empty, non-numeric, or zero end token means the
    /// file's last byte.
    ///
    /// The end is clamped to `size - 1`. A start at or past end-of-file,
    /// a start beyond the (clamped) end, or any sub-range request against
    /// an empty file is rejected.
    ///
    /// # Errors
    /// [`StreamError::RangeNotSatisfiable`] for windows no file slice can
    /// satisfy.
    pub fn interpret(header: Option<&str>, size: u64) -> Result<Self, StreamError> {
        let Some(raw) = header else {
            return Ok(Self::full(size));
        };
        let Some(spec) = raw.strip_prefix("bytes=") else {
            return Ok(Self::full(size));
        };

        let first = spec.split(',').next().unwrap_or("");
        let (start_tok, end_tok) = first.split_once('-').unwrap_or((first, ""));

        let start = start_tok.trim().parse::<u64>().unwrap_or(0);
        let end = match end_tok.trim().parse::<u64>() {
            Ok(0) | Err(_) => size.saturating_sub(1),
            Ok(e) => e.min(size.saturating_sub(1)),
        };

        if size == 0 || start >= size || start > end {
            return Err(StreamError::RangeNotSatisfiable { start, end, size });
        }

        Ok(Self {
            start,
            end,
            partial: true,
            size,
        })
    }

    /// Number of body bytes this window covers.
    pub fn content_length(&self) -> u64 {
        if self.size == 0 {
            0
        } else {
            self.end - self.start + 1
        }
    }

    /// True when the window runs through the file's last byte.
    pub fn reaches_end(&self) -> bool {
        self.end + 1 >= self.size
    }

    /// Total file size the window was computed against.
    pub fn total_size(&self) -> u64 {
        self.size
    }
}
