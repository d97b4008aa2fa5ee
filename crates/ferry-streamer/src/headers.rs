use http::StatusCode;
use http::header::{self, HeaderMap, HeaderValue};

use crate::range::RangeWindow;

/// Fixed past date stamped on every response so intermediaries treat it
/// as non-cacheable. Kept byte-for-byte for wire compatibility.
const EXPIRES_PAST: &str = "Mon, 26 Jul 1997 05:00:00 GMT";

/// Content type emitted when the probe comes up empty.
const UNKNOWN_TYPE: &str = "application/octet-stream";

/// Status line and header set, emitted before the first body byte.
#[derive(Debug, Clone)]
pub struct ResponseHead {
    pub status: StatusCode,
    pub headers: HeaderMap,
}

/// Build the complete response head for one transfer.
///
/// `content_type` of `None` falls back to `application/octet-stream`.
/// `disposition` of `Some(name)` emits an attachment
/// `Content-Disposition`, with quotes and control bytes stripped from the
/// name so the value stays a legal header.
pub fn build_head(
    window: &RangeWindow,
    content_type: Option<&str>,
    disposition: Option<&str>,
) -> ResponseHead {
    let mut headers = HeaderMap::new();

    let ctype = content_type.unwrap_or(UNKNOWN_TYPE);
    match HeaderValue::from_str(ctype) {
        Ok(v) => headers.insert(header::CONTENT_TYPE, v),
        Err(_) => headers.insert(header::CONTENT_TYPE, HeaderValue::from_static(UNKNOWN_TYPE)),
    };

    if let Some(name) = disposition {
        let value = format!("attachment; filename=\"{}\"", sanitize_filename(name));
        if let Ok(v) = HeaderValue::from_str(&value) {
            headers.insert(header::CONTENT_DISPOSITION, v);
        }
    }

    // Advertise range support even on full responses.
    headers.insert(header::ACCEPT_RANGES, HeaderValue::from_static("bytes"));

    // The three below make the download non-cacheable.
    headers.insert(header::CACHE_CONTROL, HeaderValue::from_static("private"));
    headers.insert(header::PRAGMA, HeaderValue::from_static("private"));
    headers.insert(header::EXPIRES, HeaderValue::from_static(EXPIRES_PAST));

    headers.insert(
        header::CONTENT_LENGTH,
        window.content_length().to_string().parse().unwrap(),
    );

    let status = if window.partial {
        headers.insert(
            header::CONTENT_RANGE,
            format!(
                "bytes {}-{}/{}",
                window.start,
                window.end,
                window.total_size()
            )
            .parse()
            .unwrap(),
        );
        StatusCode::PARTIAL_CONTENT
    } else {
        StatusCode::OK
    };

    ResponseHead { status, headers }
}

/// Strip characters that would break the quoted filename parameter.
fn sanitize_filename(name: &str) -> String {
    name.chars()
        .filter(|c| *c != '"' && *c != '\\' && !c.is_control())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_response_head() {
        let window = RangeWindow::full(1000);
        let head = build_head(&window, Some("text/plain"), None);

        assert_eq!(head.status, StatusCode::OK);
        assert_eq!(head.headers[header::CONTENT_TYPE], "text/plain");
        assert_eq!(head.headers[header::CONTENT_LENGTH], "1000");
        assert_eq!(head.headers[header::ACCEPT_RANGES], "bytes");
        assert!(head.headers.get(header::CONTENT_RANGE).is_none());
        assert!(head.headers.get(header::CONTENT_DISPOSITION).is_none());
    }

    #[test]
    fn partial_response_head() {
        let window = RangeWindow::interpret(Some("bytes=100-199"), 1000).unwrap();
        let head = build_head(&window, None, None);

        assert_eq!(head.status, StatusCode::PARTIAL_CONTENT);
        assert_eq!(head.headers[header::CONTENT_LENGTH], "100");
        assert_eq!(head.headers[header::CONTENT_RANGE], "bytes 100-199/1000");
    }

    #[test]
    fn cache_defeating_headers_are_exact() {
        let head = build_head(&RangeWindow::full(10), None, None);

        assert_eq!(head.headers[header::CACHE_CONTROL], "private");
        assert_eq!(head.headers[header::PRAGMA], "private");
        assert_eq!(
            head.headers[header::EXPIRES],
            "Mon, 26 Jul 1997 05:00:00 GMT"
        );
    }

    #[test]
    fn unknown_type_falls_back_to_octet_stream() {
        let head = build_head(&RangeWindow::full(10), None, None);
        assert_eq!(
            head.headers[header::CONTENT_TYPE],
            "application/octet-stream"
        );
    }

    #[test]
    fn disposition_is_quoted() {
        let head = build_head(&RangeWindow::full(10), None, Some("report.pdf"));
        assert_eq!(
            head.headers[header::CONTENT_DISPOSITION],
            "attachment; filename=\"report.pdf\""
        );
    }

    #[test]
    fn disposition_name_is_sanitized() {
        let head = build_head(&RangeWindow::full(10), None, Some("a\"b\\c\nd.txt"));
        assert_eq!(
            head.headers[header::CONTENT_DISPOSITION],
            "attachment; filename=\"abcd.txt\""
        );
    }
}
