use std::path::Path;

/// Best-effort MIME detection.
///
/// `head` holds the leading bytes of the file (up to 64), read before the
/// transfer seeks to its window. Implementations return `None` when they
/// cannot tell; the header builder then falls back to
/// `application/octet-stream`.
pub trait MimeProbe: Send + Sync {
    fn probe(&self, path: &Path, head: &[u8]) -> Option<String>;
}

/// Default detection chain: magic-byte sniffing first, extension lookup
/// second.
#[derive(Debug, Default)]
pub struct DefaultMimeProbe;

impl MimeProbe for DefaultMimeProbe {
    fn probe(&self, path: &Path, head: &[u8]) -> Option<String> {
        sniff_magic(head).map(str::to_string).or_else(|| {
            mime_guess::from_path(path)
                .first()
                .map(|m| m.essence_str().to_string())
        })
    }
}

/// Match well-known file signatures against the leading bytes.
fn sniff_magic(head: &[u8]) -> Option<&'static str> {
    if head.starts_with(b"\x89PNG\r\n\x1a\n") {
        return Some("image/png");
    }
    if head.starts_with(&[0xFF, 0xD8, 0xFF]) {
        return Some("image/jpeg");
    }
    if head.starts_with(b"GIF87a") || head.starts_with(b"GIF89a") {
        return Some("image/gif");
    }
    if head.starts_with(b"%PDF-") {
        return Some("application/pdf");
    }
    if head.starts_with(b"PK\x03\x04") {
        return Some("application/zip");
    }
    if head.starts_with(&[0x1F, 0x8B]) {
        return Some("application/gzip");
    }
    if head.starts_with(b"OggS") {
        return Some("audio/ogg");
    }
    if head.starts_with(b"ID3") || head.starts_with(&[0xFF, 0xFB]) {
        return Some("audio/mpeg");
    }
    if head.starts_with(&[0x1A, 0x45, 0xDF, 0xA3]) {
        return Some("video/webm");
    }
    if head.len() >= 12 && &head[4..8] == b"ftyp" {
        return Some("video/mp4");
    }
    if head.len() >= 12 && head.starts_with(b"RIFF") {
        return match &head[8..12] {
            b"WAVE" => Some("audio/wav"),
            b"AVI " => Some("video/x-msvideo"),
            b"WEBP" => Some("image/webp"),
            _ => None,
        };
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sniffs_png_signature() {
        let probe = DefaultMimeProbe;
        let head = b"\x89PNG\r\n\x1a\n\x00\x00\x00\x0dIHDR";
        assert_eq!(
            probe.probe(Path::new("mislabeled.txt"), head),
            Some("image/png".into())
        );
    }

    #[test]
    fn sniffs_pdf_signature() {
        let probe = DefaultMimeProbe;
        assert_eq!(
            probe.probe(Path::new("doc"), b"%PDF-1.7\n"),
            Some("application/pdf".into())
        );
    }

    #[test]
    fn sniffs_riff_subtypes() {
        assert_eq!(sniff_magic(b"RIFF\x24\x00\x00\x00WAVEfmt "), Some("audio/wav"));
        assert_eq!(sniff_magic(b"RIFF\x24\x00\x00\x00WEBPVP8 "), Some("image/webp"));
    }

    #[test]
    fn falls_back_to_extension() {
        let probe = DefaultMimeProbe;
        assert_eq!(
            probe.probe(Path::new("notes.txt"), b"hello world"),
            Some("text/plain".into())
        );
    }

    #[test]
    fn unknown_yields_none() {
        let probe = DefaultMimeProbe;
        assert_eq!(probe.probe(Path::new("blob.qz9"), b"\x00\x01\x02"), None);
    }
}
