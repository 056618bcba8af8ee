//! Content-type resolution for uploaded documents.
//!
//! Sniffing by magic number is tried first; when the content is ambiguous
//! (zip/OLE containers, plain text) the file extension decides. The result
//! records which strategy won so callers apply their own fallback policy
//! instead of having failures swallowed for them.

/// How the content type was determined.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MimeSource {
    /// Unambiguous magic number in the file contents.
    Content,
    /// File extension lookup.
    Extension,
    /// Neither strategy matched.
    Default,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedMime {
    pub mime: &'static str,
    pub source: MimeSource,
}

pub const OCTET_STREAM: &str = "application/octet-stream";

/// Resolves a content type from file contents, then extension, then the
/// generic default.
pub fn resolve(contents: &[u8], filename: &str) -> ResolvedMime {
    if let Some(mime) = sniff_content(contents) {
        return ResolvedMime {
            mime,
            source: MimeSource::Content,
        };
    }
    if let Some(mime) = from_extension(filename) {
        return ResolvedMime {
            mime,
            source: MimeSource::Extension,
        };
    }
    ResolvedMime {
        mime: OCTET_STREAM,
        source: MimeSource::Default,
    }
}

/// Magic-number check for formats that identify themselves unambiguously.
/// Container formats (docx/xlsx are zip, doc/xls are OLE) are left to the
/// extension table.
pub fn sniff_content(contents: &[u8]) -> Option<&'static str> {
    if contents.starts_with(b"%PDF-") {
        return Some("application/pdf");
    }
    if contents.starts_with(&[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A]) {
        return Some("image/png");
    }
    if contents.starts_with(&[0xFF, 0xD8, 0xFF]) {
        return Some("image/jpeg");
    }
    if contents.starts_with(b"GIF87a") || contents.starts_with(b"GIF89a") {
        return Some("image/gif");
    }
    None
}

/// Extension fallback table, matching the document types the service accepts.
pub fn from_extension(filename: &str) -> Option<&'static str> {
    let extension = filename.rsplit('.').next()?.to_ascii_lowercase();
    match extension.as_str() {
        "pdf" => Some("application/pdf"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        "png" => Some("image/png"),
        "gif" => Some("image/gif"),
        "doc" => Some("application/msword"),
        "docx" => {
            Some("application/vnd.openxmlformats-officedocument.wordprocessingml.document")
        }
        "xls" => Some("application/vnd.ms-excel"),
        "xlsx" => Some("application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"),
        "txt" => Some("text/plain"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pdf_is_sniffed_from_content() {
        let resolved = resolve(b"%PDF-1.7 rest of file", "renamed.bin");
        assert_eq!(resolved.mime, "application/pdf");
        assert_eq!(resolved.source, MimeSource::Content);
    }

    #[test]
    fn png_magic_wins_over_misleading_extension() {
        let mut contents = vec![0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];
        contents.extend_from_slice(b"payload");
        let resolved = resolve(&contents, "photo.jpg");
        assert_eq!(resolved.mime, "image/png");
        assert_eq!(resolved.source, MimeSource::Content);
    }

    #[test]
    fn docx_falls_back_to_extension() {
        // Zip container: content sniffing is deliberately silent here.
        let resolved = resolve(b"PK\x03\x04....", "report.docx");
        assert_eq!(
            resolved.mime,
            "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
        );
        assert_eq!(resolved.source, MimeSource::Extension);
    }

    #[test]
    fn extension_lookup_is_case_insensitive() {
        assert_eq!(from_extension("SCAN.PDF"), Some("application/pdf"));
    }

    #[test]
    fn unknown_everything_yields_default() {
        let resolved = resolve(b"\x00\x01\x02", "mystery.zzz");
        assert_eq!(resolved.mime, OCTET_STREAM);
        assert_eq!(resolved.source, MimeSource::Default);
    }

    #[test]
    fn no_extension_yields_default() {
        let resolved = resolve(b"plain words", "README");
        assert_eq!(resolved.source, MimeSource::Default);
    }
}
