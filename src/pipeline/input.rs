//! Input handling: the uploaded file and the PDF sniff applied to it.
//!
//! An [`UploadedFile`] is what the client side selects and the server side
//! receives. The only validation performed on its bytes is a magic-byte check
//! (`%PDF`) so that obviously wrong uploads fail before the extractor sees
//! them; structural integrity is left to the extractor itself.

use crate::error::AnalyzerError;
use std::fmt;
use std::path::Path;
use tracing::debug;

/// Declared media type of a PDF document.
pub const PDF_MEDIA_TYPE: &str = "application/pdf";

/// Declared media type for anything we cannot identify.
pub const OCTET_STREAM_MEDIA_TYPE: &str = "application/octet-stream";

const PDF_MAGIC: &[u8; 4] = b"%PDF";

/// A file chosen by the user, held in memory for the duration of a session.
#[derive(Clone, PartialEq, Eq)]
pub struct UploadedFile {
    name: String,
    media_type: String,
    bytes: Vec<u8>,
}

impl UploadedFile {
    pub fn from_bytes(
        name: impl Into<String>,
        media_type: impl Into<String>,
        bytes: impl Into<Vec<u8>>,
    ) -> Self {
        Self {
            name: name.into(),
            media_type: media_type.into(),
            bytes: bytes.into(),
        }
    }

    /// Read a file from disk, deriving its declared media type from the
    /// extension the way a browser file picker does.
    pub async fn from_path(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path).await?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        debug!("Read {} ({} bytes)", path.display(), bytes.len());
        Ok(Self {
            name,
            media_type: media_type_for_path(path).to_string(),
            bytes,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn media_type(&self) -> &str {
        &self.media_type
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn size(&self) -> usize {
        self.bytes.len()
    }

    /// `true` when the declared media type is `application/pdf`, ignoring case
    /// and parameters.
    pub fn is_declared_pdf(&self) -> bool {
        is_pdf_media_type(&self.media_type)
    }
}

// Keeps multi-megabyte buffers out of debug logs.
impl fmt::Debug for UploadedFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UploadedFile")
            .field("name", &self.name)
            .field("media_type", &self.media_type)
            .field("size", &self.bytes.len())
            .finish()
    }
}

/// Media type a file picker would declare for `path`.
pub fn media_type_for_path(path: &Path) -> &'static str {
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("pdf") => PDF_MEDIA_TYPE,
        _ => OCTET_STREAM_MEDIA_TYPE,
    }
}

pub fn is_pdf_media_type(media_type: &str) -> bool {
    media_type
        .split(';')
        .next()
        .map(|essence| essence.trim().eq_ignore_ascii_case(PDF_MEDIA_TYPE))
        .unwrap_or(false)
}

/// Reject buffers that do not start with the PDF magic bytes.
pub fn ensure_pdf(bytes: &[u8]) -> Result<(), AnalyzerError> {
    if bytes.starts_with(PDF_MAGIC) {
        Ok(())
    } else {
        Err(AnalyzerError::NotAPdf {
            magic: bytes.iter().take(PDF_MAGIC.len()).copied().collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn media_type_from_extension() {
        assert_eq!(media_type_for_path(Path::new("deck.pdf")), PDF_MEDIA_TYPE);
        assert_eq!(media_type_for_path(Path::new("DECK.PDF")), PDF_MEDIA_TYPE);
        assert_eq!(
            media_type_for_path(Path::new("deck.key")),
            OCTET_STREAM_MEDIA_TYPE
        );
        assert_eq!(
            media_type_for_path(Path::new("README")),
            OCTET_STREAM_MEDIA_TYPE
        );
    }

    #[test]
    fn pdf_media_type_ignores_case_and_parameters() {
        assert!(is_pdf_media_type("application/pdf"));
        assert!(is_pdf_media_type("Application/PDF; name=deck.pdf"));
        assert!(!is_pdf_media_type("text/plain"));
        assert!(!is_pdf_media_type(""));
    }

    #[test]
    fn magic_sniff() {
        assert!(ensure_pdf(b"%PDF-1.7\n...").is_ok());
        match ensure_pdf(b"PK\x03\x04rest") {
            Err(AnalyzerError::NotAPdf { magic }) => assert_eq!(magic, b"PK\x03\x04"),
            other => panic!("expected NotAPdf, got {other:?}"),
        }
        assert!(matches!(
            ensure_pdf(b""),
            Err(AnalyzerError::NotAPdf { ref magic }) if magic.is_empty()
        ));
    }

    #[test]
    fn debug_hides_content() {
        let f = UploadedFile::from_bytes("deck.pdf", PDF_MEDIA_TYPE, vec![0u8; 1024]);
        let dbg = format!("{f:?}");
        assert!(dbg.contains("size: 1024"));
        assert!(!dbg.contains("[0, 0"));
    }

    #[tokio::test]
    async fn from_path_reads_name_type_and_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("deck.pdf");
        let mut f = std::fs::File::create(&path).unwrap();
        f.write_all(b"%PDF-1.4 fake").unwrap();

        let file = UploadedFile::from_path(&path).await.unwrap();
        assert_eq!(file.name(), "deck.pdf");
        assert_eq!(file.media_type(), PDF_MEDIA_TYPE);
        assert_eq!(file.size(), 13);
        assert!(file.is_declared_pdf());
    }
}
