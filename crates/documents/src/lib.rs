//! Document text extraction for GChat.
//!
//! An uploaded document is either plain text or a PDF, distinguished by its
//! declared content type. Either way the result is a single string that is
//! dropped into the document slot of the combined prompt.

pub mod pdf;
pub mod text;

use std::path::Path;

use gchat_core::error::DocumentError;
use tracing::debug;

pub const MIME_PLAIN_TEXT: &str = "text/plain";
pub const MIME_PDF: &str = "application/pdf";

/// The two supported kinds of upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentKind {
    PlainText,
    Pdf,
}

impl ContentKind {
    /// Resolve a declared MIME type. Parameters (`; charset=...`) are ignored.
    pub fn from_mime(mime: &str) -> Result<Self, DocumentError> {
        let essence = mime
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();

        match essence.as_str() {
            MIME_PLAIN_TEXT => Ok(Self::PlainText),
            MIME_PDF => Ok(Self::Pdf),
            _ => Err(DocumentError::UnsupportedContentType(mime.to_string())),
        }
    }

    /// Infer the kind from a file extension, the way an upload control declares it.
    pub fn from_path(path: &Path) -> Result<Self, DocumentError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();

        match ext.as_str() {
            "txt" => Ok(Self::PlainText),
            "pdf" => Ok(Self::Pdf),
            "" => Err(DocumentError::UnsupportedContentType(format!(
                "{} (no file extension)",
                path.display()
            ))),
            other => Err(DocumentError::UnsupportedContentType(format!(".{other}"))),
        }
    }

    pub fn mime(&self) -> &'static str {
        match self {
            Self::PlainText => MIME_PLAIN_TEXT,
            Self::Pdf => MIME_PDF,
        }
    }
}

/// Extract the text of a document held in memory.
pub fn extract_text(kind: ContentKind, bytes: &[u8]) -> Result<String, DocumentError> {
    match kind {
        ContentKind::PlainText => text::decode_utf8(bytes),
        ContentKind::Pdf => pdf::extract_pages(bytes),
    }
}

/// A document read from disk and reduced to text.
#[derive(Debug, Clone)]
pub struct LoadedDocument {
    /// File name as shown to the user
    pub name: String,
    pub kind: ContentKind,
    pub text: String,
}

/// Read `path` and extract its text.
///
/// `declared` is the content type given by the caller; when absent it is
/// inferred from the file extension.
pub async fn load_document(
    path: &Path,
    declared: Option<&str>,
) -> Result<LoadedDocument, DocumentError> {
    let kind = match declared {
        Some(mime) => ContentKind::from_mime(mime)?,
        None => ContentKind::from_path(path)?,
    };

    let bytes = tokio::fs::read(path)
        .await
        .map_err(|e| DocumentError::Read {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;

    debug!(path = %path.display(), kind = kind.mime(), bytes = bytes.len(), "Extracting document text");

    let text = extract_text(kind, &bytes)?;
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    Ok(LoadedDocument { name, kind, text })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mime_resolution() {
        assert_eq!(ContentKind::from_mime("text/plain").unwrap(), ContentKind::PlainText);
        assert_eq!(
            ContentKind::from_mime("Text/Plain; charset=utf-8").unwrap(),
            ContentKind::PlainText
        );
        assert_eq!(ContentKind::from_mime("application/pdf").unwrap(), ContentKind::Pdf);
    }

    #[test]
    fn unsupported_mime_is_rejected() {
        let err = ContentKind::from_mime("image/png").unwrap_err();
        assert!(matches!(err, DocumentError::UnsupportedContentType(ref t) if t == "image/png"));
    }

    #[test]
    fn extension_resolution() {
        assert_eq!(ContentKind::from_path(Path::new("notes.TXT")).unwrap(), ContentKind::PlainText);
        assert_eq!(ContentKind::from_path(Path::new("/tmp/paper.pdf")).unwrap(), ContentKind::Pdf);
        assert!(ContentKind::from_path(Path::new("report.docx")).is_err());
        assert!(ContentKind::from_path(Path::new("README")).is_err());
    }

    #[tokio::test]
    async fn load_text_document_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        std::fs::write(&path, "héllo from disk").unwrap();

        let doc = load_document(&path, None).await.unwrap();
        assert_eq!(doc.name, "notes.txt");
        assert_eq!(doc.kind, ContentKind::PlainText);
        assert_eq!(doc.text, "héllo from disk");
    }

    #[tokio::test]
    async fn declared_type_wins_over_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.pdf");
        std::fs::write(&path, "actually text").unwrap();

        let doc = load_document(&path, Some("text/plain")).await.unwrap();
        assert_eq!(doc.text, "actually text");
    }

    #[tokio::test]
    async fn missing_file_is_read_error() {
        let err = load_document(Path::new("/nonexistent/notes.txt"), None)
            .await
            .unwrap_err();
        assert!(matches!(err, DocumentError::Read { .. }));
    }
}
