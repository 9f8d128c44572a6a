//! PDF uploads.
//!
//! Text is pulled from every page in document order with `lopdf` and the
//! pages are concatenated with no separator. A page that yields no text is
//! an error rather than a silent gap.

use gchat_core::error::DocumentError;
use lopdf::Document;
use tracing::{debug, warn};

/// Extract the text of every page, in order.
pub fn extract_pages(bytes: &[u8]) -> Result<String, DocumentError> {
    let doc = Document::load_mem(bytes)
        .map_err(|e| DocumentError::Extraction(format!("malformed PDF: {e}")))?;

    let pages = doc.get_pages();
    if pages.is_empty() {
        return Err(DocumentError::Extraction("document has no pages".into()));
    }

    let mut text = String::new();
    for &page_number in pages.keys() {
        let page_text = doc.extract_text(&[page_number]).map_err(|e| {
            DocumentError::Extraction(format!("page {page_number}: {e}"))
        })?;

        if page_text.trim().is_empty() {
            warn!(page = page_number, "PDF page has no extractable text");
            return Err(DocumentError::Extraction(format!(
                "page {page_number} yielded no extractable text"
            )));
        }

        // lopdf ends every page with a line break of its own.
        text.push_str(page_text.strip_suffix('\n').unwrap_or(&page_text));
    }

    debug!(pages = pages.len(), chars = text.len(), "Extracted PDF text");
    Ok(text)
}
