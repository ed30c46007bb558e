//! Text Extractor: turns an uploaded PDF into the plain-text resume consumed by every prompt.

use bytes::Bytes;
use thiserror::Error;
use tracing::{debug, warn};

const PDF_MAGIC: &[u8] = b"%PDF-";
/// Readers accept junk before the header as long as it appears this early.
const HEADER_SEARCH_WINDOW: usize = 1024;

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("the uploaded file is empty")]
    Empty,

    #[error("the uploaded file is not a PDF document")]
    NotPdf,

    #[error("the PDF could not be parsed: {0}")]
    Unreadable(String),

    #[error("the PDF is corrupted or uses unsupported features")]
    Corrupted,
}

/// Extracts the text of every page, in page order.
///
/// Blank or garbled output is returned as-is: a scanned resume yields little
/// text, which degrades the analysis but is not an extraction failure.
pub fn extract_text(pdf: &[u8]) -> Result<String, ExtractionError> {
    if pdf.is_empty() {
        return Err(ExtractionError::Empty);
    }
    let start = header_offset(pdf).ok_or(ExtractionError::NotPdf)?;
    if start > 0 {
        debug!("Skipping {start} bytes before the PDF header");
    }
    let pdf = &pdf[start..];

    let text = pdf_extract::extract_text_from_mem(pdf)
        .map_err(|e| ExtractionError::Unreadable(e.to_string()))?;

    debug!("Extracted {} chars from {} byte PDF", text.len(), pdf.len());
    Ok(text)
}

/// Position of the `%PDF-` header within the first kilobyte.
fn header_offset(pdf: &[u8]) -> Option<usize> {
    let window = &pdf[..pdf.len().min(HEADER_SEARCH_WINDOW)];
    window
        .windows(PDF_MAGIC.len())
        .position(|w| w == PDF_MAGIC)
}

/// Runs [`extract_text`] on the blocking pool.
/// The parser panics on some malformed inputs; that surfaces as `Corrupted`.
pub async fn extract(pdf: Bytes) -> Result<String, ExtractionError> {
    match tokio::task::spawn_blocking(move || extract_text(&pdf)).await {
        Ok(result) => result,
        Err(join_err) => {
            warn!("PDF extraction task failed: {join_err}");
            Err(ExtractionError::Corrupted)
        }
    }
}
