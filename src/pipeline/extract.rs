//! Text extraction: pull lowercase plain text from every page via pdfium.
//!
//! ## Why spawn_blocking?
//!
//! The `pdfium-render` crate wraps the pdfium C++ library, which uses
//! thread-local state internally and is not safe to call from async contexts.
//! `tokio::task::spawn_blocking` moves the work onto a dedicated thread pool
//! thread designed for blocking operations, preventing the Tokio worker
//! threads from stalling during CPU-heavy extraction.
//!
//! Text is case-folded here, once per page, so the classifier can run plain
//! substring checks against lowercase keywords without re-folding per rule.

use crate::error::LabelSortError;
use pdfium_render::prelude::*;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Extracted text for one source document.
pub struct DocumentText {
    /// Path the document was read from (local or downloaded temp file).
    pub path: PathBuf,
    /// Lowercase plain text per page, index-aligned with page numbers.
    pub pages: Vec<String>,
}

impl DocumentText {
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }
}

/// Extract lowercase page text from every document in the batch.
///
/// Documents are processed strictly in the given order; the returned vector
/// is index-aligned with `paths`. Any page that fails text extraction aborts
/// the whole batch ([`LabelSortError::TextExtractionFailed`]) — no partial
/// results are produced.
pub async fn extract_batch_text(paths: &[PathBuf]) -> Result<Vec<DocumentText>, LabelSortError> {
    let paths = paths.to_vec();

    tokio::task::spawn_blocking(move || extract_batch_text_blocking(&paths))
        .await
        .map_err(|e| LabelSortError::Internal(format!("Extraction task panicked: {}", e)))?
}

/// Blocking implementation of batch text extraction.
fn extract_batch_text_blocking(paths: &[PathBuf]) -> Result<Vec<DocumentText>, LabelSortError> {
    let pdfium = super::bind_pdfium()?;

    let mut documents = Vec::with_capacity(paths.len());
    for path in paths {
        documents.push(extract_document_text(&pdfium, path)?);
    }
    Ok(documents)
}

fn extract_document_text(pdfium: &Pdfium, path: &Path) -> Result<DocumentText, LabelSortError> {
    let document =
        pdfium
            .load_pdf_from_file(path, None)
            .map_err(|e| LabelSortError::CorruptPdf {
                path: path.to_path_buf(),
                detail: format!("{:?}", e),
            })?;

    let pages = document.pages();
    let page_count = pages.len() as usize;
    info!("Manifest loaded: {} ({} pages)", path.display(), page_count);

    let mut texts = Vec::with_capacity(page_count);
    for index in 0..page_count {
        let page = pages
            .get(index as u16)
            .map_err(|e| LabelSortError::TextExtractionFailed {
                path: path.to_path_buf(),
                page: index,
                detail: format!("{:?}", e),
            })?;

        let text = page
            .text()
            .map_err(|e| LabelSortError::TextExtractionFailed {
                path: path.to_path_buf(),
                page: index,
                detail: format!("{:?}", e),
            })?
            .all()
            .to_lowercase();

        debug!("Extracted page {} → {} chars", index, text.len());
        texts.push(text);
    }

    Ok(DocumentText {
        path: path.to_path_buf(),
        pages: texts,
    })
}
