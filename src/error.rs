//! Error types for the labelsort library.
//!
//! A single fatal error type, [`LabelSortError`], covers every failure mode.
//! Batch processing is deliberately fail-fast: a manifest page that cannot be
//! read or re-embedded aborts the whole run rather than producing a partial
//! archive. Shipping labels are printed and stuck onto parcels as a set — an
//! archive silently missing a category is worse than no archive at all, so
//! callers are never handed partial output.
//!
//! The one recoverable condition — a batch that contained no pages at all —
//! is not an error. It surfaces as [`crate::output::ProcessOutput`] with no
//! archive, which the CLI reports as a warning.

use std::path::PathBuf;
use thiserror::Error;

/// All errors returned by the labelsort library.
#[derive(Debug, Error)]
pub enum LabelSortError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// Input file was not found at the given path.
    #[error("Manifest not found: '{path}'\nCheck the path exists and is readable.")]
    FileNotFound { path: PathBuf },

    /// Process does not have read permission on the file.
    #[error("Permission denied reading '{path}'\nTry: chmod +r {path:?}")]
    PermissionDenied { path: PathBuf },

    /// The input string is not a valid file path or URL.
    #[error("Invalid input '{input}': not a file path or a valid HTTP/HTTPS URL")]
    InvalidInput { input: String },

    /// HTTP URL was syntactically valid but download failed.
    #[error("Failed to download '{url}': {reason}\nCheck your internet connection.")]
    DownloadFailed { url: String, reason: String },

    /// Download exceeded the configured timeout.
    #[error("Download timed out after {secs}s for '{url}'\nIncrease --download-timeout.")]
    DownloadTimeout { url: String, secs: u64 },

    /// The file exists and was read, but is not a PDF.
    #[error("File is not a valid PDF: '{path}'\nFirst bytes: {magic:?}")]
    NotAPdf { path: PathBuf, magic: [u8; 4] },

    // ── PDF errors ────────────────────────────────────────────────────────
    /// PDF header/trailer/xref is corrupt and cannot be parsed.
    #[error("PDF '{path}' is corrupt: {detail}\nTry repairing with: qpdf --decrypt input.pdf output.pdf")]
    CorruptPdf { path: PathBuf, detail: String },

    /// Plain text could not be extracted from a page; the batch is aborted.
    #[error("Text extraction failed on page {page} of '{path}': {detail}")]
    TextExtractionFailed {
        path: PathBuf,
        page: usize,
        detail: String,
    },

    /// A classified page could not be rendered into its category document.
    #[error("Failed to embed page {page} into the '{category}' label document: {detail}")]
    PageEmbedFailed {
        category: String,
        page: usize,
        detail: String,
    },

    /// A finished category document could not be serialised to bytes.
    #[error("Failed to write the '{category}' label document: {detail}")]
    CategorySaveFailed { category: String, detail: String },

    // ── Rule errors ───────────────────────────────────────────────────────
    /// A rule file could not be parsed or failed validation.
    #[error("Invalid rule file '{path}': {detail}")]
    InvalidRuleFile { path: PathBuf, detail: String },

    /// A rule table failed validation (empty table, rule without keywords, …).
    #[error("Invalid rule table: {0}")]
    InvalidRules(String),

    // ── Archive / I/O errors ──────────────────────────────────────────────
    /// The ZIP archive could not be assembled.
    #[error("Failed to assemble label archive: {0}")]
    ArchiveFailed(String),

    /// Could not create or write the output archive file.
    #[error("Failed to write output file '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Pdfium binding errors ─────────────────────────────────────────────
    /// Could not bind to a pdfium library.
    #[error(
        "Failed to bind to pdfium library: {0}\n\n\
labelsort needs the PDFium shared library at runtime. You can:\n\
  • Install libpdfium and make sure it is on the system library path.\n\
  • Set PDFIUM_LIB_PATH=/path/to/libpdfium to use an existing copy.\n\
  • Place libpdfium next to the labelsort binary.\n"
    )]
    PdfiumBindingFailed(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extraction_display_names_page_and_path() {
        let e = LabelSortError::TextExtractionFailed {
            path: PathBuf::from("manifest.pdf"),
            page: 7,
            detail: "bad content stream".into(),
        };
        let msg = e.to_string();
        assert!(msg.contains("page 7"), "got: {msg}");
        assert!(msg.contains("manifest.pdf"), "got: {msg}");
    }

    #[test]
    fn embed_display_names_category() {
        let e = LabelSortError::PageEmbedFailed {
            category: "Case Black".into(),
            page: 2,
            detail: "render failed".into(),
        };
        assert!(e.to_string().contains("Case Black"));
        assert!(e.to_string().contains("page 2"));
    }

    #[test]
    fn download_timeout_display() {
        let e = LabelSortError::DownloadTimeout {
            url: "https://example.com/m.pdf".into(),
            secs: 30,
        };
        assert!(e.to_string().contains("30s"));
        assert!(e.to_string().contains("example.com"));
    }

    #[test]
    fn invalid_rules_display() {
        let e = LabelSortError::InvalidRules("rule 'Black' has no include keywords".into());
        assert!(e.to_string().contains("Black"));
    }
}
