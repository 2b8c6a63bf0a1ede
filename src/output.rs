//! Output types returned by the processing entry points.

use serde::Serialize;

/// Result of processing one batch of manifests.
///
/// `archive` is `Some` whenever the batch contained at least one page —
/// every page lands in *some* category (the fallback bucket catches the
/// rest), so the only empty outcome is a batch with zero pages overall.
/// That case is not an error; it is reported here as `archive: None` and
/// surfaced by the CLI as a warning instead of a download.
#[derive(Debug, Clone, Serialize)]
pub struct ProcessOutput {
    /// The deflate-compressed ZIP archive, one `<Category>.pdf` entry per
    /// non-empty category. `None` when the batch contained no pages.
    ///
    /// Skipped during serialisation — `--json` consumers want the summary,
    /// not megabytes of base-ten byte arrays.
    #[serde(skip)]
    pub archive: Option<Vec<u8>>,

    /// Non-empty categories in first-encounter order, with page counts.
    pub categories: Vec<CategorySummary>,

    /// Batch statistics.
    pub stats: ProcessStats,
}

impl ProcessOutput {
    /// True when the batch produced no archive (zero pages in, zero out).
    pub fn is_empty(&self) -> bool {
        self.archive.is_none()
    }
}

/// One non-empty category in the processed batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategorySummary {
    /// Category name; also the archive entry stem (`<name>.pdf`).
    pub name: String,
    /// Number of label pages in this category's output document.
    pub pages: usize,
}

/// Statistics for one processing run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ProcessStats {
    /// Number of source documents in the batch.
    pub documents: usize,
    /// Total pages across all source documents.
    pub total_pages: usize,
    /// Pages assigned by a configured rule.
    pub matched_pages: usize,
    /// Pages that matched no rule and fell through to the fallback bucket.
    pub fallback_pages: usize,
    /// Number of non-empty categories (= archive entries).
    pub categories: usize,
    /// Size of the finished archive in bytes (0 for an empty batch).
    pub archive_bytes: u64,
    /// Wall-clock duration of the whole run in milliseconds.
    pub total_duration_ms: u64,
    /// Time spent extracting page text, in milliseconds.
    pub extract_duration_ms: u64,
    /// Time spent rendering and composing label documents, in milliseconds.
    pub compose_duration_ms: u64,
}

/// One page's classification, as reported by
/// [`classify_only`](crate::process::classify_only).
///
/// `document` and `page` are zero-based; `input` is the caller-supplied
/// path or URL the page came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClassifiedPage {
    pub input: String,
    pub document: usize,
    pub page: usize,
    pub category: String,
}
