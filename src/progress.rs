//! Progress-callback trait for per-page batch events.
//!
//! Inject an [`Arc<dyn BatchProgressCallback>`] via
//! [`crate::config::ProcessConfigBuilder::progress_callback`] to receive
//! events as the pipeline classifies pages and composes category documents.
//!
//! # Why callbacks instead of channels?
//!
//! The callback approach is the least-invasive integration point: callers can
//! forward events to a channel, a job-status row, or a terminal progress bar
//! without the library knowing how the host application communicates. The
//! trait is `Send + Sync` because composition runs on a blocking worker
//! thread, not the caller's task.

use std::sync::Arc;

/// Called by the processing pipeline as it works through a batch.
///
/// All methods have default no-op implementations so callers only override
/// what they care about. Events fire strictly in batch order: every
/// `on_page_classified` for a document precedes the next document's, and all
/// classification events precede the first `on_category_composed`.
pub trait BatchProgressCallback: Send + Sync {
    /// Called once after inputs are resolved, before any page is read.
    ///
    /// # Arguments
    /// * `documents` — number of source documents in the batch
    fn on_batch_start(&self, documents: usize) {
        let _ = documents;
    }

    /// Called when a page has been assigned to a category.
    ///
    /// # Arguments
    /// * `document` — zero-based index of the source document
    /// * `page`     — zero-based page index within that document
    /// * `category` — name of the assigned category (may be the fallback)
    fn on_page_classified(&self, document: usize, page: usize, category: &str) {
        let _ = (document, page, category);
    }

    /// Called when one category's label document has been composed.
    ///
    /// # Arguments
    /// * `category` — category name
    /// * `pages`    — number of label pages in the finished document
    fn on_category_composed(&self, category: &str, pages: usize) {
        let _ = (category, pages);
    }

    /// Called once after the archive is assembled (or skipped, for an empty
    /// batch).
    ///
    /// # Arguments
    /// * `categories` — number of non-empty categories
    /// * `pages`      — total pages across all categories
    fn on_batch_complete(&self, categories: usize, pages: usize) {
        let _ = (categories, pages);
    }
}

/// A no-op implementation for callers that don't need progress events.
pub struct NoopProgressCallback;

impl BatchProgressCallback for NoopProgressCallback {}

/// Convenience alias matching the type stored in [`crate::config::ProcessConfig`].
pub type ProgressCallback = Arc<dyn BatchProgressCallback>;
