//! Batch processing entry points.
//!
//! One invocation = one batch: resolve inputs, extract text, classify every
//! page, compose one label document per category, package the archive.
//! Everything is sequential and fail-fast — any extraction or embed fault
//! aborts the run, and no partial archive is ever returned. The only
//! gracefully degraded case is a batch with zero pages, which yields
//! [`ProcessOutput`] with no archive instead of an error.

use crate::config::ProcessConfig;
use crate::error::LabelSortError;
use crate::output::{CategorySummary, ClassifiedPage, ProcessOutput, ProcessStats};
use crate::pipeline::{archive, classify, compose, extract, input};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{info, warn};

/// Process a batch of PDF manifests into a label archive.
///
/// This is the primary entry point for the library.
///
/// # Arguments
/// * `inputs` — Local file paths or HTTP/HTTPS URLs, in upload order
/// * `config` — Processing configuration
///
/// # Returns
/// `Ok(ProcessOutput)` with the finished archive, or with `archive: None`
/// when the batch contained no pages at all.
///
/// # Errors
/// Any failure — unreadable input, corrupt PDF, text extraction fault,
/// render/embed fault, archive assembly — aborts the whole batch.
pub async fn process<S: AsRef<str>>(
    inputs: &[S],
    config: &ProcessConfig,
) -> Result<ProcessOutput, LabelSortError> {
    let total_start = Instant::now();
    let inputs: Vec<String> = inputs.iter().map(|s| s.as_ref().to_string()).collect();
    info!("Starting batch: {} input(s)", inputs.len());

    // ── Step 1: Resolve inputs ───────────────────────────────────────────
    let resolved = input::resolve_inputs(&inputs, config.download_timeout_secs).await?;
    let paths: Vec<PathBuf> = resolved.iter().map(|r| r.path().to_path_buf()).collect();

    if let Some(ref cb) = config.progress_callback {
        cb.on_batch_start(paths.len());
    }

    // ── Step 2: Extract page text ────────────────────────────────────────
    let extract_start = Instant::now();
    let documents = extract::extract_batch_text(&paths).await?;
    let extract_duration_ms = extract_start.elapsed().as_millis() as u64;
    let total_pages: usize = documents.iter().map(|d| d.page_count()).sum();
    info!(
        "Extracted {} pages from {} documents in {}ms",
        total_pages,
        documents.len(),
        extract_duration_ms
    );

    // ── Step 3: Classify ─────────────────────────────────────────────────
    let batch = classify::classify_batch(&documents, &config.rules, |page_ref, category| {
        if let Some(ref cb) = config.progress_callback {
            cb.on_page_classified(page_ref.document, page_ref.page, category);
        }
    });

    let fallback_pages = batch
        .buckets()
        .iter()
        .find(|(name, _)| name == config.rules.fallback())
        .map_or(0, |(_, pages)| pages.len());

    // ── Step 4: Empty batch degrades to a warning, not an error ──────────
    if batch.is_empty() {
        warn!("Batch contained no pages; no archive produced");
        if let Some(ref cb) = config.progress_callback {
            cb.on_batch_complete(0, 0);
        }
        return Ok(ProcessOutput {
            archive: None,
            categories: Vec::new(),
            stats: ProcessStats {
                documents: documents.len(),
                extract_duration_ms,
                total_duration_ms: total_start.elapsed().as_millis() as u64,
                ..Default::default()
            },
        });
    }

    // ── Step 5: Compose one label document per category ──────────────────
    let compose_start = Instant::now();
    let category_docs = compose::compose_categories(&paths, batch.buckets(), config).await?;
    let compose_duration_ms = compose_start.elapsed().as_millis() as u64;

    // ── Step 6: Package the archive ──────────────────────────────────────
    let archive_bytes = archive::build_archive(&category_docs)?;

    let categories: Vec<CategorySummary> = category_docs
        .iter()
        .map(|d| CategorySummary {
            name: d.name.clone(),
            pages: d.pages,
        })
        .collect();

    let stats = ProcessStats {
        documents: documents.len(),
        total_pages,
        matched_pages: total_pages - fallback_pages,
        fallback_pages,
        categories: categories.len(),
        archive_bytes: archive_bytes.len() as u64,
        total_duration_ms: total_start.elapsed().as_millis() as u64,
        extract_duration_ms,
        compose_duration_ms,
    };

    info!(
        "Batch complete: {} pages into {} categories, {}ms total",
        total_pages, stats.categories, stats.total_duration_ms
    );

    if let Some(ref cb) = config.progress_callback {
        cb.on_batch_complete(stats.categories, total_pages);
    }

    Ok(ProcessOutput {
        archive: Some(archive_bytes),
        categories,
        stats,
    })
}

/// Process a batch and write the archive directly to a file.
///
/// Uses atomic write (temp file + rename) to prevent partial files. When
/// the batch is empty no file is written; check
/// [`ProcessOutput::is_empty`] on the returned value.
pub async fn process_to_file<S: AsRef<str>>(
    inputs: &[S],
    output_path: impl AsRef<Path>,
    config: &ProcessConfig,
) -> Result<ProcessOutput, LabelSortError> {
    let output = process(inputs, config).await?;
    let path = output_path.as_ref();

    let Some(ref bytes) = output.archive else {
        return Ok(output);
    };

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                LabelSortError::OutputWriteFailed {
                    path: path.to_path_buf(),
                    source: e,
                }
            })?;
        }
    }

    let tmp_path = path.with_extension("zip.tmp");
    tokio::fs::write(&tmp_path, bytes)
        .await
        .map_err(|e| LabelSortError::OutputWriteFailed {
            path: path.to_path_buf(),
            source: e,
        })?;

    tokio::fs::rename(&tmp_path, path)
        .await
        .map_err(|e| LabelSortError::OutputWriteFailed {
            path: path.to_path_buf(),
            source: e,
        })?;

    Ok(output)
}

/// Process PDF batches supplied as in-memory byte buffers.
///
/// Each buffer is written to a managed [`tempfile`] that is cleaned up
/// automatically on return or panic. This is the natural API when manifest
/// data arrives from an upload handler or a database rather than a file on
/// disk.
pub async fn process_from_bytes(
    batches: &[Vec<u8>],
    config: &ProcessConfig,
) -> Result<ProcessOutput, LabelSortError> {
    let mut files = Vec::with_capacity(batches.len());
    let mut inputs = Vec::with_capacity(batches.len());

    for bytes in batches {
        let mut tmp = tempfile::Builder::new()
            .suffix(".pdf")
            .tempfile()
            .map_err(|e| LabelSortError::Internal(format!("tempfile: {e}")))?;
        tmp.write_all(bytes)
            .map_err(|e| LabelSortError::Internal(format!("tempfile write: {e}")))?;
        inputs.push(tmp.path().to_string_lossy().to_string());
        files.push(tmp);
    }

    // `files` is dropped (and the temp files deleted) when `process` returns
    process(&inputs, config).await
}

/// Synchronous wrapper around [`process`].
///
/// Creates a temporary tokio runtime internally.
pub fn process_sync<S: AsRef<str>>(
    inputs: &[S],
    config: &ProcessConfig,
) -> Result<ProcessOutput, LabelSortError> {
    tokio::runtime::Runtime::new()
        .map_err(|e| LabelSortError::Internal(format!("Failed to create tokio runtime: {}", e)))?
        .block_on(process(inputs, config))
}

/// Classify a batch without composing any label documents.
///
/// Resolves and extracts like [`process`], then stops after classification,
/// returning one [`ClassifiedPage`] per page in batch order. Useful for
/// checking what a rule change does to real manifests before printing
/// anything.
pub async fn classify_only<S: AsRef<str>>(
    inputs: &[S],
    config: &ProcessConfig,
) -> Result<Vec<ClassifiedPage>, LabelSortError> {
    let inputs: Vec<String> = inputs.iter().map(|s| s.as_ref().to_string()).collect();

    let resolved = input::resolve_inputs(&inputs, config.download_timeout_secs).await?;
    let paths: Vec<PathBuf> = resolved.iter().map(|r| r.path().to_path_buf()).collect();
    let documents = extract::extract_batch_text(&paths).await?;

    let mut pages = Vec::new();
    classify::classify_batch(&documents, &config.rules, |page_ref, category| {
        pages.push(ClassifiedPage {
            input: inputs[page_ref.document].clone(),
            document: page_ref.document,
            page: page_ref.page,
            category: category.to_string(),
        });
    });

    Ok(pages)
}
