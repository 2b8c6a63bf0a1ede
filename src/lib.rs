//! # labelsort
//!
//! Sort PDF shipping manifests into label categories and reformat every page
//! for a 3×5-inch thermal printer.
//!
//! ## Why this crate?
//!
//! Warehouse manifests arrive as mixed multi-page PDFs: one page per parcel,
//! products interleaved in whatever order the storefront exported them.
//! Printing them raw wastes label stock and forces manual sorting at the
//! packing bench. This crate classifies each page by keyword rules over its
//! extracted text, crops the label region out of the page, rescales it onto
//! a 3in×5in page sized for thermal label printers, and hands back one PDF
//! per product category, bundled into a single ZIP.
//!
//! ## Pipeline Overview
//!
//! ```text
//! PDFs
//!  │
//!  ├─ 1. Input     resolve local files or download from URLs
//!  ├─ 2. Extract   lowercase plain text per page via pdfium (spawn_blocking)
//!  ├─ 3. Classify  ordered keyword rules, first match wins, "Mix" fallback
//!  ├─ 4. Compose   crop 3.4in×5.5in capture → letterbox onto 3in×5in page
//!  └─ 5. Archive   one <Category>.pdf per non-empty category, deflate ZIP
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use labelsort::{process, ProcessConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ProcessConfig::default();
//!     let output = process(&["manifest-a.pdf", "manifest-b.pdf"], &config).await?;
//!     match output.archive {
//!         Some(bytes) => std::fs::write("processed_labels.zip", bytes)?,
//!         None => eprintln!("no pages found in the uploaded manifests"),
//!     }
//!     for cat in &output.categories {
//!         eprintln!("{}: {} labels", cat.name, cat.pages);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Classification Rules
//!
//! Rules are an **ordered** table; keyword sets overlap on purpose and the
//! first matching rule wins, so order is part of the contract. The built-in
//! table ships eighteen categories for a small-electronics operation;
//! deployments load their own as a JSON array via
//! [`RuleSet::from_json_file`]:
//!
//! ```json
//! [
//!   { "name": "Black", "include": ["black", "maverix"], "exclude": ["case"] },
//!   { "name": "Case Black", "include": ["case", "black"], "all_required": true }
//! ]
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `labelsort` binary (clap + anyhow + tracing-subscriber) |
//!
//! Disable `cli` when using only the library to avoid pulling in CLI-only deps:
//! ```toml
//! labelsort = { version = "0.2", default-features = false }
//! ```
//!
//! ## Runtime requirement
//!
//! pdfium is loaded as a shared library at runtime. Install libpdfium on the
//! system library path, set `PDFIUM_LIB_PATH=/path/to/dir`, or drop the
//! library next to the binary.

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod process;
pub mod progress;
pub mod rules;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{ProcessConfig, ProcessConfigBuilder};
pub use error::LabelSortError;
pub use output::{CategorySummary, ClassifiedPage, ProcessOutput, ProcessStats};
pub use pipeline::classify::{classify_page, ClassifiedBatch, PageRef};
pub use pipeline::compose::{FitRect, LabelGeometry, POINTS_PER_INCH};
pub use process::{classify_only, process, process_from_bytes, process_sync, process_to_file};
pub use progress::{BatchProgressCallback, NoopProgressCallback, ProgressCallback};
pub use rules::{CategoryRule, RuleSet, FALLBACK_CATEGORY};
