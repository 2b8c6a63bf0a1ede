//! Pipeline stages for manifest-to-label processing.
//!
//! Each submodule implements exactly one transformation step.
//! Keeping stages separate makes each independently testable and lets us
//! swap implementations (e.g. switch rendering backend) without touching
//! other stages.
//!
//! ## Data Flow
//!
//! ```text
//! input ──▶ extract ──▶ classify ──▶ compose ──▶ archive
//! (URL/path) (pdfium)   (rule scan)  (3×5 page)   (zip)
//! ```
//!
//! 1. [`input`]    — canonicalise user-supplied paths or URLs to local files
//! 2. [`extract`]  — pull lowercase plain text per page; runs in
//!    `spawn_blocking` because pdfium is not async-safe
//! 3. [`classify`] — assign each page to the first matching category rule
//! 4. [`compose`]  — crop, rescale and centre each page onto a fixed-size
//!    label page, one output document per category
//! 5. [`archive`]  — package the category documents into one deflate ZIP

pub mod archive;
pub mod classify;
pub mod compose;
pub mod extract;
pub mod input;

use crate::error::LabelSortError;
use pdfium_render::prelude::*;

/// Bind to the pdfium shared library.
///
/// Resolution order: an explicit `PDFIUM_LIB_PATH` environment variable,
/// the directory of the running executable, then the system library path.
pub(crate) fn bind_pdfium() -> Result<Pdfium, LabelSortError> {
    if let Ok(dir) = std::env::var("PDFIUM_LIB_PATH") {
        if !dir.is_empty() {
            let bindings =
                Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path(&dir))
                    .map_err(|e| {
                        LabelSortError::PdfiumBindingFailed(format!(
                            "PDFIUM_LIB_PATH={dir}: {e:?}"
                        ))
                    })?;
            return Ok(Pdfium::new(bindings));
        }
    }

    let exe_dir = std::env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(|d| d.to_path_buf()));

    let bindings = exe_dir
        .and_then(|dir| {
            Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path(&dir)).ok()
        })
        .map_or_else(Pdfium::bind_to_system_library, Ok)
        .map_err(|e| LabelSortError::PdfiumBindingFailed(format!("{e:?}")))?;

    Ok(Pdfium::new(bindings))
}
