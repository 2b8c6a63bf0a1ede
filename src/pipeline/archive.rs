//! Archive packaging: bundle category documents into one deflate ZIP.
//!
//! The archive is assembled entirely in memory — batches are user-driven
//! one-off uploads, and the caller decides whether the bytes go to disk,
//! an HTTP response, or a test assertion.

use crate::error::LabelSortError;
use crate::pipeline::compose::CategoryDocument;
use once_cell::sync::Lazy;
use regex::Regex;
use std::io::{Cursor, Write};
use tracing::info;
use zip::write::SimpleFileOptions;

/// Characters that must not appear in an archive entry name: path
/// separators, the characters Windows forbids in filenames, and control
/// characters.
static UNSAFE_ENTRY_CHARS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"[/\\:*?"<>|\x00-\x1f]+"#).expect("valid regex"));

/// Turn a category name into a safe `<name>.pdf` archive entry name.
///
/// Category names come from a deployment-edited rule table, so they are
/// trusted-ish — but a name like `A/B` would otherwise produce a nested
/// path inside the archive, and extraction tools treat that inconsistently.
pub fn entry_name(category: &str) -> String {
    let cleaned = UNSAFE_ENTRY_CHARS.replace_all(category, "_");
    let cleaned = cleaned.trim();
    if cleaned.is_empty() {
        "category.pdf".to_string()
    } else {
        format!("{cleaned}.pdf")
    }
}

/// Package the category documents into a deflate-compressed ZIP.
///
/// Entries appear in the given (first-encounter) order. The caller
/// guarantees `documents` is non-empty; an empty batch never reaches this
/// stage.
pub fn build_archive(documents: &[CategoryDocument]) -> Result<Vec<u8>, LabelSortError> {
    let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);

    for document in documents {
        let name = entry_name(&document.name);
        writer
            .start_file(&name, options)
            .map_err(|e| LabelSortError::ArchiveFailed(format!("entry '{name}': {e}")))?;
        writer
            .write_all(&document.bytes)
            .map_err(|e| LabelSortError::ArchiveFailed(format!("entry '{name}': {e}")))?;
    }

    let cursor = writer
        .finish()
        .map_err(|e| LabelSortError::ArchiveFailed(e.to_string()))?;
    let bytes = cursor.into_inner();

    info!(
        "Archive assembled: {} entries, {} bytes",
        documents.len(),
        bytes.len()
    );
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(name: &str, bytes: &[u8]) -> CategoryDocument {
        CategoryDocument {
            name: name.to_string(),
            pages: 1,
            bytes: bytes.to_vec(),
        }
    }

    #[test]
    fn entry_names() {
        assert_eq!(entry_name("Black"), "Black.pdf");
        assert_eq!(entry_name("Case Black"), "Case Black.pdf");
        assert_eq!(entry_name("A/B"), "A_B.pdf");
        assert_eq!(entry_name("..\\evil"), ".._evil.pdf");
        assert_eq!(entry_name(""), "category.pdf");
    }

    #[test]
    fn archive_round_trip_preserves_order_and_bytes() {
        let docs = vec![
            doc("Black", b"%PDF-black"),
            doc("Mix", b"%PDF-mix"),
            doc("Case Black", b"%PDF-case-black"),
        ];
        let bytes = build_archive(&docs).unwrap();

        let mut zip = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
        let names: Vec<String> = zip.file_names().map(str::to_string).collect();
        assert_eq!(names, vec!["Black.pdf", "Mix.pdf", "Case Black.pdf"]);

        use std::io::Read;
        let mut contents = String::new();
        zip.by_name("Mix.pdf")
            .unwrap()
            .read_to_string(&mut contents)
            .unwrap();
        assert_eq!(contents, "%PDF-mix");
    }

    #[test]
    fn entries_are_deflate_compressed() {
        let docs = vec![doc("Black", &[0u8; 8192])];
        let bytes = build_archive(&docs).unwrap();

        let mut zip = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
        let entry = zip.by_index(0).unwrap();
        assert_eq!(entry.compression(), zip::CompressionMethod::Deflated);
        assert!(entry.compressed_size() < entry.size());
    }
}
