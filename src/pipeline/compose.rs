//! Label composition: crop, rescale and centre each classified page onto a
//! fixed-size thermal-label page.
//!
//! ## Geometry
//!
//! A fixed capture region — wider and taller than the output label — is cut
//! from each source page: horizontally centred, anchored to the top edge.
//! The region is deliberately not clamped to the page bounds; a narrow
//! source page simply yields blank margins inside the capture. The captured
//! content is then scaled to fit the output page without distorting its
//! aspect ratio, letterboxing whichever axis is left over, and centred.
//!
//! ## Why rasterise instead of re-embedding vector content?
//!
//! pdfium cannot place a clipped region of one PDF page onto another as a
//! form object the way it renders to bitmaps. Rasterising the capture region
//! at label-printer DPI and embedding the bitmap gives pixel-identical
//! output on every printer driver, at the cost of larger files — acceptable
//! for 3×5 labels that exist to be printed once.

use crate::config::ProcessConfig;
use crate::error::LabelSortError;
use crate::pipeline::classify::PageRef;
use crate::progress::ProgressCallback;
use image::{imageops, DynamicImage, Rgba, RgbaImage};
use pdfium_render::prelude::*;
use std::path::PathBuf;
use tracing::{debug, info};

/// PDF user-space units per inch.
pub const POINTS_PER_INCH: f32 = 72.0;

/// Output-page and capture-region dimensions, in points.
///
/// Kept as named configuration rather than inline constants so a deployment
/// with different label stock can swap the geometry in one place, and so the
/// fit arithmetic is independently testable.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LabelGeometry {
    /// Output page width.
    pub output_width: f32,
    /// Output page height.
    pub output_height: f32,
    /// Width of the region captured from each source page.
    pub capture_width: f32,
    /// Height of the region captured from each source page.
    pub capture_height: f32,
}

impl LabelGeometry {
    /// The stock geometry: a 3in×5in label fed from a 3.4in×5.5in capture.
    pub fn thermal_3x5() -> Self {
        Self {
            output_width: 3.0 * POINTS_PER_INCH,
            output_height: 5.0 * POINTS_PER_INCH,
            capture_width: 3.4 * POINTS_PER_INCH,
            capture_height: 5.5 * POINTS_PER_INCH,
        }
    }

    pub(crate) fn validate(&self) -> Result<(), String> {
        let dims = [
            ("output width", self.output_width),
            ("output height", self.output_height),
            ("capture width", self.capture_width),
            ("capture height", self.capture_height),
        ];
        for (name, value) in dims {
            if !value.is_finite() || value <= 0.0 {
                return Err(format!("label {name} must be positive, got {value}"));
            }
        }
        Ok(())
    }

    /// Left edge of the capture region on a source page of the given width.
    ///
    /// Negative when the source page is narrower than the capture region;
    /// the overhang is accepted as-is and renders as blank margin.
    pub fn capture_origin_x(&self, source_page_width: f32) -> f32 {
        (source_page_width - self.capture_width) / 2.0
    }

    /// Where the captured content lands on the output page.
    ///
    /// Scales the capture region to fit the output page while preserving its
    /// aspect ratio, then centres it on both axes. Whichever axis is not
    /// fully filled gets letterboxed, never stretched.
    pub fn fit(&self) -> FitRect {
        let source_aspect = self.capture_width / self.capture_height;
        let target_aspect = self.output_width / self.output_height;

        let (width, height) = if source_aspect > target_aspect {
            (self.output_width, self.output_width / source_aspect)
        } else {
            (self.output_height * source_aspect, self.output_height)
        };

        FitRect {
            x: (self.output_width - width) / 2.0,
            y: (self.output_height - height) / 2.0,
            width,
            height,
        }
    }
}

/// Destination rectangle on the output page, in points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FitRect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

/// One finished category document.
pub struct CategoryDocument {
    /// Category name; becomes the archive entry stem.
    pub name: String,
    /// Number of label pages in the document.
    pub pages: usize,
    /// The serialised PDF.
    pub bytes: Vec<u8>,
}

/// Compose one label document per category bucket.
///
/// Buckets are processed in the given (first-encounter) order, pages within
/// a bucket in classification order. Any page that cannot be rendered or
/// embedded aborts the batch; no partial documents are returned.
pub async fn compose_categories(
    paths: &[PathBuf],
    buckets: &[(String, Vec<PageRef>)],
    config: &ProcessConfig,
) -> Result<Vec<CategoryDocument>, LabelSortError> {
    let paths = paths.to_vec();
    let buckets = buckets.to_vec();
    let geometry = config.geometry;
    let dpi = config.dpi;
    let callback = config.progress_callback.clone();

    tokio::task::spawn_blocking(move || {
        compose_categories_blocking(&paths, &buckets, geometry, dpi, callback)
    })
    .await
    .map_err(|e| LabelSortError::Internal(format!("Compose task panicked: {}", e)))?
}

/// Blocking implementation of category composition.
fn compose_categories_blocking(
    paths: &[PathBuf],
    buckets: &[(String, Vec<PageRef>)],
    geometry: LabelGeometry,
    dpi: u32,
    callback: Option<ProgressCallback>,
) -> Result<Vec<CategoryDocument>, LabelSortError> {
    let pdfium = super::bind_pdfium()?;

    // Open every source document once up front; page refs index into this
    // list. Source documents are read-only throughout.
    let mut sources = Vec::with_capacity(paths.len());
    for path in paths {
        sources.push(pdfium.load_pdf_from_file(path, None).map_err(|e| {
            LabelSortError::CorruptPdf {
                path: path.to_path_buf(),
                detail: format!("{:?}", e),
            }
        })?);
    }

    let fit = geometry.fit();
    let mut documents = Vec::with_capacity(buckets.len());

    for (category, pages) in buckets {
        let embed_err = |page: usize, detail: String| LabelSortError::PageEmbedFailed {
            category: category.clone(),
            page,
            detail,
        };

        let mut output = pdfium
            .create_new_pdf()
            .map_err(|e| embed_err(0, format!("{:?}", e)))?;

        for page_ref in pages {
            let label =
                render_capture_region(&sources[page_ref.document], page_ref.page, geometry, dpi)
                    .map_err(|detail| embed_err(page_ref.page, detail))?;

            let mut page = output
                .pages_mut()
                .create_page_at_end(PdfPagePaperSize::Custom(
                    PdfPoints::new(geometry.output_width),
                    PdfPoints::new(geometry.output_height),
                ))
                .map_err(|e| embed_err(page_ref.page, format!("{:?}", e)))?;

            page.objects_mut()
                .create_image_object(
                    PdfPoints::new(fit.x),
                    PdfPoints::new(fit.y),
                    &label,
                    Some(PdfPoints::new(fit.width)),
                    Some(PdfPoints::new(fit.height)),
                )
                .map_err(|e| embed_err(page_ref.page, format!("{:?}", e)))?;
        }

        let bytes = output
            .save_to_bytes()
            .map_err(|e| LabelSortError::CategorySaveFailed {
                category: category.clone(),
                detail: format!("{:?}", e),
            })?;

        info!(
            "Composed '{}': {} labels, {} bytes",
            category,
            pages.len(),
            bytes.len()
        );
        if let Some(ref cb) = callback {
            cb.on_category_composed(category, pages.len());
        }

        documents.push(CategoryDocument {
            name: category.clone(),
            pages: pages.len(),
            bytes,
        });
    }

    Ok(documents)
}

/// Rasterise one source page's capture region onto a white canvas.
///
/// The page is rendered at `dpi`, then the capture rectangle — horizontally
/// centred, anchored to the top edge — is lifted onto a canvas of exactly
/// the capture region's pixel size. Where the region extends past the page
/// edge the canvas stays white; overlay clipping handles both the
/// narrower-than-capture and wider-than-capture cases without special
/// casing.
fn render_capture_region(
    document: &PdfDocument,
    page_index: usize,
    geometry: LabelGeometry,
    dpi: u32,
) -> Result<DynamicImage, String> {
    let page = document
        .pages()
        .get(page_index as u16)
        .map_err(|e| format!("{:?}", e))?;

    let scale = dpi as f32 / POINTS_PER_INCH;
    let page_width = page.width().value;

    let render_config =
        PdfRenderConfig::new().set_target_width((page_width * scale).round().max(1.0) as i32);
    let rendered = page
        .render_with_config(&render_config)
        .map_err(|e| format!("{:?}", e))?
        .as_image();

    let capture_px_w = (geometry.capture_width * scale).round().max(1.0) as u32;
    let capture_px_h = (geometry.capture_height * scale).round().max(1.0) as u32;
    let x_offset_px = (geometry.capture_origin_x(page_width) * scale).round() as i64;

    debug!(
        "Capture {}×{} px from page {} ({}×{} px, x offset {})",
        capture_px_w,
        capture_px_h,
        page_index,
        rendered.width(),
        rendered.height(),
        x_offset_px
    );

    let mut canvas = RgbaImage::from_pixel(capture_px_w, capture_px_h, Rgba([255, 255, 255, 255]));
    imageops::overlay(&mut canvas, &rendered.to_rgba8(), -x_offset_px, 0);

    Ok(DynamicImage::ImageRgba8(canvas))
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 1e-4;

    #[test]
    fn thermal_3x5_dimensions() {
        let g = LabelGeometry::thermal_3x5();
        assert_eq!(g.output_width, 216.0);
        assert_eq!(g.output_height, 360.0);
        assert!((g.capture_width - 244.8).abs() < EPSILON);
        assert_eq!(g.capture_height, 396.0);
    }

    #[test]
    fn stock_geometry_is_full_bleed_on_width() {
        // Capture aspect 244.8/396 ≈ 0.6182 exceeds target 216/360 = 0.6, so
        // the width axis fills completely and the height is letterboxed.
        let g = LabelGeometry::thermal_3x5();
        let fit = g.fit();

        assert_eq!(fit.width, g.output_width);
        assert!(fit.height < g.output_height);
        assert!((fit.x).abs() < EPSILON);
        assert!(fit.y > 0.0);
    }

    #[test]
    fn fit_preserves_capture_aspect() {
        let g = LabelGeometry::thermal_3x5();
        let fit = g.fit();
        let capture_aspect = g.capture_width / g.capture_height;
        assert!((fit.width / fit.height - capture_aspect).abs() < EPSILON);
    }

    #[test]
    fn fit_is_centred_on_both_axes() {
        let g = LabelGeometry::thermal_3x5();
        let fit = g.fit();
        assert!((fit.x * 2.0 + fit.width - g.output_width).abs() < EPSILON);
        assert!((fit.y * 2.0 + fit.height - g.output_height).abs() < EPSILON);
    }

    #[test]
    fn narrow_capture_is_full_bleed_on_height() {
        // Capture aspect 100/300 ≈ 0.333 is below target 0.6: the height
        // axis fills and the width is letterboxed.
        let g = LabelGeometry {
            capture_width: 100.0,
            capture_height: 300.0,
            ..LabelGeometry::thermal_3x5()
        };
        let fit = g.fit();

        assert_eq!(fit.height, g.output_height);
        assert!((fit.width - 120.0).abs() < EPSILON);
        assert!((fit.x - 48.0).abs() < EPSILON);
        assert!((fit.y).abs() < EPSILON);
    }

    #[test]
    fn square_capture_on_square_output_fills_both() {
        let g = LabelGeometry {
            output_width: 100.0,
            output_height: 100.0,
            capture_width: 50.0,
            capture_height: 50.0,
        };
        let fit = g.fit();
        assert_eq!(fit.width, 100.0);
        assert_eq!(fit.height, 100.0);
        assert_eq!(fit.x, 0.0);
        assert_eq!(fit.y, 0.0);
    }

    #[test]
    fn capture_origin_is_horizontally_centred() {
        let g = LabelGeometry::thermal_3x5();
        // US Letter: (612 − 244.8) / 2
        assert!((g.capture_origin_x(612.0) - 183.6).abs() < EPSILON);
    }

    #[test]
    fn capture_origin_goes_negative_without_clamping() {
        let g = LabelGeometry::thermal_3x5();
        // A source page narrower than the capture region: the origin goes
        // past the left page edge and stays there.
        assert!((g.capture_origin_x(216.0) - (-14.4)).abs() < EPSILON);
    }

    #[test]
    fn validate_rejects_degenerate_dimensions() {
        let g = LabelGeometry {
            output_width: 0.0,
            ..LabelGeometry::thermal_3x5()
        };
        assert!(g.validate().is_err());

        let g = LabelGeometry {
            capture_height: f32::NAN,
            ..LabelGeometry::thermal_3x5()
        };
        assert!(g.validate().is_err());

        assert!(LabelGeometry::thermal_3x5().validate().is_ok());
    }
}
