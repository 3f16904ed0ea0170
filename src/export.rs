//! Raster export plans for PDF and PNG.
//!
//! The browser captures the rendered preview into one canvas; the plan says
//! at which scale to capture and, for PDF, how that single raster is sliced
//! across A4 pages.

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{BarcodeGridError, Result};

/// A4 width in millimetres, the PDF image width.
pub const PDF_PAGE_WIDTH_MM: f64 = 210.0;
/// A4 height in millimetres, the PDF page advance.
pub const PDF_PAGE_HEIGHT_MM: f64 = 297.0;
/// Capture background.
pub const EXPORT_BACKGROUND: &str = "#ffffff";

/// Remaining height below this is rounding noise, not another page.
const PAGE_EPSILON_MM: f64 = 1e-6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Pdf,
    Png,
}

impl ExportFormat {
    pub fn from_name(name: &str) -> Result<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "pdf" => Ok(Self::Pdf),
            "png" => Ok(Self::Png),
            other => Err(BarcodeGridError::UnsupportedFormat(other.to_string())),
        }
    }

    /// Capture scale relative to CSS pixels.
    pub fn scale(self) -> f64 {
        match self {
            Self::Pdf => 2.0,
            Self::Png => 3.0,
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            Self::Pdf => "pdf",
            Self::Png => "png",
        }
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            Self::Pdf => "application/pdf",
            Self::Png => "image/png",
        }
    }

    /// Default download name.
    pub fn default_file_name(self) -> String {
        format!("barcodes.{}", self.extension())
    }
}

/// Where the raster sits on one PDF page.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PdfPagePlacement {
    pub index: usize,
    /// Vertical image offset in millimetres (0, -297, -594, ...).
    pub offset_mm: f64,
}

/// Everything the browser needs to capture and write one export.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportPlan {
    pub format: ExportFormat,
    pub scale: f64,
    pub background: &'static str,
    /// Raster size in device pixels.
    pub canvas_width: f64,
    pub canvas_height: f64,
    /// Image size on the PDF page; zero for PNG.
    pub image_width_mm: f64,
    pub image_height_mm: f64,
    /// PDF pages; empty for PNG.
    pub pages: Vec<PdfPagePlacement>,
    pub file_name: String,
    pub mime_type: &'static str,
}

impl ExportPlan {
    /// Plan an export of a capture target measuring `width` x `height` CSS px.
    ///
    /// A zero-sized or non-finite target fails: there would be nothing to write.
    pub fn new(format: ExportFormat, width: f64, height: f64, file_name: Option<&str>) -> Result<Self> {
        if !(width.is_finite() && height.is_finite()) || width <= 0.0 || height <= 0.0 {
            return Err(BarcodeGridError::Export(format!(
                "nothing to capture ({width}x{height})"
            )));
        }
        let scale = format.scale();
        let canvas_width = width * scale;
        let canvas_height = height * scale;

        let (image_width_mm, image_height_mm, pages) = match format {
            ExportFormat::Pdf => {
                let image_height = canvas_height * PDF_PAGE_WIDTH_MM / canvas_width;
                (PDF_PAGE_WIDTH_MM, image_height, pdf_pages(image_height))
            }
            ExportFormat::Png => (0.0, 0.0, Vec::new()),
        };

        let file_name = file_name
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map_or_else(|| format.default_file_name(), ToString::to_string);

        info!(
            format = format.extension(),
            canvas_width,
            canvas_height,
            pages = pages.len(),
            "export planned"
        );
        Ok(Self {
            format,
            scale,
            background: EXPORT_BACKGROUND,
            canvas_width,
            canvas_height,
            image_width_mm,
            image_height_mm,
            pages,
            file_name,
            mime_type: format.mime_type(),
        })
    }

    pub fn page_count(&self) -> usize {
        match self.format {
            ExportFormat::Pdf => self.pages.len(),
            ExportFormat::Png => 1,
        }
    }
}

/// One placement per A4 page while image height remains.
fn pdf_pages(image_height: f64) -> Vec<PdfPagePlacement> {
    let mut pages = vec![PdfPagePlacement {
        index: 0,
        offset_mm: 0.0,
    }];
    let mut height_left = image_height - PDF_PAGE_HEIGHT_MM;
    while height_left > PAGE_EPSILON_MM {
        pages.push(PdfPagePlacement {
            index: pages.len(),
            offset_mm: height_left - image_height,
        });
        height_left -= PDF_PAGE_HEIGHT_MM;
    }
    pages
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp
)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test]
    fn test_pdf_single_page() {
        // 210 wide, 297 tall in any unit: exactly one page
        let plan = ExportPlan::new(ExportFormat::Pdf, 210.0, 297.0, None).unwrap();
        assert_eq!(plan.scale, 2.0);
        assert_eq!(plan.canvas_width, 420.0);
        assert!((plan.image_height_mm - 297.0).abs() < 1e-9);
        assert_eq!(plan.page_count(), 1);
        assert_eq!(plan.file_name, "barcodes.pdf");
    }

    #[test]
    fn test_pdf_offsets_step_by_page_height() {
        let plan = ExportPlan::new(ExportFormat::Pdf, 100.0, 300.0, None).unwrap();
        // image height = 300 * 210 / 100 = 630mm -> 3 pages
        assert!((plan.image_height_mm - 630.0).abs() < 1e-9);
        let offsets: Vec<f64> = plan.pages.iter().map(|p| p.offset_mm).collect();
        assert_eq!(offsets.len(), 3);
        assert!((offsets[0]).abs() < 1e-9);
        assert!((offsets[1] + 297.0).abs() < 1e-9);
        assert!((offsets[2] + 594.0).abs() < 1e-9);
    }

    #[test]
    fn test_png_is_one_raster() {
        let plan = ExportPlan::new(ExportFormat::Png, 800.0, 1200.0, Some("aisle.png")).unwrap();
        assert_eq!(plan.scale, 3.0);
        assert_eq!(plan.canvas_height, 3600.0);
        assert!(plan.pages.is_empty());
        assert_eq!(plan.page_count(), 1);
        assert_eq!(plan.file_name, "aisle.png");
        assert_eq!(plan.mime_type, "image/png");
    }

    #[test_case(0.0, 100.0 ; "zero width")]
    #[test_case(100.0, 0.0 ; "zero height")]
    #[test_case(f64::NAN, 100.0 ; "nan width")]
    #[test_case(-5.0, 100.0 ; "negative width")]
    fn test_empty_capture_rejected(width: f64, height: f64) {
        assert!(matches!(
            ExportPlan::new(ExportFormat::Pdf, width, height, None),
            Err(BarcodeGridError::Export(_))
        ));
    }

    #[test]
    fn test_format_names() {
        assert_eq!(ExportFormat::from_name("PDF").unwrap(), ExportFormat::Pdf);
        assert!(matches!(
            ExportFormat::from_name("tiff"),
            Err(BarcodeGridError::UnsupportedFormat(_))
        ));
    }
}
