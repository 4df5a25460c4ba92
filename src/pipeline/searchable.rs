//! Searchable page conversion.
//!
//! Renders the (already orientation-corrected) page, optionally enhances
//! contrast, and asks tesseract for a single-page PDF carrying an
//! invisible text layer over the page image. Failure falls back to the
//! original page rather than aborting the document.

use pdfium_render::prelude::PdfPage;
use tracing::{debug, warn};

use super::ocr::OcrEngine;

/// Convert one page into searchable single-page PDF bytes.
///
/// Returns `None` when rendering or OCR fails; the caller keeps the
/// original page in that case.
pub fn make_searchable(
    page: &PdfPage,
    page_num: usize,
    dpi: u32,
    enhance: bool,
    engine: &OcrEngine,
) -> Option<Vec<u8>> {
    let mut image = match super::raster::render_page(page, dpi) {
        Ok(img) => img,
        Err(e) => {
            warn!(
                "Page {}: render failed during searchable conversion ({}), keeping original",
                page_num, e
            );
            return None;
        }
    };

    if enhance {
        image = super::enhance::autocontrast(&image);
    }

    match engine.recognize_to_pdf(&image) {
        Ok(bytes) => {
            debug!(
                "Page {}: searchable conversion produced {} bytes",
                page_num,
                bytes.len()
            );
            Some(bytes)
        }
        Err(e) => {
            warn!(
                "Page {}: searchable conversion failed ({}), keeping original",
                page_num, e
            );
            None
        }
    }
}
