//! Orientation detection for scanned pages.
//!
//! OSD on the rendered page tells us how many degrees the content needs
//! to rotate clockwise to be upright. Detection failure is never fatal:
//! an unreadably sparse page simply stays as scanned.

use pdfium_render::prelude::PdfPage;
use tracing::{debug, warn};

use super::ocr::OcrEngine;

/// Detect the clockwise rotation needed to make the page upright.
///
/// Returns one of 0, 90, 180, 270. Any failure (render, OSD, a page with
/// too little text for OSD to lock on to) degrades to 0.
pub fn detect_rotation(page: &PdfPage, page_num: usize, dpi: u32, engine: &OcrEngine) -> u32 {
    let image = match super::raster::render_page(page, dpi) {
        Ok(img) => img,
        Err(e) => {
            warn!(
                "Page {}: render failed during orientation check ({}), assuming upright",
                page_num, e
            );
            return 0;
        }
    };

    match engine.detect_orientation(&image) {
        Ok(degrees) if matches!(degrees, 0 | 90 | 180 | 270) => {
            debug!("Page {}: detected rotation {}", page_num, degrees);
            degrees
        }
        Ok(degrees) => {
            warn!(
                "Page {}: OSD reported unexpected rotation {}, assuming upright",
                page_num, degrees
            );
            0
        }
        Err(e) => {
            warn!(
                "Page {}: orientation detection failed ({}), assuming upright",
                page_num, e
            );
            0
        }
    }
}
