//! Page rasterisation helpers.
//!
//! Every analysis stage that looks at pixels (blank detection, orientation
//! detection, OCR) starts from the same primitive: render one page at a
//! chosen DPI. Page dimensions come back from pdfium in points (1/72 inch),
//! so the pixel size is `points * dpi / 72`.

use image::DynamicImage;
use pdfium_render::prelude::*;

/// Render a single page to an RGB image at the given DPI.
///
/// Honours the page's current `/Rotate` value, so a page rotated upstream
/// renders upright here.
pub fn render_page(page: &PdfPage, dpi: u32) -> Result<DynamicImage, PdfiumError> {
    let width_px = (page.width().value * dpi as f32 / 72.0).round() as i32;
    let height_px = (page.height().value * dpi as f32 / 72.0).round() as i32;

    let config = PdfRenderConfig::new()
        .set_target_width(width_px.max(1))
        .set_maximum_height(height_px.max(1));

    let bitmap = page.render_with_config(&config)?;
    Ok(bitmap.as_image())
}

/// Render a page and collapse it to 8-bit grayscale.
pub fn render_page_gray(page: &PdfPage, dpi: u32) -> Result<image::GrayImage, PdfiumError> {
    Ok(render_page(page, dpi)?.to_luma8())
}

#[cfg(test)]
mod tests {
    #[test]
    fn pixel_dimensions_from_points() {
        // A4 portrait is 595 x 842 points; at 72 DPI that maps 1:1.
        let dpi = 72u32;
        let w = (595.0f32 * dpi as f32 / 72.0).round() as i32;
        let h = (842.0f32 * dpi as f32 / 72.0).round() as i32;
        assert_eq!(w, 595);
        assert_eq!(h, 842);

        // At 150 DPI the page roughly doubles.
        let w150 = (595.0f32 * 150.0 / 72.0).round() as i32;
        assert_eq!(w150, 1240);
    }
}
