//! Blank page detection via pixel statistics.
//!
//! A scanned blank sheet renders as near-uniform near-white pixels. We
//! render at a low DPI (72 is plenty), take the population mean and
//! standard deviation of the grayscale values, and call the page blank
//! when the image is both very uniform (stdev below 5.0) and very bright
//! (mean above 250). Both cutoffs must hold: a uniformly dark page (a
//! failed scan, a separator sheet) is uniform but not bright, and stays in.

use image::GrayImage;
use pdfium_render::prelude::PdfPage;
use tracing::{debug, warn};

/// Uniformity cutoff: pages with pixel stdev below this are candidates.
const MAX_BLANK_STDEV: f64 = 5.0;
/// Brightness cutoff: pages with pixel mean above this are candidates.
const MIN_BLANK_MEAN: f64 = 250.0;

/// Mean and population standard deviation of an 8-bit grayscale image.
pub fn pixel_stats(image: &GrayImage) -> (f64, f64) {
    let pixels = image.as_raw();
    if pixels.is_empty() {
        return (0.0, 0.0);
    }

    let n = pixels.len() as f64;
    let mean = pixels.iter().map(|&p| p as f64).sum::<f64>() / n;
    let variance = pixels
        .iter()
        .map(|&p| {
            let d = p as f64 - mean;
            d * d
        })
        .sum::<f64>()
        / n;

    (mean, variance.sqrt())
}

/// Decide blankness from precomputed stats.
pub fn is_blank_stats(mean: f64, stdev: f64) -> bool {
    stdev < MAX_BLANK_STDEV && mean > MIN_BLANK_MEAN
}

/// Render the page at the given DPI and classify it.
///
/// Render failures are logged and treated as non-blank: a page we cannot
/// inspect must never be dropped from the output.
pub fn is_blank_page(page: &PdfPage, page_num: usize, dpi: u32) -> bool {
    let gray = match super::raster::render_page_gray(page, dpi) {
        Ok(img) => img,
        Err(e) => {
            warn!(
                "Page {}: render failed during blank check ({}), keeping page",
                page_num, e
            );
            return false;
        }
    };

    let (mean, stdev) = pixel_stats(&gray);
    let blank = is_blank_stats(mean, stdev);
    debug!(
        "Page {}: mean={:.1} stdev={:.2} blank={}",
        page_num, mean, stdev, blank
    );
    blank
}

#[cfg(test)]
mod tests {
    use super::*;

    fn uniform(value: u8) -> GrayImage {
        GrayImage::from_pixel(50, 50, image::Luma([value]))
    }

    #[test]
    fn white_page_is_blank() {
        let (mean, stdev) = pixel_stats(&uniform(255));
        assert!(is_blank_stats(mean, stdev));
    }

    #[test]
    fn dark_uniform_page_is_not_blank() {
        // Uniform but not bright: stdev 0, mean 10.
        let (mean, stdev) = pixel_stats(&uniform(10));
        assert_eq!(stdev, 0.0);
        assert!(!is_blank_stats(mean, stdev));
    }

    #[test]
    fn page_with_text_is_not_blank() {
        // Mostly white with a band of black pixels, like a line of print.
        let mut img = uniform(255);
        for x in 0..50 {
            for y in 20..24 {
                img.put_pixel(x, y, image::Luma([0]));
            }
        }
        let (mean, stdev) = pixel_stats(&img);
        assert!(stdev >= 5.0, "stdev was {}", stdev);
        assert!(!is_blank_stats(mean, stdev));
    }

    #[test]
    fn faint_speckle_still_blank() {
        // A few grey dots from scanner dust should not rescue a blank page.
        let mut img = uniform(254);
        img.put_pixel(0, 0, image::Luma([250]));
        img.put_pixel(10, 10, image::Luma([251]));
        let (mean, stdev) = pixel_stats(&img);
        assert!(is_blank_stats(mean, stdev));
    }

    #[test]
    fn empty_image_is_not_blank() {
        let img = GrayImage::new(0, 0);
        let (mean, stdev) = pixel_stats(&img);
        assert!(!is_blank_stats(mean, stdev));
    }

    #[test]
    fn population_stdev_matches_hand_computation() {
        // 2x1 image with values 0 and 255: mean 127.5, population stdev 127.5.
        let mut img = GrayImage::new(2, 1);
        img.put_pixel(0, 0, image::Luma([0]));
        img.put_pixel(1, 0, image::Luma([255]));
        let (mean, stdev) = pixel_stats(&img);
        assert!((mean - 127.5).abs() < 1e-9);
        assert!((stdev - 127.5).abs() < 1e-9);
    }
}
