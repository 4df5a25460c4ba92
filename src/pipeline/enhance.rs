//! Optional contrast enhancement for faint scans.
//!
//! A percentile contrast stretch per channel: clip 2% of pixels at each
//! end of the histogram, then stretch the remaining range to full scale.
//! This lifts washed-out toner without blowing out highlights the way a
//! plain min/max stretch would when a single dark speck is present.

use image::{DynamicImage, RgbImage};

/// Fraction of pixels clipped at each end of the histogram.
const CLIP_FRACTION: f64 = 0.02;

/// Apply a 2% percentile contrast stretch to each RGB channel.
pub fn autocontrast(image: &DynamicImage) -> DynamicImage {
    let rgb = image.to_rgb8();
    let (width, height) = rgb.dimensions();
    if width == 0 || height == 0 {
        return image.clone();
    }

    let mut out = RgbImage::new(width, height);
    let total = (width * height) as u64;
    let clip = ((total as f64) * CLIP_FRACTION) as u64;

    // Per-channel histogram and lookup table
    for channel in 0..3 {
        let mut histogram = [0u64; 256];
        for pixel in rgb.pixels() {
            histogram[pixel.0[channel] as usize] += 1;
        }

        let (low, high) = stretch_bounds(&histogram, clip);
        let lut = build_lut(low, high);

        for (x, y, pixel) in rgb.enumerate_pixels() {
            out.get_pixel_mut(x, y).0[channel] = lut[pixel.0[channel] as usize];
        }
    }

    DynamicImage::ImageRgb8(out)
}

/// Find the histogram values that bound the clipped range.
fn stretch_bounds(histogram: &[u64; 256], clip: u64) -> (u8, u8) {
    let mut low = 0u8;
    let mut seen = 0u64;
    for (value, &count) in histogram.iter().enumerate() {
        seen += count;
        if seen > clip {
            low = value as u8;
            break;
        }
    }

    let mut high = 255u8;
    let mut seen = 0u64;
    for (value, &count) in histogram.iter().enumerate().rev() {
        seen += count;
        if seen > clip {
            high = value as u8;
            break;
        }
    }

    (low, high)
}

/// Map [low, high] to [0, 255]; identity when the range is degenerate.
fn build_lut(low: u8, high: u8) -> [u8; 256] {
    let mut lut = [0u8; 256];
    if high <= low {
        for (i, entry) in lut.iter_mut().enumerate() {
            *entry = i as u8;
        }
        return lut;
    }

    let range = (high - low) as f64;
    for (i, entry) in lut.iter_mut().enumerate() {
        let v = ((i as f64 - low as f64) / range * 255.0).clamp(0.0, 255.0);
        *entry = v.round() as u8;
    }
    lut
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stretch_expands_narrow_range() {
        // All pixels between 100 and 150 should spread towards 0..255.
        let mut img = RgbImage::new(10, 10);
        for (i, pixel) in img.pixels_mut().enumerate() {
            let v = 100 + (i % 51) as u8;
            *pixel = image::Rgb([v, v, v]);
        }
        let out = autocontrast(&DynamicImage::ImageRgb8(img)).to_rgb8();

        let min = out.pixels().map(|p| p.0[0]).min().unwrap();
        let max = out.pixels().map(|p| p.0[0]).max().unwrap();
        assert!(min < 20, "min was {}", min);
        assert!(max > 235, "max was {}", max);
    }

    #[test]
    fn uniform_image_unchanged() {
        let img = RgbImage::from_pixel(4, 4, image::Rgb([128, 128, 128]));
        let out = autocontrast(&DynamicImage::ImageRgb8(img)).to_rgb8();
        assert!(out.pixels().all(|p| p.0 == [128, 128, 128]));
    }

    #[test]
    fn lut_identity_on_degenerate_range() {
        let lut = build_lut(200, 200);
        assert_eq!(lut[0], 0);
        assert_eq!(lut[128], 128);
        assert_eq!(lut[255], 255);
    }

    #[test]
    fn bounds_ignore_clipped_outliers() {
        // One black pixel among many mid-grey ones should be clipped out.
        let mut histogram = [0u64; 256];
        histogram[0] = 1;
        histogram[120] = 1000;
        let (low, _high) = stretch_bounds(&histogram, 20);
        assert_eq!(low, 120);
    }
}
