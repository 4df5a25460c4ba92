//! Text candidate extraction from the first content page.
//!
//! Two paths feed the same candidate shape:
//!
//! - **Native**: pages with a real text layer expose characters through
//!   pdfium; we group them into lines and take each line's text, font
//!   size, and vertical position.
//! - **OCR**: image-only pages go through tesseract word boxes, grouped
//!   by (block, paragraph, line), with box height standing in for font
//!   size.
//!
//! The native path wins when the page carries at least
//! `min_native_text_chars` non-whitespace characters; otherwise the page
//! is treated as a scan and OCR decides.

use pdfium_render::prelude::*;
use tracing::{debug, warn};

use super::ocr::{OcrEngine, OcrWord};

/// One line of text with the geometry the title scorer needs.
#[derive(Debug, Clone)]
pub struct Candidate {
    pub text: String,
    /// Font size in points (native) or box height in pixels (OCR).
    pub size: f32,
    /// Distance from the page top, in the same unit system as
    /// `normalization_height`.
    pub top: f32,
}

/// Candidates plus the page text the date resolver scans.
#[derive(Debug, Clone)]
pub struct PageTextExtraction {
    pub candidates: Vec<Candidate>,
    /// Page height used to normalise `top` into [0, 1].
    pub normalization_height: f32,
    pub full_text: String,
}

/// Extract candidates from the page, preferring the native text layer.
pub fn extract_page_text(
    page: &PdfPage,
    page_num: usize,
    ocr_dpi: u32,
    min_native_text_chars: usize,
    min_word_confidence: f32,
    engine: &OcrEngine,
) -> PageTextExtraction {
    let native = extract_native(page, page_num);
    let native_chars = native
        .full_text
        .chars()
        .filter(|c| !c.is_whitespace())
        .count();

    if native_chars >= min_native_text_chars {
        debug!(
            "Page {}: using native text layer ({} chars, {} candidates)",
            page_num,
            native_chars,
            native.candidates.len()
        );
        return native;
    }

    debug!(
        "Page {}: native layer too sparse ({} chars), falling back to OCR",
        page_num, native_chars
    );
    extract_via_ocr(page, page_num, ocr_dpi, min_word_confidence, engine, native)
}

/// Build candidates from pdfium's character stream.
///
/// pdfium exposes individual characters rather than lines, so we group
/// consecutive characters whose baselines sit within half a font size of
/// each other.
fn extract_native(page: &PdfPage, page_num: usize) -> PageTextExtraction {
    let page_height = page.height().value;

    let text_page = match page.text() {
        Ok(t) => t,
        Err(e) => {
            warn!("Page {}: text layer unreadable ({})", page_num, e);
            return PageTextExtraction {
                candidates: Vec::new(),
                normalization_height: page_height,
                full_text: String::new(),
            };
        }
    };

    let full_text = text_page.all();

    let mut lines: Vec<Candidate> = Vec::new();
    let mut current: Option<LineAccumulator> = None;

    for ch in text_page.chars().iter() {
        let unicode = match ch.unicode_char() {
            Some(c) => c,
            None => continue,
        };
        let size = ch.unscaled_font_size().value;
        let bounds = match ch.loose_bounds() {
            Ok(b) => b,
            Err(_) => continue,
        };
        // pdfium's Y axis points up; flip so `top` grows downwards.
        let top = page_height - bounds.top().value;

        if unicode == '\n' || unicode == '\r' {
            if let Some(acc) = current.take() {
                if let Some(line) = acc.finish() {
                    lines.push(line);
                }
            }
            continue;
        }

        match current.as_mut() {
            Some(acc) if acc.same_line(top, size) => acc.push(unicode, size, top),
            _ => {
                if let Some(acc) = current.take() {
                    if let Some(line) = acc.finish() {
                        lines.push(line);
                    }
                }
                let mut acc = LineAccumulator::new();
                acc.push(unicode, size, top);
                current = Some(acc);
            }
        }
    }
    if let Some(acc) = current.take() {
        if let Some(line) = acc.finish() {
            lines.push(line);
        }
    }

    PageTextExtraction {
        candidates: lines,
        normalization_height: page_height,
        full_text,
    }
}

struct LineAccumulator {
    text: String,
    max_size: f32,
    min_top: f32,
}

impl LineAccumulator {
    fn new() -> Self {
        Self {
            text: String::new(),
            max_size: 0.0,
            min_top: f32::MAX,
        }
    }

    /// A character belongs to the current line when its top sits within
    /// half a font size of the line's top.
    fn same_line(&self, top: f32, size: f32) -> bool {
        let tolerance = (self.max_size.max(size) * 0.5).max(1.0);
        (top - self.min_top).abs() <= tolerance
    }

    fn push(&mut self, c: char, size: f32, top: f32) {
        self.text.push(c);
        self.max_size = self.max_size.max(size);
        self.min_top = self.min_top.min(top);
    }

    fn finish(self) -> Option<Candidate> {
        let text = self.text.trim().to_string();
        if text.chars().count() <= 1 {
            return None;
        }
        Some(Candidate {
            text,
            size: self.max_size,
            top: self.min_top,
        })
    }
}

/// OCR fallback: render, recognise word boxes, group into lines.
fn extract_via_ocr(
    page: &PdfPage,
    page_num: usize,
    dpi: u32,
    min_word_confidence: f32,
    engine: &OcrEngine,
    native: PageTextExtraction,
) -> PageTextExtraction {
    let image = match super::raster::render_page(page, dpi) {
        Ok(img) => img,
        Err(e) => {
            warn!(
                "Page {}: render failed during text extraction ({})",
                page_num, e
            );
            return native;
        }
    };
    let image_height = image.height() as f32;

    let words = match engine.recognize_word_boxes(&image) {
        Ok(words) => words,
        Err(e) => {
            warn!("Page {}: OCR extraction failed ({})", page_num, e);
            return native;
        }
    };

    let confident: Vec<OcrWord> = words
        .into_iter()
        .filter(|w| w.confidence >= min_word_confidence)
        .collect();

    let full_text = confident
        .iter()
        .map(|w| w.text.as_str())
        .collect::<Vec<_>>()
        .join(" ");

    let candidates = group_ocr_words(&confident);
    debug!(
        "Page {}: OCR produced {} candidates from {} words",
        page_num,
        candidates.len(),
        confident.len()
    );

    PageTextExtraction {
        candidates,
        normalization_height: if image_height > 0.0 {
            image_height
        } else {
            1000.0
        },
        full_text,
    }
}

/// Group confident OCR words into line candidates.
///
/// Words share a line when their (block, paragraph, line) triple matches.
/// The line's size is the mean word box height; its top is the topmost
/// word's top.
pub fn group_ocr_words(words: &[OcrWord]) -> Vec<Candidate> {
    let mut candidates = Vec::new();
    let mut current_key: Option<(u32, u32, u32)> = None;
    let mut texts: Vec<&str> = Vec::new();
    let mut height_sum = 0.0f32;
    let mut min_top = f32::MAX;

    let flush =
        |texts: &mut Vec<&str>, height_sum: &mut f32, min_top: &mut f32, out: &mut Vec<Candidate>| {
            if !texts.is_empty() {
                out.push(Candidate {
                    text: texts.join(" "),
                    size: *height_sum / texts.len() as f32,
                    top: *min_top,
                });
            }
            texts.clear();
            *height_sum = 0.0;
            *min_top = f32::MAX;
        };

    for word in words {
        let key = (word.block, word.paragraph, word.line);
        if current_key != Some(key) {
            flush(&mut texts, &mut height_sum, &mut min_top, &mut candidates);
            current_key = Some(key);
        }
        texts.push(&word.text);
        height_sum += word.height;
        min_top = min_top.min(word.top);
    }
    flush(&mut texts, &mut height_sum, &mut min_top, &mut candidates);

    candidates
}

#[cfg(test)]
mod tests {
    use super::*;

    fn word(text: &str, conf: f32, height: f32, top: f32, block: u32, par: u32, line: u32) -> OcrWord {
        OcrWord {
            text: text.to_string(),
            confidence: conf,
            height,
            top,
            block,
            paragraph: par,
            line,
        }
    }

    #[test]
    fn groups_words_by_line_triple() {
        let words = vec![
            word("Annual", 95.0, 40.0, 80.0, 1, 1, 1),
            word("Report", 92.0, 44.0, 82.0, 1, 1, 1),
            word("2024", 90.0, 20.0, 200.0, 1, 1, 2),
        ];
        let candidates = group_ocr_words(&words);
        assert_eq!(candidates.len(), 2);
        assert_eq!(candidates[0].text, "Annual Report");
        assert!((candidates[0].size - 42.0).abs() < 0.01);
        assert!((candidates[0].top - 80.0).abs() < f32::EPSILON);
        assert_eq!(candidates[1].text, "2024");
    }

    #[test]
    fn new_block_starts_new_line() {
        let words = vec![
            word("header", 95.0, 30.0, 50.0, 1, 1, 1),
            word("body", 95.0, 30.0, 50.0, 2, 1, 1),
        ];
        let candidates = group_ocr_words(&words);
        assert_eq!(candidates.len(), 2);
    }

    #[test]
    fn empty_words_yield_no_candidates() {
        assert!(group_ocr_words(&[]).is_empty());
    }

    #[test]
    fn line_accumulator_groups_by_baseline() {
        let mut acc = LineAccumulator::new();
        acc.push('T', 24.0, 100.0);
        // Within half a font size: same line.
        assert!(acc.same_line(108.0, 24.0));
        // A row 40 units lower is a different line.
        assert!(!acc.same_line(140.0, 24.0));
    }

    #[test]
    fn line_accumulator_drops_trivial_lines() {
        let mut acc = LineAccumulator::new();
        acc.push(' ', 12.0, 10.0);
        acc.push(' ', 12.0, 10.0);
        assert!(acc.finish().is_none());

        // A single character is not a usable candidate line.
        let mut acc = LineAccumulator::new();
        acc.push('A', 12.0, 10.0);
        assert!(acc.finish().is_none());

        let mut acc = LineAccumulator::new();
        for (i, c) in "Minutes".chars().enumerate() {
            acc.push(c, 12.0, 10.0 + i as f32 * 0.1);
        }
        let line = acc.finish().unwrap();
        assert_eq!(line.text, "Minutes");
        assert!((line.top - 10.0).abs() < f32::EPSILON);
    }
}
