//! Tesseract subprocess wrapper.
//!
//! All OCR goes through the `tesseract` binary rather than a linked
//! library. Three invocations matter here:
//!
//! - `--psm 0 -l osd` for orientation-and-script detection (OSD),
//! - `tsv` output for word boxes with confidences,
//! - `pdf` output for the searchable text layer.
//!
//! Images are handed over through a temp PNG so the subprocess boundary
//! stays simple. Each call cleans up after itself via `TempDir`.

use image::DynamicImage;
use once_cell::sync::Lazy;
use regex::Regex;
use std::path::Path;
use std::process::Command;
use tracing::{debug, trace};

static RE_OSD_ROTATE: Lazy<Regex> = Lazy::new(|| Regex::new(r"Rotate:\s*(\d+)").unwrap());

#[derive(Debug, thiserror::Error)]
pub enum OcrError {
    #[error("failed to spawn tesseract: {0}")]
    Spawn(#[source] std::io::Error),

    #[error("tesseract exited with status {status}: {stderr}")]
    Failed { status: i32, stderr: String },

    #[error("could not stage image for OCR: {0}")]
    Staging(#[source] std::io::Error),

    #[error("unparseable tesseract output: {0}")]
    BadOutput(String),
}

/// One recognised word with its geometry, as parsed from tesseract TSV.
#[derive(Debug, Clone)]
pub struct OcrWord {
    pub text: String,
    /// Recognition confidence, 0..=100.
    pub confidence: f32,
    /// Bounding-box height in pixels, a proxy for font size.
    pub height: f32,
    /// Top edge of the bounding box in pixels from the page top.
    pub top: f32,
    pub block: u32,
    pub paragraph: u32,
    pub line: u32,
}

/// Thin handle around the tesseract binary, carrying the language set.
#[derive(Debug, Clone)]
pub struct OcrEngine {
    languages: String,
}

impl OcrEngine {
    pub fn new(languages: &str) -> Self {
        Self {
            languages: languages.to_string(),
        }
    }

    /// Run OSD and return the detected rotation in degrees (0/90/180/270).
    pub fn detect_orientation(&self, image: &DynamicImage) -> Result<u32, OcrError> {
        let staged = StagedImage::new(image)?;

        let output = Command::new("tesseract")
            .arg(staged.path())
            .arg("stdout")
            .args(["-l", "osd", "--psm", "0"])
            .output()
            .map_err(OcrError::Spawn)?;

        // OSD writes its report to stderr on some builds and stdout on
        // others, so scan both.
        let combined = format!(
            "{}{}",
            String::from_utf8_lossy(&output.stdout),
            String::from_utf8_lossy(&output.stderr)
        );

        if let Some(caps) = RE_OSD_ROTATE.captures(&combined) {
            let degrees: u32 = caps[1]
                .parse()
                .map_err(|_| OcrError::BadOutput(combined.clone()))?;
            trace!("OSD reported rotation {}", degrees);
            return Ok(degrees % 360);
        }

        if !output.status.success() {
            return Err(OcrError::Failed {
                status: output.status.code().unwrap_or(-1),
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            });
        }

        Err(OcrError::BadOutput(combined))
    }

    /// Recognise words with bounding boxes via TSV output.
    pub fn recognize_word_boxes(&self, image: &DynamicImage) -> Result<Vec<OcrWord>, OcrError> {
        let staged = StagedImage::new(image)?;

        let output = Command::new("tesseract")
            .arg(staged.path())
            .arg("stdout")
            .args(["-l", &self.languages, "tsv"])
            .output()
            .map_err(OcrError::Spawn)?;

        if !output.status.success() {
            return Err(OcrError::Failed {
                status: output.status.code().unwrap_or(-1),
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            });
        }

        let tsv = String::from_utf8_lossy(&output.stdout);
        let words = parse_tsv(&tsv);
        debug!("OCR recognised {} words", words.len());
        Ok(words)
    }

    /// Produce a searchable single-page PDF from the image.
    pub fn recognize_to_pdf(&self, image: &DynamicImage) -> Result<Vec<u8>, OcrError> {
        let staged = StagedImage::new(image)?;
        let out_base = staged.dir().join("ocr_out");

        let output = Command::new("tesseract")
            .arg(staged.path())
            .arg(&out_base)
            .args(["-l", &self.languages, "pdf"])
            .output()
            .map_err(OcrError::Spawn)?;

        if !output.status.success() {
            return Err(OcrError::Failed {
                status: output.status.code().unwrap_or(-1),
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            });
        }

        let pdf_path = out_base.with_extension("pdf");
        std::fs::read(&pdf_path).map_err(OcrError::Staging)
    }
}

/// Parse tesseract TSV output into words.
///
/// TSV columns: level, page_num, block_num, par_num, line_num, word_num,
/// left, top, width, height, conf, text. Only level-5 rows (words) carry
/// text; rows with negative confidence are layout artifacts.
fn parse_tsv(tsv: &str) -> Vec<OcrWord> {
    let mut words = Vec::new();

    for line in tsv.lines().skip(1) {
        let cols: Vec<&str> = line.split('\t').collect();
        if cols.len() < 12 {
            continue;
        }

        let level: u32 = match cols[0].parse() {
            Ok(v) => v,
            Err(_) => continue,
        };
        if level != 5 {
            continue;
        }

        let confidence: f32 = match cols[10].parse() {
            Ok(v) => v,
            Err(_) => continue,
        };
        if confidence < 0.0 {
            continue;
        }

        let text = cols[11].trim();
        if text.is_empty() {
            continue;
        }

        let parse_u32 = |s: &str| s.parse::<u32>().unwrap_or(0);
        let parse_f32 = |s: &str| s.parse::<f32>().unwrap_or(0.0);

        words.push(OcrWord {
            text: text.to_string(),
            confidence,
            height: parse_f32(cols[9]),
            top: parse_f32(cols[7]),
            block: parse_u32(cols[2]),
            paragraph: parse_u32(cols[3]),
            line: parse_u32(cols[4]),
        });
    }

    words
}

/// A PNG written into a fresh temp directory for the subprocess to read.
struct StagedImage {
    dir: tempfile::TempDir,
    path: std::path::PathBuf,
}

impl StagedImage {
    fn new(image: &DynamicImage) -> Result<Self, OcrError> {
        let dir = tempfile::TempDir::new().map_err(OcrError::Staging)?;
        let path = dir.path().join("page.png");
        image
            .save_with_format(&path, image::ImageFormat::Png)
            .map_err(|e| OcrError::Staging(std::io::Error::other(e)))?;
        Ok(Self { dir, path })
    }

    fn path(&self) -> &Path {
        &self.path
    }

    fn dir(&self) -> &Path {
        self.dir.path()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_TSV: &str = "level\tpage_num\tblock_num\tpar_num\tline_num\tword_num\tleft\ttop\twidth\theight\tconf\ttext\n\
1\t1\t0\t0\t0\t0\t0\t0\t1240\t1754\t-1\t\n\
4\t1\t1\t1\t1\t0\t100\t80\t600\t42\t-1\t\n\
5\t1\t1\t1\t1\t1\t100\t80\t200\t42\t96.5\tAnnual\n\
5\t1\t1\t1\t1\t2\t320\t80\t250\t42\t91.2\tReport\n\
5\t1\t1\t1\t2\t1\t100\t160\t180\t28\t12.0\tnoisy\n\
5\t1\t2\t1\t1\t1\t100\t900\t120\t20\t88.0\tfooter\n";

    #[test]
    fn tsv_parses_level_five_words_only() {
        let words = parse_tsv(SAMPLE_TSV);
        assert_eq!(words.len(), 4);
        assert_eq!(words[0].text, "Annual");
        assert_eq!(words[0].block, 1);
        assert_eq!(words[0].line, 1);
        assert!((words[0].height - 42.0).abs() < f32::EPSILON);
        assert!((words[0].top - 80.0).abs() < f32::EPSILON);
    }

    #[test]
    fn tsv_keeps_low_confidence_words() {
        // Filtering by confidence is the caller's decision.
        let words = parse_tsv(SAMPLE_TSV);
        assert!(words.iter().any(|w| w.text == "noisy"));
    }

    #[test]
    fn tsv_skips_negative_confidence_rows() {
        let words = parse_tsv(SAMPLE_TSV);
        assert!(words.iter().all(|w| w.confidence >= 0.0));
    }

    #[test]
    fn tsv_tolerates_short_rows() {
        let words = parse_tsv("level\tjunk\n5\t1\t1\n");
        assert!(words.is_empty());
    }

    #[test]
    fn osd_rotate_regex_matches_report() {
        let report = "Page number: 0\nOrientation in degrees: 270\nRotate: 90\nOrientation confidence: 12.3\n";
        let caps = RE_OSD_ROTATE.captures(report).unwrap();
        assert_eq!(&caps[1], "90");
    }
}
