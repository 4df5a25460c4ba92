//! Output types returned by the processing pipeline.
//!
//! Everything here is `serde::Serialize` so front ends can emit the whole
//! run report as JSON (`scantidy --json`), persist it, or ship it over HTTP.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// What happened to one source page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PageDisposition {
    /// Page was kept and appended to the output document.
    Kept,
    /// Page was classified as blank and dropped.
    Blank,
}

/// Per-page processing record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageReport {
    /// 1-indexed page number in the source document.
    pub page_num: usize,
    pub disposition: PageDisposition,
    /// Absolute rotation applied to make the page upright, in degrees.
    /// Always 0 for blank pages and for pages already upright.
    pub rotation: u32,
    /// Whether the appended page is the OCR'd searchable replacement
    /// (false when OCR was off, failed, or the page was blank).
    pub searchable: bool,
}

/// The renaming decision computed from the first kept page.
///
/// `date`, when present, is the zero-padded `YYYYMMDD` form and has already
/// passed range validation (`1900 < year < 2100`, valid month/day ranges).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RenameDecision {
    /// Whether the original filename looked machine-generated (scanner or
    /// camera naming) and therefore qualified for metadata renaming.
    pub needs_rename: bool,
    /// Best title candidate from the first kept page, as selected; filename
    /// sanitization is applied later, when the final name is composed.
    pub title: Option<String>,
    /// Normalized document date, `YYYYMMDD`.
    pub date: Option<String>,
}

/// Counters for one document run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProcessStats {
    /// Pages in the source document.
    pub total_pages: usize,
    /// Pages appended to the output document.
    pub kept_pages: usize,
    /// Pages dropped as blank.
    pub blank_pages: usize,
    /// Kept pages that needed a rotation fix.
    pub rotated_pages: usize,
    /// Kept pages replaced by their OCR'd searchable equivalent.
    pub searchable_pages: usize,
    /// Wall-clock duration of the whole document run.
    pub total_duration_ms: u64,
}

/// Result of processing one document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessOutput {
    /// The input as given by the caller (path or URL).
    pub input: String,
    /// Final output filename, either metadata-derived or the
    /// `<stem>_processed<ext>` fallback.
    pub final_filename: String,
    /// Where the output document was written. `None` on a dry run.
    pub output_path: Option<PathBuf>,
    pub rename: RenameDecision,
    pub pages: Vec<PageReport>,
    pub stats: ProcessStats,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_serialises_to_json() {
        let output = ProcessOutput {
            input: "scan0001.pdf".into(),
            final_filename: "請求書_20240520.pdf".into(),
            output_path: Some(PathBuf::from("/tmp/請求書_20240520.pdf")),
            rename: RenameDecision {
                needs_rename: true,
                title: Some("請求書".into()),
                date: Some("20240520".into()),
            },
            pages: vec![
                PageReport {
                    page_num: 1,
                    disposition: PageDisposition::Kept,
                    rotation: 0,
                    searchable: true,
                },
                PageReport {
                    page_num: 2,
                    disposition: PageDisposition::Blank,
                    rotation: 0,
                    searchable: false,
                },
            ],
            stats: ProcessStats {
                total_pages: 2,
                kept_pages: 1,
                blank_pages: 1,
                rotated_pages: 0,
                searchable_pages: 1,
                total_duration_ms: 1234,
            },
        };

        let json = serde_json::to_string(&output).unwrap();
        assert!(json.contains("\"disposition\":\"blank\""));
        assert!(json.contains("20240520"));

        let back: ProcessOutput = serde_json::from_str(&json).unwrap();
        assert_eq!(back.stats.kept_pages, 1);
        assert_eq!(back.pages.len(), 2);
    }
}
