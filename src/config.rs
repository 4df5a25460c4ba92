//! Configuration types for scanned-PDF processing.
//!
//! All processing behaviour is controlled through [`ProcessingConfig`], built
//! via its [`ProcessingConfigBuilder`]. Keeping every knob in one struct makes
//! it trivial to share configs across threads, log them, and diff two runs to
//! understand why their outputs differ.
//!
//! # Design choice: builder over constructor
//! A dozen-field constructor is unreadable and breaks on every new field.
//! The builder pattern lets callers set only what they care about and rely on
//! well-documented defaults for the rest.

use crate::error::ScantidyError;
use crate::progress::ProgressCallback;
use std::fmt;
use std::path::PathBuf;

/// Configuration for processing one or more scanned PDFs.
///
/// Built via [`ProcessingConfig::builder()`] or using
/// [`ProcessingConfig::default()`].
///
/// # Example
/// ```rust
/// use scantidy::ProcessingConfig;
///
/// let config = ProcessingConfig::builder()
///     .searchable(true)
///     .enhance(true)
///     .languages("jpn+eng")
///     .build()
///     .unwrap();
/// ```
#[derive(Clone)]
pub struct ProcessingConfig {
    /// Replace each kept page with an OCR'd copy carrying an invisible text
    /// layer. Default: false.
    ///
    /// When a page's OCR conversion fails, the original page is copied
    /// verbatim instead — a failed OCR step never blocks the document.
    pub searchable: bool,

    /// Auto-contrast each raster (2% clip) before OCR. Default: false.
    ///
    /// Helps noisy or washed-out scans; on clean renders it is a no-op cost.
    /// Only consulted when `searchable` is on.
    pub enhance: bool,

    /// Tesseract language string, e.g. `"jpn+eng"`. Default: `"jpn+eng"`.
    ///
    /// Passed through to `tesseract -l`. Both recognition paths (searchable
    /// conversion and title-candidate word boxes) use the same languages.
    pub languages: String,

    /// DPI for the blank-page classifier's raster. Default: 72.
    ///
    /// Blank detection only needs population statistics over pixel
    /// intensities; 72 DPI keeps the raster tiny and the check cheap.
    pub blank_dpi: u32,

    /// DPI for OCR rasters (orientation detection, word boxes, searchable
    /// conversion). Default: 150.
    ///
    /// 150 DPI is the sweet spot: glyphs are sharp enough for tesseract while
    /// memory stays bounded on large page sizes.
    pub ocr_dpi: u32,

    /// Minimum number of non-whitespace characters in a page's native text
    /// layer before the native extraction path is trusted. Default: 50.
    ///
    /// Below this the page is treated as a scan and OCR word boxes are used
    /// for title candidates instead.
    pub min_native_text_chars: usize,

    /// Minimum tesseract word confidence (0–100) for a word to participate
    /// in title-candidate lines. Default: 30.0.
    pub min_word_confidence: f32,

    /// Directory to write the output document into. Default: alongside the
    /// input file.
    pub output_dir: Option<PathBuf>,

    /// Run the whole pipeline but write nothing. Default: false.
    ///
    /// The returned [`crate::output::ProcessOutput`] still carries the final
    /// filename the run would have produced.
    pub dry_run: bool,

    /// PDF user password for encrypted documents.
    pub password: Option<String>,

    /// Download timeout for URL inputs in seconds. Default: 120.
    pub download_timeout_secs: u64,

    /// Optional per-page progress callback for front ends.
    pub progress_callback: Option<ProgressCallback>,
}

impl Default for ProcessingConfig {
    fn default() -> Self {
        Self {
            searchable: false,
            enhance: false,
            languages: "jpn+eng".to_string(),
            blank_dpi: 72,
            ocr_dpi: 150,
            min_native_text_chars: 50,
            min_word_confidence: 30.0,
            output_dir: None,
            dry_run: false,
            password: None,
            download_timeout_secs: 120,
            progress_callback: None,
        }
    }
}

impl fmt::Debug for ProcessingConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProcessingConfig")
            .field("searchable", &self.searchable)
            .field("enhance", &self.enhance)
            .field("languages", &self.languages)
            .field("blank_dpi", &self.blank_dpi)
            .field("ocr_dpi", &self.ocr_dpi)
            .field("min_native_text_chars", &self.min_native_text_chars)
            .field("min_word_confidence", &self.min_word_confidence)
            .field("output_dir", &self.output_dir)
            .field("dry_run", &self.dry_run)
            .field(
                "progress_callback",
                &self.progress_callback.as_ref().map(|_| "<dyn callback>"),
            )
            .finish()
    }
}

impl ProcessingConfig {
    /// Create a new builder for `ProcessingConfig`.
    pub fn builder() -> ProcessingConfigBuilder {
        ProcessingConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`ProcessingConfig`].
#[derive(Debug)]
pub struct ProcessingConfigBuilder {
    config: ProcessingConfig,
}

impl ProcessingConfigBuilder {
    pub fn searchable(mut self, v: bool) -> Self {
        self.config.searchable = v;
        self
    }

    pub fn enhance(mut self, v: bool) -> Self {
        self.config.enhance = v;
        self
    }

    pub fn languages(mut self, langs: impl Into<String>) -> Self {
        self.config.languages = langs.into();
        self
    }

    pub fn blank_dpi(mut self, dpi: u32) -> Self {
        self.config.blank_dpi = dpi.clamp(36, 300);
        self
    }

    pub fn ocr_dpi(mut self, dpi: u32) -> Self {
        self.config.ocr_dpi = dpi.clamp(72, 400);
        self
    }

    pub fn min_native_text_chars(mut self, n: usize) -> Self {
        self.config.min_native_text_chars = n;
        self
    }

    pub fn min_word_confidence(mut self, conf: f32) -> Self {
        self.config.min_word_confidence = conf.clamp(0.0, 100.0);
        self
    }

    pub fn output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.output_dir = Some(dir.into());
        self
    }

    pub fn dry_run(mut self, v: bool) -> Self {
        self.config.dry_run = v;
        self
    }

    pub fn password(mut self, pwd: impl Into<String>) -> Self {
        self.config.password = Some(pwd.into());
        self
    }

    pub fn download_timeout_secs(mut self, secs: u64) -> Self {
        self.config.download_timeout_secs = secs;
        self
    }

    pub fn progress_callback(mut self, cb: ProgressCallback) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<ProcessingConfig, ScantidyError> {
        let c = &self.config;
        if c.languages.trim().is_empty() {
            return Err(ScantidyError::InvalidConfig(
                "OCR language string must not be empty (e.g. \"jpn+eng\")".into(),
            ));
        }
        if c.ocr_dpi < 72 || c.ocr_dpi > 400 {
            return Err(ScantidyError::InvalidConfig(format!(
                "OCR DPI must be 72–400, got {}",
                c.ocr_dpi
            )));
        }
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = ProcessingConfig::builder().build().unwrap();
        assert!(!config.searchable);
        assert_eq!(config.languages, "jpn+eng");
        assert_eq!(config.blank_dpi, 72);
        assert_eq!(config.ocr_dpi, 150);
        assert_eq!(config.min_native_text_chars, 50);
    }

    #[test]
    fn builder_clamps_dpi() {
        let config = ProcessingConfig::builder().ocr_dpi(10_000).build().unwrap();
        assert_eq!(config.ocr_dpi, 400);
        let config = ProcessingConfig::builder().blank_dpi(1).build().unwrap();
        assert_eq!(config.blank_dpi, 36);
    }

    #[test]
    fn empty_languages_rejected() {
        let err = ProcessingConfig::builder().languages("  ").build();
        assert!(matches!(err, Err(ScantidyError::InvalidConfig(_))));
    }

    #[test]
    fn debug_does_not_require_callback_debug() {
        use crate::progress::NoopProgressCallback;
        use std::sync::Arc;
        let config = ProcessingConfig::builder()
            .progress_callback(Arc::new(NoopProgressCallback))
            .build()
            .unwrap();
        let s = format!("{config:?}");
        assert!(s.contains("<dyn callback>"));
    }
}
