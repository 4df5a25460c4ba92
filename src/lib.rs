//! # scantidy
//!
//! Cleanup and renaming pipeline for scanned PDFs: drops blank pages,
//! straightens rotated ones, optionally rebuilds each page with a
//! searchable OCR text layer, and renames machine-named files
//! (`IMG_0042.pdf`, `scan0001.pdf`) from the document's own title and date.
//!
//! ## Pipeline
//!
//! ```text
//! path or URL
//!      │
//!      ▼
//! ┌──────────┐   per page   ┌───────────┐  blank  ┌─────────┐
//! │ resolve  │─────────────▶│ blank?    │────────▶│ dropped │
//! │ input    │              └─────┬─────┘         └─────────┘
//! └──────────┘                    │ kept
//!                                 ▼
//!                    first page:  title + date extraction
//!                                 │
//!                                 ▼
//!                          ┌─────────────┐
//!                          │ orientation │  OSD, absolute /Rotate
//!                          └──────┬──────┘
//!                                 ▼
//!                          ┌─────────────┐
//!                          │ searchable? │  OCR text layer (optional)
//!                          └──────┬──────┘
//!                                 ▼
//!                       append to output document
//!                                 │
//!                                 ▼
//!                  save as <title>_<YYYYMMDD>.pdf
//!                  (or <stem>_processed.pdf)
//! ```
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use scantidy::{process, ProcessingConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ProcessingConfig::builder()
//!         .searchable(true)
//!         .languages("jpn+eng")
//!         .build()?;
//!
//!     let output = process("IMG_0042.pdf", &config).await?;
//!     println!("{} pages kept, saved as {}",
//!         output.stats.kept_pages, output.final_filename);
//!     Ok(())
//! }
//! ```
//!
//! ## Requirements
//!
//! - A pdfium dynamic library (system-wide, next to the binary, or pointed
//!   to by `PDFIUM_DYNAMIC_LIB_PATH`).
//! - The `tesseract` binary on `PATH`, with the language data named in
//!   [`ProcessingConfig::languages`] installed.
//!
//! ## Failure model
//!
//! Per-page analysis steps never fail a document: a page that cannot be
//! classified stays in, a page whose orientation cannot be read stays as
//! scanned, a failed OCR conversion falls back to the original page. Only
//! document-level problems (unopenable input, every page blank, output not
//! writable) return a [`ScantidyError`].

pub mod config;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod process;
pub mod progress;
pub mod rename;

pub use config::{ProcessingConfig, ProcessingConfigBuilder};
pub use error::ScantidyError;
pub use output::{PageDisposition, PageReport, ProcessOutput, ProcessStats, RenameDecision};
pub use pipeline::date::extract_date;
pub use process::{process, process_sync};
pub use progress::{NoopProgressCallback, ProcessingProgressCallback, ProgressCallback};
pub use rename::{final_filename, is_generic_filename, sanitize_filename};
