//! Pipeline stages for scanned-PDF cleanup.
//!
//! Each submodule implements exactly one transformation step. Keeping stages
//! separate makes each independently testable and lets us swap
//! implementations (e.g. a different OCR backend) without touching other
//! stages.
//!
//! ## Data Flow
//!
//! ```text
//! input ──▶ raster ──▶ blank ──▶ orientation ──▶ extract ──▶ date + title
//! (URL/path) (pdfium)  (stats)   (tesseract OSD)  (text/OCR)   (heuristics)
//!                                     │
//!                                     └──▶ searchable ──▶ output document
//!                                          (tesseract PDF, optional)
//! ```
//!
//! 1. [`input`]       — canonicalise the user-supplied path or URL to a local file
//! 2. [`raster`]      — rasterise a page at a requested DPI; pdfium is
//!    blocking, so callers run the whole per-document walk in `spawn_blocking`
//! 3. [`blank`]       — classify a page as blank from grayscale pixel statistics
//! 4. [`orientation`] — detect the rotation needed to make text upright (OSD)
//! 5. [`ocr`]         — the tesseract subprocess boundary (OSD report, TSV
//!    word boxes, searchable single-page PDF)
//! 6. [`enhance`]     — auto-contrast a raster before OCR on noisy scans
//! 7. [`searchable`]  — produce the OCR'd replacement page
//! 8. [`extract`]     — turn a page's text (native or OCR) into scored-title
//!    input: line candidates, a normalisation height, and the full page text
//! 9. [`date`]        — pull a validated `YYYYMMDD` date out of the page text
//! 10. [`title`]      — clean, filter, and score candidates to pick the title

pub mod blank;
pub mod date;
pub mod enhance;
pub mod extract;
pub mod input;
pub mod ocr;
pub mod orientation;
pub mod raster;
pub mod searchable;
pub mod title;
