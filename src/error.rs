//! Error types for the scantidy library.
//!
//! Only **document-fatal** conditions surface here: a document that cannot be
//! opened, a document whose every page was removed as blank, an output file
//! that cannot be written. Per-step failures inside the pipeline (a page that
//! fails to rasterise, a tesseract invocation that errors out, an OSD report
//! that cannot be parsed) never become a [`ScantidyError`] — each step
//! degrades to a safe default (not blank, 0° rotation, verbatim page copy,
//! no title/date) and logs a warning, so one bad page can never lose the
//! rest of the document.

use std::path::PathBuf;
use thiserror::Error;

/// All fatal errors returned by the scantidy library.
///
/// Returned as `Err(ScantidyError)` from the top-level [`crate::process`]
/// functions; everything recoverable is handled inside the pipeline.
#[derive(Debug, Error)]
pub enum ScantidyError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// Input file was not found at the given path.
    #[error("PDF file not found: '{path}'\nCheck the path exists and is readable.")]
    FileNotFound { path: PathBuf },

    /// Process does not have read permission on the file.
    #[error("Permission denied reading '{path}'\nTry: chmod +r {path:?}")]
    PermissionDenied { path: PathBuf },

    /// The input string is not a valid file path or URL.
    #[error("Invalid input '{input}': not a file path or a valid HTTP/HTTPS URL")]
    InvalidInput { input: String },

    /// HTTP URL was syntactically valid but download failed.
    #[error("Failed to download '{url}': {reason}\nCheck your internet connection.")]
    DownloadFailed { url: String, reason: String },

    /// Download exceeded the configured timeout.
    #[error("Download timed out after {secs}s for '{url}'\nIncrease --download-timeout.")]
    DownloadTimeout { url: String, secs: u64 },

    /// The file exists and was read, but is not a PDF.
    #[error("File is not a valid PDF: '{path}'\nFirst bytes: {magic:?}")]
    NotAPdf { path: PathBuf, magic: [u8; 4] },

    // ── PDF errors ────────────────────────────────────────────────────────
    /// PDF header/trailer/xref is corrupt and cannot be parsed.
    #[error("PDF '{path}' is corrupt: {detail}\nTry repairing with: qpdf --decrypt input.pdf output.pdf")]
    CorruptPdf { path: PathBuf, detail: String },

    /// PDF requires a password but none was provided.
    #[error("PDF '{path}' is encrypted and requires a password.\nProvide it with --password <PASSWORD>.")]
    PasswordRequired { path: PathBuf },

    /// A password was provided but it is wrong.
    #[error("Wrong password for PDF '{path}'")]
    WrongPassword { path: PathBuf },

    /// A source page could not be loaded at all (not a render glitch —
    /// the page object itself is unreadable).
    #[error("Page {page} of '{path}' is unreadable: {detail}")]
    PageUnreadable {
        page: usize,
        path: PathBuf,
        detail: String,
    },

    /// A kept page could not be copied into the output document.
    #[error("Failed to append page {page} to the output document: {detail}")]
    PageAppendFailed { page: usize, detail: String },

    // ── Document-level terminal ───────────────────────────────────────────
    /// Every page was classified as blank; there is nothing to save.
    #[error("All pages of '{path}' were blank and removed — no output written.\nIf the scan is very faint, the blank-page thresholds may be too aggressive.")]
    AllPagesBlank { path: PathBuf },

    // ── I/O errors ────────────────────────────────────────────────────────
    /// Could not create or write the output PDF file.
    #[error("Failed to write output file '{path}': {detail}")]
    OutputWriteFailed { path: PathBuf, detail: String },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Pdfium binding errors ─────────────────────────────────────────────
    /// Could not bind to a pdfium library.
    #[error(
        "Failed to bind to pdfium library: {0}\n\n\
You can:\n\
  • Install libpdfium from your package manager or bblanchon/pdfium-binaries.\n\
  • Place libpdfium next to the scantidy binary.\n\
  • Set PDFIUM_DYNAMIC_LIB_PATH=/path/to/dir containing libpdfium.\n"
    )]
    PdfiumBindingFailed(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_pages_blank_display() {
        let e = ScantidyError::AllPagesBlank {
            path: PathBuf::from("scan0001.pdf"),
        };
        let msg = e.to_string();
        assert!(msg.contains("scan0001.pdf"), "got: {msg}");
        assert!(msg.contains("no output written"), "got: {msg}");
    }

    #[test]
    fn not_a_pdf_display() {
        let e = ScantidyError::NotAPdf {
            path: PathBuf::from("notes.txt"),
            magic: *b"hell",
        };
        assert!(e.to_string().contains("notes.txt"));
    }

    #[test]
    fn page_append_display() {
        let e = ScantidyError::PageAppendFailed {
            page: 3,
            detail: "bad object".into(),
        };
        assert!(e.to_string().contains("page 3"));
        assert!(e.to_string().contains("bad object"));
    }

    #[test]
    fn download_timeout_display() {
        let e = ScantidyError::DownloadTimeout {
            url: "https://example.com/a.pdf".into(),
            secs: 120,
        };
        assert!(e.to_string().contains("120s"));
    }
}
