//! Input resolution: normalise a user-supplied path or URL to a local file.
//!
//! ## Why download to a temp file?
//!
//! pdfium requires a file-system path — it cannot stream from a byte buffer.
//! Downloading to a `TempDir` gives us a path pdfium can open while ensuring
//! cleanup happens automatically when `ResolvedInput` is dropped, even if
//! the process panics. We validate the PDF magic bytes (`%PDF`) before
//! returning so callers get a meaningful error rather than a pdfium crash.

use crate::error::ScantidyError;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tracing::{debug, info};

/// The resolved input — either a local path or a downloaded temp file.
pub enum ResolvedInput {
    /// Input was already a local file.
    Local(PathBuf),
    /// Input was a URL; PDF downloaded to a temp directory.
    /// The `TempDir` is kept alive to prevent cleanup until processing completes.
    Downloaded { path: PathBuf, _temp_dir: TempDir },
}

impl ResolvedInput {
    /// Get the path to the PDF file regardless of how it was resolved.
    pub fn path(&self) -> &Path {
        match self {
            ResolvedInput::Local(p) => p,
            ResolvedInput::Downloaded { path, .. } => path,
        }
    }

    /// The original filename the rename policy should judge.
    ///
    /// For downloads this is the name extracted from the URL, which is what
    /// a scanner-upload service would have produced.
    pub fn original_filename(&self) -> String {
        self.path()
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "document.pdf".to_string())
    }
}

/// Check if the input string looks like a URL.
pub fn is_url(input: &str) -> bool {
    input.starts_with("http://") || input.starts_with("https://")
}

/// Resolve the input string to a local PDF file path.
///
/// If the input is a URL, download it to a temporary directory.
/// If the input is a local file, validate it exists and is readable.
pub async fn resolve_input(input: &str, timeout_secs: u64) -> Result<ResolvedInput, ScantidyError> {
    if is_url(input) {
        download_url(input, timeout_secs).await
    } else {
        resolve_local(input)
    }
}

/// Resolve a local file path, validating existence and PDF magic bytes.
fn resolve_local(path_str: &str) -> Result<ResolvedInput, ScantidyError> {
    let path = PathBuf::from(path_str);

    if !path.exists() {
        return Err(ScantidyError::FileNotFound { path });
    }

    // Check read permission by attempting to open
    match std::fs::File::open(&path) {
        Ok(mut f) => {
            // Verify PDF magic bytes
            use std::io::Read;
            let mut magic = [0u8; 4];
            if f.read_exact(&mut magic).is_ok() && &magic != b"%PDF" {
                return Err(ScantidyError::NotAPdf { path, magic });
            }
        }
        Err(e) if e.kind() == std::io::ErrorKind::PermissionDenied => {
            return Err(ScantidyError::PermissionDenied { path });
        }
        Err(_) => {
            return Err(ScantidyError::FileNotFound { path });
        }
    }

    debug!("Resolved local PDF: {}", path.display());
    Ok(ResolvedInput::Local(path))
}

/// Download a URL to a temporary directory and return the path.
async fn download_url(url: &str, timeout_secs: u64) -> Result<ResolvedInput, ScantidyError> {
    info!("Downloading PDF from: {}", url);

    let client = reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(timeout_secs))
        .build()
        .map_err(|e| ScantidyError::DownloadFailed {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

    let response = client.get(url).send().await.map_err(|e| {
        if e.is_timeout() {
            ScantidyError::DownloadTimeout {
                url: url.to_string(),
                secs: timeout_secs,
            }
        } else {
            ScantidyError::DownloadFailed {
                url: url.to_string(),
                reason: e.to_string(),
            }
        }
    })?;

    if !response.status().is_success() {
        return Err(ScantidyError::DownloadFailed {
            url: url.to_string(),
            reason: format!("HTTP {}", response.status()),
        });
    }

    let filename = extract_filename(url);

    let temp_dir = TempDir::new().map_err(|e| ScantidyError::Internal(e.to_string()))?;
    let file_path = temp_dir.path().join(&filename);

    let bytes = response
        .bytes()
        .await
        .map_err(|e| ScantidyError::DownloadFailed {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

    // Verify PDF magic bytes before writing anything to disk.
    if bytes.len() >= 4 && &bytes[..4] != b"%PDF" {
        let mut magic = [0u8; 4];
        magic.copy_from_slice(&bytes[..4]);
        return Err(ScantidyError::NotAPdf {
            path: file_path,
            magic,
        });
    }

    tokio::fs::write(&file_path, &bytes)
        .await
        .map_err(|e| ScantidyError::Internal(format!("Failed to write temp file: {}", e)))?;

    info!("Downloaded to: {}", file_path.display());

    Ok(ResolvedInput::Downloaded {
        path: file_path,
        _temp_dir: temp_dir,
    })
}

/// Extract a reasonable filename from the URL path.
fn extract_filename(url: &str) -> String {
    if let Ok(parsed) = reqwest::Url::parse(url) {
        if let Some(mut segments) = parsed.path_segments() {
            if let Some(last) = segments.next_back() {
                if !last.is_empty() && last.contains('.') {
                    return last.to_string();
                }
            }
        }
    }

    "downloaded.pdf".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_url() {
        assert!(is_url("https://example.com/doc.pdf"));
        assert!(is_url("http://example.com/doc.pdf"));
        assert!(!is_url("/tmp/doc.pdf"));
        assert!(!is_url("doc.pdf"));
        assert!(!is_url(""));
    }

    #[test]
    fn test_extract_filename() {
        assert_eq!(
            extract_filename("https://example.com/uploads/IMG_0042.pdf"),
            "IMG_0042.pdf"
        );
        assert_eq!(extract_filename("https://example.com/"), "downloaded.pdf");
    }

    #[test]
    fn local_missing_file_is_not_found() {
        let result = resolve_local("/definitely/not/a/real/file.pdf");
        assert!(matches!(result, Err(ScantidyError::FileNotFound { .. })));
    }

    #[test]
    fn local_non_pdf_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        std::fs::write(&path, b"hello world").unwrap();

        let result = resolve_local(path.to_str().unwrap());
        assert!(matches!(result, Err(ScantidyError::NotAPdf { .. })));
    }

    #[test]
    fn local_pdf_magic_accepted() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ok.pdf");
        std::fs::write(&path, b"%PDF-1.7\n%stub").unwrap();

        let resolved = resolve_local(path.to_str().unwrap()).unwrap();
        assert_eq!(resolved.original_filename(), "ok.pdf");
    }
}
