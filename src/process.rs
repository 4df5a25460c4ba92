//! Top-level document processing.
//!
//! [`process`] walks a scanned PDF page by page, drops blank sheets,
//! straightens rotated pages, optionally replaces each page with a
//! searchable OCR'd equivalent, and — when the filename looks
//! machine-generated — derives a better name from the first content
//! page's title and date.
//!
//! pdfium is not thread-safe to call concurrently and its work is CPU
//! bound, so the whole document walk runs on a `spawn_blocking` thread.
//! The async shell only covers input resolution (which may download).

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use pdfium_render::prelude::*;
use tracing::{debug, info, warn};

use crate::config::ProcessingConfig;
use crate::error::ScantidyError;
use crate::output::{PageDisposition, PageReport, ProcessOutput, ProcessStats, RenameDecision};
use crate::pipeline::input::{resolve_input, ResolvedInput};
use crate::pipeline::ocr::OcrEngine;
use crate::pipeline::{blank, date, extract, orientation, searchable, title};
use crate::progress::{NoopProgressCallback, ProgressCallback};
use crate::rename;

/// Process one scanned PDF from a file path or HTTP(S) URL.
///
/// # Example
/// ```rust,no_run
/// use scantidy::{process, ProcessingConfig};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let config = ProcessingConfig::builder().searchable(true).build()?;
///     let output = process("scan0001.pdf", &config).await?;
///     println!("wrote {}", output.final_filename);
///     Ok(())
/// }
/// ```
pub async fn process(input: &str, config: &ProcessingConfig) -> Result<ProcessOutput, ScantidyError> {
    let resolved = resolve_input(input, config.download_timeout_secs).await?;
    let config = config.clone();
    let input = input.to_string();

    tokio::task::spawn_blocking(move || process_blocking(&input, &resolved, &config))
        .await
        .map_err(|e| ScantidyError::Internal(format!("processing thread panicked: {e}")))?
}

/// Blocking variant of [`process`] for synchronous callers.
pub fn process_sync(input: &str, config: &ProcessingConfig) -> Result<ProcessOutput, ScantidyError> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| ScantidyError::Internal(format!("failed to build runtime: {e}")))?;
    runtime.block_on(process(input, config))
}

/// The whole per-document walk; runs on a blocking thread.
fn process_blocking(
    input: &str,
    resolved: &ResolvedInput,
    config: &ProcessingConfig,
) -> Result<ProcessOutput, ScantidyError> {
    let started = Instant::now();
    let path = resolved.path();
    let original_filename = resolved.original_filename();

    let pdfium = bind_pdfium()?;
    let document = open_document(&pdfium, path, config.password.as_deref())?;
    let total_pages = document.pages().len() as usize;
    info!("Opened '{}': {} pages", path.display(), total_pages);

    let progress: ProgressCallback = config
        .progress_callback
        .clone()
        .unwrap_or_else(|| Arc::new(NoopProgressCallback));
    progress.on_document_start(total_pages);

    let engine = OcrEngine::new(&config.languages);
    let needs_rename = rename::is_generic_filename(&original_filename);
    debug!(
        "'{}' looks machine-generated: {}",
        original_filename, needs_rename
    );

    let mut out_doc = pdfium
        .create_new_pdf()
        .map_err(|e| ScantidyError::Internal(format!("failed to create output document: {e}")))?;

    let mut reports: Vec<PageReport> = Vec::with_capacity(total_pages);
    let mut stats = ProcessStats {
        total_pages,
        ..Default::default()
    };
    let mut title: Option<String> = None;
    let mut doc_date: Option<String> = None;
    let mut metadata_done = false;
    let mut dest_index: PdfPageIndex = 0;

    for (index, mut page) in document.pages().iter().enumerate() {
        let page_num = index + 1;
        progress.on_page_start(page_num, total_pages);

        if blank::is_blank_page(&page, page_num, config.blank_dpi) {
            info!("Page {}/{}: blank, dropped", page_num, total_pages);
            stats.blank_pages += 1;
            reports.push(PageReport {
                page_num,
                disposition: PageDisposition::Blank,
                rotation: 0,
                searchable: false,
            });
            progress.on_page_blank(page_num, total_pages);
            continue;
        }

        // Metadata comes from the first content page, before any rotation
        // fix, so the extraction sees the page exactly as scanned.
        if !metadata_done && needs_rename {
            metadata_done = true;
            let extraction = extract::extract_page_text(
                &page,
                page_num,
                config.ocr_dpi,
                config.min_native_text_chars,
                config.min_word_confidence,
                &engine,
            );
            doc_date = date::extract_date(&extraction.full_text);
            title = title::select_title(
                &extraction.candidates,
                extraction.normalization_height,
                doc_date.as_deref(),
            );
            debug!("Metadata from page {}: title={:?} date={:?}", page_num, title, doc_date);
        }

        let detected = orientation::detect_rotation(&page, page_num, config.ocr_dpi, &engine);
        if detected != 0 {
            // Absolute set: OSD already saw the page with its stored
            // rotation applied, so the detected angle is the final one.
            page.set_rotation(degrees_rotation(detected));
            info!("Page {}/{}: rotated {}°", page_num, total_pages, detected);
            stats.rotated_pages += 1;
        }

        // Searchable conversion renders after the rotation fix, so the OCR
        // layer lines up with an upright page.
        let mut page_searchable = false;
        let mut appended = false;
        if config.searchable {
            if let Some(bytes) = searchable::make_searchable(
                &page,
                page_num,
                config.ocr_dpi,
                config.enhance,
                &engine,
            ) {
                match pdfium.load_pdf_from_byte_slice(&bytes, None) {
                    Ok(ocr_doc) => {
                        out_doc
                            .pages_mut()
                            .copy_page_from_document(&ocr_doc, 0, dest_index)
                            .map_err(|e| ScantidyError::PageAppendFailed {
                                page: page_num,
                                detail: e.to_string(),
                            })?;
                        page_searchable = true;
                        appended = true;
                    }
                    Err(e) => {
                        warn!(
                            "Page {}: OCR output unreadable ({}), keeping original",
                            page_num, e
                        );
                    }
                }
            }
        }

        if !appended {
            out_doc
                .pages_mut()
                .copy_page_from_document(&document, index as PdfPageIndex, dest_index)
                .map_err(|e| ScantidyError::PageAppendFailed {
                    page: page_num,
                    detail: e.to_string(),
                })?;
        }
        dest_index += 1;
        stats.kept_pages += 1;
        if page_searchable {
            stats.searchable_pages += 1;
        }

        reports.push(PageReport {
            page_num,
            disposition: PageDisposition::Kept,
            rotation: detected,
            searchable: page_searchable,
        });
        progress.on_page_kept(page_num, total_pages, detected, page_searchable);
    }

    progress.on_document_complete(stats.kept_pages, total_pages);

    if stats.kept_pages == 0 {
        return Err(ScantidyError::AllPagesBlank {
            path: path.to_path_buf(),
        });
    }

    let final_filename =
        rename::final_filename(&original_filename, title.as_deref(), doc_date.as_deref());

    let output_path = if config.dry_run {
        info!("Dry run: would write '{}'", final_filename);
        None
    } else {
        let out_dir = output_dir(resolved, config);
        std::fs::create_dir_all(&out_dir).map_err(|e| ScantidyError::OutputWriteFailed {
            path: out_dir.clone(),
            detail: e.to_string(),
        })?;
        let out_path = out_dir.join(&final_filename);
        out_doc
            .save_to_file(&out_path)
            .map_err(|e| ScantidyError::OutputWriteFailed {
                path: out_path.clone(),
                detail: e.to_string(),
            })?;
        info!("Wrote '{}'", out_path.display());
        Some(out_path)
    };

    stats.total_duration_ms = started.elapsed().as_millis() as u64;
    info!(
        "Done: {}/{} pages kept, {} blank, {} rotated, {} searchable in {}ms",
        stats.kept_pages,
        stats.total_pages,
        stats.blank_pages,
        stats.rotated_pages,
        stats.searchable_pages,
        stats.total_duration_ms
    );

    Ok(ProcessOutput {
        input: input.to_string(),
        final_filename,
        output_path,
        rename: RenameDecision {
            needs_rename,
            title,
            date: doc_date,
        },
        pages: reports,
        stats,
    })
}

/// Bind to pdfium: explicit env path, then alongside the binary, then the
/// system library.
fn bind_pdfium() -> Result<Pdfium, ScantidyError> {
    if let Ok(dir) = std::env::var("PDFIUM_DYNAMIC_LIB_PATH") {
        return Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path(&dir))
            .map(Pdfium::new)
            .map_err(|e| ScantidyError::PdfiumBindingFailed(e.to_string()));
    }

    Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path("./"))
        .or_else(|_| Pdfium::bind_to_system_library())
        .map(Pdfium::new)
        .map_err(|e| ScantidyError::PdfiumBindingFailed(e.to_string()))
}

/// Open the source document, mapping pdfium's error soup to ours.
fn open_document<'a>(
    pdfium: &'a Pdfium,
    path: &std::path::Path,
    password: Option<&'a str>,
) -> Result<PdfDocument<'a>, ScantidyError> {
    pdfium.load_pdf_from_file(path, password).map_err(|e| match e {
        PdfiumError::PdfiumLibraryInternalError(PdfiumInternalError::PasswordError) => {
            if password.is_some() {
                ScantidyError::WrongPassword {
                    path: path.to_path_buf(),
                }
            } else {
                ScantidyError::PasswordRequired {
                    path: path.to_path_buf(),
                }
            }
        }
        other => ScantidyError::CorruptPdf {
            path: path.to_path_buf(),
            detail: other.to_string(),
        },
    })
}

/// Where the output document goes: the configured directory, else next to
/// the input file, else the working directory for downloaded inputs.
fn output_dir(resolved: &ResolvedInput, config: &ProcessingConfig) -> PathBuf {
    if let Some(dir) = &config.output_dir {
        return dir.clone();
    }
    match resolved {
        ResolvedInput::Local(path) => path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map(|p| p.to_path_buf())
            .unwrap_or_else(|| PathBuf::from(".")),
        ResolvedInput::Downloaded { .. } => PathBuf::from("."),
    }
}

fn degrees_rotation(degrees: u32) -> PdfPageRenderRotation {
    match degrees % 360 {
        90 => PdfPageRenderRotation::Degrees90,
        180 => PdfPageRenderRotation::Degrees180,
        270 => PdfPageRenderRotation::Degrees270,
        _ => PdfPageRenderRotation::None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn degrees_map_to_quarter_turns() {
        assert!(matches!(degrees_rotation(0), PdfPageRenderRotation::None));
        assert!(matches!(degrees_rotation(90), PdfPageRenderRotation::Degrees90));
        assert!(matches!(degrees_rotation(180), PdfPageRenderRotation::Degrees180));
        assert!(matches!(degrees_rotation(270), PdfPageRenderRotation::Degrees270));
        assert!(matches!(degrees_rotation(450), PdfPageRenderRotation::Degrees90));
        assert!(matches!(degrees_rotation(45), PdfPageRenderRotation::None));
    }

    #[test]
    fn output_dir_prefers_config() {
        let config = ProcessingConfig::builder().output_dir("/tmp/out").build().unwrap();
        let resolved = ResolvedInput::Local(PathBuf::from("/data/in/scan.pdf"));
        assert_eq!(output_dir(&resolved, &config), PathBuf::from("/tmp/out"));
    }

    #[test]
    fn output_dir_defaults_beside_input() {
        let config = ProcessingConfig::default();
        let resolved = ResolvedInput::Local(PathBuf::from("/data/in/scan.pdf"));
        assert_eq!(output_dir(&resolved, &config), PathBuf::from("/data/in"));
    }

    #[test]
    fn output_dir_bare_filename_uses_cwd() {
        let config = ProcessingConfig::default();
        let resolved = ResolvedInput::Local(PathBuf::from("scan.pdf"));
        assert_eq!(output_dir(&resolved, &config), PathBuf::from("."));
    }
}
