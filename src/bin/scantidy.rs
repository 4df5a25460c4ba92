//! CLI binary for scantidy.
//!
//! A thin shim over the library crate that maps CLI flags to
//! `ProcessingConfig`, handles single-file and recursive directory modes,
//! and prints results.

use anyhow::{Context, Result};
use clap::Parser;
use futures::stream::{self, StreamExt};
use indicatif::{ProgressBar, ProgressStyle};
use scantidy::{
    process, ProcessOutput, ProcessingConfig, ProcessingProgressCallback, ProgressCallback,
};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}
fn cyan(s: &str) -> String {
    format!("\x1b[36m{s}\x1b[0m")
}

// ── CLI progress callback using indicatif ────────────────────────────────────

/// Terminal progress callback: renders a live per-page progress bar and
/// per-page log lines using [indicatif].
struct CliProgressCallback {
    bar: ProgressBar,
}

impl CliProgressCallback {
    /// Create a callback whose bar length is set by `on_document_start`
    /// once the page count is known.
    fn new_dynamic() -> Arc<Self> {
        let bar = ProgressBar::new(0);

        let spinner_style = ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]);

        bar.set_style(spinner_style);
        bar.set_prefix("Preparing");
        bar.set_message("Opening PDF…");
        bar.enable_steady_tick(Duration::from_millis(80));

        Arc::new(Self { bar })
    }

    fn activate_bar(&self, total: usize) {
        let progress_style = ProgressStyle::with_template(
            "{spinner:.cyan} {prefix:.bold}  \
             [{bar:42.green/238}] {pos:>3}/{len} pages  \
             ⏱ {elapsed_precise}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏  ")
        .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]);

        self.bar.set_length(total as u64);
        self.bar.set_style(progress_style);
        self.bar.set_prefix("Processing");
    }

    fn finish(&self) {
        self.bar.finish_and_clear();
    }
}

impl ProcessingProgressCallback for CliProgressCallback {
    fn on_document_start(&self, total_pages: usize) {
        self.activate_bar(total_pages);
    }

    fn on_page_start(&self, page_num: usize, _total: usize) {
        self.bar.set_message(format!("page {page_num}"));
    }

    fn on_page_blank(&self, page_num: usize, total: usize) {
        self.bar.println(format!(
            "  {} Page {:>3}/{:<3}  {}",
            cyan("∅"),
            page_num,
            total,
            dim("blank, dropped"),
        ));
        self.bar.inc(1);
    }

    fn on_page_kept(&self, page_num: usize, total: usize, rotation: u32, searchable: bool) {
        let mut notes = Vec::new();
        if rotation != 0 {
            notes.push(format!("rotated {rotation}°"));
        }
        if searchable {
            notes.push("searchable".to_string());
        }
        self.bar.println(format!(
            "  {} Page {:>3}/{:<3}  {}",
            green("✓"),
            page_num,
            total,
            dim(&if notes.is_empty() {
                "kept".to_string()
            } else {
                notes.join(", ")
            }),
        ));
        self.bar.inc(1);
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Clean up a single scan (blank removal + auto-rotation + renaming)
  scantidy IMG_0042.pdf

  # Also rebuild each page with a searchable OCR text layer
  scantidy --searchable scan0001.pdf

  # Faint scan: stretch contrast before OCR
  scantidy --searchable --enhance scan0001.pdf

  # Process a whole directory tree, four documents at a time
  scantidy ~/scans -o ~/清書 -c 4

  # See what would happen without writing anything
  scantidy --dry-run ~/scans

  # Process a scanner-upload URL
  scantidy https://nas.local/scans/IMG_0042.pdf -o ./out

  # Machine-readable run report
  scantidy --json IMG_0042.pdf > report.json

OUTPUT NAMING:
  Machine-generated names (IMG_0042.pdf, scan0001.pdf, 20240315103000.pdf)
  are replaced with <title>_<YYYYMMDD>.pdf derived from the first content
  page. Files that already have a meaningful name, or whose title cannot be
  read, become <stem>_processed.pdf.

ENVIRONMENT VARIABLES:
  SCANTIDY_LANGUAGES         OCR languages (default jpn+eng)
  SCANTIDY_OCR_DPI           OCR raster DPI (default 150)
  SCANTIDY_CONCURRENCY       Parallel documents in directory mode
  PDFIUM_DYNAMIC_LIB_PATH    Directory containing libpdfium

SETUP:
  scantidy needs two native pieces:
  1. libpdfium  — from your package manager or bblanchon/pdfium-binaries,
                  installed system-wide, next to the binary, or pointed to
                  by PDFIUM_DYNAMIC_LIB_PATH.
  2. tesseract  — on PATH, with the language data you plan to use
                  (e.g. tesseract-ocr-jpn for Japanese).
"#;

/// Clean up scanned PDFs: drop blank pages, fix rotation, OCR, rename.
#[derive(Parser, Debug)]
#[command(
    name = "scantidy",
    version,
    about = "Clean up scanned PDFs: drop blank pages, fix rotation, OCR, rename",
    long_about = "Process scanned PDF documents (local files, directories, or URLs): remove \
blank pages, straighten upside-down and sideways pages, optionally rebuild each page with a \
searchable OCR text layer, and rename machine-named files from the document's own title and date.",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// PDF file, directory of PDFs, or HTTP/HTTPS URL.
    input: String,

    /// Directory to write processed documents into (default: beside each input).
    #[arg(short, long, env = "SCANTIDY_OUTPUT_DIR")]
    output_dir: Option<PathBuf>,

    /// Replace each page with a searchable OCR'd copy.
    #[arg(short, long, env = "SCANTIDY_SEARCHABLE")]
    searchable: bool,

    /// Auto-contrast pages before OCR (helps faint scans).
    #[arg(long, env = "SCANTIDY_ENHANCE")]
    enhance: bool,

    /// Analyse and report, but write nothing.
    #[arg(long, env = "SCANTIDY_DRY_RUN")]
    dry_run: bool,

    /// Tesseract language string, e.g. jpn+eng or deu.
    #[arg(short, long, env = "SCANTIDY_LANGUAGES", default_value = "jpn+eng")]
    languages: String,

    /// OCR raster DPI (72–400).
    #[arg(long, env = "SCANTIDY_OCR_DPI", default_value_t = 150,
          value_parser = clap::value_parser!(u32).range(72..=400))]
    ocr_dpi: u32,

    /// Documents processed in parallel in directory mode.
    #[arg(short, long, env = "SCANTIDY_CONCURRENCY", default_value_t = 2)]
    concurrency: usize,

    /// PDF user password for encrypted documents.
    #[arg(long, env = "SCANTIDY_PASSWORD")]
    password: Option<String>,

    /// HTTP download timeout in seconds.
    #[arg(long, env = "SCANTIDY_DOWNLOAD_TIMEOUT", default_value_t = 120)]
    download_timeout: u64,

    /// Output a structured JSON run report instead of human-readable text.
    #[arg(long, env = "SCANTIDY_JSON")]
    json: bool,

    /// Disable progress bars.
    #[arg(long, env = "SCANTIDY_NO_PROGRESS")]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "SCANTIDY_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "SCANTIDY_QUIET")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // Suppress INFO-level library logs when the progress bar is active;
    // the bar provides all the feedback that matters to the user.
    let show_progress = !cli.quiet && !cli.no_progress && !cli.json;
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || show_progress {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    let input_path = Path::new(&cli.input);
    if input_path.is_dir() {
        run_directory(&cli, input_path, show_progress).await
    } else {
        run_single(&cli, show_progress).await
    }
}

/// Process one file or URL.
async fn run_single(cli: &Cli, show_progress: bool) -> Result<()> {
    let progress_cb = if show_progress {
        Some(CliProgressCallback::new_dynamic())
    } else {
        None
    };

    let config = build_config(
        cli,
        progress_cb
            .clone()
            .map(|cb| cb as Arc<dyn ProcessingProgressCallback>),
    )?;

    let result = process(&cli.input, &config).await;
    if let Some(cb) = &progress_cb {
        cb.finish();
    }
    let output = result.context("Processing failed")?;

    if cli.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&output).context("Failed to serialise output")?
        );
    } else if !cli.quiet {
        print_summary(&output);
    }

    Ok(())
}

/// Process every PDF under a directory, `concurrency` documents at a time.
async fn run_directory(cli: &Cli, dir: &Path, show_progress: bool) -> Result<()> {
    let mut pdfs = Vec::new();
    collect_pdfs(dir, &mut pdfs)
        .with_context(|| format!("Failed to scan directory {}", dir.display()))?;
    pdfs.sort();

    if pdfs.is_empty() {
        eprintln!("No PDF files found under {}", dir.display());
        return Ok(());
    }

    // Per-page bars would interleave across documents; in batch mode one
    // documents-level bar is the readable choice.
    let bar = if show_progress {
        let bar = ProgressBar::new(pdfs.len() as u64);
        bar.set_style(
            ProgressStyle::with_template(
                "{spinner:.cyan} {prefix:.bold}  \
                 [{bar:42.green/238}] {pos:>3}/{len} documents  ⏱ {elapsed_precise}",
            )
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("█▉▊▋▌▍▎▏  "),
        );
        bar.set_prefix("Processing");
        bar.enable_steady_tick(Duration::from_millis(80));
        Some(bar)
    } else {
        None
    };

    let config = build_config(cli, None)?;
    let concurrency = cli.concurrency.max(1);

    let results: Vec<(PathBuf, Result<ProcessOutput, scantidy::ScantidyError>)> =
        stream::iter(pdfs.into_iter().map(|path| {
            let config = config.clone();
            let bar = bar.clone();
            async move {
                let input = path.display().to_string();
                let result = process(&input, &config).await;
                if let Some(bar) = &bar {
                    match &result {
                        Ok(output) => bar.println(format!(
                            "  {} {}  →  {}",
                            green("✓"),
                            path.display(),
                            bold(&output.final_filename),
                        )),
                        Err(e) => bar.println(format!(
                            "  {} {}  {}",
                            red("✗"),
                            path.display(),
                            red(&e.to_string().lines().next().unwrap_or_default().to_string()),
                        )),
                    }
                    bar.inc(1);
                }
                (path, result)
            }
        }))
        .buffer_unordered(concurrency)
        .collect()
        .await;

    if let Some(bar) = &bar {
        bar.finish_and_clear();
    }

    let succeeded: Vec<&ProcessOutput> = results.iter().filter_map(|(_, r)| r.as_ref().ok()).collect();
    let failed = results.len() - succeeded.len();

    if cli.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&succeeded).context("Failed to serialise outputs")?
        );
    } else if !cli.quiet {
        eprintln!(
            "{} {}/{} documents processed{}",
            if failed == 0 { green("✔") } else { cyan("⚠") },
            bold(&succeeded.len().to_string()),
            results.len(),
            if failed == 0 {
                String::new()
            } else {
                format!("  ({} failed)", red(&failed.to_string()))
            },
        );
    }

    if failed > 0 && succeeded.is_empty() {
        anyhow::bail!("all {} documents failed", results.len());
    }
    Ok(())
}

/// Recursively collect `.pdf` files (case-insensitive extension match).
fn collect_pdfs(dir: &Path, out: &mut Vec<PathBuf>) -> io::Result<()> {
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_dir() {
            collect_pdfs(&path, out)?;
        } else if path
            .extension()
            .map(|e| e.eq_ignore_ascii_case("pdf"))
            .unwrap_or(false)
        {
            out.push(path);
        }
    }
    Ok(())
}

/// Human-readable single-document summary on stderr.
fn print_summary(output: &ProcessOutput) {
    let stats = &output.stats;
    match &output.output_path {
        Some(path) => eprintln!(
            "{}  {}/{} pages kept  {}ms  →  {}",
            green("✔"),
            stats.kept_pages,
            stats.total_pages,
            stats.total_duration_ms,
            bold(&path.display().to_string()),
        ),
        None => eprintln!(
            "{}  dry run: {}/{} pages kept, would write {}",
            cyan("◆"),
            stats.kept_pages,
            stats.total_pages,
            bold(&output.final_filename),
        ),
    }
    let mut details = Vec::new();
    if stats.blank_pages > 0 {
        details.push(format!("{} blank removed", stats.blank_pages));
    }
    if stats.rotated_pages > 0 {
        details.push(format!("{} rotated", stats.rotated_pages));
    }
    if stats.searchable_pages > 0 {
        details.push(format!("{} made searchable", stats.searchable_pages));
    }
    if output.rename.needs_rename {
        details.push(match (&output.rename.title, &output.rename.date) {
            (Some(t), Some(d)) => format!("renamed from title \"{t}\" and date {d}"),
            (Some(t), None) => format!("renamed from title \"{t}\""),
            _ => "machine-generated name, no usable title found".to_string(),
        });
    }
    if !details.is_empty() {
        eprintln!("   {}", dim(&details.join("  ·  ")));
    }
}

/// Map CLI args to `ProcessingConfig`.
fn build_config(cli: &Cli, progress: Option<ProgressCallback>) -> Result<ProcessingConfig> {
    let mut builder = ProcessingConfig::builder()
        .searchable(cli.searchable)
        .enhance(cli.enhance)
        .languages(cli.languages.clone())
        .ocr_dpi(cli.ocr_dpi)
        .dry_run(cli.dry_run)
        .download_timeout_secs(cli.download_timeout);

    if let Some(dir) = &cli.output_dir {
        builder = builder.output_dir(dir.clone());
    }
    if let Some(pwd) = &cli.password {
        builder = builder.password(pwd.clone());
    }
    if let Some(cb) = progress {
        builder = builder.progress_callback(cb);
    }

    builder.build().context("Invalid configuration")
}
