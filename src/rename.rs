//! Filename policy: which documents qualify for metadata renaming, and how
//! the final output filename is composed.
//!
//! A document is renamed from its extracted title/date only when its original
//! name looks machine-generated — `IMG_0042.pdf`, `scan0012.pdf`, a long
//! digit string, a long alphanumeric blob, or a "New Doc …" app default.
//! Anything a human already named keeps its name with a `_processed` suffix,
//! so the tool never destroys meaningful filenames.

use once_cell::sync::Lazy;
use regex::Regex;

/// Characters that are invalid or dangerous in filenames on at least one
/// mainstream filesystem.
static RE_FILENAME_INVALID: Lazy<Regex> = Lazy::new(|| Regex::new(r#"[\\/*?:"<>|]"#).unwrap());

/// ASCII control characters.
static RE_CONTROL: Lazy<Regex> = Lazy::new(|| Regex::new(r"[\x00-\x1f]").unwrap());

/// Scanner/camera naming patterns. Matched against the stem (extension
/// stripped), case-insensitively, anchored at both ends.
static GENERIC_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"(?i)^IMG_\d+$",          // IMG_0001
        r"(?i)^scan\d+$",          // scan0001
        r"^\d{8,}$",               // 202312141010
        r"(?i)^[a-z0-9]{8,}$",     // random blob like abcd1234
        r"(?i)^New Doc.*$",        // New Doc 2023-12-14
    ]
    .iter()
    .map(|p| Regex::new(p).unwrap())
    .collect()
});

/// Split a filename into `(stem, extension)` where the extension keeps its
/// leading dot. A name without a dot (or a dotfile like `.hidden`) has an
/// empty extension.
pub(crate) fn split_name(filename: &str) -> (&str, &str) {
    match filename.rfind('.') {
        Some(idx) if idx > 0 => filename.split_at(idx),
        _ => (filename, ""),
    }
}

/// Does this filename look machine-generated (scanner or camera assigned)?
///
/// ```
/// use scantidy::is_generic_filename;
///
/// assert!(is_generic_filename("IMG_0042.pdf"));
/// assert!(is_generic_filename("202312141010.pdf"));
/// assert!(!is_generic_filename("Quarterly_Report.pdf"));
/// ```
pub fn is_generic_filename(filename: &str) -> bool {
    let (stem, _) = split_name(filename);
    GENERIC_PATTERNS.iter().any(|p| p.is_match(stem))
}

/// Strip filename-invalid characters and control characters, trim, and
/// truncate to 250 characters.
pub fn sanitize_filename(text: &str) -> String {
    let cleaned = RE_FILENAME_INVALID.replace_all(text, "");
    let cleaned = RE_CONTROL.replace_all(&cleaned, "");
    cleaned.trim().chars().take(250).collect()
}

/// Compose the final output filename from the rename decision.
///
/// Metadata renaming applies only when the original name is generic *and* a
/// title was extracted; the date is appended when available. Everything else
/// falls back to `<stem>_processed<ext>`.
pub fn final_filename(original: &str, title: Option<&str>, date: Option<&str>) -> String {
    let (stem, ext) = split_name(original);

    if is_generic_filename(original) {
        if let Some(title) = title {
            let sanitized = sanitize_filename(title);
            if !sanitized.is_empty() {
                return match date {
                    Some(date) => format!("{sanitized}_{date}{ext}"),
                    None => format!("{sanitized}{ext}"),
                };
            }
        }
    }

    format!("{stem}_processed{ext}")
}
