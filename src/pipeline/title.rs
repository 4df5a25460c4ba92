//! Title selection from scored line candidates.
//!
//! The title is the visually dominant line near the top of the first
//! content page: score = sqrt(font size) * position bonus, where the
//! bonus favours the top band of the page and penalises the bottom half.
//! Ties and equal scores resolve to the earliest candidate so the output
//! is stable run to run.

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, trace};

/// Characters that never belong in a title: keep word chars (which in
/// Unicode mode includes CJK), whitespace, and hyphens.
static RE_TITLE_STRIP: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^\w\s\-]").unwrap());

/// A candidate that survives digit-only rejection.
static RE_ONLY_DIGITS_DASHES: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[\d\s\-]+$").unwrap());

static RE_NON_DIGIT: Lazy<Regex> = Lazy::new(|| Regex::new(r"\D").unwrap());

use super::extract::Candidate;

/// A candidate with its computed score, for diagnostics and selection.
#[derive(Debug, Clone)]
pub struct ScoredCandidate {
    pub text: String,
    pub size: f32,
    pub score: f32,
    pub normalized_top: f32,
}

/// Clean candidate text for use as a title.
///
/// Deletes symbols outright (so "Q3:Report" reads "Q3Report", not two
/// words), closes the gaps OCR inserts between CJK characters, and trims.
/// Returns `None` when nothing usable remains.
pub fn clean_candidate_text(text: &str) -> Option<String> {
    let stripped = RE_TITLE_STRIP.replace_all(text, "");
    let closed = close_cjk_gaps(&stripped);
    let cleaned = closed.trim().to_string();

    if cleaned.chars().count() < 3 {
        return None;
    }
    if RE_ONLY_DIGITS_DASHES.is_match(&cleaned) {
        return None;
    }
    Some(cleaned)
}

/// Drop whitespace sitting between two CJK characters.
///
/// OCR of Japanese text reports each glyph as its own word, so the
/// joined line reads "請 求 書". Latin word gaps keep their original
/// spacing untouched.
fn close_cjk_gaps(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len());
    let mut i = 0;

    while i < chars.len() {
        if chars[i].is_whitespace() {
            let mut j = i;
            while j < chars.len() && chars[j].is_whitespace() {
                j += 1;
            }
            let prev = out.chars().next_back();
            let next = chars.get(j).copied();
            let both_cjk = matches!((prev, next), (Some(p), Some(n)) if is_cjk(p) && is_cjk(n));
            if !both_cjk {
                out.extend(chars[i..j].iter());
            }
            i = j;
        } else {
            out.push(chars[i]);
            i += 1;
        }
    }
    out
}

fn is_cjk(c: char) -> bool {
    matches!(c,
        '\u{4E00}'..='\u{9FAF}'   // CJK unified ideographs
        | '\u{3040}'..='\u{309F}' // hiragana
        | '\u{30A0}'..='\u{30FF}' // katakana
    )
}

/// Position bonus from the candidate's normalised vertical position.
fn position_bonus(normalized_top: f32) -> f32 {
    let bonus = if normalized_top < 0.10 {
        3.0
    } else if normalized_top < 0.20 {
        2.0
    } else if normalized_top < 0.35 {
        1.3
    } else {
        1.0
    };
    if normalized_top > 0.40 {
        bonus * 0.5
    } else {
        bonus
    }
}

/// Score all candidates, preserving input order.
///
/// Candidates that clean down to nothing, or whose digits merely repeat
/// the already-extracted document date, are skipped.
pub fn rank_candidates(
    candidates: &[Candidate],
    normalization_height: f32,
    date: Option<&str>,
) -> Vec<ScoredCandidate> {
    let height = if normalization_height > 0.0 {
        normalization_height
    } else {
        1000.0
    };

    let mut scored = Vec::new();
    for candidate in candidates {
        let cleaned = match clean_candidate_text(&candidate.text) {
            Some(c) => c,
            None => continue,
        };

        // A line that is just the document date restated is not a title.
        if let Some(date) = date {
            let digits: String = RE_NON_DIGIT.replace_all(&cleaned, "").into_owned();
            if !digits.is_empty() && date.contains(&digits) {
                trace!("skipping date-echo candidate: {:?}", cleaned);
                continue;
            }
        }

        let normalized_top = (candidate.top / height).clamp(0.0, 1.0);
        let score = candidate.size.max(0.0).sqrt() * position_bonus(normalized_top);

        scored.push(ScoredCandidate {
            text: cleaned,
            size: candidate.size,
            score,
            normalized_top,
        });
    }
    scored
}

/// Pick the highest-scoring candidate; first seen wins ties.
pub fn select_title(
    candidates: &[Candidate],
    normalization_height: f32,
    date: Option<&str>,
) -> Option<String> {
    let scored = rank_candidates(candidates, normalization_height, date);
    for c in &scored {
        debug!(
            "title candidate: {:?} size={:.1} top={:.2} score={:.2}",
            c.text, c.size, c.normalized_top, c.score
        );
    }

    let mut best: Option<&ScoredCandidate> = None;
    for candidate in &scored {
        match best {
            Some(current) if candidate.score <= current.score => {}
            _ => best = Some(candidate),
        }
    }

    best.map(|c| c.text.clone())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cand(text: &str, size: f32, top: f32) -> Candidate {
        Candidate {
            text: text.to_string(),
            size,
            top,
        }
    }

    #[test]
    fn large_top_line_wins() {
        let candidates = vec![
            cand("Annual Report", 36.0, 50.0),
            cand("Prepared by finance", 12.0, 300.0),
        ];
        assert_eq!(
            select_title(&candidates, 1000.0, None),
            Some("Annual Report".to_string())
        );
    }

    #[test]
    fn position_beats_raw_size() {
        // A 20pt line in the top band outranks a 40pt line at the bottom:
        // sqrt(20)*3.0 = 13.4 versus sqrt(40)*0.5 = 3.16.
        let candidates = vec![
            cand("Giant footer", 40.0, 900.0),
            cand("Modest header", 20.0, 50.0),
        ];
        assert_eq!(
            select_title(&candidates, 1000.0, None),
            Some("Modest header".to_string())
        );
    }

    #[test]
    fn equal_scores_keep_first_seen() {
        let candidates = vec![cand("First", 20.0, 50.0), cand("Second", 20.0, 50.0)];
        assert_eq!(
            select_title(&candidates, 1000.0, None),
            Some("First".to_string())
        );
    }

    #[test]
    fn digit_only_lines_rejected() {
        let candidates = vec![cand("2024-001", 30.0, 40.0), cand("Meeting Minutes", 18.0, 120.0)];
        assert_eq!(
            select_title(&candidates, 1000.0, None),
            Some("Meeting Minutes".to_string())
        );
    }

    #[test]
    fn date_echo_rejected() {
        let candidates = vec![
            cand("2024年03月15日", 30.0, 40.0),
            cand("議事録", 24.0, 90.0),
        ];
        assert_eq!(
            select_title(&candidates, 1000.0, Some("20240315")),
            Some("議事録".to_string())
        );
    }

    #[test]
    fn too_short_after_cleaning_rejected() {
        let candidates = vec![cand("**", 30.0, 40.0), cand("ok then", 10.0, 60.0)];
        assert_eq!(
            select_title(&candidates, 1000.0, None),
            Some("ok then".to_string())
        );
    }

    #[test]
    fn no_candidates_no_title() {
        assert_eq!(select_title(&[], 1000.0, None), None);
    }

    #[test]
    fn cjk_gaps_closed() {
        assert_eq!(close_cjk_gaps("請 求 書"), "請求書");
        assert_eq!(close_cjk_gaps("令和 6 年"), "令和 6 年");
        assert_eq!(close_cjk_gaps("hello world"), "hello world");
        assert_eq!(close_cjk_gaps("見積 Invoice 書"), "見積 Invoice 書");
    }

    #[test]
    fn clean_deletes_symbols_in_place() {
        // Symbols vanish without turning into word gaps.
        assert_eq!(
            clean_candidate_text("Q3:Report"),
            Some("Q3Report".to_string())
        );
        assert_eq!(
            clean_candidate_text("Invoice  #123: final!"),
            Some("Invoice  123 final".to_string())
        );
        assert_eq!(clean_candidate_text("***"), None);
        assert_eq!(clean_candidate_text("12 - 34"), None);
    }

    #[test]
    fn clean_keeps_original_spacing() {
        assert_eq!(
            clean_candidate_text("Annual  Report"),
            Some("Annual  Report".to_string())
        );
    }

    #[test]
    fn bonus_bands() {
        assert_eq!(position_bonus(0.05), 3.0);
        assert_eq!(position_bonus(0.15), 2.0);
        assert_eq!(position_bonus(0.30), 1.3);
        assert_eq!(position_bonus(0.38), 1.0);
        assert_eq!(position_bonus(0.80), 0.5);
    }
}
