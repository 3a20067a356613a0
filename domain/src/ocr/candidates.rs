//! Title/author candidate selection from raw OCR lines
//!
//! Cover text has no structure, so salience stands in for meaning: large,
//! confidently-read lines are probably the title, and short lines that look
//! like name lists are probably authors.

use serde::{Deserialize, Serialize};

/// Lines ranked beyond this are ignored
pub const MAX_RANKED_LINES: usize = 20;

/// Maximum candidates kept per list
pub const MAX_CANDIDATES: usize = 5;

/// Normalized text is cut at this many characters
pub const MAX_TEXT_CHARS: usize = 200;

/// Shorter lines are noise
pub const MIN_TEXT_CHARS: usize = 3;

/// Author lines are shorter than this
pub const MAX_AUTHOR_CHARS: usize = 80;

/// Separators that suggest a list of names
const AUTHOR_MARKERS: [&str; 3] = [",", " and ", " & "];

/// A point in image coordinates
pub type Point = [f64; 2];

/// One line recognized by the OCR engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OcrLine {
    pub text: String,
    pub confidence: f64,
    /// Four corners of the bounding box
    pub bbox: [Point; 4],
}

impl OcrLine {
    pub fn new(text: impl Into<String>, confidence: f64, bbox: [Point; 4]) -> Self {
        Self {
            text: text.into(),
            confidence,
            bbox,
        }
    }

    /// Axis-aligned area covered by the bounding box
    pub fn area(&self) -> f64 {
        let xs = self.bbox.iter().map(|p| p[0]);
        let ys = self.bbox.iter().map(|p| p[1]);
        let width = xs.clone().fold(f64::MIN, f64::max) - xs.fold(f64::MAX, f64::min);
        let height = ys.clone().fold(f64::MIN, f64::max) - ys.fold(f64::MAX, f64::min);
        width.max(0.0) * height.max(0.0)
    }

    /// Ranking score: confidence boosted by size
    pub fn salience(&self) -> f64 {
        self.confidence * (1.0 + self.area() / 10_000.0)
    }
}

/// A candidate value with the OCR confidence it was read at
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextCandidate {
    pub value: String,
    pub confidence: f64,
}

/// Candidate titles and authors read from a cover
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CoverTextCandidates {
    pub title_candidates: Vec<TextCandidate>,
    pub author_candidates: Vec<TextCandidate>,
    pub language_guess: String,
}

impl CoverTextCandidates {
    pub fn best_title(&self) -> Option<&TextCandidate> {
        self.title_candidates.first()
    }

    pub fn best_author(&self) -> Option<&TextCandidate> {
        self.author_candidates.first()
    }

    pub fn is_empty(&self) -> bool {
        self.title_candidates.is_empty() && self.author_candidates.is_empty()
    }
}

/// Collapse whitespace and cap the length
pub fn normalize_line(text: &str) -> String {
    text.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .chars()
        .take(MAX_TEXT_CHARS)
        .collect()
}

fn looks_like_authors(text: &str) -> bool {
    text.chars().count() < MAX_AUTHOR_CHARS && AUTHOR_MARKERS.iter().any(|m| text.contains(m))
}

fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

fn dedup(candidates: Vec<TextCandidate>) -> Vec<TextCandidate> {
    let mut seen = std::collections::HashSet::new();
    candidates
        .into_iter()
        .filter(|c| seen.insert(c.value.to_lowercase()))
        .take(MAX_CANDIDATES)
        .collect()
}

/// Split OCR lines into title and author candidates.
///
/// Lines are ranked by [`OcrLine::salience`], the top
/// [`MAX_RANKED_LINES`] are normalized, and each is classified as an author
/// line (short, contains a name separator) or a title line. Both lists are
/// deduplicated case-insensitively and capped at [`MAX_CANDIDATES`].
pub fn classify_lines(lines: &[OcrLine]) -> CoverTextCandidates {
    let mut ranked: Vec<&OcrLine> = lines
        .iter()
        .filter(|l| !l.text.trim().is_empty())
        .collect();
    ranked.sort_by(|a, b| b.salience().total_cmp(&a.salience()));

    let mut titles = Vec::new();
    let mut authors = Vec::new();

    for line in ranked.into_iter().take(MAX_RANKED_LINES) {
        let text = normalize_line(&line.text);
        if text.chars().count() < MIN_TEXT_CHARS {
            continue;
        }
        let candidate = TextCandidate {
            confidence: round3(line.confidence),
            value: text,
        };
        if looks_like_authors(&candidate.value) {
            authors.push(candidate);
        } else {
            titles.push(candidate);
        }
    }

    CoverTextCandidates {
        title_candidates: dedup(titles),
        author_candidates: dedup(authors),
        language_guess: "en".to_string(),
    }
}

/// Split an author line into individual names
pub fn split_authors(line: &str) -> Vec<String> {
    line.replace(" and ", ",")
        .replace(" & ", ",")
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bbox(w: f64, h: f64) -> [Point; 4] {
        [[0.0, 0.0], [w, 0.0], [w, h], [0.0, h]]
    }

    #[test]
    fn test_area_and_salience() {
        let line = OcrLine::new("CLEAN CODE", 0.9, bbox(200.0, 50.0));
        assert_eq!(line.area(), 10_000.0);
        assert!((line.salience() - 1.8).abs() < 1e-9);
    }

    #[test]
    fn test_large_lines_rank_first() {
        let lines = vec![
            OcrLine::new("small print", 0.99, bbox(10.0, 10.0)),
            OcrLine::new("CLEAN CODE", 0.9, bbox(400.0, 100.0)),
        ];
        let candidates = classify_lines(&lines);
        assert_eq!(candidates.best_title().unwrap().value, "CLEAN CODE");
        assert_eq!(candidates.title_candidates.len(), 2);
    }

    #[test]
    fn test_author_lines_detected() {
        let lines = vec![
            OcrLine::new("Design Patterns", 0.95, bbox(300.0, 60.0)),
            OcrLine::new("Erich Gamma, Richard Helm", 0.8712, bbox(200.0, 20.0)),
            OcrLine::new("Kernighan & Ritchie", 0.7, bbox(100.0, 20.0)),
        ];
        let candidates = classify_lines(&lines);
        assert_eq!(candidates.author_candidates.len(), 2);
        assert_eq!(
            candidates.best_author().unwrap().value,
            "Erich Gamma, Richard Helm"
        );
        assert_eq!(candidates.best_author().unwrap().confidence, 0.871);
        assert_eq!(candidates.language_guess, "en");
    }

    #[test]
    fn test_short_and_duplicate_lines_dropped() {
        let lines = vec![
            OcrLine::new("Dune", 0.9, bbox(100.0, 40.0)),
            OcrLine::new("DUNE", 0.8, bbox(100.0, 40.0)),
            OcrLine::new("ok", 0.99, bbox(100.0, 40.0)),
        ];
        let candidates = classify_lines(&lines);
        assert_eq!(candidates.title_candidates.len(), 1);
        assert_eq!(candidates.title_candidates[0].value, "Dune");
    }

    #[test]
    fn test_normalize_line() {
        assert_eq!(normalize_line("  Clean\n  Code  "), "Clean Code");
        assert_eq!(normalize_line(&"x".repeat(300)).len(), MAX_TEXT_CHARS);
    }

    #[test]
    fn test_at_most_five_candidates() {
        let lines: Vec<OcrLine> = (0..10)
            .map(|i| OcrLine::new(format!("Line number {}", i), 0.9, bbox(10.0, 10.0)))
            .collect();
        assert_eq!(classify_lines(&lines).title_candidates.len(), MAX_CANDIDATES);
    }

    #[test]
    fn test_split_authors() {
        assert_eq!(
            split_authors("Erich Gamma, Richard Helm and Ralph Johnson"),
            vec!["Erich Gamma", "Richard Helm", "Ralph Johnson"]
        );
        assert_eq!(split_authors("Kernighan & Ritchie"), vec!["Kernighan", "Ritchie"]);
    }
}
