//! Extraction of structured fields from generated text.
//!
//! Generated output is never trusted to follow the requested format, so
//! every parser here degrades to empty fields or the raw text instead of
//! failing.

use once_cell::sync::Lazy;
use regex::Regex;

#[expect(clippy::expect_used, reason = "pattern is a literal")]
static BOLD_SPAN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\*\*(.*?)\*\*").expect("bold span pattern"));

#[expect(clippy::expect_used, reason = "pattern is a literal")]
static TRAILING_YEAR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s*\(\d{4}\)\s*$").expect("trailing year pattern"));

/// Most item names taken from one recommendation response.
pub const MAX_ITEMS_PER_BATCH: usize = 3;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuizQuestion {
    pub question: String,
    pub answer: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AutoTranslation {
    pub detected: String,
    pub translation: String,
}

fn labelled<'a>(line: &'a str, label: &str) -> Option<&'a str> {
    line.trim_start().strip_prefix(label).map(str::trim)
}

/// Read the `Question:` and `Answer:` lines; a missing label leaves its
/// field empty and a repeated label keeps the last value.
#[must_use]
pub fn parse_quiz_question(text: &str) -> QuizQuestion {
    let mut parsed = QuizQuestion::default();
    for line in text.lines() {
        if let Some(question) = labelled(line, "Question:") {
            parsed.question = question.to_string();
        } else if let Some(answer) = labelled(line, "Answer:") {
            parsed.answer = answer.to_string();
        }
    }
    parsed
}

/// A verdict counts as correct when it begins with "correct", ignoring case.
#[must_use]
pub fn is_correct_verdict(verdict: &str) -> bool {
    verdict.trim_start().to_lowercase().starts_with("correct")
}

/// Split an auto-detect response into the detected language and the
/// translation. Everything after the `Translation:` label belongs to the
/// translation; without it the whole response is the translation.
#[must_use]
pub fn parse_auto_translation(text: &str) -> AutoTranslation {
    let mut detected = String::new();
    let mut translation: Option<Vec<&str>> = None;

    for line in text.lines() {
        if let Some(lines) = translation.as_mut() {
            lines.push(line);
        } else if let Some(value) = labelled(line, "Translation:") {
            translation = Some(vec![value]);
        } else if let Some(value) = labelled(line, "Detected:") {
            detected = value.to_string();
        }
    }

    let translation = translation
        .map(|lines| lines.join("\n").trim().to_string())
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| text.trim().to_string());

    AutoTranslation {
        detected,
        translation,
    }
}

/// Pull up to three item names out of a recommendation response.
///
/// Names are the bold spans of the text. Spans of three characters or fewer
/// and section headings starting with "Recommendations" are skipped, and a
/// trailing `(YYYY)` year is removed.
#[must_use]
pub fn extract_item_names(text: &str) -> Vec<String> {
    BOLD_SPAN
        .captures_iter(text)
        .filter_map(|caps| caps.get(1).map(|m| m.as_str()))
        .filter(|span| span.chars().count() > 3 && !span.starts_with("Recommendations"))
        .map(|span| TRAILING_YEAR.replace(span, "").trim().to_string())
        .filter(|name| !name.is_empty())
        .take(MAX_ITEMS_PER_BATCH)
        .collect()
}
