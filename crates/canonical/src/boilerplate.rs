//! Structural boilerplate removal.
//!
//! Student papers carry a title page, a table of contents and appendices
//! (listings, tables, scans) that are near-identical across unrelated works.
//! Fingerprinting them would inflate similarity, so they are cut before
//! tokenizing.
//!
//! Detection is line-based and conservative. A section is removed only when
//! a conventional heading (Russian or English) sits on a line of its own in
//! the expected part of the document:
//!
//! - title page: everything before the first `СОДЕРЖАНИЕ` / `ВВЕДЕНИЕ`
//!   style heading in the first 40% of the text, and only when that block
//!   has title page structure: short lines, at least two distinct
//!   institution or author markers, a standalone `Москва 2024` style year
//!   line, and no line that reads like a sentence;
//! - table of contents: the `СОДЕРЖАНИЕ` heading plus the run of entries
//!   ending in a page number that follows it;
//! - appendices: from the first `ПРИЛОЖЕНИЕ А` style heading in the second
//!   half of the text to the end.
//!
//! Anything else is left alone. Leaving boilerplate in is acceptable;
//! removing body text is not.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Share of the text (percent) in which a title page or TOC may end.
const EARLY_PERCENT: usize = 40;
/// Share of the text (percent) after which an appendix heading is trusted.
const LATE_PERCENT: usize = 50;
const TITLE_MAX_LINES: usize = 40;
const TITLE_MAX_LINE_CHARS: usize = 120;
const TITLE_MIN_MARKERS: usize = 2;
/// Word count from which a line ending like a sentence counts as prose.
const SENTENCE_MIN_WORDS: usize = 6;

static TOC_HEADING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\s*(?:содержание|оглавление|contents|table\s+of\s+contents)\s*[:.]?\s*$")
        .expect("valid toc heading regex")
});

static BODY_HEADING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\s*(?:введение|реферат|аннотация|introduction|abstract)\s*[:.]?\s*$")
        .expect("valid body heading regex")
});

static TITLE_MARKER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"(?i)\b(?:министерство|федеральное|университет|институт|кафедра|факультет",
        r"|курсов(?:ая|ой)\s+(?:работа|проект)|дипломная\s+работа|выпускная\s+квалификационная",
        r"|лабораторная\s+работа|отч[её]т\s+по\s+практике|выполнил[аи]?|проверил[аи]?",
        r"|научный\s+руководитель|ministry|university|faculty|department|submitted\s+by|supervisor)"
    ))
    .expect("valid title marker regex")
});

// "2024", "Москва 2024", "Санкт-Петербург, 2023 г."
static YEAR_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(?:\p{L}[\p{L}.\-]*,?\s+){0,3}(?:19|20)\d{2}\s*(?:г\.?)?\s*$")
        .expect("valid year line regex")
});

static SENTENCE_BREAK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[.!?…]\s+\p{Lu}").expect("valid sentence break regex")
});

static TOC_ENTRY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"(?i)^\s*(?:",
        // "1.2 Section title 14", "Глава 2 ... 14", "Приложение А ... 24"
        r"(?:\d+(?:\.\d+)*\.?|глава\s+\d+\.?|chapter\s+\d+\.?|приложение\s+[а-яёa-z0-9]{1,3}\.?|appendix\s+[a-z0-9]{1,3}\.?)\s+\S.{0,150}?\s+\d{1,3}",
        // "Anything ....... 14", "Anything … 14", "Anything\t14"
        r"|\S.{0,150}?(?:\s*\.{2,}\s*|\s*…+\s*|\t+)\d{1,3}",
        // "Заключение 20"
        r"|(?:введение|заключение|список\s+(?:использованных\s+)?(?:литературы|источников)",
        r"|introduction|conclusion|references|bibliography)\s+\d{1,3}",
        r")\s*$"
    ))
    .expect("valid toc entry regex")
});

static APPENDIX_HEADING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\s*(?:приложени[еяй]|appendix|appendices)(?:\s+[а-яёa-z0-9]{1,3})?\s*[.:]?\s*$")
        .expect("valid appendix heading regex")
});

/// Byte counts of the sections removed by [`strip_boilerplate_with_report`].
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct BoilerplateReport {
    pub title_page_bytes: usize,
    pub table_of_contents_bytes: usize,
    pub appendix_bytes: usize,
}

impl BoilerplateReport {
    /// True when at least one section was removed.
    pub fn any(&self) -> bool {
        self.title_page_bytes > 0 || self.table_of_contents_bytes > 0 || self.appendix_bytes > 0
    }
}

struct Line<'a> {
    start: usize,
    text: &'a str,
}

fn lines(text: &str) -> Vec<Line<'_>> {
    let mut out = Vec::new();
    let mut offset = 0;
    for piece in text.split_inclusive('\n') {
        out.push(Line {
            start: offset,
            text: piece.trim_end_matches(['\n', '\r']),
        });
        offset += piece.len();
    }
    out
}

/// Remove title page, table of contents and appendices from `text`.
///
/// Returns a sub-slice of the input; when nothing is recognized the input is
/// returned as is.
pub fn strip_boilerplate(text: &str) -> &str {
    strip_boilerplate_with_report(text).0
}

/// Like [`strip_boilerplate`], also reporting what was removed.
pub fn strip_boilerplate_with_report(text: &str) -> (&str, BoilerplateReport) {
    let lines = lines(text);
    let early_limit = text.len() * EARLY_PERCENT / 100;
    let late_limit = text.len() * LATE_PERCENT / 100;

    let mut report = BoilerplateReport::default();
    let mut start = 0;
    let mut end = text.len();

    let first_heading = lines.iter().position(|line| {
        line.start < early_limit
            && (TOC_HEADING.is_match(line.text) || BODY_HEADING.is_match(line.text))
    });

    if let Some(idx) = first_heading {
        let heading_start = lines[idx].start;
        if looks_like_title_page(&lines[..idx]) {
            start = heading_start;
            report.title_page_bytes = heading_start;
        }

        if TOC_HEADING.is_match(lines[idx].text) {
            let mut next = idx + 1;
            let mut entries = 0;
            while let Some(line) = lines.get(next) {
                if line.text.trim().is_empty() {
                    next += 1;
                    continue;
                }
                if BODY_HEADING.is_match(line.text) || !TOC_ENTRY.is_match(line.text) {
                    break;
                }
                entries += 1;
                next += 1;
            }
            // A bare "Contents" line with no entries is left in place.
            if entries > 0 {
                let toc_end = lines.get(next).map_or(text.len(), |line| line.start);
                report.table_of_contents_bytes = toc_end - heading_start;
                start = toc_end;
            }
        }
    }

    let appendix_from = late_limit.max(start);
    if let Some(line) = lines
        .iter()
        .find(|line| line.start >= appendix_from && APPENDIX_HEADING.is_match(line.text))
    {
        end = line.start;
        report.appendix_bytes = text.len() - line.start;
    }

    let body = &text[start..end];
    if body.trim().is_empty() {
        return (text, BoilerplateReport::default());
    }
    (body, report)
}

fn looks_like_title_page(block: &[Line<'_>]) -> bool {
    let non_blank: Vec<&str> = block
        .iter()
        .map(|line| line.text.trim())
        .filter(|line| !line.is_empty())
        .collect();
    if non_blank.is_empty() || non_blank.len() > TITLE_MAX_LINES {
        return false;
    }
    if non_blank
        .iter()
        .any(|line| line.chars().count() > TITLE_MAX_LINE_CHARS || reads_like_sentence(line))
    {
        return false;
    }
    if !non_blank.iter().any(|line| YEAR_LINE.is_match(line)) {
        return false;
    }
    let markers: HashSet<String> = non_blank
        .iter()
        .flat_map(|line| TITLE_MARKER.find_iter(line))
        .map(|m| m.as_str().to_lowercase())
        .collect();
    markers.len() >= TITLE_MIN_MARKERS
}

/// Prose: a line of several words that ends a sentence or runs into the next
/// one. Short lines such as `Проверил: доцент Петров П.П.` do not qualify.
fn reads_like_sentence(line: &str) -> bool {
    if line.split_whitespace().count() < SENTENCE_MIN_WORDS {
        return false;
    }
    line.ends_with(['.', '!', '?', '…']) || SENTENCE_BREAK.is_match(line)
}
