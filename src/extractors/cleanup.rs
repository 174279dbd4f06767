// src/extractors/cleanup.rs

// --- Imports ---
use once_cell::sync::Lazy;
use regex::{Captures, Regex};

// --- Regex Patterns (Lazy Static) ---
// A keyword broken by letter-spacing ("I T E M  1 A") at the start of a line.
static BROKEN_PART_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?im)^([^\S\r\n]*)(P[^\S\r\n]*A[^\S\r\n]*R[^\S\r\n]*T)[^\S\r\n]+((?:\d(?:[^\S\r\n]?\d)?|[IV](?:[^\S\r\n]?[IV]){0,2})(?:[^\S\r\n]*[AB])?)\b")
        .expect("Failed to compile BROKEN_PART_RE")
});

static BROKEN_ITEM_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?im)^([^\S\r\n]*)(I[^\S\r\n]*T[^\S\r\n]*E[^\S\r\n]*M)[^\S\r\n]+(\d(?:[^\S\r\n]?\d)?(?:[^\S\r\n]*[AB])?)\b")
        .expect("Failed to compile BROKEN_ITEM_RE")
});

// "ITEM 1A-Risk Factors" -> "ITEM 1A - Risk Factors"
static GLUED_SEPARATOR_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(ITEM|PART)(\s+\d{1,2}[AB]?)([\-•])").expect("Failed to compile GLUED_SEPARATOR_RE")
});

static HORIZONTAL_SPACE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[^\S\r\n]+").expect("Failed to compile HORIZONTAL_SPACE_RE")
});

// Lines that carry navigation rather than content. Each removes the whole line.
static NAVIGATION_RES: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        // Table of contents / back-to-top markers
        r"(?im)^[^\S\r\n]*(?:TABLE\s+OF\s+CONTENTS|INDEX\s+TO\s+FINANCIAL\s+STATEMENTS|BACK\s+TO\s+CONTENTS|QUICKLINKS)[^\S\r\n]*(?:\n|$)",
        // Lone page numbers
        r"(?m)^[^\S\r\n]*\d+[^\S\r\n]*(?:\n|$)",
        // Dash page markers: "- 12 -", "--12"
        r"(?m)^[^\S\r\n]*-+[^\S\r\n]*\d+[^\S\r\n]*-*[^\S\r\n]*(?:\n|$)",
        // Financial statement page codes: "F-12"
        r"(?im)^[^\S\r\n]*F-*\d+[^\S\r\n]*(?:\n|$)",
        // "Page 7" footers
        r"(?im)^[^\S\r\n]*Page\s[\d*]+[^\S\r\n]*(?:\n|$)",
    ]
    .iter()
    .map(|pat| Regex::new(pat).expect("Failed to compile navigation pattern"))
    .collect()
});

/// Runs the full cleanup chain in order: characters, headers, navigation noise.
pub fn clean_text(text: &str) -> String {
    let text = substitute_characters(text);
    let text = repair_headers(&text);
    remove_navigation(&text)
}

/// Maps Windows-1252 leftovers and typographic punctuation to plain equivalents.
pub fn substitute_characters(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            '\u{a0}' | '\u{200b}' => ' ',
            '\u{91}' | '\u{92}' | '\u{2018}' | '\u{2019}' => '\'',
            '\u{93}' | '\u{94}' | '\u{201c}' | '\u{201d}' => '"',
            '\u{95}' => '•',
            '\u{96}' | '\u{97}' => '-',
            '\u{98}' => '˜',
            '\u{99}' => '™',
            '\u{2010}'..='\u{2015}' => '-',
            other => other,
        })
        .collect()
}

/// Rejoins letter-spaced `PART`/`ITEM` headers so that header patterns can match them.
///
/// Keyword and numeral lose their interior whitespace; exactly one space separates them.
pub fn repair_headers(text: &str) -> String {
    let rejoin = |caps: &Captures| {
        format!(
            "{}{} {}",
            &caps[1],
            HORIZONTAL_SPACE_RE.replace_all(&caps[2], ""),
            HORIZONTAL_SPACE_RE.replace_all(&caps[3], ""),
        )
    };

    let text = BROKEN_PART_RE.replace_all(text, rejoin);
    let text = BROKEN_ITEM_RE.replace_all(&text, rejoin);
    GLUED_SEPARATOR_RE.replace_all(&text, "${1}${2} ${3} ").into_owned()
}

/// Deletes table-of-contents markers and page furniture lines.
pub fn remove_navigation(text: &str) -> String {
    NAVIGATION_RES
        .iter()
        .fold(text.to_string(), |acc, re| re.replace_all(&acc, "").into_owned())
}
