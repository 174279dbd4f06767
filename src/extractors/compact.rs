// src/extractors/compact.rs

use once_cell::sync::Lazy;
use regex::Regex;

// Two or more line breaks, with any horizontal whitespace around them
static PARAGRAPH_BREAK_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:[^\S\n]*\n[^\S\n]*){2,}").expect("Failed to compile PARAGRAPH_BREAK_RE")
});

static SPACE_RUN_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[^\S\n]{2,}").expect("Failed to compile SPACE_RUN_RE")
});

/// Turns a raw span into paragraph text.
///
/// Blank-line runs become one `\n`, single line breaks become spaces (layout
/// wrapping, not structure), and space runs collapse to one.
pub fn compact_section(text: &str) -> String {
    PARAGRAPH_BREAK_RE
        .split(text)
        .map(|paragraph| {
            let joined = paragraph.replace('\n', " ");
            SPACE_RUN_RE.replace_all(&joined, " ").trim().to_string()
        })
        .filter(|paragraph| !paragraph.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}
