// src/extractors/locator.rs
//! Section boundary search over cleaned filing text.
//!
//! A section runs from its own `ITEM <id>` header to the header of the nearest
//! later catalog item that actually appears. Tables of contents list every
//! header back to back, so each header pairing yields several candidate spans;
//! the widest one after the previously accepted section wins.

// --- Imports ---
use crate::extractors::items::ItemId;
use regex::Regex;

// Text after the header on its line is a title only if it is this short; longer
// lines are body text that shares the header's line.
const MAX_TITLE_CHARS: usize = 200;

/// A region of the cleaned text claimed by one item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    /// Start of the item header line.
    pub start: usize,
    /// First byte after the header match (terminator included).
    pub header_end: usize,
    /// Start of the terminating header, or the end of the text.
    pub end: usize,
}

impl Span {
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// End offsets of accepted sections, in acceptance order.
///
/// Offsets never decrease, so a later item cannot claim text an earlier item already owns.
#[derive(Debug, Clone, Default)]
pub struct ConsumedPositions(Vec<usize>);

impl ConsumedPositions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Earliest offset at which the next section may start.
    pub fn last(&self) -> usize {
        self.0.last().copied().unwrap_or(0)
    }

    pub fn record(&mut self, end: usize) {
        debug_assert!(end >= self.last(), "consumed positions must not move backwards");
        self.0.push(end.max(self.last()));
    }

    pub fn as_slice(&self) -> &[usize] {
        &self.0
    }
}

/// Finds the span for `item` starting at or after `consumed`.
///
/// Every later catalog item can terminate the section, whether or not it was requested.
pub fn locate_item(text: &str, item: ItemId, consumed: usize) -> Option<Span> {
    let successors: Vec<&Regex> = item.successors().map(ItemId::header_re).collect();
    let span = find_section_span(text, item.header_re(), &successors, consumed);
    if let Some(span) = span.filter(|s| s.end == text.len()) {
        tracing::debug!("Item {} at {} has no later header; taking text to end of document", item, span.start);
    }
    span
}

/// One candidate per `current` header at or after `consumed`, ending at the nearest
/// later header of any successor, or at the end of `text` when none follows.
pub fn candidate_spans(text: &str, current: &Regex, successors: &[&Regex], consumed: usize) -> Vec<Span> {
    let mut boundaries: Vec<usize> = successors
        .iter()
        .flat_map(|next| next.find_iter(text).map(|m| m.start()))
        .collect();
    boundaries.sort_unstable();
    boundaries.dedup();

    current
        .find_iter(text)
        .filter(|m| m.start() >= consumed)
        .map(|m| {
            let idx = boundaries.partition_point(|&s| s < m.end());
            let end = boundaries.get(idx).copied().unwrap_or(text.len());
            Span { start: m.start(), header_end: m.end(), end }
        })
        .collect()
}

/// Picks the section for `current` among its candidate spans.
///
/// Candidates with nothing below the header line (table of contents entries) are
/// ignored. The widest bounded candidate wins, earliest start on ties; when every
/// remaining candidate runs to the end of the text, the last one is taken.
pub fn find_section_span(text: &str, current: &Regex, successors: &[&Regex], consumed: usize) -> Option<Span> {
    let mut best: Option<Span> = None;
    let mut tail: Option<Span> = None;

    for candidate in candidate_spans(text, current, successors, consumed) {
        if split_header_line(text, candidate).1.trim().is_empty() {
            tracing::trace!("Skipping bodiless candidate at {}", candidate.start);
            continue;
        }
        // Header matches are never empty, so only unbounded candidates reach the end.
        if candidate.end == text.len() {
            tail = Some(candidate);
            continue;
        }
        tracing::trace!("Candidate span {}..{} ({} bytes)", candidate.start, candidate.end, candidate.len());
        if best.map_or(true, |b| candidate.len() > b.len()) {
            best = Some(candidate);
        }
    }

    best.or(tail)
}

/// Separates the header's title (rest of its line) from the section body.
pub(crate) fn split_header_line(text: &str, span: Span) -> (Option<String>, &str) {
    let after_header = &text[span.header_end..span.end];
    if text[..span.header_end].ends_with('\n') {
        return (None, after_header);
    }

    let (line, body) = after_header.split_once('\n').unwrap_or((after_header, ""));
    let title = line
        .trim_start_matches(|c: char| c.is_whitespace() || ".-:*~".contains(c))
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");

    if title.chars().count() > MAX_TITLE_CHARS {
        return (None, after_header);
    }
    ((!title.is_empty()).then_some(title), body)
}

// --- Tests ---
#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: &str) -> ItemId {
        id.parse().unwrap()
    }

    const WITH_TOC: &str = "\
TABLE
ITEM 1. Business
ITEM 1A. Risk Factors
ITEM 7. MD&A

ITEM 1. BUSINESS
We make widgets and sell them widely.
ITEM 1A. RISK FACTORS
Widgets may break.
ITEM 7. MANAGEMENT'S DISCUSSION
Sales grew.
";

    #[test]
    fn test_widest_span_skips_table_of_contents() {
        let span = locate_item(WITH_TOC, item("1"), 0).unwrap();
        let body = &WITH_TOC[span.start..span.end];
        assert!(body.starts_with("ITEM 1. BUSINESS"), "got {:?}", body);
        assert!(body.contains("We make widgets"));
        assert!(!body.contains("RISK FACTORS"));
    }

    #[test]
    fn test_consumed_position_blocks_earlier_candidates() {
        let first = locate_item(WITH_TOC, item("1"), 0).unwrap();
        let second = locate_item(WITH_TOC, item("1A"), first.end).unwrap();
        assert_eq!(second.start, first.end);
        assert!(WITH_TOC[second.start..second.end].contains("Widgets may break."));
    }

    #[test]
    fn test_missing_successor_is_skipped() {
        let text = "ITEM 1. Business\nWe make widgets.\nITEM 7. MD&A\nSales grew.\nITEM 8. Financials\n";
        let span = locate_item(text, item("1"), 0).unwrap();
        assert_eq!(&text[span.start..span.end], "ITEM 1. Business\nWe make widgets.\n");
    }

    #[test]
    fn test_terminal_item_runs_to_end() {
        let text = "ITEM 14. Fees\nAudit fees.\nITEM 15. Exhibits\nExhibit 3.1 Charter\n";
        let span = locate_item(text, item("15"), 0).unwrap();
        assert_eq!(span.end, text.len());
        assert_eq!(&text[span.start..], "ITEM 15. Exhibits\nExhibit 3.1 Charter\n");
    }

    #[test]
    fn test_absent_header_yields_none() {
        let text = "ITEM 1. Business\nWe make widgets.\n";
        assert!(locate_item(text, item("2"), 0).is_none());
        // Header exists but sits before the consumed position
        assert!(locate_item(text, item("1"), 5).is_none());
    }

    const TOC_WITHOUT_7A_BODY: &str = "\
TABLE OF CONTENTS
ITEM 1. Business
ITEM 7. MD&A
ITEM 7A. Market Risk
ITEM 8. Financial Statements

ITEM 1. BUSINESS
We make widgets.
ITEM 7. MANAGEMENT'S DISCUSSION
Sales grew strongly this year.
ITEM 8. FINANCIAL STATEMENTS
See the statements.
";

    #[test]
    fn test_table_of_contents_entry_does_not_pick_terminator() {
        // The contents entry for 7 is followed by 7A, which never appears in the body.
        let span = locate_item(TOC_WITHOUT_7A_BODY, item("7"), 0).unwrap();
        let body = &TOC_WITHOUT_7A_BODY[span.start..span.end];
        assert_eq!(body, "ITEM 7. MANAGEMENT'S DISCUSSION\nSales grew strongly this year.\n");

        let after_item_1 = locate_item(TOC_WITHOUT_7A_BODY, item("1"), 0).unwrap();
        assert_eq!(locate_item(TOC_WITHOUT_7A_BODY, item("7"), after_item_1.end), Some(span));
    }

    #[test]
    fn test_unbounded_item_takes_last_header() {
        let span = locate_item(WITH_TOC, item("7"), 0).unwrap();
        assert_eq!(span.end, WITH_TOC.len());
        assert_eq!(&WITH_TOC[span.start..], "ITEM 7. MANAGEMENT'S DISCUSSION\nSales grew.\n");
    }

    #[test]
    fn test_split_header_line() {
        let text = "ITEM 1A. Risk   Factors\nWidgets may break.\n";
        let span = Span { start: 0, header_end: 8, end: text.len() };
        let (title, body) = split_header_line(text, span);
        assert_eq!(title.as_deref(), Some("Risk Factors"));
        assert_eq!(body, "Widgets may break.\n");

        let bare = "ITEM 2.\nOne plant.\n";
        let span = Span { start: 0, header_end: 8, end: bare.len() };
        assert_eq!(split_header_line(bare, span), (None, "One plant.\n"));
    }

    #[test]
    fn test_equal_length_tie_keeps_earliest_start() {
        let current = item("2").header_re();
        let next = item("3").header_re();
        let text = "ITEM 2. a\nxx\nITEM 3. b\nITEM 2. c\nxx\nITEM 3. d\n";
        let span = find_section_span(text, current, &[next], 0).unwrap();
        assert_eq!(span.start, 0);
    }

    #[test]
    fn test_consumed_positions_are_monotonic() {
        let mut consumed = ConsumedPositions::new();
        assert_eq!(consumed.last(), 0);
        consumed.record(10);
        consumed.record(25);
        assert_eq!(consumed.last(), 25);
        assert_eq!(consumed.as_slice(), &[10, 25]);
    }
}
