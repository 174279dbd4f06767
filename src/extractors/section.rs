// src/extractors/section.rs

// --- Imports ---
use crate::extractors::cleanup::clean_text;
use crate::extractors::compact::compact_section;
use crate::extractors::items::ItemId;
use crate::extractors::locator::{locate_item, split_header_line, ConsumedPositions, Span};
use crate::extractors::normalize::{document_text, is_html_structured, strip_markup};
use crate::extractors::tables::{remove_data_tables, remove_text_tables};
use crate::utils::error::ExtractError;
use scraper::Html;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

// --- Constants ---
/// Items requested when the caller does not name any.
pub const DEFAULT_ITEMS: [&str; 4] = ["1", "1A", "7", "7A"];

// --- Data Structures ---
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Section {
    pub item: String,          // e.g., "1A"
    pub section_name: String,  // e.g., "item_1a" or a caller-chosen name
    pub section_title: String, // e.g., "Risk Factors" (best effort)
    pub content: String,       // Compacted plain text, header line excluded
    pub word_count: usize,
    pub char_count: usize,
    #[serde(skip)]
    pub span: Span, // Offsets into the cleaned document text
}

impl Section {
    fn new(item: ItemId, section_name: String, section_title: String, content: String, span: Span) -> Self {
        Self {
            item: item.as_str().to_string(),
            section_name,
            section_title,
            word_count: content.split_whitespace().count(),
            char_count: content.chars().count(),
            content,
            span,
        }
    }
}

// --- Main Extractor Structure ---
/// Recovers 10-K items from HTML or plain-text filings.
///
/// Holds configuration only; every call owns its own intermediate state, so a
/// single extractor can be shared across tasks.
#[derive(Debug, Clone, Default)]
pub struct SectionExtractor {
    remove_tables: bool,
    section_names: HashMap<ItemId, String>,
}

impl SectionExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop shaded numeric tables before locating sections.
    pub fn remove_tables(mut self, remove: bool) -> Self {
        self.remove_tables = remove;
        self
    }

    /// Store `item` under `name` instead of `item_<id>`.
    pub fn section_name(mut self, item: &str, name: impl Into<String>) -> Result<Self, ExtractError> {
        let item: ItemId = item.parse()?;
        self.section_names.insert(item, name.into());
        Ok(self)
    }

    /// Extracts the requested items, returned in catalog order.
    ///
    /// Request order and duplicates are ignored. Items whose header cannot be
    /// found, or whose body is empty, are left out.
    pub fn extract_sections(&self, document: &str, items: &[&str]) -> Result<Vec<Section>, ExtractError> {
        let mut requested = items
            .iter()
            .map(|id| id.parse::<ItemId>())
            .collect::<Result<Vec<_>, _>>()?;
        requested.sort();
        requested.dedup();

        tracing::info!("Extracting items {:?} from {} byte document", items, document.len());

        let text = self.normalized_text(document);
        let mut consumed = ConsumedPositions::new();
        let mut sections = Vec::with_capacity(requested.len());

        for item in requested {
            let Some(span) = locate_item(&text, item, consumed.last()) else {
                tracing::warn!("No boundaries found for Item {}; omitting it", item);
                continue;
            };
            consumed.record(span.end);

            let section = self.build_section(item, &text, span);
            if section.content.is_empty() {
                tracing::warn!("Item {} header found but its body is empty", item);
                continue;
            }
            tracing::debug!(
                "Accepted Item {} at {}..{} ({} words)",
                item,
                span.start,
                span.end,
                section.word_count
            );
            sections.push(section);
        }

        tracing::info!("Extracted {} of {} requested sections", sections.len(), items.len());
        Ok(sections)
    }

    /// Section name to content, for callers that only need the text.
    pub fn extract(&self, document: &str, items: &[&str]) -> Result<BTreeMap<String, String>, ExtractError> {
        Ok(self
            .extract_sections(document, items)?
            .into_iter()
            .map(|section| (section.section_name, section.content))
            .collect())
    }

    /// Runs extraction on the blocking pool so async callers never stall their executor.
    pub async fn extract_async(&self, document: String, items: Vec<String>) -> Result<Vec<Section>, ExtractError> {
        let extractor = self.clone();
        tokio::task::spawn_blocking(move || {
            let items: Vec<&str> = items.iter().map(String::as_str).collect();
            extractor.extract_sections(&document, &items)
        })
        .await
        .map_err(|e| ExtractError::Task(e.to_string()))?
    }

    /// Markup stripped (and tables filtered, if enabled), then cleaned.
    pub fn normalized_text(&self, document: &str) -> String {
        let mut parsed = Html::parse_document(document);

        let raw_text = if is_html_structured(&parsed) {
            if self.remove_tables {
                remove_data_tables(&mut parsed);
            }
            document_text(&parsed)
        } else if self.remove_tables {
            strip_markup(&remove_text_tables(document))
        } else {
            document_text(&parsed)
        };

        clean_text(&raw_text)
    }

    fn build_section(&self, item: ItemId, text: &str, span: Span) -> Section {
        let (title, body) = split_header_line(text, span);
        let section_title = title.unwrap_or_else(|| item.spec().title.to_string());
        let section_name = self
            .section_names
            .get(&item)
            .cloned()
            .unwrap_or_else(|| item.default_section_name());

        Section::new(item, section_name, section_title, compact_section(body), span)
    }
}

// Convenience functions
/// One-shot extraction keyed by section name; `None` requests [`DEFAULT_ITEMS`].
pub fn extract_10k_sections(
    document: &str,
    items: Option<&[&str]>,
    remove_tables: bool,
) -> Result<BTreeMap<String, String>, ExtractError> {
    SectionExtractor::new()
        .remove_tables(remove_tables)
        .extract(document, items.unwrap_or(&DEFAULT_ITEMS[..]))
}

/// [`extract_10k_sections`] on the blocking pool, for callers inside an async runtime.
pub async fn extract_10k_sections_async(
    document: String,
    items: Option<Vec<String>>,
    remove_tables: bool,
) -> Result<BTreeMap<String, String>, ExtractError> {
    let items = items.unwrap_or_else(|| DEFAULT_ITEMS.iter().map(|id| id.to_string()).collect());
    let sections = SectionExtractor::new()
        .remove_tables(remove_tables)
        .extract_async(document, items)
        .await?;
    Ok(sections
        .into_iter()
        .map(|section| (section.section_name, section.content))
        .collect())
}

// --- Tests ---
#[cfg(test)]
mod tests {
    use super::*;

    const SIMPLE: &str = "...\nITEM 1. BUSINESS\nWe make widgets.\nITEM 1A. RISK FACTORS\nWidgets may break.\nITEM 7. MD&A\nSales grew.\n";

    const FULL_FILING: &str = r#"
        <html><body>
        <div><p>TABLE OF CONTENTS</p>
        <table>
          <tr><td>Item 1.</td><td>Business</td><td>3</td></tr>
          <tr><td>Item 1A.</td><td>Risk Factors</td><td>5</td></tr>
          <tr><td>Item 7.</td><td>Management's Discussion</td><td>9</td></tr>
          <tr><td>Item 7A.</td><td>Market Risk</td><td>12</td></tr>
          <tr><td>Item 8.</td><td>Financial Statements</td><td>14</td></tr>
        </table></div>
        <p><b>Item 1. Business</b></p>
        <p>We design and sell industrial widgets
        to customers in forty countries.</p>
        <p>Our strategy is to keep making widgets.</p>
        <p>3</p>
        <p><b>Item 1A. Risk Factors</b></p>
        <p>Widgets may break under heavy load.</p>
        <p><b>Item 7. Management&#8217;s Discussion and Analysis</b></p>
        <p>Sales grew twelve percent.</p>
        <table>
          <tr style="background-color:#CCEEFF"><td>Net sales</td><td>4,321</td></tr>
          <tr><td>Cost of sales</td><td>1,234</td></tr>
        </table>
        <p>Margins improved.</p>
        <p><b>Item 7A. Quantitative and Qualitative Disclosures About Market Risk</b></p>
        <p>We hedge currency exposure.</p>
        <p><b>Item 8. Financial Statements</b></p>
        <p>See the statements that follow.</p>
        </body></html>
    "#;

    fn map(document: &str, items: &[&str]) -> BTreeMap<String, String> {
        SectionExtractor::new().extract(document, items).unwrap()
    }

    #[test]
    fn test_end_to_end_plain_text() {
        let sections = map(SIMPLE, &["1", "1A", "7"]);
        let expected: BTreeMap<String, String> = [
            ("item_1", "We make widgets."),
            ("item_1a", "Widgets may break."),
            ("item_7", "Sales grew."),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
        assert_eq!(sections, expected);
    }

    #[test]
    fn test_section_metadata() {
        let sections = SectionExtractor::new().extract_sections(SIMPLE, &["1A"]).unwrap();
        assert_eq!(sections.len(), 1);
        let section = &sections[0];
        assert_eq!(section.item, "1A");
        assert_eq!(section.section_name, "item_1a");
        assert_eq!(section.section_title, "RISK FACTORS");
        assert_eq!(section.word_count, 3);
        assert_eq!(section.char_count, "Widgets may break.".len());
    }

    #[test]
    fn test_html_filing_skips_table_of_contents() {
        let sections = map(FULL_FILING, &["1", "1A", "7", "7A"]);
        assert_eq!(
            sections["item_1"],
            "We design and sell industrial widgets to customers in forty countries.\nOur strategy is to keep making widgets."
        );
        assert_eq!(sections["item_1a"], "Widgets may break under heavy load.");
        assert!(sections["item_7"].starts_with("Sales grew twelve percent."));
        assert_eq!(sections["item_7a"], "We hedge currency exposure.");
    }

    #[test]
    fn test_table_suppression() {
        let kept = map(FULL_FILING, &["7", "7A"]);
        assert!(kept["item_7"].contains("4,321"));

        let filtered = SectionExtractor::new()
            .remove_tables(true)
            .extract(FULL_FILING, &["7", "7A"])
            .unwrap();
        for content in filtered.values() {
            assert!(!content.contains("4,321"));
            assert!(!content.contains("1,234"));
        }
        assert!(filtered["item_7"].contains("Margins improved."));
        // The table of contents is not shaded and survives, so headers still resolve.
        assert_eq!(filtered["item_7a"], "We hedge currency exposure.");
    }

    #[test]
    fn test_ordering_invariant() {
        let sections = SectionExtractor::new()
            .extract_sections(FULL_FILING, &["8", "1", "7A", "1A", "7"])
            .unwrap();
        let ids: Vec<&str> = sections.iter().map(|s| s.item.as_str()).collect();
        assert_eq!(ids, vec!["1", "1A", "7", "7A", "8"]);
        for pair in sections.windows(2) {
            assert!(pair[0].span.start <= pair[1].span.start);
            assert!(pair[0].span.end <= pair[1].span.start, "spans overlap: {:?}", pair);
        }
    }

    #[test]
    fn test_idempotence() {
        let extractor = SectionExtractor::new().remove_tables(true);
        let first = extractor.extract(FULL_FILING, &["1", "1A", "7", "7A", "8"]).unwrap();
        let second = extractor.extract(FULL_FILING, &["1", "1A", "7", "7A", "8"]).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_subset_consistency() {
        let narrow = map(FULL_FILING, &["1", "7"]);
        let wide = map(FULL_FILING, &["1", "1A", "7", "7A"]);
        assert_eq!(narrow["item_1"], wide["item_1"]);
        assert_eq!(narrow["item_7"], wide["item_7"]);
    }

    #[test]
    fn test_item_does_not_depend_on_other_requested_items() {
        // The contents list 7A, but the body skips it and goes straight to Item 8.
        let document = "\
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
        let narrow = map(document, &["7"]);
        let wide = map(document, &["1", "7"]);
        assert_eq!(narrow.get("item_7").map(String::as_str), Some("Sales grew strongly this year."));
        assert_eq!(narrow.get("item_7"), wide.get("item_7"));
        assert_eq!(wide["item_1"], "We make widgets.");
    }

    #[test]
    fn test_missing_item_tolerance() {
        let document = "ITEM 1. Business\nWe make widgets.\nITEM 7. MD&A\nSales grew.\n";
        let sections = map(document, &["1", "1A", "7"]);
        assert_eq!(sections.len(), 2);
        assert_eq!(sections["item_1"], "We make widgets.");
        assert!(!sections.contains_key("item_1a"));
        assert_eq!(sections["item_7"], "Sales grew.");
    }

    #[test]
    fn test_terminal_fallback() {
        let document = "ITEM 14. Principal Accountant Fees\nAudit fees were modest.\n\nITEM 15. Exhibits\nExhibit 3.1 Articles.\n\nExhibit 31 Certifications.\n";
        let sections = map(document, &["14", "15"]);
        assert_eq!(sections["item_14"], "Audit fees were modest.");
        assert_eq!(sections["item_15"], "Exhibit 3.1 Articles.\nExhibit 31 Certifications.");
    }

    #[test]
    fn test_no_items_found_returns_empty_map() {
        let sections = map("<html><body><p>Just a letter to shareholders.</p></body></html>", &["1", "7"]);
        assert!(sections.is_empty());
    }

    #[test]
    fn test_letter_spaced_headers_are_found() {
        let document = "I T E M 1. Business\nWe make widgets.\nI T E M 1 A. Risk Factors\nWidgets may break.\n";
        let sections = map(document, &["1", "1A"]);
        assert_eq!(sections["item_1"], "We make widgets.");
        assert_eq!(sections["item_1a"], "Widgets may break.");
    }

    #[test]
    fn test_custom_section_names() {
        let extractor = SectionExtractor::new()
            .section_name("1a", "risk_factors")
            .unwrap();
        let sections = extractor.extract(SIMPLE, &["1A"]).unwrap();
        assert_eq!(sections["risk_factors"], "Widgets may break.");

        assert!(matches!(
            SectionExtractor::new().section_name("99", "nope"),
            Err(ExtractError::UnknownItem(_))
        ));
    }

    #[test]
    fn test_unknown_item_is_rejected() {
        let result = SectionExtractor::new().extract(SIMPLE, &["1", "21"]);
        assert!(matches!(result, Err(ExtractError::UnknownItem(id)) if id == "21"));
    }

    #[test]
    fn test_bare_header_uses_catalog_title() {
        let document = "ITEM 1.\nWe make widgets.\nITEM 2.\nOne plant.\n";
        let sections = SectionExtractor::new().extract_sections(document, &["1"]).unwrap();
        assert_eq!(sections[0].section_title, "Business");
        assert_eq!(sections[0].content, "We make widgets.");
    }

    #[test]
    fn test_convenience_function_uses_defaults() {
        let sections = extract_10k_sections(SIMPLE, None, false).unwrap();
        assert_eq!(sections.len(), 3);
        assert!(sections.contains_key("item_1a"));
    }

    #[test]
    fn test_async_convenience_function() {
        let sections = tokio_test::block_on(extract_10k_sections_async(SIMPLE.to_string(), None, false)).unwrap();
        assert_eq!(sections, extract_10k_sections(SIMPLE, None, false).unwrap());

        let only_7 =
            tokio_test::block_on(extract_10k_sections_async(SIMPLE.to_string(), Some(vec!["7".to_string()]), true))
                .unwrap();
        assert_eq!(only_7.len(), 1);
        assert_eq!(only_7["item_7"], "Sales grew.");
    }

    #[test]
    fn test_extract_async() {
        let extractor = SectionExtractor::new();
        let sections = tokio_test::block_on(extractor.extract_async(SIMPLE.to_string(), vec!["7".to_string()]))
            .unwrap();
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].content, "Sales grew.");
    }
}
