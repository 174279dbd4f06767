// src/extractors/tables.rs

// --- Imports ---
use crate::extractors::cleanup::clean_text;
use crate::extractors::items::contains_any_header;
use crate::extractors::normalize::flatten;
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};

// --- CSS Selectors (Lazy Static) ---
static TABLE_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("table").expect("Failed to compile TABLE_SELECTOR")
});

// Table parts that can carry shading
static SHADED_PART_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("tr, td, th").expect("Failed to compile SHADED_PART_SELECTOR")
});

// Plain-text submissions wrap tabular exhibits in literal <TABLE> markers.
static TEXT_TABLE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?is)<TABLE>.*?</TABLE>").expect("Failed to compile TEXT_TABLE_RE")
});

/// Background values that do not count as shading.
const UNSHADED: [&str; 5] = ["none", "transparent", "#ffffff", "#fff", "white"];

/// Detaches every shaded data table from the parsed document.
///
/// Returns how many tables were removed. Tables whose text contains an item
/// header are always kept, since the header would otherwise be lost.
pub fn remove_data_tables(document: &mut Html) -> usize {
    let doomed: Vec<_> = document
        .select(&TABLE_SELECTOR)
        .filter(|table| should_remove_table(*table))
        .map(|table| table.id())
        .collect();

    for id in &doomed {
        if let Some(mut node) = document.tree.get_mut(*id) {
            node.detach();
        }
    }

    tracing::debug!("Removed {} shaded data tables", doomed.len());
    doomed.len()
}

/// Removes `<TABLE>...</TABLE>` blocks wholesale from a plain-text submission.
pub fn remove_text_tables(raw: &str) -> String {
    TEXT_TABLE_RE.replace_all(raw, "").into_owned()
}

/// A table is data when any row or cell carries a non-white background.
pub fn should_remove_table(table: ElementRef<'_>) -> bool {
    let table_text = clean_text(&flatten(table));
    if contains_any_header(&table_text) {
        tracing::trace!("Keeping table containing an item header");
        return false;
    }

    table.select(&SHADED_PART_SELECTOR).any(|part| {
        let element = part.value();
        let styled = element
            .attr("style")
            .and_then(background_from_style)
            .is_some_and(|bg| is_shaded(&bg));
        let attributed = element.attr("bgcolor").is_some_and(is_shaded);
        styled || attributed
    })
}

/// Reads the `background`/`background-color` value out of an inline style.
///
/// Declarations without a `:` are skipped rather than rejected.
fn background_from_style(style: &str) -> Option<String> {
    style
        .split(';')
        .filter_map(|declaration| declaration.split_once(':'))
        .filter(|(property, _)| {
            let property = property.trim().to_ascii_lowercase();
            property == "background" || property == "background-color"
        })
        .map(|(_, value)| {
            let value = value.trim().to_ascii_lowercase();
            value.trim_end_matches("!important").trim().to_string()
        })
        .find(|value| !value.is_empty())
}

fn is_shaded(value: &str) -> bool {
    let value = value.trim().to_ascii_lowercase();
    !value.is_empty() && !UNSHADED.contains(&value.as_str())
}
