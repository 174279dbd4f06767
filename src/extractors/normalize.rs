// src/extractors/normalize.rs

// --- Imports ---
use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Node, Selector};

// --- CSS Selectors (Lazy Static) ---
static CELL_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("td").expect("Failed to compile CELL_SELECTOR")
});

static ROW_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("tr").expect("Failed to compile ROW_SELECTOR")
});

/// Elements whose end is rendered as a paragraph break.
const BLOCK_ELEMENTS: [&str; 10] = ["div", "tr", "p", "li", "h1", "h2", "h3", "h4", "h5", "h6"];

/// Elements whose end is rendered as a column gap rather than a line break.
const CELL_ELEMENTS: [&str; 2] = ["td", "th"];

/// Elements whose text never reaches the reader.
const SKIPPED_ELEMENTS: [&str; 4] = ["script", "style", "noscript", "template"];

const PARAGRAPH_BREAK: &str = "\n\n";

/// Structured HTML filings carry real table rows and cells; EDGAR plain-text
/// submissions only carry SGML-ish wrapper tags.
pub fn is_html_structured(document: &Html) -> bool {
    document.select(&CELL_SELECTOR).next().is_some()
        && document.select(&ROW_SELECTOR).next().is_some()
}

/// Flattens a parsed document into plain text, preserving block boundaries as line breaks.
pub fn document_text(document: &Html) -> String {
    flatten(document.root_element())
}

/// Parses and flattens raw markup in one step.
///
/// html5ever recovers from any input, so corrupt markup degrades to whatever
/// text it could place in the tree; this never fails.
pub fn strip_markup(raw: &str) -> String {
    document_text(&Html::parse_document(raw))
}

/// Walks the subtree under `root` with an explicit stack.
///
/// Deeply nested filings (hundreds of levels of `<div>`/`<font>`) stay off the call stack.
pub fn flatten(root: ElementRef<'_>) -> String {
    let mut out = String::new();
    // (node, closing): the closing visit emits the separator after all children.
    let mut stack = vec![(*root, false)];

    while let Some((node, closing)) = stack.pop() {
        match node.value() {
            Node::Element(element) => {
                let name = element.name();
                if closing {
                    if BLOCK_ELEMENTS.contains(&name) {
                        out.push_str(PARAGRAPH_BREAK);
                    } else if CELL_ELEMENTS.contains(&name) {
                        out.push(' ');
                    }
                    continue;
                }
                if SKIPPED_ELEMENTS.contains(&name) {
                    continue;
                }
                if name == "br" {
                    out.push_str(PARAGRAPH_BREAK);
                }
                stack.push((node, true));
                stack.extend(node.children().rev().map(|child| (child, false)));
            }
            Node::Text(text) => out.push_str(text),
            _ => {} // Comments, doctype, processing instructions
        }
    }

    out
}
