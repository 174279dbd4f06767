// src/utils/html_debug.rs
use crate::extractors::ItemId;
use crate::utils::error::AppError;
use std::fs;
use std::path::Path;

/// Writes `text` as an HTML page with the given byte ranges highlighted.
///
/// Overlapping ranges are dropped after the first; the page is for eyeballing, not parsing.
pub fn save_debug_html(text: &str, path: &Path, highlights: &[(usize, usize, String)]) -> Result<(), AppError> {
    let mut debug_html = String::from("<!DOCTYPE html>\n<html>\n<head>\n<style>\n");
    debug_html.push_str("body { font-family: monospace; white-space: pre-wrap; }\n");
    debug_html.push_str(".highlight-header { background-color: #90EE90; }\n");
    debug_html.push_str("</style>\n</head>\n<body>\n");

    let mut sorted_highlights = highlights.to_vec();
    sorted_highlights.sort_by_key(|h| h.0);

    let mut last_pos = 0;
    for (start, end, label) in sorted_highlights {
        if start < last_pos || end > text.len() {
            continue;
        }
        debug_html.push_str(&escape_html(&text[last_pos..start]));
        debug_html.push_str(&format!(
            "<span class=\"highlight-header\" title=\"Item {} at {}-{}\">",
            escape_html(&label),
            start,
            end
        ));
        debug_html.push_str(&escape_html(&text[start..end]));
        debug_html.push_str("</span>");
        last_pos = end;
    }
    debug_html.push_str(&escape_html(&text[last_pos..]));
    debug_html.push_str("\n</body>\n</html>");

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, debug_html)?;

    tracing::info!("Saved debug HTML to {}", path.display());
    Ok(())
}

/// Highlights every catalog item header in cleaned filing text, table-of-contents
/// repeats included, so boundary choices can be checked by eye.
pub fn annotate_item_headers(text: &str, path: &Path) -> Result<usize, AppError> {
    let highlights: Vec<(usize, usize, String)> = ItemId::all()
        .flat_map(|item| {
            item.header_re()
                .find_iter(text)
                .map(move |m| (m.start(), m.end(), item.to_string()))
        })
        .collect();

    save_debug_html(text, path, &highlights)?;
    Ok(highlights.len())
}

fn escape_html(raw: &str) -> String {
    raw.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;").replace('"', "&quot;")
}
