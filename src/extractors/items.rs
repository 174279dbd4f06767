// src/extractors/items.rs

// --- Imports ---
use crate::utils::error::ExtractError;
use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;
use std::str::FromStr;

/// Horizontal whitespace only; header parts may be letter-spaced but never span lines.
pub(crate) const HSPACE: &str = r"[^\S\r\n]";

/// One entry of the 10-K item catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ItemSpec {
    pub id: &'static str,
    pub title: &'static str,
}

/// The fixed, ordered catalog of 10-K items.
pub const ITEM_CATALOG: [ItemSpec; 20] = [
    ItemSpec { id: "1", title: "Business" },
    ItemSpec { id: "1A", title: "Risk Factors" },
    ItemSpec { id: "1B", title: "Unresolved Staff Comments" },
    ItemSpec { id: "2", title: "Properties" },
    ItemSpec { id: "3", title: "Legal Proceedings" },
    ItemSpec { id: "4", title: "Mine Safety Disclosures" },
    ItemSpec { id: "5", title: "Market for Registrant's Common Equity, Related Stockholder Matters and Issuer Purchases of Equity Securities" },
    ItemSpec { id: "6", title: "Selected Financial Data" },
    ItemSpec { id: "7", title: "Management's Discussion and Analysis of Financial Condition and Results of Operations" },
    ItemSpec { id: "7A", title: "Quantitative and Qualitative Disclosures About Market Risk" },
    ItemSpec { id: "8", title: "Financial Statements and Supplementary Data" },
    ItemSpec { id: "9", title: "Changes in and Disagreements with Accountants on Accounting and Financial Disclosure" },
    ItemSpec { id: "9A", title: "Controls and Procedures" },
    ItemSpec { id: "9B", title: "Other Information" },
    ItemSpec { id: "10", title: "Directors, Executive Officers and Corporate Governance" },
    ItemSpec { id: "11", title: "Executive Compensation" },
    ItemSpec { id: "12", title: "Security Ownership of Certain Beneficial Owners and Management and Related Stockholder Matters" },
    ItemSpec { id: "13", title: "Certain Relationships and Related Transactions, and Director Independence" },
    ItemSpec { id: "14", title: "Principal Accountant Fees and Services" },
    ItemSpec { id: "15", title: "Exhibits and Financial Statement Schedules" },
];

/// Header regexes, one per catalog entry, in catalog order.
static HEADER_RES: Lazy<Vec<Regex>> = Lazy::new(|| {
    ITEM_CATALOG
        .iter()
        .map(|spec| {
            Regex::new(&header_pattern(spec.id)).expect("Failed to compile item header pattern")
        })
        .collect()
});

/// A requested item, validated against the catalog.
///
/// Holds the catalog position so ordering and successor lookup are index arithmetic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ItemId(usize);

impl ItemId {
    pub fn spec(self) -> &'static ItemSpec {
        &ITEM_CATALOG[self.0]
    }

    pub fn as_str(self) -> &'static str {
        self.spec().id
    }

    pub fn index(self) -> usize {
        self.0
    }

    /// Compiled header pattern for this item.
    pub fn header_re(self) -> &'static Regex {
        &HEADER_RES[self.0]
    }

    /// Every item after this one in the catalog, nearest first.
    pub fn successors(self) -> impl Iterator<Item = ItemId> {
        (self.0 + 1..ITEM_CATALOG.len()).map(ItemId)
    }

    /// Default key used in extraction output, e.g. `item_1a`.
    pub fn default_section_name(self) -> String {
        format!("item_{}", self.as_str().to_lowercase())
    }

    pub fn all() -> impl Iterator<Item = ItemId> {
        (0..ITEM_CATALOG.len()).map(ItemId)
    }
}

impl FromStr for ItemId {
    type Err = ExtractError;

    /// Accepts `1a`, `Item 1A`, `item_1a` and `9A(T)` as well as the bare catalog id.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let lowered = trimmed.to_ascii_lowercase();
        let bare = lowered
            .strip_prefix("item")
            .map(|rest| rest.trim_start_matches(|c: char| c == '_' || c.is_whitespace()))
            .unwrap_or(lowered.as_str());
        let bare = bare.strip_suffix("(t)").unwrap_or(bare);

        ITEM_CATALOG
            .iter()
            .position(|spec| spec.id.eq_ignore_ascii_case(bare))
            .map(ItemId)
            .ok_or_else(|| ExtractError::UnknownItem(trimmed.to_string()))
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Regex fragment matching an item id, tolerant of letter-spacing before the suffix.
///
/// `9A` additionally accepts the `9A(T)` form used by smaller reporting companies.
pub fn item_pattern(id: &str) -> String {
    match id.char_indices().find(|(_, c)| c.is_ascii_alphabetic()) {
        Some((pos, _)) => {
            let (digits, letter) = id.split_at(pos);
            let optional_t = if id == "9A" { r"(?:\(T\))?" } else { "" };
            format!("{digits}{HSPACE}*{letter}{optional_t}")
        }
        None => id.to_string(),
    }
}

/// Full header pattern: `ITEM <id>` at the start of a line followed by a terminator.
///
/// The terminator is one of `. * ~ - :` or whitespace, so `ITEM 1` never matches `ITEM 10`
/// or `ITEM 1A`.
pub fn header_pattern(id: &str) -> String {
    format!(r"(?im)^{HSPACE}*ITEM\s+{}[.*~\-:\s]", item_pattern(id))
}

/// True when `text` contains a header line for any catalog item.
pub fn contains_any_header(text: &str) -> bool {
    HEADER_RES.iter().any(|re| re.is_match(text))
}
