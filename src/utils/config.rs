// src/utils/config.rs
use crate::extractors::{ItemId, SectionExtractor};
use crate::utils::error::AppError;
use std::path::PathBuf;

/// Items the pipeline stores when none are requested: the narrative sections
/// downstream scoring reads, plus the financial statements.
pub const DEFAULT_PIPELINE_ITEMS: [&str; 6] = ["1", "1A", "3", "7", "7A", "8"];

/// Sections at or below this many characters are treated as stubs
/// ("Not applicable.", a cross-reference) and not stored.
pub const DEFAULT_MIN_SECTION_CHARS: usize = 100;

// SEC asks automated clients to identify themselves with a contact address.
pub const DEFAULT_USER_AGENT: &str = "filing-items research-bot admin@example.com";

/// Resolved run configuration, validated once at startup.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub items: Vec<String>,
    pub section_names: Vec<(String, String)>,
    pub remove_tables: bool,
    pub output_dir: PathBuf,
    pub min_section_chars: usize,
    pub user_agent: String,
    pub debug: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            items: DEFAULT_PIPELINE_ITEMS.iter().map(|id| id.to_string()).collect(),
            section_names: Vec::new(),
            remove_tables: false,
            output_dir: PathBuf::from("./output"),
            min_section_chars: DEFAULT_MIN_SECTION_CHARS,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            debug: false,
        }
    }
}

impl PipelineConfig {
    /// Checks every item id and rewrites it to its catalog spelling (`1a` -> `1A`).
    pub fn validate(mut self) -> Result<Self, AppError> {
        if self.items.is_empty() {
            return Err(AppError::Config("At least one item must be requested".to_string()));
        }

        self.items = self
            .items
            .iter()
            .map(|id| id.parse::<ItemId>().map(|item| item.as_str().to_string()))
            .collect::<Result<Vec<_>, _>>()?;

        for (item, name) in &self.section_names {
            item.parse::<ItemId>()?;
            if name.trim().is_empty() {
                return Err(AppError::Config(format!("Empty section name for item {}", item)));
            }
        }

        if self.user_agent.trim().is_empty() {
            return Err(AppError::Config("EDGAR user agent must not be empty".to_string()));
        }
        if !self.user_agent.contains('@') {
            tracing::warn!("EDGAR user agent '{}' has no contact address; SEC may refuse requests", self.user_agent);
        }

        Ok(self)
    }

    /// Builds the extractor this configuration describes.
    pub fn extractor(&self) -> Result<SectionExtractor, AppError> {
        let mut extractor = SectionExtractor::new().remove_tables(self.remove_tables);
        for (item, name) in &self.section_names {
            extractor = extractor.section_name(item, name.trim())?;
        }
        Ok(extractor)
    }
}

/// Parses a `ID=NAME` custom section name, e.g. `1A=risk_factors`.
pub fn parse_section_name(raw: &str) -> Result<(String, String), AppError> {
    let (item, name) = raw
        .split_once('=')
        .ok_or_else(|| AppError::Config(format!("Expected ID=NAME, got '{}'", raw)))?;
    Ok((item.trim().to_string(), name.trim().to_string()))
}

// --- Tests ---
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_canonicalizes_items() {
        let config = PipelineConfig {
            items: vec!["1a".to_string(), "Item 7".to_string()],
            ..PipelineConfig::default()
        };
        let config = config.validate().unwrap();
        assert_eq!(config.items, vec!["1A", "7"]);
    }

    #[test]
    fn test_validate_rejects_bad_input() {
        let unknown = PipelineConfig {
            items: vec!["42".to_string()],
            ..PipelineConfig::default()
        };
        assert!(matches!(unknown.validate(), Err(AppError::Extraction(_))));

        let empty = PipelineConfig {
            items: Vec::new(),
            ..PipelineConfig::default()
        };
        assert!(matches!(empty.validate(), Err(AppError::Config(_))));

        let blank_name = PipelineConfig {
            section_names: vec![("1A".to_string(), " ".to_string())],
            ..PipelineConfig::default()
        };
        assert!(matches!(blank_name.validate(), Err(AppError::Config(_))));
    }

    #[test]
    fn test_parse_section_name() {
        assert_eq!(
            parse_section_name("1A = risk_factors").unwrap(),
            ("1A".to_string(), "risk_factors".to_string())
        );
        assert!(parse_section_name("risk_factors").is_err());
    }

    #[test]
    fn test_extractor_applies_names() {
        let config = PipelineConfig {
            section_names: vec![("7".to_string(), "mda".to_string())],
            ..PipelineConfig::default()
        };
        let extractor = config.extractor().unwrap();
        let sections = extractor.extract("ITEM 7. MD&A\nSales grew.\n", &["7"]).unwrap();
        assert_eq!(sections["mda"], "Sales grew.");
    }
}
