// src/extractors/mod.rs
pub mod cleanup;
pub mod compact;
pub mod items;
pub mod locator;
pub mod normalize;
pub mod section;
pub mod tables;

// Re-export key extraction types for convenience
pub use items::{ItemId, ItemSpec, ITEM_CATALOG};
pub use locator::{ConsumedPositions, Span};
pub use section::{extract_10k_sections, extract_10k_sections_async, Section, SectionExtractor, DEFAULT_ITEMS};
