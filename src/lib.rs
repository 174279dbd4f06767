// src/lib.rs
//! Recovers regulator-defined items ("Item 1A. Risk Factors", ...) from 10-K
//! filings delivered as HTML or plain text.
//!
//! The extraction engine lives in [`extractors`]; [`edgar`], [`storage`] and
//! [`pipeline`] are the fetch and persistence collaborators the binary wires
//! around it.
pub mod edgar;
pub mod extractors;
pub mod pipeline;
pub mod storage;
pub mod utils;

pub use extractors::{extract_10k_sections, extract_10k_sections_async, ItemId, Section, SectionExtractor};
pub use utils::AppError;
