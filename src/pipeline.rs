// src/pipeline.rs
//! Fetch -> extract -> filter -> store, one filing at a time.

use crate::edgar::{EdgarClient, FilingInfo};
use crate::extractors::SectionExtractor;
use crate::storage::SectionStore;
use crate::utils::error::AppError;
use crate::utils::html_debug;
use std::path::PathBuf;

/// Per-run counters. Filings that fail to download, yield no sections, or fail
/// to store all count as `documents_failed`.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PipelineStats {
    pub documents: usize,
    pub documents_failed: usize,
    pub sections_stored: usize,
}

pub struct FilingPipeline<S: SectionStore> {
    extractor: SectionExtractor,
    store: S,
    items: Vec<String>,
    min_section_chars: usize,
    debug_dir: Option<PathBuf>,
}

impl<S: SectionStore> FilingPipeline<S> {
    pub fn new(extractor: SectionExtractor, store: S, items: Vec<String>, min_section_chars: usize) -> Self {
        Self { extractor, store, items, min_section_chars, debug_dir: None }
    }

    /// Write an annotated copy of each cleaned document under `dir/<document_id>/debug/`.
    pub fn with_debug_dir(mut self, dir: PathBuf) -> Self {
        self.debug_dir = Some(dir);
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Extracts and stores one document's sections. Returns how many were stored.
    ///
    /// A document yielding no sections at all is an error. Sections whose trimmed
    /// content is not longer than the minimum are skipped.
    pub async fn process_document(&self, document_id: &str, content: String) -> Result<usize, AppError> {
        if let Some(dir) = &self.debug_dir {
            let path = dir.join(document_id).join("debug").join("normalized.html");
            self.write_debug_annotation(document_id, content.clone(), path).await;
        }

        let sections = self.extractor.extract_async(content, self.items.clone()).await?;
        if sections.is_empty() {
            return Err(AppError::Processing(format!("No sections extracted for {}", document_id)));
        }

        let mut stored = 0;
        for section in &sections {
            if section.content.trim().chars().count() <= self.min_section_chars {
                tracing::debug!(
                    "Skipping {} for {}: {} chars is below the minimum of {}",
                    section.section_name,
                    document_id,
                    section.char_count,
                    self.min_section_chars
                );
                continue;
            }
            self.store.store_section(document_id, section)?;
            stored += 1;
        }

        tracing::info!("Processed {}: {} of {} sections stored", document_id, stored, sections.len());
        Ok(stored)
    }

    async fn write_debug_annotation(&self, document_id: &str, content: String, path: PathBuf) {
        let extractor = self.extractor.clone();
        let outcome = tokio::task::spawn_blocking(move || {
            html_debug::annotate_item_headers(&extractor.normalized_text(&content), &path)
        })
        .await;

        match outcome {
            Ok(Ok(count)) => tracing::debug!("Annotated {} item headers for {}", count, document_id),
            Ok(Err(e)) => tracing::warn!("Failed to create debug HTML for {}: {}", document_id, e),
            Err(e) => tracing::warn!("Debug annotation task for {} failed: {}", document_id, e),
        }
    }

    /// Downloads and processes each filing. One filing failing never stops the others.
    pub async fn process_filings(&self, client: &EdgarClient, filings: &[FilingInfo]) -> PipelineStats {
        let mut stats = PipelineStats::default();

        for filing in filings {
            stats.documents += 1;
            let document_id = filing.document_id();
            tracing::info!("Processing filing {} ({})", document_id, filing.company_name);

            let outcome = match client.download_filing_doc(&filing.primary_doc_url()).await {
                Ok(content) => self.process_document(&document_id, content).await,
                Err(e) => Err(e.into()),
            };

            match outcome {
                Ok(stored) => stats.sections_stored += stored,
                Err(e) => {
                    tracing::error!("Failed to process {}: {}", document_id, e);
                    stats.documents_failed += 1;
                }
            }
        }

        tracing::info!(
            "Processing finished. Documents: {}, failures: {}, sections stored: {}",
            stats.documents,
            stats.documents_failed,
            stats.sections_stored
        );
        stats
    }
}
