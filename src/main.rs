// src/main.rs
use clap::Parser;
use filing_items::edgar::EdgarClient;
use filing_items::pipeline::FilingPipeline;
use filing_items::storage::StorageManager;
use filing_items::utils::config::{self, PipelineConfig};
use filing_items::utils::{logging, AppError};
use std::path::PathBuf;

/// Extracts 10-K items (Business, Risk Factors, MD&A, ...) from filings
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Local filing document (HTML or plain text) to extract from
    #[arg(short, long, conflicts_with = "ticker")]
    input: Option<PathBuf>,

    /// Ticker symbol whose 10-K filings are fetched from EDGAR
    #[arg(short, long)]
    ticker: Option<String>,

    /// Start year for the 10-K filings (optional)
    #[arg(long)]
    start_year: Option<u32>,

    /// End year for the 10-K filings (optional)
    #[arg(long)]
    end_year: Option<u32>,

    /// Items to extract, comma separated
    #[arg(long, value_delimiter = ',', default_values = config::DEFAULT_PIPELINE_ITEMS)]
    items: Vec<String>,

    /// Custom section name for an item, e.g. --name 1A=risk_factors (repeatable)
    #[arg(long = "name", value_name = "ID=NAME")]
    names: Vec<String>,

    /// Drop shaded numeric tables before extraction
    #[arg(long)]
    remove_tables: bool,

    /// Output directory for extracted content
    #[arg(short, long, default_value = "./output")]
    output_dir: PathBuf,

    /// Sections with at most this many characters are not stored
    #[arg(long, env = "MIN_SECTION_CHARS", default_value_t = config::DEFAULT_MIN_SECTION_CHARS)]
    min_section_chars: usize,

    /// User-Agent sent to EDGAR; SEC requires a contact address
    #[arg(long, env = "EDGAR_USER_AGENT", default_value = config::DEFAULT_USER_AGENT)]
    user_agent: String,

    /// Debug mode - save annotated HTML of the cleaned text with item headers highlighted
    #[arg(short, long)]
    debug: bool,
}

impl Args {
    fn to_config(&self) -> Result<PipelineConfig, AppError> {
        let section_names = self
            .names
            .iter()
            .map(|raw| config::parse_section_name(raw))
            .collect::<Result<Vec<_>, _>>()?;

        PipelineConfig {
            items: self.items.clone(),
            section_names,
            remove_tables: self.remove_tables,
            output_dir: self.output_dir.clone(),
            min_section_chars: self.min_section_chars,
            user_agent: self.user_agent.clone(),
            debug: self.debug,
        }
        .validate()
    }
}

#[tokio::main]
async fn main() -> Result<(), AppError> {
    // 1. Setup Logging (reads RUST_LOG env var)
    logging::setup_logging();

    // 2. Parse CLI Arguments
    let args = Args::parse();
    tracing::debug!("Starting with args: {:?}", args);
    let config = args.to_config()?;

    // 3. Wire extractor and storage
    let storage = StorageManager::new(&config.output_dir)?;
    let mut pipeline = FilingPipeline::new(
        config.extractor()?,
        storage,
        config.items.clone(),
        config.min_section_chars,
    );
    if config.debug {
        pipeline = pipeline.with_debug_dir(config.output_dir.clone());
    }

    // 4a. A local document
    if let Some(input) = &args.input {
        let content = tokio::fs::read_to_string(input).await?;
        let document_id = input
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_else(|| "document".to_string());
        let stored = pipeline.process_document(&document_id, content).await?;
        if stored == 0 {
            return Err(AppError::Processing(format!("No sections stored for {}", input.display())));
        }
        return Ok(());
    }

    // 4b. 10-K filings fetched from EDGAR
    let ticker = args
        .ticker
        .as_deref()
        .ok_or_else(|| AppError::Config("Either --input or --ticker is required".to_string()))?;

    let client = EdgarClient::new(&config.user_agent)?;
    tracing::info!("Finding 10-K filings for ticker: {}", ticker);
    let filings = client.find_10k_filings(ticker, args.start_year, args.end_year).await?;
    tracing::info!("Found {} 10-K filings", filings.len());

    if filings.is_empty() {
        return Err(AppError::Config(format!(
            "No 10-K filings found for ticker {} in the specified date range",
            ticker
        )));
    }

    let stats = pipeline.process_filings(&client, &filings).await;
    if stats.sections_stored == 0 && stats.documents_failed > 0 {
        return Err(AppError::Processing(format!(
            "Failed to extract any sections from {} filings",
            stats.documents_failed
        )));
    }

    Ok(())
}
