// src/edgar/client.rs
use crate::edgar::models::{CompanySubmission, FilingInfo, FilingsList};
use crate::utils::error::EdgarError;
use reqwest::header;
use std::time::Duration;

// SEC asks for 10 requests/second max. Be conservative. >100ms delay.
const EDGAR_REQUEST_DELAY_MS: u64 = 150;
const EDGAR_TIMEOUT_SECS: u64 = 60;
const TICKER_INDEX_URL: &str = "https://www.sec.gov/files/company_tickers.json";

/// Fetches raw filing documents from EDGAR. Makes no attempt to interpret them.
#[derive(Debug, Clone)]
pub struct EdgarClient {
    http: reqwest::Client,
    user_agent: String,
}

impl EdgarClient {
    /// Creates a client that identifies itself with `user_agent`, as SEC requires.
    pub fn new(user_agent: &str) -> Result<Self, EdgarError> {
        let http = reqwest::Client::builder()
            .user_agent(user_agent)
            .timeout(Duration::from_secs(EDGAR_TIMEOUT_SECS))
            .build()?;
        Ok(Self { http, user_agent: user_agent.to_string() })
    }

    /// Downloads a specific filing document from its URL.
    /// Includes mandatory User-Agent and basic rate limiting.
    pub async fn download_filing_doc(&self, url: &str) -> Result<String, EdgarError> {
        tracing::info!("Downloading document from: {}", url);
        tracing::debug!("Using User-Agent: {}", self.user_agent);

        let response = self.get(url).await?;
        let body = response.text().await?;
        tracing::debug!("Successfully downloaded {} bytes from {}", body.len(), url);
        Ok(body)
    }

    /// Gets the zero-padded CIK (Central Index Key) for a ticker symbol
    pub async fn get_cik_from_ticker(&self, ticker: &str) -> Result<String, EdgarError> {
        let json: serde_json::Value = self.get(TICKER_INDEX_URL).await?.json().await?;
        cik_from_ticker_index(&json, ticker)
    }

    /// Fetches the company submission data for a given CIK
    pub async fn get_company_submissions(&self, cik: &str) -> Result<CompanySubmission, EdgarError> {
        let url = format!("https://data.sec.gov/submissions/CIK{}.json", cik);
        let submission: CompanySubmission = self.get(&url).await?.json().await?;
        Ok(submission)
    }

    /// Finds 10-K filings for a ticker within an inclusive year range, newest first
    pub async fn find_10k_filings(
        &self,
        ticker: &str,
        start_year: Option<u32>,
        end_year: Option<u32>,
    ) -> Result<Vec<FilingInfo>, EdgarError> {
        let cik = self.get_cik_from_ticker(ticker).await?;
        let submissions = self.get_company_submissions(&cik).await?;
        let mut filings = list_10k_filings(&submissions.filings.recent, ticker, &submissions.name, &cik)?;

        filings.retain(|filing| {
            filing.year.is_some_and(|year| {
                start_year.map_or(true, |start| year >= start) && end_year.map_or(true, |end| year <= end)
            })
        });
        Ok(filings)
    }

    /// Rate-limited GET that maps SEC's refusal codes onto [`EdgarError`].
    async fn get(&self, url: &str) -> Result<reqwest::Response, EdgarError> {
        // --- Basic Rate Limiting ---
        tokio::time::sleep(Duration::from_millis(EDGAR_REQUEST_DELAY_MS)).await;

        let response = self
            .http
            .get(url)
            // SEC uses various content types, but often text/html for filings
            .header(header::ACCEPT, "application/json,application/xml,text/html,text/plain,*/*")
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        tracing::error!("HTTP error status: {} for URL: {}", status, url);
        match status {
            reqwest::StatusCode::FORBIDDEN | reqwest::StatusCode::TOO_MANY_REQUESTS => {
                tracing::warn!("Received {} - check User-Agent and rate limits.", status);
                Err(EdgarError::RateLimited)
            }
            reqwest::StatusCode::NOT_FOUND => Err(EdgarError::FilingDocNotFound(url.to_string())),
            _ => Err(EdgarError::Http(status)),
        }
    }
}

/// Looks a ticker up in `company_tickers.json` (`{"0": {"cik_str": 320193, "ticker": "AAPL", ...}, ...}`).
fn cik_from_ticker_index(index: &serde_json::Value, ticker: &str) -> Result<String, EdgarError> {
    let companies = index
        .as_object()
        .ok_or_else(|| EdgarError::Parse("Invalid ticker index structure".to_string()))?;

    let company = companies
        .values()
        .find(|company| {
            company
                .get("ticker")
                .and_then(|t| t.as_str())
                .is_some_and(|t| t.eq_ignore_ascii_case(ticker))
        })
        .ok_or_else(|| EdgarError::Parse(format!("Could not find CIK for ticker {}", ticker)))?;

    let cik = company
        .get("cik_str")
        .and_then(|cik| cik.as_u64())
        .ok_or_else(|| EdgarError::Parse("Invalid CIK format".to_string()))?;
    Ok(format!("{:010}", cik))
}

/// Picks the 10-K rows out of the column-oriented listing, newest first.
fn list_10k_filings(
    recent: &FilingsList,
    ticker: &str,
    company_name: &str,
    cik: &str,
) -> Result<Vec<FilingInfo>, EdgarError> {
    let column = |values: &[String], i: usize, what: &str| {
        values
            .get(i)
            .cloned()
            .ok_or_else(|| EdgarError::Parse(format!("Missing {} for filing {}", what, i)))
    };

    let mut filings = Vec::new();
    for (i, form) in recent.form.iter().enumerate() {
        if form != "10-K" {
            continue;
        }

        let filing_date = column(&recent.filing_date, i, "filing date")?;
        // Fiscal year comes from the report period; fall back to the filing date.
        let year = recent
            .report_date
            .get(i)
            .filter(|date| !date.is_empty())
            .unwrap_or(&filing_date)
            .get(0..4)
            .and_then(|year| year.parse::<u32>().ok());

        filings.push(FilingInfo {
            accession_number: column(&recent.accession_number, i, "accession number")?,
            filing_date,
            form_type: form.clone(),
            ticker: ticker.to_uppercase(),
            company_name: company_name.to_string(),
            cik: cik.to_string(),
            primary_doc: column(&recent.primary_document, i, "primary document")?,
            year,
        });
    }

    // Sort by year (newest first)
    filings.sort_by(|a, b| b.year.cmp(&a.year));
    Ok(filings)
}

// --- Tests ---
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cik_lookup_is_case_insensitive_and_padded() {
        let index = serde_json::json!({
            "0": {"cik_str": 320193, "ticker": "AAPL", "title": "Apple Inc."},
            "1": {"cik_str": 789019, "ticker": "MSFT", "title": "Microsoft Corp"}
        });
        assert_eq!(cik_from_ticker_index(&index, "msft").unwrap(), "0000789019");
        assert!(matches!(cik_from_ticker_index(&index, "ZZZZ"), Err(EdgarError::Parse(_))));
    }

    #[test]
    fn test_list_10k_filings_filters_and_sorts() {
        let recent = FilingsList {
            accession_number: vec!["a-22".into(), "b-23".into(), "c-23".into()],
            filing_date: vec!["2022-10-28".into(), "2023-05-01".into(), "2023-11-03".into()],
            report_date: vec!["2022-09-24".into(), "2023-04-01".into(), "".into()],
            form: vec!["10-K".into(), "10-Q".into(), "10-K".into()],
            primary_document: vec!["x22.htm".into(), "q.htm".into(), "x23.htm".into()],
        };
        let filings = list_10k_filings(&recent, "aapl", "Apple Inc.", "0000320193").unwrap();
        assert_eq!(filings.len(), 2);
        assert_eq!(filings[0].accession_number, "c-23");
        assert_eq!(filings[0].year, Some(2023));
        assert_eq!(filings[1].year, Some(2022));
        assert_eq!(filings[1].ticker, "AAPL");
    }

    #[test]
    fn test_list_10k_filings_reports_ragged_columns() {
        let recent = FilingsList {
            accession_number: vec![],
            filing_date: vec!["2022-10-28".into()],
            report_date: vec![],
            form: vec!["10-K".into()],
            primary_document: vec!["x.htm".into()],
        };
        assert!(matches!(list_10k_filings(&recent, "X", "X", "1"), Err(EdgarError::Parse(_))));
    }
}
