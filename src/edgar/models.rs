// src/edgar/models.rs
use serde::{Deserialize, Serialize};

/// The slice of the EDGAR company submission index this crate reads.
/// Example: https://data.sec.gov/submissions/CIK0000320193.json
#[derive(Debug, Deserialize)]
pub struct CompanySubmission {
    pub cik: String,
    pub name: String,
    pub filings: Filings,
}

#[derive(Debug, Deserialize)]
pub struct Filings {
    pub recent: FilingsList,
}

/// Column-oriented listing: index `i` of every vector describes the same filing.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilingsList {
    pub accession_number: Vec<String>,
    pub filing_date: Vec<String>,
    #[serde(default)]
    pub report_date: Vec<String>,
    pub form: Vec<String>,
    pub primary_document: Vec<String>,
}

/// A 10-K filing whose primary document can be fetched and extracted
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilingInfo {
    pub accession_number: String,
    pub filing_date: String,
    pub form_type: String,
    pub ticker: String,
    pub company_name: String,
    pub cik: String,
    pub primary_doc: String,
    pub year: Option<u32>, // Fiscal year of the report
}

impl FilingInfo {
    /// Constructs the URL to access the primary document of this filing
    pub fn primary_doc_url(&self) -> String {
        let acc_no_dashes = self.accession_number.replace('-', "");
        let cik = self.cik.trim_start_matches('0');
        format!(
            "https://www.sec.gov/Archives/edgar/data/{}/{}/{}",
            cik, acc_no_dashes, self.primary_doc
        )
    }

    /// Stable key under which this filing's sections are stored, e.g. `ACME_2023_0000320193-23-000106`.
    pub fn document_id(&self) -> String {
        match self.year {
            Some(year) => format!("{}_{}_{}", self.ticker.to_uppercase(), year, self.accession_number),
            None => format!("{}_{}", self.ticker.to_uppercase(), self.accession_number),
        }
    }
}
