// src/services/input.rs
use anyhow::{Context, Result};
use csv::ReaderBuilder;
use log::{info, warn};
use serde::Deserialize;
use std::collections::HashMap;
use std::io::Read;
use std::path::{Path, PathBuf};

use crate::models::PayoutEvent;
use crate::services::pipeline::CompanyInput;

/// One extracted payout-table row.
#[derive(Debug, Deserialize)]
struct PayoutRow {
    #[serde(rename = "Symbol")]
    symbol: String,
    #[serde(rename = "StockPrice", default)]
    stock_price: String,
    #[serde(rename = "Date", default)]
    date: String,
    #[serde(rename = "FinancialResult", default)]
    financial_result: String,
    #[serde(rename = "Details", default)]
    details: String,
}

/// Parses a quote such as "Rs. 1,234.50".
pub fn parse_price_text(text: &str) -> Option<f64> {
    let cleaned = text.replace("Rs.", "").replace(',', "");
    cleaned.trim().parse::<f64>().ok()
}

/// Groups rows by symbol. Symbols keep their first-appearance order and
/// events keep row order. Short rows fill missing cells with empty text;
/// rows that still cannot be decoded are logged and dropped.
pub fn read_companies<R: Read>(reader: R) -> Result<Vec<CompanyInput>> {
    let mut rdr = ReaderBuilder::new().flexible(true).from_reader(reader);
    let mut companies: Vec<CompanyInput> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for (line, record) in rdr.deserialize::<PayoutRow>().enumerate() {
        let row = match record {
            Ok(row) => row,
            Err(e) => {
                warn!("Malformed payout row {}, ignoring: {}", line + 1, e);
                continue;
            }
        };
        let symbol = row.symbol.trim().to_string();
        if symbol.is_empty() {
            warn!("Row {} has no symbol, ignoring", line + 1);
            continue;
        }

        let slot = *index.entry(symbol.clone()).or_insert_with(|| {
            companies.push(CompanyInput {
                symbol: symbol.clone(),
                ..CompanyInput::default()
            });
            companies.len() - 1
        });
        let company = &mut companies[slot];

        if company.stock_price.is_none() {
            company.stock_price = parse_price_text(&row.stock_price);
        }

        let event = PayoutEvent::new(
            row.financial_result.trim(),
            row.details.trim(),
            row.date.trim(),
        );
        if event != PayoutEvent::default() {
            company.events.push(event);
        }
    }

    for company in companies.iter().filter(|c| c.stock_price.is_none()) {
        warn!("No parsable stock price for {}", company.symbol);
    }

    Ok(companies)
}

pub fn read_companies_from_path(path: &Path) -> Result<Vec<CompanyInput>> {
    info!("Reading payout rows from {}", path.display());
    let file = std::fs::File::open(path)
        .with_context(|| format!("Failed to open {}", path.display()))?;
    read_companies(file).with_context(|| format!("Failed to read {}", path.display()))
}

/// Sector names are the stems of the `.csv` files in `dir`, sorted.
pub fn list_sectors(dir: &Path) -> Result<Vec<String>> {
    let mut sectors = Vec::new();
    for entry in std::fs::read_dir(dir)
        .with_context(|| format!("Failed to list {}", dir.display()))?
    {
        let path: PathBuf = entry?.path();
        if path.extension().and_then(|e| e.to_str()) == Some("csv") {
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                sectors.push(stem.to_string());
            }
        }
    }
    sectors.sort();
    Ok(sectors)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_price_text() {
        assert_eq!(parse_price_text("Rs.1,234.50"), Some(1234.5));
        assert_eq!(parse_price_text(" Rs. 87.10 "), Some(87.1));
        assert_eq!(parse_price_text("112"), Some(112.0));
        assert_eq!(parse_price_text("N/A"), None);
        assert_eq!(parse_price_text(""), None);
    }

    #[test]
    fn test_read_companies_groups_by_symbol() {
        let csv = "\
Symbol,StockPrice,Date,FinancialResult,Details
FFC,\"Rs.1,234.50\",\"Feb 1, 2024\",31/12/2023(YR),65%(F) (D)
ENGRO,300,\"Aug 10, 2024\",30/06/2024(HYR),110%(ii) (D)
FFC,\"Rs.1,234.50\",\"Oct 20, 2023\",30/09/2023(IIIQ),38%(iii) (D)
LUCK,bad,,,
";
        let companies = read_companies(csv.as_bytes()).unwrap();
        let symbols: Vec<&str> = companies.iter().map(|c| c.symbol.as_str()).collect();
        assert_eq!(symbols, vec!["FFC", "ENGRO", "LUCK"]);

        assert_eq!(companies[0].stock_price, Some(1234.5));
        assert_eq!(companies[0].events.len(), 2);
        assert_eq!(companies[0].events[1].result_text, "30/09/2023(IIIQ)");
        assert_eq!(companies[0].events[1].detail_text, "38%(iii) (D)");
        assert_eq!(companies[0].events[1].date_text, "Oct 20, 2023");

        assert_eq!(companies[2].stock_price, None);
        assert!(companies[2].events.is_empty());
    }

    #[test]
    fn test_read_companies_keeps_good_rows_around_bad_ones() {
        let mut csv = b"\
Symbol,StockPrice,Date,FinancialResult,Details
FFC,100,\"Feb 1, 2024\",31/12/2023(YR),65%(F) (D)
LUCK,200,\"Mar 1, 2024\",31/12/2023(YR)
"
        .to_vec();
        csv.extend_from_slice(b"MLCF,50,\xff\xfe,31/12/2023(YR),10%\n");
        csv.extend_from_slice(b"FFC,100,\"Feb 2, 2023\",31/12/2022(YR),50%(F) (D)\n");
        csv.extend_from_slice(b"ENGRO,300,\"Aug 10, 2024\",30/06/2024(HYR),110%(ii) (D)\n");

        let companies = read_companies(csv.as_slice()).unwrap();
        let symbols: Vec<&str> = companies.iter().map(|c| c.symbol.as_str()).collect();
        assert_eq!(symbols, vec!["FFC", "LUCK", "ENGRO"]);

        assert_eq!(companies[0].events.len(), 2);
        assert_eq!(companies[1].stock_price, Some(200.0));
        assert_eq!(companies[1].events.len(), 1);
        assert_eq!(companies[1].events[0].detail_text, "");
        assert_eq!(companies[2].events.len(), 1);
    }

    #[test]
    fn test_list_sectors() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("CEMENT.csv"), "").unwrap();
        std::fs::write(dir.path().join("FERTILIZER.csv"), "").unwrap();
        std::fs::write(dir.path().join("notes.txt"), "").unwrap();

        assert_eq!(
            list_sectors(dir.path()).unwrap(),
            vec!["CEMENT".to_string(), "FERTILIZER".to_string()]
        );
    }
}
