// src/services/report.rs
use anyhow::{Context, Result};
use csv::Writer;
use log::info;
use std::io::Write;
use std::path::Path;

use crate::models::{CompanyRecord, YieldEntry};

const BASE_COLUMNS: [&str; 9] = [
    "Symbol",
    "StockPrice",
    "DividendYearsPaid",
    "DivPerYearPattern",
    "ConsistentPayer",
    "YearlyYieldDetails",
    "DividendAmountsPKR",
    "ConsistencyScore",
    "Remarks",
];

pub fn header(projection_year: Option<i32>) -> Vec<String> {
    let mut columns: Vec<String> = BASE_COLUMNS.iter().map(|c| c.to_string()).collect();
    if let Some(year) = projection_year {
        columns.push(format!("ExpectedDividend{}_PKR", year));
        columns.push(format!("ExpectedDividend{}_Percent", year));
        columns.push("CalculationMethod".to_string());
    }
    columns
}

/// "2024: 0.50% | 2023: 0.45%"
pub fn format_yield_details(yields: &[YieldEntry]) -> String {
    yields
        .iter()
        .map(|e| format!("{}: {:.2}%", e.year, e.yield_percent))
        .collect::<Vec<_>>()
        .join(" | ")
}

/// "2024: Rs.0.50 | 2023: Rs.0.45"
pub fn format_amounts(yields: &[YieldEntry]) -> String {
    yields
        .iter()
        .map(|e| format!("{}: Rs.{:.2}", e.year, e.amount_pkr))
        .collect::<Vec<_>>()
        .join(" | ")
}

pub fn format_score(score: f64) -> String {
    format!("{:.1}%", score)
}

fn format_price(price: f64) -> String {
    if price.fract() == 0.0 {
        format!("{:.1}", price)
    } else {
        price.to_string()
    }
}

pub fn record_row(record: &CompanyRecord, with_projection: bool) -> Vec<String> {
    let mut row = vec![
        record.symbol.clone(),
        format_price(record.stock_price),
        record.dividend_years_paid.clone(),
        record.div_per_year_pattern.clone(),
        record.consistent_payer().to_string(),
        format_yield_details(&record.yields),
        format_amounts(&record.yields),
        format_score(record.consistency.score),
        record.consistency.remarks.clone(),
    ];
    if with_projection {
        match &record.projection {
            Some(p) => {
                row.push(format!("Rs.{:.2}", p.expected_amount_pkr));
                row.push(format!("{:.2}%", p.expected_yield_percent));
                row.push(p.method_used.clone());
            }
            None => row.extend(std::iter::repeat(String::new()).take(3)),
        }
    }
    row
}

/// Writes a UTF-8 (with BOM) CSV report. `projection_year` adds the three
/// expected-dividend columns.
pub fn write_report<W: Write>(
    mut out: W,
    records: &[CompanyRecord],
    projection_year: Option<i32>,
) -> Result<()> {
    out.write_all("\u{feff}".as_bytes())?;
    let mut wtr = Writer::from_writer(out);
    wtr.write_record(header(projection_year))?;
    for record in records {
        wtr.write_record(record_row(record, projection_year.is_some()))?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn write_report_to_path(
    path: &Path,
    records: &[CompanyRecord],
    projection_year: Option<i32>,
) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    let file = std::fs::File::create(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;
    write_report(file, records, projection_year)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    info!("Saved {} records to {}", records.len(), path.display());
    Ok(())
}
