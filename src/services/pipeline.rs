// src/services/pipeline.rs
use log::{error, info, warn};

use crate::error::{ensure_valid_price, EngineError};
use crate::models::{CompanyRecord, PayoutEvent};
use crate::services::aggregator::aggregate_payouts;
use crate::services::calculations::calculate_yearly_yields;
use crate::services::consistency::check_dividend_consistency;
use crate::services::projection::project_next_dividend;

/// Calendar years, counting the current one, in which a kept company must
/// have declared a dividend.
const RECENT_PAYMENT_WINDOW: i32 = 2;

/// Raw inputs for one symbol. `stock_price` is `None` when the quote could
/// not be read.
#[derive(Debug, Clone, Default)]
pub struct CompanyInput {
    pub symbol: String,
    pub stock_price: Option<f64>,
    pub events: Vec<PayoutEvent>,
}

#[derive(Debug, Clone, Copy)]
pub struct BatchOptions {
    pub consistent_only: bool,
    pub include_projection: bool,
}

impl Default for BatchOptions {
    fn default() -> Self {
        BatchOptions {
            consistent_only: true,
            include_projection: true,
        }
    }
}

#[derive(Debug, Default)]
pub struct BatchOutcome {
    pub records: Vec<CompanyRecord>,
    pub filtered_out: usize,
    pub skipped: Vec<String>,
}

pub fn analyze_company(
    symbol: &str,
    stock_price: f64,
    events: &[PayoutEvent],
    current_year: i32,
    include_projection: bool,
) -> Result<CompanyRecord, EngineError> {
    let stock_price = ensure_valid_price(stock_price)?;

    let dividends = aggregate_payouts(events);
    let consistency = check_dividend_consistency(&dividends, current_year);
    let yields = calculate_yearly_yields(&dividends, stock_price)?;
    let projection = if include_projection {
        Some(project_next_dividend(&dividends, stock_price, current_year)?)
    } else {
        None
    };

    Ok(CompanyRecord {
        symbol: symbol.to_string(),
        stock_price,
        dividend_years_paid: dividends.years_paid(),
        div_per_year_pattern: dividends.pattern(),
        consistency,
        yields,
        projection,
    })
}

/// Keeps consistent payers that declared a dividend this year or last year.
pub fn passes_filter(record: &CompanyRecord, current_year: i32) -> bool {
    record.consistency.is_consistent && record.paid_within(current_year, RECENT_PAYMENT_WINDOW)
}

/// Analyzes every company in order. A company that cannot be analyzed is
/// logged and left out; it never stops the batch.
pub fn run_batch(companies: &[CompanyInput], current_year: i32, options: BatchOptions) -> BatchOutcome {
    let mut outcome = BatchOutcome::default();

    for company in companies {
        info!("Processing {}", company.symbol);

        let Some(stock_price) = company.stock_price else {
            warn!("Skipping {}: stock price unavailable", company.symbol);
            outcome.skipped.push(company.symbol.clone());
            continue;
        };

        match analyze_company(
            &company.symbol,
            stock_price,
            &company.events,
            current_year,
            options.include_projection,
        ) {
            Ok(record) => {
                info!(
                    "{}: consistent={}, remarks=\"{}\"",
                    record.symbol, record.consistency.is_consistent, record.consistency.remarks
                );
                if options.consistent_only && !passes_filter(&record, current_year) {
                    outcome.filtered_out += 1;
                } else {
                    outcome.records.push(record);
                }
            }
            Err(e) => {
                error!("Error processing {}: {}", company.symbol, e);
                outcome.skipped.push(company.symbol.clone());
            }
        }
    }

    info!(
        "Batch complete: {} kept, {} filtered out, {} skipped",
        outcome.records.len(),
        outcome.filtered_out,
        outcome.skipped.len()
    );
    outcome
}
