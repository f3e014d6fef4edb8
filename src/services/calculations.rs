// src/services/calculations.rs
use crate::error::{ensure_valid_price, EngineError};
use crate::models::{YearlyDividends, YieldEntry};

/// Dividends are declared as a percentage of a Rs.10 par value.
pub const PAR_VALUE_DIVISOR: f64 = 10.0;

pub fn percent_to_pkr(total_percent: f64) -> f64 {
    total_percent / PAR_VALUE_DIVISOR
}

pub fn yield_percent(amount_pkr: f64, stock_price: f64) -> f64 {
    amount_pkr / stock_price * 100.0
}

pub(crate) fn calculate_average(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}

pub(crate) fn calculate_median(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    }
}

/// Cash amount and yield for every year, newest first.
pub fn calculate_yearly_yields(
    dividends: &YearlyDividends,
    stock_price: f64,
) -> Result<Vec<YieldEntry>, EngineError> {
    let stock_price = ensure_valid_price(stock_price)?;

    Ok(dividends
        .years_desc()
        .into_iter()
        .map(|year| {
            let amount_pkr = percent_to_pkr(dividends.total(&year));
            YieldEntry {
                year,
                amount_pkr,
                yield_percent: yield_percent(amount_pkr, stock_price),
            }
        })
        .collect())
}
