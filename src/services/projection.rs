// src/services/projection.rs
use log::debug;
use serde::Serialize;

use crate::error::{ensure_valid_price, EngineError};
use crate::models::{ProjectionResult, YearKey, YearlyDividends};
use crate::services::calculations::{
    calculate_average, calculate_median, percent_to_pkr, yield_percent,
};

pub const INSUFFICIENT_HISTORY: &str = "Insufficient history (need at least 2 years)";

/// Every estimate the projection can choose from, in percent of par.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectionCandidates {
    pub recent_average: f64,
    pub recent_years: usize,
    pub weighted_average: Option<f64>,
    pub median: f64,
    pub growth_trend: Option<f64>,
}

/// Yearly totals for completed known years, oldest first.
fn qualifying_totals(dividends: &YearlyDividends, current_year: i32) -> Vec<f64> {
    let mut years: Vec<i32> = dividends
        .years_desc()
        .iter()
        .filter_map(YearKey::as_known)
        .filter(|year| *year != current_year)
        .collect();
    years.sort_unstable();
    years
        .into_iter()
        .map(|year| dividends.total(&YearKey::Known(year)))
        .collect()
}

fn growth_trend(totals: &[f64]) -> Option<f64> {
    if totals.len() < 3 {
        return None;
    }
    let growth_rates: Vec<f64> = totals
        .windows(2)
        .filter(|pair| pair[0] > 0.0)
        .map(|pair| (pair[1] - pair[0]) / pair[0])
        .collect();
    if growth_rates.is_empty() {
        return None;
    }
    let latest = totals[totals.len() - 1];
    Some((latest * (1.0 + calculate_average(&growth_rates))).max(0.0))
}

/// Computes all candidate estimates from yearly totals ordered oldest first.
/// Returns `None` when fewer than two years are available.
pub fn candidate_estimates(totals: &[f64]) -> Option<ProjectionCandidates> {
    if totals.len() < 2 {
        return None;
    }
    let n = totals.len();
    let recent = &totals[n.saturating_sub(3)..];
    let weighted_average = if n >= 3 {
        Some(0.5 * totals[n - 1] + 0.3 * totals[n - 2] + 0.2 * totals[n - 3])
    } else {
        None
    };

    Some(ProjectionCandidates {
        recent_average: calculate_average(recent),
        recent_years: recent.len(),
        weighted_average,
        median: calculate_median(totals),
        growth_trend: growth_trend(totals),
    })
}

/// Growth trend when it is positive, then the weighted average, then the
/// plain recent average. Returns the chosen percent total and its label.
pub fn select_estimate(candidates: &ProjectionCandidates) -> (f64, String) {
    match (candidates.growth_trend, candidates.weighted_average) {
        (Some(trend), _) if trend > 0.0 => (trend, "Growth trend".to_string()),
        (_, Some(weighted)) => (weighted, "Weighted average".to_string()),
        _ => (
            candidates.recent_average,
            format!("Recent average ({} years)", candidates.recent_years),
        ),
    }
}

/// Projects the dividend for `current_year` from the completed years before it.
pub fn project_next_dividend(
    dividends: &YearlyDividends,
    stock_price: f64,
    current_year: i32,
) -> Result<ProjectionResult, EngineError> {
    let stock_price = ensure_valid_price(stock_price)?;

    let totals = qualifying_totals(dividends, current_year);
    let candidates = match candidate_estimates(&totals) {
        Some(candidates) => candidates,
        None => {
            return Ok(ProjectionResult {
                expected_amount_pkr: 0.0,
                expected_yield_percent: 0.0,
                method_used: INSUFFICIENT_HISTORY.to_string(),
            })
        }
    };
    debug!("Projection candidates from totals {:?}: {:?}", totals, candidates);

    let (expected_percent, method_used) = select_estimate(&candidates);
    let expected_amount_pkr = percent_to_pkr(expected_percent);

    Ok(ProjectionResult {
        expected_amount_pkr,
        expected_yield_percent: yield_percent(expected_amount_pkr, stock_price),
        method_used,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dividends(entries: &[(i32, f64)]) -> YearlyDividends {
        entries
            .iter()
            .map(|(year, percent)| (YearKey::Known(*year), *percent))
            .collect()
    }

    #[test]
    fn test_insufficient_history() {
        let only_current = dividends(&[(2025, 10.0), (2024, 10.0)]);
        let result = project_next_dividend(&only_current, 100.0, 2025).unwrap();
        assert_eq!(result.expected_amount_pkr, 0.0);
        assert_eq!(result.expected_yield_percent, 0.0);
        assert_eq!(result.method_used, INSUFFICIENT_HISTORY);

        let unknown: YearlyDividends = vec![(YearKey::Unknown, 5.0), (YearKey::Known(2023), 5.0)]
            .into_iter()
            .collect();
        let result = project_next_dividend(&unknown, 100.0, 2025).unwrap();
        assert_eq!(result.method_used, INSUFFICIENT_HISTORY);
    }

    #[test]
    fn test_growth_trend_selected() {
        let history = dividends(&[(2022, 4.0), (2023, 4.0), (2024, 6.0)]);
        let result = project_next_dividend(&history, 50.0, 2025).unwrap();
        assert_eq!(result.method_used, "Growth trend");
        assert!((result.expected_amount_pkr - 0.75).abs() < 1e-9);
        assert!((result.expected_yield_percent - 1.5).abs() < 1e-9);
    }

    #[test]
    fn test_weighted_average_when_trend_not_positive() {
        // Falling from 10 to 0: average growth is -100%, trend floors at 0.
        let history = dividends(&[(2022, 10.0), (2023, 0.0), (2024, 0.0)]);
        let result = project_next_dividend(&history, 100.0, 2025).unwrap();
        assert_eq!(result.method_used, "Weighted average");
        assert!((result.expected_amount_pkr - 0.2).abs() < 1e-9);
    }

    #[test]
    fn test_weighted_average_when_no_growth_rate() {
        let history = dividends(&[(2022, 0.0), (2023, 0.0), (2024, 0.0)]);
        let result = project_next_dividend(&history, 100.0, 2025).unwrap();
        assert_eq!(result.method_used, "Weighted average");
        assert_eq!(result.expected_amount_pkr, 0.0);
    }

    #[test]
    fn test_recent_average_with_two_years() {
        let history = dividends(&[(2023, 10.0), (2024, 20.0), (2025, 99.0)]);
        let result = project_next_dividend(&history, 100.0, 2025).unwrap();
        assert_eq!(result.method_used, "Recent average (2 years)");
        assert!((result.expected_amount_pkr - 1.5).abs() < 1e-9);
        assert!((result.expected_yield_percent - 1.5).abs() < 1e-9);
    }

    #[test]
    fn test_candidates_use_last_three_years() {
        let candidates = candidate_estimates(&[100.0, 10.0, 20.0, 30.0]).unwrap();
        assert_eq!(candidates.recent_years, 3);
        assert!((candidates.recent_average - 20.0).abs() < 1e-9);
        assert!((candidates.weighted_average.unwrap() - 23.0).abs() < 1e-9);
        assert!((candidates.median - 25.0).abs() < 1e-9);
        assert!(candidates.growth_trend.is_some());
    }

    #[test]
    fn test_rejects_bad_price() {
        let history = dividends(&[(2022, 4.0), (2023, 4.0)]);
        assert_eq!(
            project_next_dividend(&history, 0.0, 2025),
            Err(EngineError::invalid_price(0.0))
        );
    }
}
