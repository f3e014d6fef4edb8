// src/services/consistency.rs
use log::debug;

use crate::models::{ConsistencyResult, YearKey, YearlyDividends};

/// Years before the current one that still count as "recent".
const RECENT_WINDOW_YEARS: i32 = 3;
/// A single interruption skipping at most this many years is tolerated.
const MAX_MINOR_GAP_YEARS: i32 = 2;
const HIGH_CONSISTENCY_SCORE: f64 = 80.0;

/// Classifies how regularly dividends were paid, ignoring the current
/// (incomplete) year. `Unknown` counts as a year with dividends but has no
/// place on the calendar, so it never opens or closes a gap.
pub fn check_dividend_consistency(
    dividends: &YearlyDividends,
    current_year: i32,
) -> ConsistencyResult {
    if dividends.is_empty() {
        return ConsistencyResult::inconsistent("No dividends found");
    }

    let filtered_years: Vec<YearKey> = dividends
        .years_desc()
        .into_iter()
        .filter(|year| *year != YearKey::Known(current_year))
        .collect();

    if filtered_years.len() < 2 {
        return ConsistencyResult::inconsistent("Insufficient dividend history");
    }

    let years_int: Vec<i32> = filtered_years.iter().filter_map(YearKey::as_known).collect();

    let recent_years: Vec<i32> = years_int
        .iter()
        .copied()
        .filter(|year| current_year - year <= RECENT_WINDOW_YEARS)
        .collect();

    if recent_years.is_empty() {
        return ConsistencyResult::inconsistent(format!(
            "Stopped paying dividends since {}",
            filtered_years[0]
        ));
    }

    let gaps: Vec<i32> = years_int
        .windows(2)
        .map(|pair| pair[0] - pair[1])
        .filter(|gap| *gap > 1)
        .collect();

    // Every filtered year is a year with dividends, so this is always 100.
    let total_years = filtered_years.len();
    let years_with_dividends = filtered_years.len();
    let score = years_with_dividends as f64 / total_years as f64 * 100.0;

    debug!(
        "Consistency inputs: years={:?}, recent={:?}, gaps={:?}, score={:.1}",
        years_int, recent_years, gaps, score
    );

    let (is_consistent, mut remarks) = if gaps.is_empty() {
        (
            true,
            format!("Perfect consistency: {} consecutive years", years_with_dividends),
        )
    } else if gaps.len() == 1 && gaps[0] - 1 <= MAX_MINOR_GAP_YEARS {
        (
            true,
            format!(
                "Minor gap detected but overall consistent: {} years with dividends",
                years_with_dividends
            ),
        )
    } else if score >= HIGH_CONSISTENCY_SCORE && recent_years.len() >= 2 {
        (
            true,
            format!(
                "High consistency ({:.1}%): {} years with dividends",
                score, years_with_dividends
            ),
        )
    } else {
        let mut remarks = format!(
            "Low consistency ({:.1}%): {} years with dividends",
            score, years_with_dividends
        );
        if !gaps.is_empty() {
            remarks.push_str(&format!(", {} gaps detected", gaps.len()));
        }
        (false, remarks)
    };

    let dividend_counts: Vec<usize> = filtered_years.iter().map(|y| dividends.count(y)).collect();
    let pattern_consistent = dividend_counts.windows(2).all(|pair| pair[0] == pair[1]);
    if is_consistent && pattern_consistent {
        remarks.push_str(&format!(
            ", Pattern: {} dividends per year",
            dividend_counts[0]
        ));
    }

    ConsistencyResult {
        is_consistent,
        score,
        remarks,
    }
}
