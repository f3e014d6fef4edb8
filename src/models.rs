// src/models.rs
use serde::{Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;

/// One payout row as it appears on a company page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PayoutEvent {
    pub result_text: String,
    pub detail_text: String,
    pub date_text: String,
}

impl PayoutEvent {
    pub fn new(
        result_text: impl Into<String>,
        detail_text: impl Into<String>,
        date_text: impl Into<String>,
    ) -> Self {
        PayoutEvent {
            result_text: result_text.into(),
            detail_text: detail_text.into(),
            date_text: date_text.into(),
        }
    }
}

/// Year a payout is attributed to. `Unknown` sorts below every known year so
/// that reverse iteration yields newest first with `Unknown` last.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum YearKey {
    Unknown,
    Known(i32),
}

impl YearKey {
    pub fn as_known(&self) -> Option<i32> {
        match self {
            YearKey::Known(year) => Some(*year),
            YearKey::Unknown => None,
        }
    }
}

impl From<&str> for YearKey {
    fn from(text: &str) -> Self {
        let text = text.trim();
        if text.len() == 4 && text.chars().all(|c| c.is_ascii_digit()) {
            text.parse().map(YearKey::Known).unwrap_or(YearKey::Unknown)
        } else {
            YearKey::Unknown
        }
    }
}

impl fmt::Display for YearKey {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            YearKey::Known(year) => write!(f, "{}", year),
            YearKey::Unknown => write!(f, "Unknown"),
        }
    }
}

impl Serialize for YearKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Dividend percentages grouped per year, in the order they were declared.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct YearlyDividends {
    years: BTreeMap<YearKey, Vec<f64>>,
}

impl YearlyDividends {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a percentage to `year`, creating the year on first use.
    pub fn push(&mut self, year: YearKey, percent: f64) {
        self.years.entry(year).or_default().push(percent);
    }

    pub fn is_empty(&self) -> bool {
        self.years.is_empty()
    }

    pub fn len(&self) -> usize {
        self.years.len()
    }

    /// Years newest first, `Unknown` last.
    pub fn years_desc(&self) -> Vec<YearKey> {
        self.years.keys().rev().copied().collect()
    }

    pub fn values(&self, year: &YearKey) -> &[f64] {
        self.years.get(year).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn total(&self, year: &YearKey) -> f64 {
        self.values(year).iter().sum()
    }

    pub fn count(&self, year: &YearKey) -> usize {
        self.values(year).len()
    }

    /// "2024, 2023, 2021"
    pub fn years_paid(&self) -> String {
        self.years_desc()
            .iter()
            .map(|y| y.to_string())
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Number of payouts per year in `years_paid` order, e.g. "2, 2, 1".
    pub fn pattern(&self) -> String {
        self.years_desc()
            .iter()
            .map(|y| self.count(y).to_string())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl FromIterator<(YearKey, f64)> for YearlyDividends {
    fn from_iter<I: IntoIterator<Item = (YearKey, f64)>>(iter: I) -> Self {
        let mut dividends = YearlyDividends::new();
        for (year, percent) in iter {
            dividends.push(year, percent);
        }
        dividends
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConsistencyResult {
    pub is_consistent: bool,
    pub score: f64,
    pub remarks: String,
}

impl ConsistencyResult {
    pub(crate) fn inconsistent(remarks: impl Into<String>) -> Self {
        ConsistencyResult {
            is_consistent: false,
            score: 0.0,
            remarks: remarks.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YieldEntry {
    pub year: YearKey,
    pub amount_pkr: f64,
    pub yield_percent: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectionResult {
    pub expected_amount_pkr: f64,
    pub expected_yield_percent: f64,
    pub method_used: String,
}

/// Everything the report needs for one symbol.
#[derive(Debug, Clone, Serialize)]
pub struct CompanyRecord {
    pub symbol: String,
    pub stock_price: f64,
    pub dividend_years_paid: String,
    pub div_per_year_pattern: String,
    pub consistency: ConsistencyResult,
    pub yields: Vec<YieldEntry>,
    pub projection: Option<ProjectionResult>,
}

impl CompanyRecord {
    pub fn consistent_payer(&self) -> &'static str {
        if self.consistency.is_consistent {
            "Yes"
        } else {
            "No"
        }
    }

    /// True when a dividend was declared in one of the `window` most recent
    /// calendar years, counting `current_year` itself.
    pub fn paid_within(&self, current_year: i32, window: i32) -> bool {
        self.yields
            .iter()
            .filter_map(|entry| entry.year.as_known())
            .any(|year| year > current_year - window && year <= current_year)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_year_key_from_text() {
        assert_eq!(YearKey::from("2024"), YearKey::Known(2024));
        assert_eq!(YearKey::from(" 1999 "), YearKey::Known(1999));
        assert_eq!(YearKey::from("Unknown"), YearKey::Unknown);
        assert_eq!(YearKey::from("20245"), YearKey::Unknown);
    }

    #[test]
    fn test_years_desc_puts_unknown_last() {
        let dividends: YearlyDividends = vec![
            (YearKey::Known(2021), 5.0),
            (YearKey::Unknown, 1.0),
            (YearKey::Known(2024), 10.0),
            (YearKey::Known(2024), 7.5),
        ]
        .into_iter()
        .collect();

        assert_eq!(
            dividends.years_desc(),
            vec![YearKey::Known(2024), YearKey::Known(2021), YearKey::Unknown]
        );
        assert_eq!(dividends.years_paid(), "2024, 2021, Unknown");
        assert_eq!(dividends.pattern(), "2, 1, 1");
        assert_eq!(dividends.total(&YearKey::Known(2024)), 17.5);
        assert_eq!(dividends.values(&YearKey::Known(2024)), &[10.0, 7.5]);
    }

    #[test]
    fn test_missing_year_is_empty() {
        let dividends = YearlyDividends::new();
        assert!(dividends.is_empty());
        assert_eq!(dividends.count(&YearKey::Known(2020)), 0);
        assert_eq!(dividends.total(&YearKey::Known(2020)), 0.0);
        assert_eq!(dividends.years_paid(), "");
    }

    #[test]
    fn test_paid_within_window() {
        let record = CompanyRecord {
            symbol: "ABC".to_string(),
            stock_price: 100.0,
            dividend_years_paid: "2023".to_string(),
            div_per_year_pattern: "1".to_string(),
            consistency: ConsistencyResult::inconsistent("x"),
            yields: vec![YieldEntry {
                year: YearKey::Known(2023),
                amount_pkr: 1.0,
                yield_percent: 1.0,
            }],
            projection: None,
        };
        assert!(record.paid_within(2024, 2));
        assert!(!record.paid_within(2025, 2));
        assert_eq!(record.consistent_payer(), "No");
    }
}
