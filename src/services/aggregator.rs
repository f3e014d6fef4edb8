// src/services/aggregator.rs
use log::debug;
use regex::Regex;
use std::sync::LazyLock;

use crate::models::{PayoutEvent, YearKey, YearlyDividends};

static YEAR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d{4})").expect("year pattern compiles"));
static PERCENT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+\.?\d*)%").expect("percent pattern compiles"));

fn find_year(text: &str) -> Option<YearKey> {
    YEAR_RE
        .captures(text)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse::<i32>().ok())
        .map(YearKey::Known)
}

/// Financial-result label first, then the announcement date, else `Unknown`.
pub fn attribute_year(event: &PayoutEvent) -> YearKey {
    find_year(&event.result_text)
        .or_else(|| find_year(&event.date_text))
        .unwrap_or(YearKey::Unknown)
}

/// First number directly followed by `%`; anything else counts as 0.
pub fn extract_dividend_percent(details: &str) -> f64 {
    PERCENT_RE
        .captures(details)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse::<f64>().ok())
        .unwrap_or(0.0)
}

pub fn aggregate_payouts(events: &[PayoutEvent]) -> YearlyDividends {
    let dividends: YearlyDividends = events
        .iter()
        .map(|event| (attribute_year(event), extract_dividend_percent(&event.detail_text)))
        .collect();
    debug!("Dividends extracted: {:?}", dividends);
    dividends
}
