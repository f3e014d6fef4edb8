// src/bin/analyze_symbol.rs
use anyhow::{anyhow, Context, Result};
use log::info;
use std::env;
use std::path::Path;

use psx_dividend_screener::config::ScreenerConfig;
use psx_dividend_screener::services::input::read_companies_from_path;
use psx_dividend_screener::services::pipeline::analyze_company;

/// Usage: analyze_symbol <payouts.csv> <SYMBOL>
fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 3 {
        return Err(anyhow!("usage: {} <payouts.csv> <SYMBOL>", args[0]));
    }
    let (path, symbol) = (Path::new(&args[1]), args[2].trim());

    let config = ScreenerConfig::from_env()?;
    let companies = read_companies_from_path(path)?;
    let company = companies
        .iter()
        .find(|c| c.symbol.eq_ignore_ascii_case(symbol))
        .ok_or_else(|| anyhow!("{} not found in {}", symbol, path.display()))?;
    let price = company
        .stock_price
        .ok_or_else(|| anyhow!("No stock price for {}", company.symbol))?;

    info!("Analyzing {} with {} payout rows", company.symbol, company.events.len());
    let record = analyze_company(
        &company.symbol,
        price,
        &company.events,
        config.current_year,
        config.options.include_projection,
    )
    .with_context(|| format!("Failed to analyze {}", company.symbol))?;

    println!("{}", serde_json::to_string_pretty(&record)?);
    Ok(())
}
