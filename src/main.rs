use anyhow::Result;
use log::{error, info};

use psx_dividend_screener::config::ScreenerConfig;
use psx_dividend_screener::services::input::{list_sectors, read_companies_from_path};
use psx_dividend_screener::services::pipeline::run_batch;
use psx_dividend_screener::services::report::write_report_to_path;

fn main() -> Result<()> {
    // Initialize the logger
    env_logger::init();
    info!("Logger initialized. Starting the dividend screener...");

    let config = ScreenerConfig::from_env()?;

    let sectors = match &config.sectors {
        Some(sectors) => sectors.clone(),
        None => list_sectors(&config.input_dir)?,
    };
    info!("Processing {} sectors for {}", sectors.len(), config.current_year);

    for sector in &sectors {
        info!("Processing {} sector", sector);
        let input_path = config.input_dir.join(format!("{}.csv", sector));
        let companies = match read_companies_from_path(&input_path) {
            Ok(companies) => companies,
            Err(e) => {
                error!("Skipping sector {}: {:#}", sector, e);
                continue;
            }
        };

        let outcome = run_batch(&companies, config.current_year, config.options);
        let output_path = config
            .output_dir
            .join(format!("{}_with_dividends.csv", sector));
        if let Err(e) = write_report_to_path(&output_path, &outcome.records, config.projection_year()) {
            error!("Failed to save {} sector: {:#}", sector, e);
        }
    }

    info!("Done.");
    Ok(())
}
