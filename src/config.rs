// src/config.rs
use anyhow::{anyhow, Context, Result};
use chrono::{Datelike, Utc};
use chrono_tz::Asia::Karachi;
use log::{info, warn};
use std::env;
use std::path::PathBuf;

use crate::services::pipeline::BatchOptions;

#[derive(Debug, Clone)]
pub struct ScreenerConfig {
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
    /// Explicit sector list; `None` means every CSV in `input_dir`.
    pub sectors: Option<Vec<String>>,
    pub current_year: i32,
    pub options: BatchOptions,
}

/// Calendar year on the exchange's clock.
pub fn exchange_current_year() -> i32 {
    Utc::now().with_timezone(&Karachi).year()
}

/// Years outside four digits are rejected so year arithmetic stays in range.
fn parse_current_year(value: &str) -> Result<i32> {
    let year = value
        .trim()
        .parse::<i32>()
        .with_context(|| format!("PSX_CURRENT_YEAR must be a year, got '{}'", value))?;
    if (1000..=9999).contains(&year) {
        Ok(year)
    } else {
        Err(anyhow!("PSX_CURRENT_YEAR must be a four-digit year, got {}", year))
    }
}

fn parse_flag(name: &str, value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(anyhow!("{} must be a boolean, got '{}'", name, other)),
    }
}

fn flag_var(name: &str, default: bool) -> Result<bool> {
    match env::var(name) {
        Ok(value) => parse_flag(name, &value),
        Err(_) => Ok(default),
    }
}

impl ScreenerConfig {
    /// Reads `PSX_*` variables from the environment (and `.env` if present).
    pub fn from_env() -> Result<Self> {
        dotenv::dotenv().ok();

        let input_dir = env::var("PSX_INPUT_DIR").unwrap_or_else(|_| {
            warn!("$PSX_INPUT_DIR not set, defaulting to sector_files");
            "sector_files".to_string()
        });
        let output_dir = env::var("PSX_OUTPUT_DIR")
            .unwrap_or_else(|_| "sector_calculated_files".to_string());

        let sectors = env::var("PSX_SECTORS").ok().map(|list| {
            list.split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect::<Vec<_>>()
        });

        let current_year = match env::var("PSX_CURRENT_YEAR") {
            Ok(value) => parse_current_year(&value)?,
            Err(_) => exchange_current_year(),
        };

        let options = BatchOptions {
            consistent_only: flag_var("PSX_CONSISTENT_ONLY", true)?,
            include_projection: flag_var("PSX_INCLUDE_PROJECTION", true)?,
        };

        let config = ScreenerConfig {
            input_dir: PathBuf::from(input_dir),
            output_dir: PathBuf::from(output_dir),
            sectors,
            current_year,
            options,
        };
        info!("Using config: {:?}", config);
        Ok(config)
    }

    pub fn projection_year(&self) -> Option<i32> {
        self.options.include_projection.then_some(self.current_year)
    }
}
