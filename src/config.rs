// ⚙️ Configuration - environment driven, with .env support

use crate::history::{load_history_csv, sample_history, MonthlyRecord};
use anyhow::{bail, Context, Result};
use std::path::PathBuf;

pub const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:3000";
pub const DEFAULT_FORECAST_MONTHS: usize = 6;
pub const MAX_FORECAST_MONTHS: usize = 24;

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// History CSV; None means the built-in sample
    pub history_path: Option<PathBuf>,
    pub bind_address: String,
    pub forecast_months: usize,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            history_path: None,
            bind_address: DEFAULT_BIND_ADDRESS.to_string(),
            forecast_months: DEFAULT_FORECAST_MONTHS,
        }
    }
}

impl Config {
    /// Read `ECOPREDICT_*` variables, loading `.env` first if present
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Config::default();

        if let Some(path) = lookup("ECOPREDICT_HISTORY").filter(|p| !p.trim().is_empty()) {
            config.history_path = Some(PathBuf::from(path));
        }

        if let Some(addr) = lookup("ECOPREDICT_BIND") {
            config.bind_address = addr;
        }

        if let Some(months) = lookup("ECOPREDICT_FORECAST_MONTHS") {
            let months: usize = months
                .trim()
                .parse()
                .with_context(|| format!("ECOPREDICT_FORECAST_MONTHS is not a number: {:?}", months))?;
            config.forecast_months = validate_horizon(months)?;
        }

        Ok(config)
    }

    /// History from the configured CSV, or the built-in sample
    pub fn load_history(&self) -> Result<Vec<MonthlyRecord>> {
        match &self.history_path {
            Some(path) => load_history_csv(path),
            None => Ok(sample_history()),
        }
    }
}

/// Forecast horizons must be 1..=24 months
pub fn validate_horizon(months: usize) -> Result<usize> {
    if months == 0 || months > MAX_FORECAST_MONTHS {
        bail!("forecast horizon must be 1-{} months, got {}", MAX_FORECAST_MONTHS, months);
    }
    Ok(months)
}
