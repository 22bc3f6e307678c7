// 📅 Monthly History - ordered emission totals per period
//
// The history is supplied by the caller (CSV file or the built-in sample) and
// is never mutated by the core. Position in the sequence is recency: the last
// record is the most recent month.

use crate::error::{CoreError, Result as CoreResult};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// One month of emissions, all values in kg CO2e
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct MonthlyRecord {
    #[serde(rename = "Month")]
    pub period: String,

    #[serde(rename = "Actual")]
    pub actual: f64,

    #[serde(rename = "Predicted")]
    pub predicted: f64,

    #[serde(rename = "Target")]
    pub target: f64,
}

impl MonthlyRecord {
    pub fn new(period: &str, actual: f64, predicted: f64, target: f64) -> Self {
        MonthlyRecord {
            period: period.to_string(),
            actual,
            predicted,
            target,
        }
    }

    /// Actual emissions must be a finite, non-negative mass
    pub fn validate(&self) -> CoreResult<()> {
        if !self.actual.is_finite() {
            return Err(CoreError::InvalidRecord {
                period: self.period.clone(),
                reason: format!("actual emissions {} is not finite", self.actual),
            });
        }
        if self.actual < 0.0 {
            return Err(CoreError::InvalidRecord {
                period: self.period.clone(),
                reason: format!("actual emissions {} is negative", self.actual),
            });
        }
        Ok(())
    }
}

/// Load a monthly history from a CSV file with `Month,Actual,Predicted,Target` columns
pub fn load_history_csv(csv_path: &Path) -> Result<Vec<MonthlyRecord>> {
    let mut rdr = csv::Reader::from_path(csv_path)
        .with_context(|| format!("Failed to open history CSV: {:?}", csv_path))?;

    let mut history = Vec::new();

    for (idx, result) in rdr.deserialize().enumerate() {
        let record: MonthlyRecord = result
            .with_context(|| format!("Failed to deserialize history row {}", idx + 1))?;
        record
            .validate()
            .with_context(|| format!("Invalid history row {}", idx + 1))?;
        history.push(record);
    }

    tracing::debug!(records = history.len(), path = ?csv_path, "loaded history");

    Ok(history)
}

/// Twelve months of sample data used when no history file is configured
pub fn sample_history() -> Vec<MonthlyRecord> {
    [
        ("Jan", 1800.0, 1750.0),
        ("Feb", 1650.0, 1600.0),
        ("Mar", 1900.0, 1850.0),
        ("Apr", 1750.0, 1700.0),
        ("May", 1600.0, 1550.0),
        ("Jun", 1850.0, 1800.0),
        ("Jul", 2100.0, 2050.0),
        ("Aug", 2200.0, 2150.0),
        ("Sep", 1950.0, 1900.0),
        ("Oct", 1800.0, 1750.0),
        ("Nov", 1700.0, 1650.0),
        ("Dec", 1600.0, 1550.0),
    ]
    .iter()
    .map(|(period, actual, predicted)| MonthlyRecord::new(period, *actual, *predicted, 1500.0))
    .collect()
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_sample_history_is_chronological() {
        let history = sample_history();
        assert_eq!(history.len(), 12);
        assert_eq!(history[0].period, "Jan");
        assert_eq!(history[11].period, "Dec");
        assert_eq!(history[11].actual, 1600.0);
        assert!(history.iter().all(|r| r.validate().is_ok()));
    }

    #[test]
    fn test_validate_rejects_negative_and_nan() {
        let negative = MonthlyRecord::new("Jan", -1.0, 0.0, 0.0);
        assert!(matches!(negative.validate(), Err(CoreError::InvalidRecord { .. })));

        let nan = MonthlyRecord::new("Feb", f64::NAN, 0.0, 0.0);
        assert!(matches!(nan.validate(), Err(CoreError::InvalidRecord { .. })));

        let zero = MonthlyRecord::new("Mar", 0.0, 0.0, 0.0);
        assert!(zero.validate().is_ok());
    }

    #[test]
    fn test_load_history_csv() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "Month,Actual,Predicted,Target").unwrap();
        writeln!(file, "May,1600,1550,1500").unwrap();
        writeln!(file, "Jun,1850,1800,1500").unwrap();
        writeln!(file, "Jul,2100.5,2050,1500").unwrap();
        file.flush().unwrap();

        let history = load_history_csv(file.path()).unwrap();
        assert_eq!(history.len(), 3);
        assert_eq!(history[2], MonthlyRecord::new("Jul", 2100.5, 2050.0, 1500.0));
    }

    #[test]
    fn test_load_history_csv_rejects_negative_actual() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "Month,Actual,Predicted,Target").unwrap();
        writeln!(file, "May,-5,1550,1500").unwrap();
        file.flush().unwrap();

        let err = load_history_csv(file.path()).unwrap_err();
        assert!(err.to_string().contains("row 1"));
    }

    #[test]
    fn test_load_history_csv_missing_file() {
        assert!(load_history_csv(Path::new("/nonexistent/history.csv")).is_err());
    }
}
