// 📈 Trend Predictor - next-period emission estimate
//
// estimate = last + trend * 0.7 + sin(month * π / 6) * 50, floored at 800
//
// The month of year is always an explicit argument. Reading the clock is the
// caller's job, which keeps every function here deterministic.

use crate::error::{CoreError, Result};
use crate::history::MonthlyRecord;
use serde::Serialize;
use std::f64::consts::PI;

/// Number of trailing records the trend is computed from
pub const TREND_WINDOW: usize = 3;

/// Weight applied to the trend increment
pub const TREND_WEIGHT: f64 = 0.7;

/// Amplitude of the seasonal sinusoid (kg CO2e)
pub const SEASONAL_AMPLITUDE: f64 = 50.0;

/// Irreducible minimum footprint; estimates never go below this (kg CO2e)
pub const EMISSION_FLOOR: f64 = 800.0;

// ============================================================================
// PREDICTION
// ============================================================================

/// Intermediate terms of a single estimate
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Prediction {
    pub as_of_month: u32,
    pub base: f64,
    pub trend: f64,
    pub seasonal: f64,
    pub raw: f64,
    pub value: f64,
    /// True when the floor replaced the raw estimate
    pub floored: bool,
}

fn check_month(month: u32) -> Result<()> {
    if (1..=12).contains(&month) {
        Ok(())
    } else {
        Err(CoreError::InvalidMonth(month))
    }
}

/// Sinusoid with a 12-month period
pub fn seasonal_adjustment(month: u32) -> Result<f64> {
    check_month(month)?;
    Ok((month as f64 * PI / 6.0).sin() * SEASONAL_AMPLITUDE)
}

/// Average consecutive difference of `actual` over a window
fn trend_increment(window: &[MonthlyRecord]) -> f64 {
    let gaps = window.len().saturating_sub(1);
    if gaps == 0 {
        return 0.0;
    }
    let total: f64 = window
        .windows(2)
        .map(|pair| pair[1].actual - pair[0].actual)
        .sum();
    total / gaps as f64
}

/// Compute the next-period estimate along with the terms that produced it
pub fn explain_next(history: &[MonthlyRecord], as_of_month: u32) -> Result<Prediction> {
    check_month(as_of_month)?;

    if history.len() < TREND_WINDOW {
        return Err(CoreError::InsufficientHistory {
            required: TREND_WINDOW,
            actual: history.len(),
        });
    }

    let window = &history[history.len() - TREND_WINDOW..];
    for record in window {
        record.validate()?;
    }

    let base = window[TREND_WINDOW - 1].actual;
    let trend = trend_increment(window);
    let seasonal = seasonal_adjustment(as_of_month)?;
    let raw = base + trend * TREND_WEIGHT + seasonal;
    let value = raw.max(EMISSION_FLOOR);

    tracing::debug!(as_of_month, base, trend, seasonal, raw, value, "predicted next period");

    Ok(Prediction {
        as_of_month,
        base,
        trend,
        seasonal,
        raw,
        value,
        floored: raw < EMISSION_FLOOR,
    })
}

/// Next-period estimate in kg CO2e
///
/// Fails with `InsufficientHistory` when fewer than three records are given and
/// with `InvalidMonth` when `as_of_month` is outside 1..=12.
pub fn predict_next(history: &[MonthlyRecord], as_of_month: u32) -> Result<f64> {
    Ok(explain_next(history, as_of_month)?.value)
}

// ============================================================================
// ROLLING FORECAST
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastPoint {
    pub as_of_month: u32,
    /// Three-letter label of the month being estimated
    pub period: String,
    pub predicted: f64,
}

/// Month after `month`, wrapping December to January
pub fn next_month(month: u32) -> u32 {
    month % 12 + 1
}

/// Short label ("Jan", "Feb", ...) for a month of year
pub fn month_label(month: u32) -> Result<String> {
    let m = u8::try_from(month)
        .ok()
        .and_then(|m| chrono::Month::try_from(m).ok())
        .ok_or(CoreError::InvalidMonth(month))?;
    Ok(m.name()[..3].to_string())
}

/// Apply `predict_next` `horizon` times, feeding each estimate back in as the
/// newest record. The caller's history is left untouched.
pub fn forecast(
    history: &[MonthlyRecord],
    as_of_month: u32,
    horizon: usize,
) -> Result<Vec<ForecastPoint>> {
    check_month(as_of_month)?;

    if history.len() < TREND_WINDOW {
        return Err(CoreError::InsufficientHistory {
            required: TREND_WINDOW,
            actual: history.len(),
        });
    }

    let mut window: Vec<MonthlyRecord> = history[history.len() - TREND_WINDOW..].to_vec();
    let target = window[TREND_WINDOW - 1].target;
    let mut month = as_of_month;
    let mut points = Vec::with_capacity(horizon);

    for _ in 0..horizon {
        let predicted = predict_next(&window, month)?;
        let period = month_label(next_month(month))?;

        window.remove(0);
        window.push(MonthlyRecord::new(&period, predicted, predicted, target));

        points.push(ForecastPoint {
            as_of_month: month,
            period,
            predicted,
        });
        month = next_month(month);
    }

    Ok(points)
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::sample_history;

    fn history_of(actuals: &[f64]) -> Vec<MonthlyRecord> {
        actuals
            .iter()
            .enumerate()
            .map(|(i, a)| MonthlyRecord::new(&format!("M{}", i + 1), *a, *a, 1500.0))
            .collect()
    }

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_july_scenario() {
        let history = history_of(&[1700.0, 1850.0, 2100.0]);
        let prediction = explain_next(&history, 7).unwrap();

        assert!(approx(prediction.trend, 150.0));
        assert!(approx(prediction.seasonal, -25.0));
        assert!(approx(prediction.value, 2180.0));
        assert!(!prediction.floored);
    }

    #[test]
    fn test_uses_only_last_three_records() {
        let short = history_of(&[1700.0, 1850.0, 2100.0]);
        let long = history_of(&[5000.0, 10.0, 1700.0, 1850.0, 2100.0]);

        assert_eq!(predict_next(&short, 3).unwrap(), predict_next(&long, 3).unwrap());
    }

    #[test]
    fn test_deterministic() {
        let history = sample_history();
        for month in 1..=12 {
            let first = predict_next(&history, month).unwrap();
            let second = predict_next(&history, month).unwrap();
            assert_eq!(first.to_bits(), second.to_bits());
        }
    }

    #[test]
    fn test_floor_applied() {
        let history = history_of(&[1000.0, 500.0, 100.0]);
        let prediction = explain_next(&history, 6).unwrap();

        assert!(prediction.raw < EMISSION_FLOOR);
        assert_eq!(prediction.value, EMISSION_FLOOR);
        assert!(prediction.floored);
    }

    #[test]
    fn test_never_below_floor() {
        let samples = [
            [0.0, 0.0, 0.0],
            [3000.0, 1500.0, 0.0],
            [900.0, 850.0, 800.0],
            [10.0, 20.0, 30.0],
        ];
        for actuals in samples.iter() {
            let history = history_of(actuals);
            for month in 1..=12 {
                assert!(predict_next(&history, month).unwrap() >= EMISSION_FLOOR);
            }
        }
    }

    #[test]
    fn test_insufficient_history() {
        for len in 0..TREND_WINDOW {
            let history = history_of(&vec![1000.0; len]);
            assert_eq!(
                predict_next(&history, 5),
                Err(CoreError::InsufficientHistory { required: 3, actual: len })
            );
        }
    }

    #[test]
    fn test_invalid_month() {
        let history = sample_history();
        assert_eq!(predict_next(&history, 0), Err(CoreError::InvalidMonth(0)));
        assert_eq!(predict_next(&history, 13), Err(CoreError::InvalidMonth(13)));
    }

    #[test]
    fn test_invalid_record_in_window() {
        let history = history_of(&[1700.0, f64::NAN, 2100.0]);
        assert!(matches!(
            predict_next(&history, 4),
            Err(CoreError::InvalidRecord { .. })
        ));

        // Records outside the window are not inspected
        let history = history_of(&[-1.0, 1700.0, 1850.0, 2100.0]);
        assert!(predict_next(&history, 4).is_ok());
    }

    #[test]
    fn test_seasonal_period() {
        assert!(approx(seasonal_adjustment(3).unwrap(), 50.0));
        assert!(approx(seasonal_adjustment(9).unwrap(), -50.0));
        assert!(seasonal_adjustment(12).unwrap().abs() < 1e-9);
        assert!(seasonal_adjustment(6).unwrap().abs() < 1e-9);
    }

    #[test]
    fn test_month_helpers() {
        assert_eq!(next_month(12), 1);
        assert_eq!(next_month(1), 2);
        assert_eq!(month_label(1).unwrap(), "Jan");
        assert_eq!(month_label(9).unwrap(), "Sep");
        assert_eq!(month_label(13), Err(CoreError::InvalidMonth(13)));
    }

    #[test]
    fn test_forecast_rolls_estimates_forward() {
        let history = sample_history();
        let points = forecast(&history, 12, 2).unwrap();

        assert_eq!(points.len(), 2);

        // Oct 1800, Nov 1700, Dec 1600: trend -100, no seasonal term in December
        assert_eq!(points[0].as_of_month, 12);
        assert_eq!(points[0].period, "Jan");
        assert!(approx(points[0].predicted, 1530.0));

        // Nov 1700, Dec 1600, Jan 1530: trend -85, seasonal +25
        assert_eq!(points[1].as_of_month, 1);
        assert_eq!(points[1].period, "Feb");
        assert!(approx(points[1].predicted, 1495.5));

        // History untouched
        assert_eq!(history, sample_history());
    }

    #[test]
    fn test_forecast_first_point_matches_predict_next() {
        let history = sample_history();
        let points = forecast(&history, 4, 6).unwrap();
        assert_eq!(points.len(), 6);
        assert_eq!(points[0].predicted, predict_next(&history, 4).unwrap());
        assert!(points.iter().all(|p| p.predicted >= EMISSION_FLOOR));
    }

    #[test]
    fn test_forecast_edge_cases() {
        let history = sample_history();
        assert!(forecast(&history, 5, 0).unwrap().is_empty());
        assert!(matches!(
            forecast(&history[..2], 5, 3),
            Err(CoreError::InsufficientHistory { .. })
        ));
        assert_eq!(forecast(&history, 0, 3), Err(CoreError::InvalidMonth(0)));
    }
}
