// 📊 Dashboard Summary - headline figures for the presentation layer

use crate::activity::{round_one_decimal, Activity, ActivityCategory};
use crate::history::MonthlyRecord;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlySummary {
    pub period: String,
    pub actual: f64,
    pub target: f64,
    /// Percentage change versus the previous record
    pub change_pct: Option<f64>,
    /// Positive when over target
    pub target_gap: f64,
}

impl MonthlySummary {
    pub fn is_on_target(&self) -> bool {
        self.target_gap <= 0.0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryShare {
    pub category: ActivityCategory,
    pub emissions: f64,
    pub share_pct: f64,
}

/// Figures for the most recent month, or None for an empty history
pub fn latest_summary(history: &[MonthlyRecord]) -> Option<MonthlySummary> {
    let latest = history.last()?;

    let change_pct = history
        .len()
        .checked_sub(2)
        .map(|idx| &history[idx])
        .filter(|prev| prev.actual != 0.0)
        .map(|prev| (latest.actual - prev.actual) / prev.actual * 100.0);

    Some(MonthlySummary {
        period: latest.period.clone(),
        actual: latest.actual,
        target: latest.target,
        change_pct,
        target_gap: latest.actual - latest.target,
    })
}

/// Per-category totals over an activity log, in enumeration order
pub fn category_breakdown(log: &[Activity]) -> Vec<CategoryShare> {
    let totals: Vec<(ActivityCategory, f64)> = ActivityCategory::ALL
        .iter()
        .map(|category| {
            let sum: f64 = log
                .iter()
                .filter(|a| a.category == *category)
                .map(|a| a.emissions)
                .sum();
            (*category, sum)
        })
        .collect();

    let grand_total: f64 = totals.iter().map(|(_, sum)| sum).sum();

    totals
        .into_iter()
        .map(|(category, sum)| CategoryShare {
            category,
            emissions: round_one_decimal(sum),
            share_pct: if grand_total > 0.0 {
                sum / grand_total * 100.0
            } else {
                0.0
            },
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::activity::sample_activities;
    use crate::history::sample_history;

    #[test]
    fn test_latest_summary() {
        let summary = latest_summary(&sample_history()).unwrap();

        assert_eq!(summary.period, "Dec");
        assert_eq!(summary.actual, 1600.0);
        assert_eq!(summary.target_gap, 100.0);
        assert!(!summary.is_on_target());

        // Nov 1700 -> Dec 1600
        let change = summary.change_pct.unwrap();
        assert!((change - (-100.0 / 1700.0 * 100.0)).abs() < 1e-9);
    }

    #[test]
    fn test_latest_summary_edges() {
        assert_eq!(latest_summary(&[]), None);

        let single = vec![MonthlyRecord::new("Jan", 1400.0, 0.0, 1500.0)];
        let summary = latest_summary(&single).unwrap();
        assert_eq!(summary.change_pct, None);
        assert!(summary.is_on_target());

        let from_zero = vec![
            MonthlyRecord::new("Jan", 0.0, 0.0, 1500.0),
            MonthlyRecord::new("Feb", 900.0, 0.0, 1500.0),
        ];
        assert_eq!(latest_summary(&from_zero).unwrap().change_pct, None);
    }

    #[test]
    fn test_category_breakdown() {
        let breakdown = category_breakdown(&sample_activities());

        assert_eq!(breakdown.len(), 4);
        assert_eq!(breakdown[0].category, ActivityCategory::Transport);
        assert_eq!(breakdown[0].emissions, 10.6);
        assert_eq!(breakdown[1].emissions, 12.2);
        assert_eq!(breakdown[2].emissions, 3.8);
        assert_eq!(breakdown[3].emissions, 0.0);
        assert_eq!(breakdown[3].share_pct, 0.0);

        let total_share: f64 = breakdown.iter().map(|s| s.share_pct).sum();
        assert!((total_share - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_category_breakdown_empty_log() {
        let breakdown = category_breakdown(&[]);
        assert_eq!(breakdown.len(), 4);
        assert!(breakdown.iter().all(|s| s.emissions == 0.0 && s.share_pct == 0.0));
    }
}
