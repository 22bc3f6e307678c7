// 🚗 Activity Emission Converter
//
// Converts a logged activity (category + quantity) into kg CO2e using a fixed
// per-category factor, and keeps a bounded most-recent-first activity log.
//
// Categories are a closed enum: an unknown category is rejected when it is
// parsed, never looked up as a missing key.

use crate::error::{CoreError, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Maximum number of entries kept in the activity log
pub const ACTIVITY_LOG_CAP: usize = 10;

// ============================================================================
// ACTIVITY CATEGORY
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityCategory {
    /// Travel, reported in miles
    Transport,

    /// Electricity, reported in kWh
    Energy,

    /// Meals, reported in servings
    Food,

    /// Discarded waste, reported in kg
    Waste,
}

impl ActivityCategory {
    pub const ALL: [ActivityCategory; 4] = [
        ActivityCategory::Transport,
        ActivityCategory::Energy,
        ActivityCategory::Food,
        ActivityCategory::Waste,
    ];

    /// Emission factor in kg CO2e per reported unit
    pub fn factor(&self) -> f64 {
        match self {
            ActivityCategory::Transport => 0.5,
            ActivityCategory::Energy => 0.7,
            ActivityCategory::Food => 2.5,
            ActivityCategory::Waste => 0.3,
        }
    }

    pub fn unit(&self) -> &'static str {
        match self {
            ActivityCategory::Transport => "mile",
            ActivityCategory::Energy => "kWh",
            ActivityCategory::Food => "serving",
            ActivityCategory::Waste => "kg",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityCategory::Transport => "transport",
            ActivityCategory::Energy => "energy",
            ActivityCategory::Food => "food",
            ActivityCategory::Waste => "waste",
        }
    }
}

impl FromStr for ActivityCategory {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "transport" => Ok(ActivityCategory::Transport),
            "energy" => Ok(ActivityCategory::Energy),
            "food" => Ok(ActivityCategory::Food),
            "waste" => Ok(ActivityCategory::Waste),
            _ => Err(CoreError::InvalidCategory(s.to_string())),
        }
    }
}

impl fmt::Display for ActivityCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// ACTIVITY
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Activity {
    pub date: NaiveDate,
    pub category: ActivityCategory,
    pub description: String,
    /// Derived kg CO2e, rounded to one decimal
    pub emissions: f64,
}

/// Round half-up to one decimal place
pub fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Parse a user-entered quantity string
pub fn parse_quantity(input: &str) -> Result<f64> {
    let trimmed = input.trim();
    let quantity: f64 = trimmed
        .parse()
        .map_err(|_| CoreError::InvalidQuantity(format!("{:?} is not a number", input)))?;
    check_quantity(quantity)
}

/// Validated quantity with negative zero folded to zero
fn check_quantity(quantity: f64) -> Result<f64> {
    if !quantity.is_finite() {
        return Err(CoreError::InvalidQuantity(format!("{} is not finite", quantity)));
    }
    if quantity < 0.0 {
        return Err(CoreError::InvalidQuantity(format!("{} is negative", quantity)));
    }
    Ok(quantity + 0.0)
}

/// Convert an activity to its CO2e estimate
///
/// Rejects non-finite or negative quantities and blank descriptions; nothing is
/// created on failure.
pub fn convert(
    category: ActivityCategory,
    quantity: f64,
    description: &str,
    date: NaiveDate,
) -> Result<Activity> {
    let quantity = check_quantity(quantity)?;

    let description = description.trim();
    if description.is_empty() {
        return Err(CoreError::EmptyDescription);
    }

    let emissions = round_one_decimal(quantity * category.factor());

    tracing::debug!(%category, quantity, emissions, "converted activity");

    Ok(Activity {
        date,
        category,
        description: description.to_string(),
        emissions,
    })
}

/// Prepend `activity` to `log`, keeping at most `ACTIVITY_LOG_CAP` entries
pub fn record(log: &[Activity], activity: Activity) -> Vec<Activity> {
    let mut next = Vec::with_capacity(ACTIVITY_LOG_CAP);
    next.push(activity);
    next.extend(log.iter().take(ACTIVITY_LOG_CAP - 1).cloned());
    next
}

/// The four activities the dashboard starts with
pub fn sample_activities() -> Vec<Activity> {
    let seeded = [
        ((2024, 12, 15), ActivityCategory::Transport, "KSRTC bus to Trivandrum (45 km)", 8.5),
        ((2024, 12, 15), ActivityCategory::Energy, "Home electricity usage", 12.2),
        ((2024, 12, 14), ActivityCategory::Food, "Fish curry lunch", 3.8),
        ((2024, 12, 14), ActivityCategory::Transport, "Auto-rickshaw to market", 2.1),
    ];

    seeded
        .iter()
        .filter_map(|((y, m, d), category, description, emissions)| {
            NaiveDate::from_ymd_opt(*y, *m, *d).map(|date| Activity {
                date,
                category: *category,
                description: description.to_string(),
                emissions: *emissions,
            })
        })
        .collect()
}

// ============================================================================
// TESTS
// ============================================================================
