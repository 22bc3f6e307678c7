// EcoPredict - Core Library
// Emission trend prediction and activity conversion, shared by the CLI and the API server

pub mod error;
pub mod history;
pub mod predictor;
pub mod activity;
pub mod summary;
pub mod config;

#[cfg(feature = "server")]
pub mod api;

// Re-export commonly used types
pub use error::{CoreError, Result};
pub use history::{MonthlyRecord, load_history_csv, sample_history};
pub use predictor::{
    Prediction, ForecastPoint,
    predict_next, explain_next, forecast, seasonal_adjustment, next_month, month_label,
    TREND_WINDOW, TREND_WEIGHT, SEASONAL_AMPLITUDE, EMISSION_FLOOR,
};
pub use activity::{
    Activity, ActivityCategory,
    convert, record, parse_quantity, round_one_decimal, sample_activities,
    ACTIVITY_LOG_CAP,
};
pub use summary::{MonthlySummary, CategoryShare, latest_summary, category_breakdown};
pub use config::Config;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Install the `tracing` subscriber used by both binaries
pub fn init_tracing() {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let _ = tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ecopredict=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init();
}
