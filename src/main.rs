use anyhow::{bail, Context, Result};
use chrono::{Datelike, Local, NaiveDate};
use std::env;

use ecopredict::config::validate_horizon;
use ecopredict::{
    category_breakdown, convert, explain_next, forecast, init_tracing, latest_summary,
    parse_quantity, record, sample_activities, ActivityCategory, Config, MonthlyRecord,
};

fn main() -> Result<()> {
    init_tracing();

    let args: Vec<String> = env::args().skip(1).collect();
    dispatch(&args, Config::from_env)
}

/// Run a subcommand; configuration is loaded only by commands that read history
fn dispatch<F>(args: &[String], load_config: F) -> Result<()>
where
    F: Fn() -> Result<Config>,
{
    match args.first().map(String::as_str) {
        Some("predict") => run_predict(&load_config()?, &args[1..])?,
        Some("forecast") => run_forecast(&load_config()?, &args[1..])?,
        Some("convert") => run_convert(&args[1..])?,
        Some("summary") => run_summary(&load_config()?)?,
        Some("version") => println!("ecopredict {}", ecopredict::VERSION),
        _ => print_usage(),
    }

    Ok(())
}

fn print_usage() {
    println!("🌱 EcoPredict - Carbon Footprint Forecasting");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("Usage:");
    println!("  ecopredict predict  [--month M]");
    println!("  ecopredict forecast [--month M] [--months N]");
    println!("  ecopredict convert  <category> <quantity> <description...> [--date YYYY-MM-DD]");
    println!("  ecopredict summary");
    println!();
    println!("Categories: transport (mile), energy (kWh), food (serving), waste (kg)");
    println!("History: $ECOPREDICT_HISTORY (CSV) or built-in sample");
}

/// Pull `--flag value` out of an argument list, returning the value and the remaining args
fn take_flag(args: &[String], flag: &str) -> Result<(Option<String>, Vec<String>)> {
    let mut value = None;
    let mut rest = Vec::new();
    let mut iter = args.iter();

    while let Some(arg) = iter.next() {
        if arg == flag {
            let v = iter
                .next()
                .with_context(|| format!("{} requires a value", flag))?;
            value = Some(v.clone());
        } else {
            rest.push(arg.clone());
        }
    }

    Ok((value, rest))
}

/// Month from `--month`, or the local calendar month
fn month_arg(args: &[String]) -> Result<(u32, Vec<String>)> {
    let (month, rest) = take_flag(args, "--month")?;
    let month = match month {
        Some(m) => m.parse().with_context(|| format!("--month is not a number: {:?}", m))?,
        None => Local::now().month(),
    };
    Ok((month, rest))
}

fn load_history(config: &Config) -> Result<Vec<MonthlyRecord>> {
    let history = config.load_history()?;
    match &config.history_path {
        Some(path) => println!("📂 History: {} months from {:?}", history.len(), path),
        None => println!("📂 History: {} months (built-in sample)", history.len()),
    }
    Ok(history)
}

fn run_predict(config: &Config, args: &[String]) -> Result<()> {
    let (month, _) = month_arg(args)?;
    let history = load_history(config)?;

    let prediction = explain_next(&history, month)?;

    println!("\n📈 Next-month prediction (as of month {})", month);
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("  Base (last actual): {:>10.1} kg", prediction.base);
    println!("  Trend increment:    {:>10.1} kg", prediction.trend);
    println!("  Seasonal term:      {:>10.1} kg", prediction.seasonal);
    println!("  Raw estimate:       {:>10.1} kg", prediction.raw);
    if prediction.floored {
        println!("  ⚠️  Raised to floor of {} kg", ecopredict::EMISSION_FLOOR);
    }
    println!("\n✓ Predicted: {:.0} kg CO2e", prediction.value);

    Ok(())
}

fn run_forecast(config: &Config, args: &[String]) -> Result<()> {
    let (month, rest) = month_arg(args)?;
    let (months, _) = take_flag(&rest, "--months")?;
    let months = match months {
        Some(n) => validate_horizon(
            n.parse()
                .with_context(|| format!("--months is not a number: {:?}", n))?,
        )?,
        None => config.forecast_months,
    };

    let history = load_history(config)?;
    let points = forecast(&history, month, months)?;

    println!("\n🔮 {}-month forecast", months);
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    for point in &points {
        println!("  {}  {:>8.0} kg", point.period, point.predicted);
    }

    Ok(())
}

fn run_convert(args: &[String]) -> Result<()> {
    let (date, rest) = take_flag(args, "--date")?;

    if rest.len() < 3 {
        bail!("usage: ecopredict convert <category> <quantity> <description...> [--date YYYY-MM-DD]");
    }

    let category: ActivityCategory = rest[0].parse()?;
    let quantity = parse_quantity(&rest[1])?;
    let description = rest[2..].join(" ");
    let date = match date {
        Some(d) => NaiveDate::parse_from_str(&d, "%Y-%m-%d")
            .with_context(|| format!("--date is not YYYY-MM-DD: {:?}", d))?,
        None => Local::now().date_naive(),
    };

    let activity = convert(category, quantity, &description, date)?;

    println!("✓ {} {} {} × {} kg/{} = {} kg CO2e",
        activity.date,
        activity.category,
        quantity,
        category.factor(),
        category.unit(),
        activity.emissions,
    );

    let log = record(&sample_activities(), activity);

    println!("\n📝 Recent activities ({})", log.len());
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    for entry in &log {
        println!("  {}  {:<9} {:>6.1} kg  {}", entry.date, entry.category.as_str(), entry.emissions, entry.description);
    }

    Ok(())
}

fn run_summary(config: &Config) -> Result<()> {
    let history = load_history(config)?;

    println!("\n📊 Summary");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    match latest_summary(&history) {
        Some(summary) => {
            println!("  {}: {:.0} kg (target {:.0} kg)", summary.period, summary.actual, summary.target);
            if let Some(change) = summary.change_pct {
                let arrow = if change < 0.0 { "↓" } else { "↑" };
                println!("  {} {:.0}% from last month", arrow, change.abs());
            }
            if summary.is_on_target() {
                println!("  ✅ On target");
            } else {
                println!("  ⚠️  {:.0} kg over target", summary.target_gap);
            }
        }
        None => println!("  No history"),
    }

    println!("\n  By category (recent activities):");
    for share in category_breakdown(&sample_activities()) {
        println!("  {:<9} {:>6.1} kg  {:>5.1}%", share.category.as_str(), share.emissions, share.share_pct);
    }

    Ok(())
}
