//! Paddock CLI binary.
//!
//! Drives the offline evaluation pipeline: load a raw event-history CSV,
//! enrich it, cross-validate the requested models and persist the metrics
//! artifact.

use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use paddock::pipeline::{PipelineConfig, run_evaluation};
use paddock_data::{read_events_csv, winner_uniqueness_violations};
use paddock_eval::EstimatorFactory;
use paddock_features::{FeatureConfig, FeatureEngine, available_features};
use paddock_output::{DEFAULT_ARTIFACT_PATH, ExportFormat, Exporter};
use polars::prelude::*;
use std::path::PathBuf;
use std::process;
use std::time::Duration;

#[derive(Parser)]
#[command(name = "paddock")]
#[command(about = "Paddock: offline winner-probability evaluation", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Cross-validate models over an event-history CSV
    Evaluate {
        /// Path to the raw event-history CSV
        #[arg(long)]
        data: PathBuf,

        /// Comma-separated model identifiers
        #[arg(long, default_value = "logreg,gbdt", value_delimiter = ',')]
        models: Vec<String>,

        /// Trailing window length for driver form
        #[arg(long, default_value = "5")]
        window: usize,

        /// Number of cross-validation folds
        #[arg(long, default_value = "5")]
        splits: usize,

        /// Column whose values define the leakage groups
        #[arg(long, default_value = "event_date")]
        group_key: String,

        /// Where to write the metrics artifact
        #[arg(long, default_value = DEFAULT_ARTIFACT_PATH)]
        output: PathBuf,

        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },

    /// Run the feature engine alone and write the enriched table
    Features {
        /// Path to the raw event-history CSV
        #[arg(long)]
        data: PathBuf,

        /// Trailing window length for driver form
        #[arg(long, default_value = "5")]
        window: usize,

        /// Where to write the enriched CSV
        #[arg(long)]
        output: PathBuf,
    },

    /// List registered estimators and features
    Models,
}

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Evaluate {
            data,
            models,
            window,
            splits,
            group_key,
            output,
            format,
        } => evaluate(data, models, window, splits, group_key, output, &format),
        Commands::Features {
            data,
            window,
            output,
        } => features(data, window, output),
        Commands::Models => {
            list_models();
            Ok(())
        }
    }
}

fn evaluate(
    data: PathBuf,
    models: Vec<String>,
    window: usize,
    splits: usize,
    group_key: String,
    output: PathBuf,
    format: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let records = read_events_csv(&data)?;
    println!(
        "Loaded {} participant-event rows from {}",
        records.height(),
        data.display()
    );

    let violations = winner_uniqueness_violations(&records)?;
    if !violations.is_empty() {
        eprintln!(
            "Warning: {} event(s) without exactly one winner label:",
            violations.len()
        );
        for (date, name) in violations.iter().take(10) {
            eprintln!("  {date} {name}");
        }
    }

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::default_spinner());
    spinner.set_message(format!(
        "running {splits}-fold grouped cross-validation for {} model(s)",
        models.len()
    ));
    spinner.enable_steady_tick(Duration::from_millis(120));

    let config = PipelineConfig {
        window,
        n_splits: splits,
        group_key,
        models,
    };
    let factory = EstimatorFactory::with_defaults();
    let report = run_evaluation(&records, &config, &factory)?;
    spinner.finish_and_clear();

    report.write_json(&output)?;
    println!("Saved metrics to {}", output.display());

    match format {
        "json" => println!("{}", report.export_to_string(ExportFormat::PrettyJson)?),
        _ => print_table(&report),
    }
    Ok(())
}

fn print_table(report: &paddock_output::EvaluationReport) {
    println!();
    println!(
        "{:<12} {:>10} {:>10} {:>14}",
        "model", "logloss", "brier", "top1_hit_rate"
    );
    for row in report.metric_rows() {
        println!(
            "{:<12} {:>10.4} {:>10.4} {:>14.4}",
            row.model, row.logloss, row.brier, row.top1_hit_rate
        );
    }
}

fn features(
    data: PathBuf,
    window: usize,
    output: PathBuf,
) -> Result<(), Box<dyn std::error::Error>> {
    let records = read_events_csv(&data)?;
    let engine = FeatureEngine::new(FeatureConfig { window });
    let mut enriched = engine.enrich(&records)?;
    println!(
        "Enriched {} rows with {} columns",
        enriched.height(),
        enriched.width()
    );

    let mut file = std::fs::File::create(&output)?;
    CsvWriter::new(&mut file).finish(&mut enriched)?;
    println!("Wrote enriched table to {}", output.display());
    Ok(())
}

fn list_models() {
    let factory = EstimatorFactory::with_defaults();
    println!("Registered estimators:");
    for model_id in factory.model_ids() {
        println!("  {model_id}");
    }
    println!();
    println!("Registered features:");
    for info in available_features() {
        let proxy = if info.post_race_proxy {
            "  [post-race proxy]"
        } else {
            ""
        };
        println!("  {:<20} {}{}", info.name, info.description, proxy);
    }
}
