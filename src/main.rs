//! CAD-EWS command line entry point
//!
//! Loads the borrower and transaction tables, runs the rule evaluators and
//! writes `{count, alerts}` reports as JSON. Alerts can optionally be
//! published to NATS for downstream dashboards.

use anyhow::{bail, Context, Result};
use cad_ews::{
    config::{AppConfig, DEFAULT_CONFIG_PATH},
    loader::{read_records, DatasetLoader},
    metrics::EvaluationMetrics,
    producer::AlertProducer,
    report::{AlertReport, Dataset},
    rules::{CreditStressEvaluator, TransactionAnomalyEvaluator},
    telemetry,
    types::{CreditRecord, TransactionRecord},
};
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "cad-ews")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Credit & Deposit Early Warning System", long_about = None)]
struct Cli {
    /// Configuration file (TOML); missing files fall back to defaults
    #[arg(short, long, global = true, env = "EWS_CONFIG", default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit JSON-formatted log lines
    #[arg(long, global = true)]
    json: bool,

    /// Publish alerts to NATS even if disabled in the configuration
    #[arg(long, global = true)]
    publish: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Flag borrowers under credit stress
    Credit {
        /// Borrower table (defaults to the configured data directory)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Write the report here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Flag anomalous account transactions
    Transactions {
        /// Transaction table (defaults to the configured data directory)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Write the report here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Evaluate both tables from the configured data directory
    All {
        /// Write `credit-alerts.json` and `transaction-alerts.json` here
        #[arg(short, long)]
        output_dir: Option<PathBuf>,
    },

    /// Check configuration, data files and NATS connectivity
    Check,
}

#[derive(Serialize)]
struct HealthStatus {
    status: &'static str,
    credit_table: String,
    transaction_table: String,
    nats: &'static str,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = AppConfig::load_from_path(&cli.config)?;
    if cli.publish {
        config.nats.enabled = true;
    }
    telemetry::init_tracing(&config.logging, cli.verbose, cli.json);
    info!(config = %cli.config.display(), "Configuration loaded");

    let loader = DatasetLoader::new(&config.data);
    let metrics = EvaluationMetrics::new();

    match cli.command {
        Commands::Credit { input, output } => {
            let report = run_credit(&config, &loader, input.as_deref(), &metrics)?;
            write_report(&report, output.as_deref())?;
            deliver(&config, &report).await?;
        }
        Commands::Transactions { input, output } => {
            let report = run_transactions(&config, &loader, input.as_deref(), &metrics)?;
            write_report(&report, output.as_deref())?;
            deliver(&config, &report).await?;
        }
        Commands::All { output_dir } => {
            let credit = run_credit(&config, &loader, None, &metrics)?;
            let transactions = run_transactions(&config, &loader, None, &metrics)?;

            match output_dir {
                Some(dir) => {
                    std::fs::create_dir_all(&dir)
                        .with_context(|| format!("Failed to create {}", dir.display()))?;
                    write_report(&credit, Some(dir.join("credit-alerts.json").as_path()))?;
                    write_report(&transactions, Some(dir.join("transaction-alerts.json").as_path()))?;
                }
                None => {
                    write_report(&credit, None)?;
                    write_report(&transactions, None)?;
                }
            }

            deliver(&config, &credit).await?;
            deliver(&config, &transactions).await?;
        }
        Commands::Check => {
            return check(&config, &loader).await;
        }
    }

    metrics.print_summary();
    Ok(())
}

fn run_credit(
    config: &AppConfig,
    loader: &DatasetLoader,
    input: Option<&Path>,
    metrics: &EvaluationMetrics,
) -> Result<AlertReport> {
    let records: Vec<CreditRecord> = match input {
        Some(path) => read_records(path, Dataset::Credit)?,
        None => loader.load_credit()?,
    };

    let evaluator = CreditStressEvaluator::new(config.rules.credit);
    let start = Instant::now();
    let alerts = evaluator.evaluate(&records);
    metrics.record_evaluation(Dataset::Credit, records.len(), &alerts, start.elapsed());

    info!(rows = records.len(), alerts = alerts.len(), "Credit stress evaluated");
    Ok(AlertReport::new(Dataset::Credit, records.len(), alerts))
}

fn run_transactions(
    config: &AppConfig,
    loader: &DatasetLoader,
    input: Option<&Path>,
    metrics: &EvaluationMetrics,
) -> Result<AlertReport> {
    let records: Vec<TransactionRecord> = match input {
        Some(path) => read_records(path, Dataset::Transactions)?,
        None => loader.load_transactions()?,
    };

    let evaluator = TransactionAnomalyEvaluator::new(config.rules.transaction);
    let start = Instant::now();
    let alerts = evaluator.evaluate(&records);
    metrics.record_evaluation(Dataset::Transactions, records.len(), &alerts, start.elapsed());

    info!(rows = records.len(), alerts = alerts.len(), "Transaction anomalies evaluated");
    Ok(AlertReport::new(Dataset::Transactions, records.len(), alerts))
}

fn write_report(report: &AlertReport, output: Option<&Path>) -> Result<()> {
    let json = serde_json::to_string_pretty(report)?;

    match output {
        Some(path) => {
            std::fs::write(path, json)
                .with_context(|| format!("Failed to write report to {}", path.display()))?;
            info!(dataset = %report.dataset, path = %path.display(), "Report written");
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            writeln!(stdout, "{json}")?;
        }
    }
    Ok(())
}

async fn deliver(config: &AppConfig, report: &AlertReport) -> Result<()> {
    if !config.nats.enabled || report.is_empty() {
        return Ok(());
    }

    let client = async_nats::connect(&config.nats.url)
        .await
        .with_context(|| format!("Failed to connect to NATS at {}", config.nats.url))?;

    let subject = match report.dataset {
        Dataset::Credit => &config.nats.credit_alert_subject,
        Dataset::Transactions => &config.nats.transaction_alert_subject,
    };
    let producer = AlertProducer::new(client, subject, report.dataset);
    let published = producer.publish_batch(&report.alerts).await?;

    if published < report.count {
        warn!(
            subject = %producer.subject(),
            published,
            total = report.count,
            "Some alerts were not published"
        );
    } else {
        info!(subject = %producer.subject(), published, "Alerts published");
    }
    Ok(())
}

async fn check(config: &AppConfig, loader: &DatasetLoader) -> Result<()> {
    let missing = loader.missing_files();
    for (dataset, path) in &missing {
        warn!(dataset = %dataset, path = %path.display(), "Table not found");
    }

    let nats = if config.nats.enabled {
        async_nats::connect(&config.nats.url)
            .await
            .with_context(|| format!("Failed to connect to NATS at {}", config.nats.url))?;
        "connected"
    } else {
        "disabled"
    };

    if !missing.is_empty() {
        bail!("{} data table(s) missing", missing.len());
    }

    let status = HealthStatus {
        status: "ok",
        credit_table: loader.path(Dataset::Credit).display().to_string(),
        transaction_table: loader.path(Dataset::Transactions).display().to_string(),
        nats,
    };
    println!("{}", serde_json::to_string(&status)?);
    Ok(())
}
