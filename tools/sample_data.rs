//! Sample Data Generator
//!
//! Writes synthetic borrower and transaction tables for exercising the
//! early warning pipeline end to end.

use anyhow::{Context, Result};
use cad_ews::config::LoggingConfig;
use cad_ews::telemetry;
use cad_ews::{CreditRecord, TransactionRecord};
use clap::Parser;
use rand::rngs::ThreadRng;
use rand::Rng;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Parser)]
#[command(name = "sample-data")]
#[command(about = "Generate synthetic credit and transaction tables", long_about = None)]
struct Args {
    /// Directory to write `credit_data.csv` and `transactions.csv` into
    #[arg(short, long, default_value = "data")]
    output_dir: PathBuf,

    /// Rows per table
    #[arg(short, long, default_value_t = 200)]
    rows: u64,

    /// Fraction of rows crafted to trip a rule, between 0 and 1
    #[arg(short, long, default_value_t = 0.1, value_parser = parse_rate)]
    stress_rate: f64,
}

fn parse_rate(value: &str) -> Result<f64, String> {
    let rate: f64 = value
        .parse()
        .map_err(|e| format!("`{value}` is not a number: {e}"))?;
    if !(0.0..=1.0).contains(&rate) {
        return Err(format!("`{value}` is not between 0 and 1"));
    }
    Ok(rate)
}

/// Record generator for testing
struct RecordGenerator {
    rng: ThreadRng,
    counter: u64,
}

impl RecordGenerator {
    fn new() -> Self {
        Self {
            rng: rand::thread_rng(),
            counter: 0,
        }
    }

    fn next_ids(&mut self) -> (String, String) {
        self.counter += 1;
        (
            format!("A{:06}", self.counter),
            format!("C{:06}", self.counter),
        )
    }

    /// Borrower paying on time with moderate utilization
    fn healthy_borrower(&mut self) -> CreditRecord {
        let (_, customer_id) = self.next_ids();
        CreditRecord::new(
            customer_id,
            self.rng.gen_range(0..=15) as f64,
            self.rng.gen_range(0..=1),
            self.rng.gen_range(0.05..0.85),
        )
    }

    /// Borrower with at least one signal past a severity tier
    fn stressed_borrower(&mut self) -> CreditRecord {
        let (_, customer_id) = self.next_ids();
        match self.rng.gen_range(0..3) {
            0 => CreditRecord::new(
                customer_id,
                self.rng.gen_range(31..=120) as f64,
                self.rng.gen_range(0..=1),
                self.rng.gen_range(0.2..0.8),
            ),
            1 => CreditRecord::new(
                customer_id,
                self.rng.gen_range(0..=20) as f64,
                self.rng.gen_range(2..=6),
                self.rng.gen_range(0.2..0.8),
            ),
            _ => CreditRecord::new(
                customer_id,
                0.0,
                0,
                self.rng.gen_range(0.91..1.10),
            ),
        }
    }

    fn ordinary_transaction(&mut self) -> TransactionRecord {
        let (account_id, customer_id) = self.next_ids();
        let income = self.rng.gen_range(20_000.0..150_000.0_f64).round();
        let amount = self.rng.gen_range(100.0..income * 2.0).round();
        TransactionRecord::new(
            account_id,
            customer_id,
            amount,
            self.rng.gen_range(0..8),
            self.rng.gen_range(200.0..20_000.0_f64).round(),
            income,
        )
    }

    fn suspicious_transaction(&mut self) -> TransactionRecord {
        let (account_id, customer_id) = self.next_ids();
        match self.rng.gen_range(0..3) {
            // structuring: many small transfers
            0 => TransactionRecord::new(
                account_id,
                customer_id,
                self.rng.gen_range(500.0..4_900.0_f64).round(),
                self.rng.gen_range(10..40),
                self.rng.gen_range(300.0..4_900.0_f64).round(),
                self.rng.gen_range(20_000.0..80_000.0_f64).round(),
            ),
            // far above declared income
            1 => {
                let income = self.rng.gen_range(20_000.0..60_000.0_f64).round();
                TransactionRecord::new(
                    account_id,
                    customer_id,
                    (income * self.rng.gen_range(6.0..15.0)).round(),
                    1,
                    income,
                    income,
                )
            }
            // large, income unknown
            _ => {
                let amount = self.rng.gen_range(1_000_000.0..5_000_000.0_f64).round();
                TransactionRecord::new(account_id, customer_id, amount, 1, amount, 0.0)
            }
        }
    }
}

fn write_table<T: serde::Serialize>(path: &Path, records: &[T]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;
    for record in records {
        writer.serialize(record)?;
    }
    writer.flush()?;
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();
    telemetry::init_tracing(&LoggingConfig::default(), false, false);

    let stress_rate = args.stress_rate;
    info!(
        output_dir = %args.output_dir.display(),
        rows = args.rows,
        stress_rate,
        "Generating sample tables"
    );

    std::fs::create_dir_all(&args.output_dir)
        .with_context(|| format!("Failed to create {}", args.output_dir.display()))?;

    let mut generator = RecordGenerator::new();
    let mut rng = rand::thread_rng();

    let mut stressed = 0;
    let borrowers: Vec<CreditRecord> = (0..args.rows)
        .map(|_| {
            if rng.gen_bool(stress_rate) {
                stressed += 1;
                generator.stressed_borrower()
            } else {
                generator.healthy_borrower()
            }
        })
        .collect();

    let mut suspicious = 0;
    let transactions: Vec<TransactionRecord> = (0..args.rows)
        .map(|_| {
            if rng.gen_bool(stress_rate) {
                suspicious += 1;
                generator.suspicious_transaction()
            } else {
                generator.ordinary_transaction()
            }
        })
        .collect();

    write_table(&args.output_dir.join("credit_data.csv"), &borrowers)?;
    write_table(&args.output_dir.join("transactions.csv"), &transactions)?;

    info!(
        "Completed! Wrote {} borrowers ({} stressed) and {} transactions ({} suspicious)",
        borrowers.len(),
        stressed,
        transactions.len(),
        suspicious
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_rate_accepts_unit_interval() {
        assert_eq!(parse_rate("0").unwrap(), 0.0);
        assert_eq!(parse_rate("0.25").unwrap(), 0.25);
        assert_eq!(parse_rate("1").unwrap(), 1.0);
    }

    #[test]
    fn test_parse_rate_rejects_non_finite_and_out_of_range() {
        for value in ["NaN", "nan", "inf", "-inf", "1.5", "-0.1", "lots"] {
            assert!(parse_rate(value).is_err(), "{value} should be rejected");
        }
    }

    #[test]
    fn test_args_reject_nan_stress_rate() {
        assert!(Args::try_parse_from(["sample-data", "--stress-rate", "NaN"]).is_err());

        let args = Args::try_parse_from(["sample-data", "--stress-rate", "0.5"]).unwrap();
        assert_eq!(args.stress_rate, 0.5);
    }
}
