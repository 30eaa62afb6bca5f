//! CSV dataset loader

use crate::config::DataConfig;
use crate::report::Dataset;
use crate::types::record::{CreditRecord, FromRow, Row, TransactionRecord};
use anyhow::{Context, Result};
use serde_json::Value;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Loads the borrower and transaction tables from the data directory
#[derive(Debug, Clone)]
pub struct DatasetLoader {
    credit_path: PathBuf,
    transaction_path: PathBuf,
}

impl DatasetLoader {
    pub fn new(config: &DataConfig) -> Self {
        Self {
            credit_path: config.credit_path(),
            transaction_path: config.transaction_path(),
        }
    }

    /// Resolved path of a dataset's table
    pub fn path(&self, dataset: Dataset) -> &Path {
        match dataset {
            Dataset::Credit => &self.credit_path,
            Dataset::Transactions => &self.transaction_path,
        }
    }

    pub fn load_credit(&self) -> Result<Vec<CreditRecord>> {
        read_records(&self.credit_path, Dataset::Credit)
    }

    pub fn load_transactions(&self) -> Result<Vec<TransactionRecord>> {
        read_records(&self.transaction_path, Dataset::Transactions)
    }

    /// Datasets whose table file is not on disk
    pub fn missing_files(&self) -> Vec<(Dataset, &Path)> {
        [Dataset::Credit, Dataset::Transactions]
            .into_iter()
            .map(|dataset| (dataset, self.path(dataset)))
            .filter(|(_, path)| !path.is_file())
            .collect()
    }
}

/// Read a headed CSV file into typed records
pub fn read_records<T, P>(path: P, dataset: Dataset) -> Result<Vec<T>>
where
    T: FromRow,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let file = std::fs::File::open(path)
        .with_context(|| format!("Failed to open {} table {}", dataset, path.display()))?;

    let records = records_from_reader(file, dataset)
        .with_context(|| format!("Failed to read {} table {}", dataset, path.display()))?;

    info!(
        dataset = %dataset,
        path = %path.display(),
        rows = records.len(),
        "Loaded table"
    );
    Ok(records)
}

/// Decode records from any CSV source.
///
/// Cells are handed to the record as text, never type-inferred, so an
/// identifier such as `007` keeps its leading zeros and an amount too long
/// for an integer still reads as a float. Blank cells read as null.
///
/// Expected columns absent from the header are reported but not fatal: every
/// row then reads zero (or null) for them.
pub fn records_from_reader<T, R>(reader: R, dataset: Dataset) -> Result<Vec<T>>
where
    T: FromRow,
    R: Read,
{
    let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);

    let headers = reader.headers().context("Failed to read CSV header")?.clone();
    let missing: Vec<&str> = dataset
        .columns()
        .iter()
        .copied()
        .filter(|column| !headers.iter().any(|h| h == *column))
        .collect();
    if !missing.is_empty() {
        warn!(
            dataset = %dataset,
            columns = ?missing,
            "Table is missing expected columns, their values default to zero"
        );
    }

    let mut records = Vec::new();
    for (index, result) in reader.records().enumerate() {
        // +2: one for the header, one for 1-based line numbers
        let cells = result.with_context(|| format!("Malformed row at line {}", index + 2))?;
        records.push(T::from_row(&row_from_cells(&headers, &cells)));
    }
    Ok(records)
}

fn row_from_cells(headers: &csv::StringRecord, cells: &csv::StringRecord) -> Row {
    headers
        .iter()
        .zip(cells.iter())
        .map(|(header, cell)| {
            let value = if cell.is_empty() {
                Value::Null
            } else {
                Value::String(cell.to_string())
            };
            (header.to_string(), value)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_credit_table_with_blank_cells() {
        let csv = "customer_id,overdue_days,missed_emi_count,utilization_ratio\n\
                   C1,70,0,0.2\n\
                   C2,,1,\n\
                   ,45,,0.5\n";

        let records: Vec<CreditRecord> =
            records_from_reader(csv.as_bytes(), Dataset::Credit).unwrap();

        assert_eq!(records.len(), 3);
        assert_eq!(records[0], CreditRecord::new("C1", 70.0, 0, 0.2));
        assert_eq!(records[1].overdue_days, 0.0);
        assert_eq!(records[1].utilization_ratio, 0.0);
        assert_eq!(records[2].customer_id, None);
        assert_eq!(records[2].missed_emi_count, 0);
    }

    #[test]
    fn test_missing_column_defaults_to_zero() {
        let csv = "account_id,customer_id,txn_amount,txn_count_last_24h,avg_txn_amount\n\
                   A1,C1,300000,1,300000\n";

        let records: Vec<TransactionRecord> =
            records_from_reader(csv.as_bytes(), Dataset::Transactions).unwrap();

        assert_eq!(records[0].expected_income, 0.0);
        assert_eq!(records[0].txn_amount, 300000.0);
    }

    #[test]
    fn test_numeric_identifiers_and_extra_columns() {
        let csv = "branch,customer_id,overdue_days,missed_emi_count,utilization_ratio\n\
                   Pune,1042,12.5,1,0.97\n";

        let records: Vec<CreditRecord> =
            records_from_reader(csv.as_bytes(), Dataset::Credit).unwrap();

        assert_eq!(records[0].customer_id.as_deref(), Some("1042"));
        assert_eq!(records[0].overdue_days, 12.5);
    }

    #[test]
    fn test_ragged_row_is_an_error() {
        let csv = "customer_id,overdue_days,missed_emi_count,utilization_ratio\n\
                   C1,70\n";

        let result: Result<Vec<CreditRecord>> = records_from_reader(csv.as_bytes(), Dataset::Credit);
        assert!(result.is_err());
    }

    #[test]
    fn test_loader_reads_from_data_dir() {
        let dir = tempfile::tempdir().unwrap();
        let mut file = std::fs::File::create(dir.path().join("credit_data.csv")).unwrap();
        writeln!(file, "customer_id,overdue_days,missed_emi_count,utilization_ratio").unwrap();
        writeln!(file, "C1,70,0,0.2").unwrap();

        let config = DataConfig {
            data_dir: dir.path().to_path_buf(),
            ..DataConfig::default()
        };
        let loader = DatasetLoader::new(&config);

        assert_eq!(loader.load_credit().unwrap().len(), 1);
        assert!(loader.load_transactions().is_err());

        let missing = loader.missing_files();
        assert_eq!(missing.len(), 1);
        assert_eq!(missing[0].0, Dataset::Transactions);
    }

    #[test]
    fn test_identifiers_keep_their_text() {
        let csv = "account_id,customer_id,txn_amount,txn_count_last_24h,avg_txn_amount,expected_income\n\
                   007,000042,1500000,1,1500000,0\n\
                   1e3,00017.50,100,1,100,0\n";

        let records: Vec<TransactionRecord> =
            records_from_reader(csv.as_bytes(), Dataset::Transactions).unwrap();

        assert_eq!(records[0].account_id.as_deref(), Some("007"));
        assert_eq!(records[0].customer_id.as_deref(), Some("000042"));
        assert_eq!(records[0].txn_amount, 1_500_000.0);
        assert_eq!(records[1].account_id.as_deref(), Some("1e3"));
        assert_eq!(records[1].customer_id.as_deref(), Some("00017.50"));

        let alerts = crate::rules::evaluate_transaction_anomalies(&records);
        assert_eq!(alerts[0].account_id(), Some("007"));
        assert_eq!(alerts[0].customer_id(), Some("000042"));
    }

    #[test]
    fn test_oversized_integer_cell_reads_as_float() {
        let csv = "account_id,customer_id,txn_amount,txn_count_last_24h,avg_txn_amount,expected_income\n\
                   A1,C1,100000000000000000000000,1,500,0\n\
                   A2,C2,2500,2,1800,60000\n";

        let records: Vec<TransactionRecord> =
            records_from_reader(csv.as_bytes(), Dataset::Transactions).unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].txn_amount, 1e23);
        assert_eq!(records[1].expected_income, 60_000.0);
    }
}
