//! Alert reports handed to consumers

use crate::types::alert::{Alert, Severity};
use crate::types::record::{CreditRecord, TransactionRecord};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// The input table a report was produced from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dataset {
    Credit,
    Transactions,
}

impl Dataset {
    pub fn as_str(&self) -> &'static str {
        match self {
            Dataset::Credit => "credit",
            Dataset::Transactions => "transactions",
        }
    }

    /// Columns the evaluator for this dataset reads
    pub fn columns(&self) -> &'static [&'static str] {
        match self {
            Dataset::Credit => CreditRecord::COLUMNS,
            Dataset::Transactions => TransactionRecord::COLUMNS,
        }
    }
}

impl fmt::Display for Dataset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Alerts from one evaluation run, shaped as `{count, alerts}` plus provenance
#[derive(Debug, Clone, Serialize)]
pub struct AlertReport {
    pub dataset: Dataset,
    pub generated_at: DateTime<Utc>,
    /// Rows in the input table
    pub rows_evaluated: usize,
    pub count: usize,
    pub alerts: Vec<Alert>,
}

impl AlertReport {
    pub fn new(dataset: Dataset, rows_evaluated: usize, alerts: Vec<Alert>) -> Self {
        Self {
            dataset,
            generated_at: Utc::now(),
            rows_evaluated,
            count: alerts.len(),
            alerts,
        }
    }

    /// Alert count per severity, ordered Low to High
    pub fn severity_counts(&self) -> BTreeMap<Severity, usize> {
        let mut counts = BTreeMap::new();
        for alert in &self.alerts {
            *counts.entry(alert.severity).or_insert(0) += 1;
        }
        counts
    }

    pub fn is_empty(&self) -> bool {
        self.alerts.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::evaluate_credit_stress;

    #[test]
    fn test_report_counts() {
        let records = vec![
            CreditRecord::new("C1", 70.0, 0, 0.2),
            CreditRecord::new("C2", 10.0, 0, 0.3),
            CreditRecord::new("C3", 0.0, 2, 0.0),
            CreditRecord::new("C4", 0.0, 0, 0.99),
        ];
        let report = AlertReport::new(Dataset::Credit, records.len(), evaluate_credit_stress(&records));

        assert_eq!(report.count, 3);
        assert_eq!(report.rows_evaluated, 4);

        let counts: Vec<_> = report.severity_counts().into_iter().collect();
        assert_eq!(counts, vec![(Severity::Medium, 1), (Severity::High, 2)]);
    }

    #[test]
    fn test_report_serialization() {
        let report = AlertReport::new(Dataset::Transactions, 0, Vec::new());
        let json = serde_json::to_value(&report).unwrap();

        assert_eq!(json["dataset"], "transactions");
        assert_eq!(json["count"], 0);
        assert!(json["alerts"].as_array().unwrap().is_empty());
        assert!(json["generated_at"].is_string());
        assert!(report.is_empty());
    }

    #[test]
    fn test_dataset_columns() {
        assert_eq!(Dataset::Credit.columns().len(), 4);
        assert!(Dataset::Transactions.columns().contains(&"expected_income"));
    }
}
