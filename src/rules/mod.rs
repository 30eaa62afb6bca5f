//! Rule evaluators for borrower and transaction tables.
//!
//! Both evaluators are pure: they read a slice of records, hold no state
//! between calls, and never fail. Unreadable cells have already been coerced
//! to zero by the time a record reaches them.

pub mod credit;
pub mod transaction;

pub use credit::{evaluate_credit_stress, CreditStressEvaluator, CreditThresholds, StressTier};
pub use transaction::{
    evaluate_transaction_anomalies, TransactionAnomalyEvaluator, TransactionRule,
    TransactionThresholds, TRANSACTION_RULES,
};

use crate::types::alert::Alert;
use crate::types::record::{CreditRecord, Row, TransactionRecord};

/// Evaluate loosely typed credit rows with the default tiers
pub fn evaluate_credit_rows(rows: &[Row]) -> Vec<Alert> {
    let records: Vec<CreditRecord> = rows.iter().map(CreditRecord::from_row).collect();
    evaluate_credit_stress(&records)
}

/// Evaluate loosely typed transaction rows with the default rule limits
pub fn evaluate_transaction_rows(rows: &[Row]) -> Vec<Alert> {
    let records: Vec<TransactionRecord> = rows.iter().map(TransactionRecord::from_row).collect();
    evaluate_transaction_anomalies(&records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::alert::{AlertType, Severity};
    use serde_json::{json, Value};

    fn rows(value: Value) -> Vec<Row> {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_credit_rows_with_missing_cells() {
        let alerts = evaluate_credit_rows(&rows(json!([
            { "customer_id": "C1", "overdue_days": 70, "missed_emi_count": 0, "utilization_ratio": 0.2 },
            { "customer_id": "C2", "overdue_days": null, "missed_emi_count": 2 },
            { "overdue_days": "n/a", "utilization_ratio": 0.1 }
        ])));

        assert_eq!(alerts.len(), 2);
        assert_eq!(alerts[0].message, "Overdue: 70 days; Utilization: 0.20");
        assert_eq!(alerts[1].customer_id(), Some("C2"));
        assert_eq!(alerts[1].severity, Severity::Medium);
        assert_eq!(alerts[1].message, "Missed EMIs: 2");
    }

    #[test]
    fn test_missing_income_column_disables_profile_rule() {
        let alerts = evaluate_transaction_rows(&rows(json!([
            { "account_id": "A1", "customer_id": "C1", "txn_amount": 300000, "txn_count_last_24h": 1 }
        ])));

        assert!(alerts.is_empty());
    }

    #[test]
    fn test_transaction_rows() {
        let alerts = evaluate_transaction_rows(&rows(json!([
            { "account_id": "A3", "customer_id": "C3", "txn_amount": 1000,
              "txn_count_last_24h": 15, "avg_txn_amount": 800, "expected_income": 50000 }
        ])));

        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].alert_type, AlertType::SmurfingPattern);
    }

    #[test]
    fn test_evaluators_are_shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<CreditStressEvaluator>();
        assert_send_sync::<TransactionAnomalyEvaluator>();
    }
}
