//! Transaction anomaly rules.
//!
//! Rules live in an ordered table and are tried top to bottom. The first rule
//! whose predicate holds produces the row's only alert; later rules are not
//! consulted even if they would also match.

use crate::types::alert::{Alert, AlertType, Severity};
use crate::types::record::TransactionRecord;
use serde::{Deserialize, Serialize};
use tracing::trace;

/// Configurable limits for the transaction rules
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransactionThresholds {
    /// Minimum 24h transaction count for the smurfing rule
    pub smurfing_min_count: i64,
    /// Highest average amount still considered "small"
    pub smurfing_max_avg_amount: f64,
    /// How many times the declared income a single transaction may reach
    pub income_multiple: f64,
    /// Absolute amount that is always reported
    pub large_amount: f64,
}

impl Default for TransactionThresholds {
    fn default() -> Self {
        Self {
            smurfing_min_count: 10,
            smurfing_max_avg_amount: 5000.0,
            income_multiple: 5.0,
            large_amount: 1_000_000.0, // ₹10 lakh
        }
    }
}

type Predicate = fn(&TransactionRecord, &TransactionThresholds) -> bool;
type Describe = fn(&TransactionRecord, &TransactionThresholds) -> String;

/// A single (predicate, message builder) pair in the rule table
#[derive(Clone, Copy)]
pub struct TransactionRule {
    pub alert_type: AlertType,
    pub severity: Severity,
    predicate: Predicate,
    describe: Describe,
}

impl TransactionRule {
    pub fn matches(&self, record: &TransactionRecord, thresholds: &TransactionThresholds) -> bool {
        (self.predicate)(record, thresholds)
    }

    pub fn build(&self, record: &TransactionRecord, thresholds: &TransactionThresholds) -> Alert {
        Alert::for_account(
            record.account_id.clone(),
            record.customer_id.clone(),
            self.alert_type,
            self.severity,
            (self.describe)(record, thresholds),
        )
    }
}

impl std::fmt::Debug for TransactionRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransactionRule")
            .field("alert_type", &self.alert_type)
            .field("severity", &self.severity)
            .finish()
    }
}

/// Rules in precedence order
pub static TRANSACTION_RULES: [TransactionRule; 3] = [
    // Many small transactions in a day: possible structuring
    TransactionRule {
        alert_type: AlertType::SmurfingPattern,
        severity: Severity::High,
        predicate: |r, t| {
            r.txn_count_last_24h >= t.smurfing_min_count
                && r.avg_txn_amount <= t.smurfing_max_avg_amount
        },
        describe: |r, _| {
            format!(
                "{} transactions in 24h with avg ₹{:.0}",
                r.txn_count_last_24h, r.avg_txn_amount
            )
        },
    },
    // Single transaction far above the customer's declared income
    TransactionRule {
        alert_type: AlertType::ProfileMismatchLargeTxn,
        severity: Severity::Medium,
        predicate: |r, t| {
            r.expected_income > 0.0 && r.txn_amount > t.income_multiple * r.expected_income
        },
        describe: |r, _| {
            format!(
                "Txn ₹{:.0} >> expected income ₹{:.0}",
                r.txn_amount, r.expected_income
            )
        },
    },
    TransactionRule {
        alert_type: AlertType::VeryLargeTransaction,
        severity: Severity::High,
        predicate: |r, t| r.txn_amount >= t.large_amount,
        describe: |r, t| {
            format!(
                "Txn ₹{:.0} exceeds ₹{}",
                r.txn_amount,
                group_thousands(t.large_amount)
            )
        },
    },
];

/// Render a whole amount with comma thousands separators, e.g. `1,000,000`.
pub fn group_thousands(amount: f64) -> String {
    let digits = format!("{:.0}", amount.abs());
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);

    if amount < 0.0 && digits != "0" {
        grouped.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}

/// Applies the rule table to transaction records
#[derive(Debug, Clone, Default)]
pub struct TransactionAnomalyEvaluator {
    thresholds: TransactionThresholds,
}

impl TransactionAnomalyEvaluator {
    pub fn new(thresholds: TransactionThresholds) -> Self {
        Self { thresholds }
    }

    pub fn thresholds(&self) -> &TransactionThresholds {
        &self.thresholds
    }

    /// The rule table in the order it is evaluated
    pub fn rules(&self) -> &'static [TransactionRule] {
        &TRANSACTION_RULES
    }

    /// First rule that matches the record, if any
    pub fn matching_rule(&self, record: &TransactionRecord) -> Option<&'static TransactionRule> {
        self.rules()
            .iter()
            .find(|rule| rule.matches(record, &self.thresholds))
    }

    /// At most one alert for a record
    pub fn assess(&self, record: &TransactionRecord) -> Option<Alert> {
        let rule = self.matching_rule(record)?;
        trace!(
            account_id = ?record.account_id,
            alert_type = %rule.alert_type,
            "Transaction rule matched"
        );
        Some(rule.build(record, &self.thresholds))
    }

    /// Evaluate a table of records, keeping input order
    pub fn evaluate(&self, records: &[TransactionRecord]) -> Vec<Alert> {
        records.iter().filter_map(|record| self.assess(record)).collect()
    }
}

/// Evaluate transaction records against the default rule limits
pub fn evaluate_transaction_anomalies(records: &[TransactionRecord]) -> Vec<Alert> {
    TransactionAnomalyEvaluator::default().evaluate(records)
}
