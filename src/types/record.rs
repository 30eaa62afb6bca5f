//! Input rows for the two evaluators

use crate::coerce::{
    count_or, identifier, lenient_count, lenient_identifier, lenient_number, number_or,
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A loosely typed table row, keyed by column name.
pub type Row = Map<String, Value>;

/// Records that can be built from a loosely typed row
pub trait FromRow: Sized {
    fn from_row(row: &Row) -> Self;
}

impl FromRow for CreditRecord {
    fn from_row(row: &Row) -> Self {
        CreditRecord::from_row(row)
    }
}

impl FromRow for TransactionRecord {
    fn from_row(row: &Row) -> Self {
        TransactionRecord::from_row(row)
    }
}

/// One borrower snapshot from the credit table
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CreditRecord {
    /// Borrower identifier, passed through to alerts untouched
    #[serde(default, deserialize_with = "lenient_identifier")]
    pub customer_id: Option<String>,

    /// Days the oldest installment is past due
    #[serde(default, deserialize_with = "lenient_number")]
    pub overdue_days: f64,

    /// Number of missed EMIs
    #[serde(default, deserialize_with = "lenient_count")]
    pub missed_emi_count: i64,

    /// Drawn credit as a fraction of the limit, expected in [0, 1] but not clamped
    #[serde(default, deserialize_with = "lenient_number")]
    pub utilization_ratio: f64,
}

impl CreditRecord {
    /// Column names read from a credit table. Other columns are ignored.
    pub const COLUMNS: &'static [&'static str] = &[
        "customer_id",
        "overdue_days",
        "missed_emi_count",
        "utilization_ratio",
    ];

    /// Create a record from already-typed values
    pub fn new(
        customer_id: impl Into<String>,
        overdue_days: f64,
        missed_emi_count: i64,
        utilization_ratio: f64,
    ) -> Self {
        Self {
            customer_id: Some(customer_id.into()),
            overdue_days,
            missed_emi_count,
            utilization_ratio,
        }
    }

    /// Build a record from a row mapping, defaulting unreadable numbers to zero
    pub fn from_row(row: &Row) -> Self {
        Self {
            customer_id: identifier(row.get("customer_id")),
            overdue_days: number_or(row.get("overdue_days"), 0.0),
            missed_emi_count: count_or(row.get("missed_emi_count"), 0),
            utilization_ratio: number_or(row.get("utilization_ratio"), 0.0),
        }
    }
}

/// One transaction, or one rolling-window snapshot of an account
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TransactionRecord {
    #[serde(default, deserialize_with = "lenient_identifier")]
    pub account_id: Option<String>,

    #[serde(default, deserialize_with = "lenient_identifier")]
    pub customer_id: Option<String>,

    /// Amount of the transaction under review
    #[serde(default, deserialize_with = "lenient_number")]
    pub txn_amount: f64,

    /// Transactions on the account in the trailing 24 hours
    #[serde(default, deserialize_with = "lenient_count")]
    pub txn_count_last_24h: i64,

    /// Mean amount of those transactions
    #[serde(default, deserialize_with = "lenient_number")]
    pub avg_txn_amount: f64,

    /// Declared income on the customer profile; zero means unknown
    #[serde(default, deserialize_with = "lenient_number")]
    pub expected_income: f64,
}

impl TransactionRecord {
    /// Column names read from a transaction table. Other columns are ignored.
    pub const COLUMNS: &'static [&'static str] = &[
        "account_id",
        "customer_id",
        "txn_amount",
        "txn_count_last_24h",
        "avg_txn_amount",
        "expected_income",
    ];

    /// Create a record for an account with the given activity figures
    pub fn new(
        account_id: impl Into<String>,
        customer_id: impl Into<String>,
        txn_amount: f64,
        txn_count_last_24h: i64,
        avg_txn_amount: f64,
        expected_income: f64,
    ) -> Self {
        Self {
            account_id: Some(account_id.into()),
            customer_id: Some(customer_id.into()),
            txn_amount,
            txn_count_last_24h,
            avg_txn_amount,
            expected_income,
        }
    }

    /// Build a record from a row mapping, defaulting unreadable numbers to zero
    pub fn from_row(row: &Row) -> Self {
        Self {
            account_id: identifier(row.get("account_id")),
            customer_id: identifier(row.get("customer_id")),
            txn_amount: number_or(row.get("txn_amount"), 0.0),
            txn_count_last_24h: count_or(row.get("txn_count_last_24h"), 0),
            avg_txn_amount: number_or(row.get("avg_txn_amount"), 0.0),
            expected_income: number_or(row.get("expected_income"), 0.0),
        }
    }
}
