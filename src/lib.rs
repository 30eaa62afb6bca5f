//! Credit & Deposit Early Warning System
//!
//! Flags potentially risky borrowers and accounts by applying fixed,
//! human-readable threshold rules to borrower credit records and account
//! transaction records. Each row is evaluated on its own; the result is an
//! ordered list of alerts with a severity and an explanation.

pub mod coerce;
pub mod config;
pub mod loader;
pub mod metrics;
pub mod producer;
pub mod report;
pub mod rules;
pub mod telemetry;
pub mod types;

pub use config::AppConfig;
pub use loader::DatasetLoader;
pub use producer::AlertProducer;
pub use report::{AlertReport, Dataset};
pub use rules::{
    evaluate_credit_rows, evaluate_credit_stress, evaluate_transaction_anomalies,
    evaluate_transaction_rows, CreditStressEvaluator, TransactionAnomalyEvaluator,
};
pub use types::{Alert, AlertType, CreditRecord, FromRow, Row, Severity, TransactionRecord};
