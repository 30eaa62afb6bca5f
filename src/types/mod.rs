//! Record and alert types shared by the evaluators

pub mod alert;
pub mod record;

pub use alert::{Alert, AlertSubject, AlertType, Severity};
pub use record::{CreditRecord, FromRow, Row, TransactionRecord};
