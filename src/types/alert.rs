//! Alert data structures

use serde::{Deserialize, Serialize};
use std::fmt;

/// Severity tier attached to an alert
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Severity {
    Low,
    Medium,
    High,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Low => "Low",
            Severity::Medium => "Medium",
            Severity::High => "High",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Which rule raised an alert
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AlertType {
    #[serde(rename = "Credit Stress")]
    CreditStress,
    #[serde(rename = "Smurfing Pattern")]
    SmurfingPattern,
    #[serde(rename = "Profile Mismatch - Large Txn")]
    ProfileMismatchLargeTxn,
    #[serde(rename = "Very Large Transaction")]
    VeryLargeTransaction,
}

impl AlertType {
    /// The tag rendered in reports and dashboards
    pub fn as_str(&self) -> &'static str {
        match self {
            AlertType::CreditStress => "Credit Stress",
            AlertType::SmurfingPattern => "Smurfing Pattern",
            AlertType::ProfileMismatchLargeTxn => "Profile Mismatch - Large Txn",
            AlertType::VeryLargeTransaction => "Very Large Transaction",
        }
    }
}

impl fmt::Display for AlertType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// The entity an alert is about.
///
/// Serialized untagged and flattened into the alert, so a credit alert
/// carries only `customer_id` while a transaction alert carries both keys.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum AlertSubject {
    Account {
        account_id: Option<String>,
        customer_id: Option<String>,
    },
    Customer {
        customer_id: Option<String>,
    },
}

/// Alert raised for a single input row
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Alert {
    #[serde(flatten)]
    pub subject: AlertSubject,

    pub alert_type: AlertType,

    pub severity: Severity,

    /// Human-readable explanation of what tripped the rule
    pub message: String,
}

impl Alert {
    /// Create an alert about a borrower
    pub fn for_customer(
        customer_id: Option<String>,
        alert_type: AlertType,
        severity: Severity,
        message: String,
    ) -> Self {
        Self {
            subject: AlertSubject::Customer { customer_id },
            alert_type,
            severity,
            message,
        }
    }

    /// Create an alert about an account held by a customer
    pub fn for_account(
        account_id: Option<String>,
        customer_id: Option<String>,
        alert_type: AlertType,
        severity: Severity,
        message: String,
    ) -> Self {
        Self {
            subject: AlertSubject::Account {
                account_id,
                customer_id,
            },
            alert_type,
            severity,
            message,
        }
    }

    pub fn customer_id(&self) -> Option<&str> {
        match &self.subject {
            AlertSubject::Account { customer_id, .. } | AlertSubject::Customer { customer_id } => {
                customer_id.as_deref()
            }
        }
    }

    pub fn account_id(&self) -> Option<&str> {
        match &self.subject {
            AlertSubject::Account { account_id, .. } => account_id.as_deref(),
            AlertSubject::Customer { .. } => None,
        }
    }
}
