//! Borrower credit stress classification

use crate::types::alert::{Alert, AlertType, Severity};
use crate::types::record::CreditRecord;
use serde::{Deserialize, Serialize};
use tracing::trace;

/// Limits that put a borrower into a severity tier.
///
/// A tier is breached when any one of its limits is crossed: overdue days
/// and utilization must strictly exceed the limit, missed EMIs must reach it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StressTier {
    pub overdue_days: f64,
    pub missed_emis: i64,
    pub utilization: f64,
}

impl StressTier {
    pub fn is_breached(&self, overdue: f64, missed: i64, utilization: f64) -> bool {
        overdue > self.overdue_days || missed >= self.missed_emis || utilization > self.utilization
    }
}

/// Configurable credit stress tiers.
///
/// Deserializes field by field: any limit a source leaves out keeps its
/// tier's default, so `[rules.credit.high] overdue_days = 90.0` alone is valid.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "ThresholdOverrides")]
pub struct CreditThresholds {
    pub high: StressTier,
    pub medium: StressTier,
}

impl Default for CreditThresholds {
    fn default() -> Self {
        Self {
            high: StressTier {
                overdue_days: 60.0,
                missed_emis: 3,
                utilization: 0.95,
            },
            medium: StressTier {
                overdue_days: 30.0,
                missed_emis: 2,
                utilization: 0.9,
            },
        }
    }
}

/// Per-limit overrides of a single tier
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct TierOverrides {
    overdue_days: Option<f64>,
    missed_emis: Option<i64>,
    utilization: Option<f64>,
}

impl TierOverrides {
    fn apply(self, tier: StressTier) -> StressTier {
        StressTier {
            overdue_days: self.overdue_days.unwrap_or(tier.overdue_days),
            missed_emis: self.missed_emis.unwrap_or(tier.missed_emis),
            utilization: self.utilization.unwrap_or(tier.utilization),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ThresholdOverrides {
    high: TierOverrides,
    medium: TierOverrides,
}

impl From<ThresholdOverrides> for CreditThresholds {
    fn from(overrides: ThresholdOverrides) -> Self {
        let defaults = CreditThresholds::default();
        Self {
            high: overrides.high.apply(defaults.high),
            medium: overrides.medium.apply(defaults.medium),
        }
    }
}

/// Classifies borrower snapshots into severity tiers.
///
/// Holds nothing but its thresholds, so one instance can be shared freely
/// across threads.
#[derive(Debug, Clone, Default)]
pub struct CreditStressEvaluator {
    thresholds: CreditThresholds,
}

impl CreditStressEvaluator {
    pub fn new(thresholds: CreditThresholds) -> Self {
        Self { thresholds }
    }

    pub fn thresholds(&self) -> &CreditThresholds {
        &self.thresholds
    }

    /// Severity tier for a single record. High is checked before Medium.
    pub fn classify(&self, record: &CreditRecord) -> Severity {
        let overdue = record.overdue_days;
        let missed = record.missed_emi_count;
        let utilization = record.utilization_ratio;

        if self.thresholds.high.is_breached(overdue, missed, utilization) {
            Severity::High
        } else if self.thresholds.medium.is_breached(overdue, missed, utilization) {
            Severity::Medium
        } else {
            Severity::Low
        }
    }

    /// Explanation listing every nonzero stress signal, independent of the tier.
    pub fn describe(record: &CreditRecord) -> String {
        let mut parts = Vec::with_capacity(3);

        if record.overdue_days > 0.0 {
            parts.push(format!("Overdue: {:.0} days", record.overdue_days.trunc()));
        }
        if record.missed_emi_count > 0 {
            parts.push(format!("Missed EMIs: {}", record.missed_emi_count));
        }
        if record.utilization_ratio > 0.0 {
            parts.push(format!("Utilization: {:.2}", record.utilization_ratio));
        }

        parts.join("; ")
    }

    /// Alert for a record, or `None` when it lands in the Low tier
    pub fn assess(&self, record: &CreditRecord) -> Option<Alert> {
        let severity = self.classify(record);
        if severity == Severity::Low {
            return None;
        }

        let alert = Alert::for_customer(
            record.customer_id.clone(),
            AlertType::CreditStress,
            severity,
            Self::describe(record),
        );
        trace!(customer_id = ?record.customer_id, severity = %severity, "Credit stress alert");
        Some(alert)
    }

    /// Evaluate a table of records, keeping input order
    pub fn evaluate(&self, records: &[CreditRecord]) -> Vec<Alert> {
        records.iter().filter_map(|record| self.assess(record)).collect()
    }
}

/// Evaluate borrower records against the default credit stress tiers
pub fn evaluate_credit_stress(records: &[CreditRecord]) -> Vec<Alert> {
    CreditStressEvaluator::default().evaluate(records)
}
