//! Evaluation statistics for the early warning runs.

use crate::report::Dataset;
use crate::types::alert::Alert;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::RwLock;
use std::time::Duration;
use tracing::info;

/// Metrics collector shared by every evaluation in a process
pub struct EvaluationMetrics {
    /// Total rows evaluated
    pub rows_evaluated: AtomicU64,
    /// Total alerts emitted
    pub alerts_generated: AtomicU64,
    /// Alerts by severity
    alerts_by_severity: RwLock<HashMap<String, u64>>,
    /// Alerts by alert type
    alerts_by_type: RwLock<HashMap<String, u64>>,
    /// Evaluation wall time per dataset (in microseconds)
    evaluation_times: RwLock<HashMap<Dataset, u64>>,
}

impl EvaluationMetrics {
    pub fn new() -> Self {
        Self {
            rows_evaluated: AtomicU64::new(0),
            alerts_generated: AtomicU64::new(0),
            alerts_by_severity: RwLock::new(HashMap::new()),
            alerts_by_type: RwLock::new(HashMap::new()),
            evaluation_times: RwLock::new(HashMap::new()),
        }
    }

    /// Record one evaluator run over a table
    pub fn record_evaluation(
        &self,
        dataset: Dataset,
        rows: usize,
        alerts: &[Alert],
        elapsed: Duration,
    ) {
        self.rows_evaluated.fetch_add(rows as u64, Ordering::Relaxed);
        self.alerts_generated
            .fetch_add(alerts.len() as u64, Ordering::Relaxed);

        if let Ok(mut by_severity) = self.alerts_by_severity.write() {
            for alert in alerts {
                *by_severity
                    .entry(alert.severity.to_string())
                    .or_insert(0) += 1;
            }
        }

        if let Ok(mut by_type) = self.alerts_by_type.write() {
            for alert in alerts {
                *by_type.entry(alert.alert_type.to_string()).or_insert(0) += 1;
            }
        }

        if let Ok(mut times) = self.evaluation_times.write() {
            *times.entry(dataset).or_insert(0) += elapsed.as_micros() as u64;
        }
    }

    /// Get alerts by severity
    pub fn get_alerts_by_severity(&self) -> HashMap<String, u64> {
        self.alerts_by_severity
            .read()
            .map(|m| m.clone())
            .unwrap_or_default()
    }

    /// Get alerts by alert type
    pub fn get_alerts_by_type(&self) -> HashMap<String, u64> {
        self.alerts_by_type
            .read()
            .map(|m| m.clone())
            .unwrap_or_default()
    }

    /// Accumulated evaluation time for a dataset, in microseconds
    pub fn get_evaluation_time_us(&self, dataset: Dataset) -> u64 {
        self.evaluation_times
            .read()
            .ok()
            .and_then(|times| times.get(&dataset).copied())
            .unwrap_or(0)
    }

    /// Fraction of evaluated rows that raised an alert, as a percentage
    pub fn alert_rate(&self) -> f64 {
        let rows = self.rows_evaluated.load(Ordering::Relaxed);
        let alerts = self.alerts_generated.load(Ordering::Relaxed);
        if rows > 0 {
            (alerts as f64 / rows as f64) * 100.0
        } else {
            0.0
        }
    }

    /// Print summary statistics
    pub fn print_summary(&self) {
        let rows = self.rows_evaluated.load(Ordering::Relaxed);
        let alert_count = self.alerts_generated.load(Ordering::Relaxed);
        let alert_rate = self.alert_rate();

        info!("╔══════════════════════════════════════════════════════════════╗");
        info!("║          EARLY WARNING SYSTEM - EVALUATION SUMMARY           ║");
        info!("╠══════════════════════════════════════════════════════════════╣");
        info!(
            "║ Rows Evaluated:   {:>8}  │  Alerts: {:>8} ({:>5.1}%)      ║",
            rows, alert_count, alert_rate
        );
        for dataset in [Dataset::Credit, Dataset::Transactions] {
            let micros = self.get_evaluation_time_us(dataset);
            if micros > 0 {
                info!("║   {:12} evaluated in {:>8} μs                        ║", dataset, micros);
            }
        }
        info!("╠══════════════════════════════════════════════════════════════╣");
        info!("║ Alerts by Severity:                                          ║");
        let by_severity = self.get_alerts_by_severity();
        for severity in ["High", "Medium"] {
            let count = by_severity.get(severity).copied().unwrap_or(0);
            let pct = if alert_count > 0 {
                (count as f64 / alert_count as f64) * 100.0
            } else {
                0.0
            };
            info!("║   {:10}: {:>6} ({:>5.1}%)                                ║", severity, count, pct);
        }
        info!("╠══════════════════════════════════════════════════════════════╣");
        info!("║ Alerts by Type:                                              ║");
        let mut by_type: Vec<_> = self.get_alerts_by_type().into_iter().collect();
        by_type.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        for (alert_type, count) in &by_type {
            info!("║   {:30}: {:>6}                        ║", alert_type, count);
        }
        info!("╚══════════════════════════════════════════════════════════════╝");
    }
}

impl Default for EvaluationMetrics {
    fn default() -> Self {
        Self::new()
    }
}
