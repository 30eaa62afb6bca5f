//! NATS message producer for early warning alerts

use crate::report::Dataset;
use crate::types::alert::Alert;
use anyhow::Result;
use async_nats::Client;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, error};
use uuid::Uuid;

/// Wire form of a published alert: the flat alert plus delivery metadata
#[derive(Debug, Clone, Serialize)]
pub struct AlertEnvelope<'a> {
    /// Unique per publication, so consumers can deduplicate redeliveries
    pub alert_id: Uuid,
    pub dataset: Dataset,
    pub emitted_at: DateTime<Utc>,
    #[serde(flatten)]
    pub alert: &'a Alert,
}

impl<'a> AlertEnvelope<'a> {
    pub fn new(dataset: Dataset, alert: &'a Alert) -> Self {
        Self {
            alert_id: Uuid::new_v4(),
            dataset,
            emitted_at: Utc::now(),
            alert,
        }
    }
}

/// Producer for publishing alerts of one dataset to NATS
#[derive(Clone)]
pub struct AlertProducer {
    client: Client,
    subject: String,
    dataset: Dataset,
}

impl AlertProducer {
    /// Create a new alert producer
    pub fn new(client: Client, subject: &str, dataset: Dataset) -> Self {
        Self {
            client,
            subject: subject.to_string(),
            dataset,
        }
    }

    /// Publish a single alert
    pub async fn publish(&self, alert: &Alert) -> Result<()> {
        let envelope = AlertEnvelope::new(self.dataset, alert);
        let payload = serde_json::to_vec(&envelope)?;

        self.client
            .publish(self.subject.clone(), payload.into())
            .await?;

        debug!(
            alert_id = %envelope.alert_id,
            alert_type = %alert.alert_type,
            severity = %alert.severity,
            "Published alert"
        );

        Ok(())
    }

    /// Publish multiple alerts, returning how many went out.
    ///
    /// A failed publish is logged and skipped; the rest of the batch still goes.
    pub async fn publish_batch(&self, alerts: &[Alert]) -> Result<usize> {
        let mut published = 0;
        for alert in alerts {
            match self.publish(alert).await {
                Ok(()) => published += 1,
                Err(e) => {
                    error!(
                        subject = %self.subject,
                        alert_type = %alert.alert_type,
                        error = %e,
                        "Failed to publish alert"
                    );
                }
            }
        }
        self.client.flush().await?;
        Ok(published)
    }

    /// Get the subject name
    pub fn subject(&self) -> &str {
        &self.subject
    }
}
