//! NATS producer for segmentation replies

use crate::types::report::SegmentReport;
use anyhow::Result;
use async_nats::{Client, Subject};
use serde::Serialize;
use tracing::debug;

/// Reply sent when a request cannot be segmented
#[derive(Debug, Serialize)]
pub struct ErrorReply {
    pub error: String,
}

/// Producer for publishing segment reports to NATS
#[derive(Clone)]
pub struct ReportProducer {
    client: Client,
    subject: String,
}

impl ReportProducer {
    /// Create a new producer with a fallback subject for requests
    /// that carry no reply subject
    pub fn new(client: Client, subject: &str) -> Self {
        Self {
            client,
            subject: subject.to_string(),
        }
    }

    /// Publish a report to the reply subject, or the fallback subject
    pub async fn publish(&self, reply: Option<Subject>, report: &SegmentReport) -> Result<()> {
        self.send(reply, serde_json::to_vec(report)?).await?;

        debug!(
            request_id = %report.request_id,
            label = %report.label,
            "Published segment report"
        );

        Ok(())
    }

    /// Publish an error reply
    pub async fn publish_error(&self, reply: Option<Subject>, error: &str) -> Result<()> {
        let payload = serde_json::to_vec(&ErrorReply {
            error: error.to_string(),
        })?;
        self.send(reply, payload).await
    }

    async fn send(&self, reply: Option<Subject>, payload: Vec<u8>) -> Result<()> {
        match reply {
            Some(subject) => self.client.publish(subject, payload.into()).await?,
            None => {
                self.client
                    .publish(self.subject.clone(), payload.into())
                    .await?
            }
        }
        Ok(())
    }

    /// Get the fallback subject name
    pub fn subject(&self) -> &str {
        &self.subject
    }
}
