//! NATS request/reply service around the inference engine
//!
//! Many requests can be in flight at once; they all share one engine over
//! the cached, read-only artifacts.

use crate::config::AppConfig;
use crate::consumer::ProfileConsumer;
use crate::metrics::{MetricsReporter, SegmentationMetrics};
use crate::models::inference::InferenceEngine;
use crate::producer::ReportProducer;
use crate::types::profile::ProfileInput;
use crate::types::report::SegmentReport;
use anyhow::{Context, Result};
use futures::StreamExt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Semaphore;
use tracing::{debug, error, info, warn};

/// Decode a JSON profile, clamp it to the field ranges and segment it.
pub fn handle_payload(engine: &InferenceEngine, payload: &[u8]) -> Result<SegmentReport> {
    let input: ProfileInput = serde_json::from_slice(payload).context("invalid profile")?;

    // there are no bounded widgets on this path, so clamp here
    let profile = input.clamped();
    if profile.values() != input.values() {
        debug!(?input, ?profile, "Profile clamped to field ranges");
    }

    Ok(engine.segment(&profile)?)
}

/// Wait until every worker permit is back, i.e. no request is in flight.
async fn wait_for_workers(semaphore: &Semaphore, workers: usize) -> Result<()> {
    let _all = semaphore
        .acquire_many(workers as u32)
        .await
        .context("Worker semaphore closed")?;
    Ok(())
}

/// Serve segmentation requests until the subscription ends.
pub async fn serve(config: AppConfig, engine: Arc<InferenceEngine>) -> Result<()> {
    let metrics = Arc::new(SegmentationMetrics::new());

    let client = async_nats::connect(&config.nats.url)
        .await
        .with_context(|| format!("Failed to connect to NATS at {}", config.nats.url))?;
    info!("Connected to NATS at {}", config.nats.url);

    let consumer = ProfileConsumer::new(
        client.clone(),
        &config.nats.request_subject,
        &config.nats.queue_group,
    );
    let producer = Arc::new(ReportProducer::new(client.clone(), &config.nats.report_subject));

    let num_workers = config.service.workers.max(1);
    info!(
        "Starting request loop with {} parallel workers on {}",
        num_workers,
        consumer.subject()
    );

    let semaphore = Arc::new(Semaphore::new(num_workers));
    let processed_count = Arc::new(AtomicU64::new(0));

    let reporter = MetricsReporter::new(metrics.clone(), config.service.metrics_interval_secs);
    tokio::spawn(reporter.start());

    let mut subscription = consumer.subscribe().await?;

    while let Some(message) = subscription.next().await {
        let permit = semaphore
            .clone()
            .acquire_owned()
            .await
            .context("Worker semaphore closed")?;

        let engine = engine.clone();
        let producer = producer.clone();
        let metrics = metrics.clone();
        let processed_count = processed_count.clone();

        tokio::spawn(async move {
            let start_time = Instant::now();
            let reply = message.reply.clone();

            match handle_payload(&engine, &message.payload) {
                Ok(report) => {
                    let processing_time = start_time.elapsed();
                    metrics.record_report(&report, processing_time);

                    if let Err(e) = producer.publish(reply, &report).await {
                        error!(
                            request_id = %report.request_id,
                            error = %e,
                            "Failed to publish segment report"
                        );
                    } else {
                        debug!(
                            request_id = %report.request_id,
                            label = %report.label,
                            advisories = report.advisories.len(),
                            processing_time_us = processing_time.as_micros(),
                            "Segment report published"
                        );
                    }

                    let count = processed_count.fetch_add(1, Ordering::Relaxed) + 1;
                    if count % 100 == 0 {
                        let stats = metrics.get_processing_stats();
                        info!(
                            processed = count,
                            throughput = format!("{:.1} req/s", metrics.get_throughput()),
                            avg_latency_us = stats.mean_us,
                            "Processing milestone"
                        );
                    }
                }
                Err(e) => {
                    metrics.record_failure();
                    let reason = format!("{:#}", e);
                    warn!(error = %reason, "Failed to segment request");
                    if let Err(e) = producer.publish_error(reply, &reason).await {
                        error!(error = %e, "Failed to publish error reply");
                    }
                }
            }

            drop(permit);
        });
    }

    info!("Service shutting down...");
    wait_for_workers(&semaphore, num_workers).await?;
    metrics.print_summary();

    Ok(())
}
