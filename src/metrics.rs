//! Performance metrics and statistics tracking for the segmentation service.

use crate::types::advisory::Advisory;
use crate::types::report::SegmentReport;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};
use std::time::{Duration, Instant};
use tracing::info;

/// Metrics collector for segmentation requests
pub struct SegmentationMetrics {
    /// Total requests segmented successfully
    pub requests_processed: AtomicU64,
    /// Requests that could not be segmented
    pub requests_failed: AtomicU64,
    /// Reports by predicted label
    segments_by_label: RwLock<HashMap<String, u64>>,
    /// Advisories raised, by kind
    advisories: RwLock<HashMap<&'static str, u64>>,
    /// Processing times (in microseconds)
    processing_times: RwLock<Vec<u64>>,
    /// Start time for rate calculation
    start_time: Instant,
}

impl SegmentationMetrics {
    pub fn new() -> Self {
        Self {
            requests_processed: AtomicU64::new(0),
            requests_failed: AtomicU64::new(0),
            segments_by_label: RwLock::new(HashMap::new()),
            advisories: RwLock::new(HashMap::new()),
            processing_times: RwLock::new(Vec::with_capacity(1000)),
            start_time: Instant::now(),
        }
    }

    /// Record a successfully segmented request
    pub fn record_report(&self, report: &SegmentReport, processing_time: Duration) {
        self.requests_processed.fetch_add(1, Ordering::Relaxed);

        if let Ok(mut times) = self.processing_times.write() {
            times.push(processing_time.as_micros() as u64);
            // Keep only last 10000
            if times.len() > 10000 {
                times.drain(0..5000);
            }
        }

        if let Ok(mut by_label) = self.segments_by_label.write() {
            *by_label.entry(report.label.to_string()).or_insert(0) += 1;
        }

        self.record_advisories(&report.advisories);
    }

    fn record_advisories(&self, advisories: &[Advisory]) {
        if advisories.is_empty() {
            return;
        }
        if let Ok(mut counts) = self.advisories.write() {
            for advisory in advisories {
                *counts.entry(advisory.as_str()).or_insert(0) += 1;
            }
        }
    }

    /// Record a request that failed to decode or segment
    pub fn record_failure(&self) {
        self.requests_failed.fetch_add(1, Ordering::Relaxed);
    }

    /// Get processing time statistics
    pub fn get_processing_stats(&self) -> ProcessingStats {
        let times = match self.processing_times.read() {
            Ok(times) => times,
            Err(_) => return ProcessingStats::default(),
        };
        if times.is_empty() {
            return ProcessingStats::default();
        }

        let mut sorted: Vec<u64> = times.clone();
        sorted.sort_unstable();

        let sum: u64 = sorted.iter().sum();
        let count = sorted.len();

        ProcessingStats {
            count: count as u64,
            mean_us: sum / count as u64,
            p50_us: sorted[count / 2],
            p95_us: sorted[(count as f64 * 0.95) as usize],
            p99_us: sorted[(count as f64 * 0.99) as usize],
            max_us: *sorted.last().unwrap_or(&0),
        }
    }

    /// Get current throughput (requests per second)
    pub fn get_throughput(&self) -> f64 {
        let elapsed = self.start_time.elapsed().as_secs_f64();
        if elapsed > 0.0 {
            self.requests_processed.load(Ordering::Relaxed) as f64 / elapsed
        } else {
            0.0
        }
    }

    /// Get reports by label
    pub fn get_segments_by_label(&self) -> HashMap<String, u64> {
        self.segments_by_label
            .read()
            .map(|m| m.clone())
            .unwrap_or_default()
    }

    /// Get advisory counts by kind
    pub fn get_advisory_counts(&self) -> HashMap<&'static str, u64> {
        self.advisories
            .read()
            .map(|m| m.clone())
            .unwrap_or_default()
    }

    /// Print summary statistics
    pub fn print_summary(&self) {
        let processed = self.requests_processed.load(Ordering::Relaxed);
        let failed = self.requests_failed.load(Ordering::Relaxed);
        let processing = self.get_processing_stats();
        let throughput = self.get_throughput();

        info!("╔══════════════════════════════════════════════════════════════╗");
        info!("║          CUSTOMER SEGMENTATION - METRICS SUMMARY             ║");
        info!("╠══════════════════════════════════════════════════════════════╣");
        info!(
            "║ Requests Processed: {:>8}  │  Throughput: {:>6.1} req/s     ║",
            processed, throughput
        );
        info!("║ Requests Failed:    {:>8}                                  ║", failed);
        info!(
            "║ Processing Time (μs): mean={:>5} p50={:>5} p95={:>5} p99={:>5} ║",
            processing.mean_us, processing.p50_us, processing.p95_us, processing.p99_us
        );
        info!("╠══════════════════════════════════════════════════════════════╣");
        info!("║ Segments:                                                    ║");
        let mut by_label: Vec<(String, u64)> = self.get_segments_by_label().into_iter().collect();
        by_label.sort();
        for (label, count) in &by_label {
            let pct = if processed > 0 {
                (*count as f64 / processed as f64) * 100.0
            } else {
                0.0
            };
            let bar: String = "█".repeat(((pct / 5.0) as usize).min(20));
            info!("║   {:10}: {:>6} ({:>5.1}%) {}", label, count, pct, bar);
        }
        let advisories = self.get_advisory_counts();
        if !advisories.is_empty() {
            info!("╠══════════════════════════════════════════════════════════════╣");
            info!("║ Advisories:                                                  ║");
            for (kind, count) in &advisories {
                info!("║   {:24}: {:>6}", kind, count);
            }
        }
        info!("╚══════════════════════════════════════════════════════════════╝");
    }
}

impl Default for SegmentationMetrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Processing time statistics
#[derive(Debug, Default)]
pub struct ProcessingStats {
    pub count: u64,
    pub mean_us: u64,
    pub p50_us: u64,
    pub p95_us: u64,
    pub p99_us: u64,
    pub max_us: u64,
}

/// Prints a metrics summary on a fixed interval
pub struct MetricsReporter {
    metrics: Arc<SegmentationMetrics>,
    interval_secs: u64,
}

impl MetricsReporter {
    pub fn new(metrics: Arc<SegmentationMetrics>, interval_secs: u64) -> Self {
        Self {
            metrics,
            interval_secs,
        }
    }

    /// Start the periodic reporting task
    pub async fn start(self) {
        let mut interval = tokio::time::interval(Duration::from_secs(self.interval_secs.max(1)));
        // first tick fires immediately
        interval.tick().await;
        loop {
            interval.tick().await;
            self.metrics.print_summary();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::report::CategoryLabel;

    #[test]
    fn test_metrics_recording() {
        let metrics = SegmentationMetrics::new();

        metrics.record_report(
            &SegmentReport::new(CategoryLabel::new("Saver")),
            Duration::from_micros(100),
        );
        metrics.record_report(
            &SegmentReport::new(CategoryLabel::new("Saver"))
                .with_advisories(vec![Advisory::SavingsRateAboveOne]),
            Duration::from_micros(300),
        );
        metrics.record_report(
            &SegmentReport::new(CategoryLabel::new("Spender")),
            Duration::from_micros(200),
        );
        metrics.record_failure();

        assert_eq!(metrics.requests_processed.load(Ordering::Relaxed), 3);
        assert_eq!(metrics.requests_failed.load(Ordering::Relaxed), 1);

        let by_label = metrics.get_segments_by_label();
        assert_eq!(by_label.get("Saver"), Some(&2));
        assert_eq!(by_label.get("Spender"), Some(&1));
        assert_eq!(
            metrics.get_advisory_counts().get("savings_rate_above_one"),
            Some(&1)
        );

        let stats = metrics.get_processing_stats();
        assert_eq!(stats.count, 3);
        assert_eq!(stats.mean_us, 200);
        assert_eq!(stats.p50_us, 200);
        assert_eq!(stats.max_us, 300);
    }

    #[test]
    fn test_empty_stats() {
        let metrics = SegmentationMetrics::new();
        assert_eq!(metrics.get_processing_stats().count, 0);
        assert!(metrics.get_segments_by_label().is_empty());
    }
}
