//! Test Profile Requester
//!
//! Generates random customer profiles and sends them as segmentation
//! requests over NATS, logging each reply.

use finseg::CustomerProfile;
use rand::Rng;
use serde_json::Value;
use std::time::Duration;
use tracing::{info, warn};

const DEFAULT_SPENDER_RATE: f64 = 0.3;

/// Share of spender profiles, kept within `[0, 1]`.
fn parse_spender_rate(arg: Option<&str>) -> f64 {
    arg.and_then(|s| s.parse::<f64>().ok())
        .filter(|rate| !rate.is_nan())
        .map(|rate| rate.clamp(0.0, 1.0))
        .unwrap_or(DEFAULT_SPENDER_RATE)
}

/// Random profile generator for testing
struct ProfileGenerator {
    rng: rand::rngs::ThreadRng,
}

impl ProfileGenerator {
    fn new() -> Self {
        Self {
            rng: rand::thread_rng(),
        }
    }

    /// Cautious customer: low spend, high savings
    fn generate_saver(&mut self) -> CustomerProfile {
        let income = self.rng.gen_range(30000.0..150000.0_f64).round();
        CustomerProfile {
            income,
            expenses: (income * self.rng.gen_range(0.2..0.5)).round(),
            savings_rate: self.rng.gen_range(0.4..0.9),
            credit_cards: self.rng.gen_range(0..3),
            credit_utilization: self.rng.gen_range(0.0..25.0_f64).round(),
            emi_count: self.rng.gen_range(0..2),
            online_shopping_spend: self.rng.gen_range(0.0..2000.0_f64).round(),
            age: self.rng.gen_range(25..70),
        }
    }

    /// Heavy spender, sometimes past the advisory limits
    fn generate_spender(&mut self) -> CustomerProfile {
        let income = self.rng.gen_range(20000.0..200000.0_f64).round();
        CustomerProfile {
            income,
            expenses: (income * self.rng.gen_range(0.7..1.3)).round(),
            savings_rate: self.rng.gen_range(0.0..0.2),
            credit_cards: self.rng.gen_range(3..11),
            credit_utilization: self.rng.gen_range(50.0..100.0_f64).round(),
            emi_count: self.rng.gen_range(2..11),
            online_shopping_spend: self.rng.gen_range(5000.0..40000.0_f64).round(),
            age: self.rng.gen_range(18..50),
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("test_requester=info".parse()?),
        )
        .init();

    info!("Starting Test Profile Requester");

    // Parse arguments
    let args: Vec<String> = std::env::args().collect();
    let nats_url = args.get(1).map(|s| s.as_str()).unwrap_or("nats://localhost:4222");
    let subject = args.get(2).map(|s| s.as_str()).unwrap_or("finseg.segment");
    let count: u64 = args.get(3).and_then(|s| s.parse().ok()).unwrap_or(100);
    let spender_rate = parse_spender_rate(args.get(4).map(|s| s.as_str()));
    let delay_ms: u64 = args.get(5).and_then(|s| s.parse().ok()).unwrap_or(100);

    info!(
        nats_url = %nats_url,
        subject = %subject,
        count = count,
        spender_rate = spender_rate,
        delay_ms = delay_ms,
        "Configuration loaded"
    );

    let client = match async_nats::connect(nats_url).await {
        Ok(c) => {
            info!("Connected to NATS");
            c
        }
        Err(e) => {
            warn!(error = %e, "Failed to connect to NATS. Running in dry-run mode.");
            return run_dry_mode(count, spender_rate, delay_ms).await;
        }
    };

    let mut generator = ProfileGenerator::new();
    let mut rng = rand::thread_rng();
    let mut failures = 0;

    for i in 0..count {
        let profile = if rng.gen_bool(spender_rate) {
            generator.generate_spender()
        } else {
            generator.generate_saver()
        };

        let payload = serde_json::to_vec(&profile)?;
        match client.request(subject.to_string(), payload.into()).await {
            Ok(reply) => {
                let reply: Value = serde_json::from_slice(&reply.payload)?;
                if let Some(error) = reply.get("error") {
                    failures += 1;
                    warn!(request = i + 1, error = %error, "Service returned an error");
                } else {
                    info!(
                        request = i + 1,
                        label = %reply["label"],
                        advisories = %reply["advisories"],
                        "Segmented"
                    );
                }
            }
            Err(e) => {
                failures += 1;
                warn!(request = i + 1, error = %e, "Request failed");
            }
        }

        tokio::time::sleep(Duration::from_millis(delay_ms)).await;
    }

    info!("Completed! Sent {} requests ({} failed)", count, failures);

    Ok(())
}

async fn run_dry_mode(count: u64, spender_rate: f64, delay_ms: u64) -> anyhow::Result<()> {
    info!("Running in dry-run mode (no NATS connection)");

    let mut generator = ProfileGenerator::new();
    let mut rng = rand::thread_rng();

    for i in 0..count {
        let profile = if rng.gen_bool(spender_rate) {
            generator.generate_spender()
        } else {
            generator.generate_saver()
        };

        if (i + 1) % 10 == 0 || i == 0 {
            info!("Sample profile {}:\n{}", i + 1, serde_json::to_string_pretty(&profile)?);
        }

        tokio::time::sleep(Duration::from_millis(delay_ms)).await;
    }

    Ok(())
}
