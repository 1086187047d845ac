//! Subnet sweep - discovers printers on a LAN without any vendor protocol.
//!
//! Fans a CIDR range out to bounded-concurrency address surveys (four port
//! probes plus a reverse DNS lookup per address, all concurrent), classifies
//! each host, and collects the printers into a [`SweepReport`].

pub mod classify;
pub mod enrich;
pub mod probe;
pub mod rate_limiter;

pub use classify::{apply_enrichment, classify};
pub use enrich::{SnmpEnricher, TelemetryEnricher, TelemetryReading};
pub use probe::{probe_port, resolve_hostname, survey, ProbeResult};
pub use rate_limiter::RateLimiter;

use crate::error::ScanResult;
use crate::types::{DiscoveredDevice, ScanRange, SweepId};
use chrono::{DateTime, Utc};
use futures::stream::{self, StreamExt};
use indicatif::{ProgressBar, ProgressStyle};
use std::net::IpAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Semaphore;
use trust_dns_resolver::config::{ResolverConfig, ResolverOpts};
use trust_dns_resolver::TokioAsyncResolver;

/// Configuration for a sweep.
#[derive(Debug, Clone)]
pub struct SweepConfig {
    /// Range to sweep (already validated at parse time).
    pub range: ScanRange,
    /// Maximum in-flight address surveys.
    pub concurrency: usize,
    /// Per-probe connect timeout.
    pub probe_timeout: Duration,
    /// Address surveys per second, 0 for unlimited.
    pub rate_limit: u32,
    /// Show a progress bar while sweeping.
    pub verbose: bool,
}

impl SweepConfig {
    /// Default bound on in-flight address surveys.
    pub const DEFAULT_CONCURRENCY: usize = 50;
    /// Default per-probe connect timeout.
    pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_secs(1);

    /// Create a sweep configuration with default bounds.
    pub fn new(range: ScanRange) -> Self {
        Self {
            range,
            concurrency: Self::DEFAULT_CONCURRENCY,
            probe_timeout: Self::DEFAULT_PROBE_TIMEOUT,
            rate_limit: 0,
            verbose: false,
        }
    }

    /// Set the concurrency bound.
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    /// Set the per-probe timeout.
    pub fn with_probe_timeout(mut self, timeout: Duration) -> Self {
        self.probe_timeout = timeout;
        self
    }

    /// Set the survey rate limit (0 = unlimited).
    pub fn with_rate_limit(mut self, rate: u32) -> Self {
        self.rate_limit = rate;
        self
    }

    /// Enable progress output.
    pub fn with_verbose(mut self) -> Self {
        self.verbose = true;
        self
    }
}

/// Complete sweep results plus metadata for the caller.
#[derive(Debug, Clone, serde::Serialize)]
pub struct SweepReport {
    pub id: SweepId,
    pub range: String,
    pub started_at: DateTime<Utc>,
    /// Addresses surveyed (every usable host, exactly once).
    pub attempted: usize,
    /// Addresses classified as printers.
    pub matched: usize,
    pub duration_ms: u64,
    pub devices: Vec<DiscoveredDevice>,
}

/// Execute a complete sweep over the configured range.
///
/// Discards non-printer verdicts; result order carries no meaning. The
/// enricher, when given, runs once per discovered device and its failures
/// leave the classifier's defaults in place.
pub async fn run_sweep(
    config: SweepConfig,
    enricher: Option<Arc<dyn TelemetryEnricher>>,
) -> ScanResult<SweepReport> {
    let addresses = config.range.expand();
    let attempted = addresses.len();
    let started_at = Utc::now();
    let start = Instant::now();

    tracing::info!(range = %config.range, attempted, "starting sweep");

    let progress = if config.verbose {
        let pb = ProgressBar::new(attempted as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) {msg}")
                .unwrap()
                .progress_chars("=>-"),
        );
        Some(pb)
    } else {
        None
    };

    // Reverse records for private ranges live on the site's own DNS, so
    // prefer the system resolver configuration
    let resolver = Arc::new(match TokioAsyncResolver::tokio_from_system_conf() {
        Ok(resolver) => resolver,
        Err(_) => TokioAsyncResolver::tokio(ResolverConfig::default(), ResolverOpts::default()),
    });
    let semaphore = Arc::new(Semaphore::new(config.concurrency));
    let limiter = (config.rate_limit > 0).then(|| RateLimiter::new(config.rate_limit));
    let probe_timeout = config.probe_timeout;

    let devices: Vec<DiscoveredDevice> = stream::iter(addresses)
        .map(|address| {
            let sem = Arc::clone(&semaphore);
            let resolver = Arc::clone(&resolver);
            let enricher = enricher.clone();
            let limiter = limiter.clone();
            let progress = progress.clone();

            async move {
                let _permit = sem.acquire().await.unwrap();
                if let Some(ref limiter) = limiter {
                    limiter.wait().await;
                }

                let device =
                    classify_address(&resolver, address, probe_timeout, enricher.as_deref()).await;

                if let Some(ref pb) = progress {
                    pb.inc(1);
                    if let Some(ref device) = device {
                        pb.set_message(format!("Found {}", device.hostname));
                    }
                }

                device
            }
        })
        // High buffering; the semaphore controls actual concurrency
        .buffer_unordered(1000)
        .filter_map(|device| async move { device })
        .collect()
        .await;

    if let Some(pb) = progress {
        pb.finish_with_message("Sweep complete");
    }

    let duration = start.elapsed();
    let matched = devices.len();
    tracing::info!(matched, attempted, elapsed_ms = duration.as_millis() as u64, "sweep finished");

    Ok(SweepReport {
        id: SweepId::new(),
        range: config.range.to_string(),
        started_at,
        attempted,
        matched,
        duration_ms: duration.as_millis() as u64,
        devices,
    })
}

/// Survey and classify one address, applying enrichment when available.
async fn classify_address(
    resolver: &TokioAsyncResolver,
    address: IpAddr,
    probe_timeout: Duration,
    enricher: Option<&dyn TelemetryEnricher>,
) -> Option<DiscoveredDevice> {
    let probe = probe::survey(resolver, address, probe_timeout).await;
    let mut device = classify::classify(&probe)?;

    if let Some(enricher) = enricher {
        match enricher.query(address).await {
            Ok(reading) => classify::apply_enrichment(&mut device, &reading),
            // Enrichment is best-effort; keep classifier defaults
            Err(e) => tracing::debug!(%address, error = %e, "enrichment unavailable"),
        }
    }

    Some(device)
}
