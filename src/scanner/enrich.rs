//! Optional per-device telemetry enrichment.
//!
//! Enrichment runs after classification and can fill in fields the port and
//! hostname heuristics cannot know: the exact model, serial number, location,
//! and consumable levels. It is strictly best-effort — the sweep treats any
//! enricher error as "no enrichment available" and keeps the classifier's
//! defaults.

use async_trait::async_trait;
use std::net::IpAddr;
use std::time::Duration;

/// A sparse set of fields read from device telemetry.
///
/// Unset fields mean "the device did not report this", never "clear it".
#[derive(Debug, Clone, Default)]
pub struct TelemetryReading {
    pub model: Option<String>,
    pub serial_number: Option<String>,
    pub location: Option<String>,
    pub toner_black: Option<u8>,
    pub toner_cyan: Option<u8>,
    pub toner_magenta: Option<u8>,
    pub toner_yellow: Option<u8>,
}

/// Capability-gated telemetry source queried per discovered device.
#[async_trait]
pub trait TelemetryEnricher: Send + Sync {
    /// Query telemetry for one device.
    ///
    /// Errors are swallowed by the sweep; implementations should not retry
    /// internally.
    async fn query(&self, address: IpAddr) -> anyhow::Result<TelemetryReading>;
}

/// SNMP-backed enricher.
///
/// Currently a stub that always reports unavailable; the sweep degrades to
/// classifier defaults. Kept so a real SNMP stack can slot in behind the
/// trait without touching the classifier.
#[derive(Debug, Clone)]
pub struct SnmpEnricher {
    pub community: String,
    pub timeout: Duration,
}

impl SnmpEnricher {
    pub fn new() -> Self {
        Self {
            community: "public".to_string(),
            timeout: Duration::from_secs(2),
        }
    }
}

impl Default for SnmpEnricher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TelemetryEnricher for SnmpEnricher {
    async fn query(&self, address: IpAddr) -> anyhow::Result<TelemetryReading> {
        tracing::debug!(%address, "SNMP enrichment requested but support is disabled");
        anyhow::bail!("SNMP support is disabled")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_snmp_stub_reports_unavailable() {
        let enricher = SnmpEnricher::new();
        let result = enricher.query("192.168.1.20".parse().unwrap()).await;
        assert!(result.is_err());
    }

    #[test]
    fn test_default_reading_is_all_unset() {
        let reading = TelemetryReading::default();
        assert!(reading.model.is_none());
        assert!(reading.toner_cyan.is_none());
    }
}
