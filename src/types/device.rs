//! Discovered device records.

use serde::{Deserialize, Serialize};
use std::net::IpAddr;

/// A host the classifier judged to be a printer.
///
/// Immutable once produced; consumed by the external registration
/// collaborator. Consumable levels default to zero and are only filled in
/// when telemetry enrichment succeeds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscoveredDevice {
    /// Address the device answered on.
    pub address: IpAddr,
    /// Resolved hostname, or a synthesized `printer-a-b-c-d` name when no
    /// reverse record exists.
    pub hostname: String,
    /// Best-effort model guess from the hostname heuristic or enrichment.
    pub model: String,
    /// Whether the device can print in color.
    pub has_color: bool,
    /// Whether the device can scan.
    pub has_scanner: bool,
    /// Whether the device can fax.
    pub has_fax: bool,
    /// Toner levels in percent, 0 when unknown.
    pub toner_black: u8,
    pub toner_cyan: u8,
    pub toner_magenta: u8,
    pub toner_yellow: u8,
    /// Serial number, when enrichment reported one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub serial_number: Option<String>,
    /// Physical location, when enrichment reported one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

impl DiscoveredDevice {
    /// Synthesize a hostname for a device with no reverse DNS record.
    pub fn synthesized_hostname(address: IpAddr) -> String {
        format!("printer-{}", address.to_string().replace(['.', ':'], "-"))
    }

    /// True when any chromatic toner level is above zero.
    pub fn has_chromatic_toner(&self) -> bool {
        self.toner_cyan > 0 || self.toner_magenta > 0 || self.toner_yellow > 0
    }
}
