//! Printer classification heuristic.
//!
//! Turns one address's probe results into a verdict: not a printer, or a
//! [`DiscoveredDevice`] with a model guess and capability flags. The
//! heuristic is deliberately unchanged from the fleet it was tuned against:
//! a hostname keyword list plus the raw-print port, false positives and
//! false negatives included.

use crate::scanner::enrich::TelemetryReading;
use crate::scanner::probe::ProbeResult;
use crate::types::DiscoveredDevice;

/// A hostname containing any of these marks the host as a printer.
const PRINTER_KEYWORDS: &[&str] = &[
    "ricoh", "printer", "print", "mfp", "copier", "mp", "sp", "im", "laserjet", "deskjet",
];

/// Classify one surveyed address.
///
/// Hostname keywords and the raw-print port are additive for the is-printer
/// verdict; for the model and capability guess the first matching rule wins.
pub fn classify(probe: &ProbeResult) -> Option<DiscoveredDevice> {
    let mut is_printer = false;
    let mut model = String::from("Unknown Printer");
    let mut has_color = false;
    let mut has_scanner = false;
    let mut hostname = probe.hostname.clone();

    if let Some(name) = &probe.hostname {
        let name = name.to_lowercase();
        if PRINTER_KEYWORDS.iter().any(|kw| name.contains(kw)) {
            is_printer = true;

            if name.contains("ricoh") {
                // Refine the model guess from the hostname
                if name.contains("mp") {
                    model = "RICOH MP Series".to_string();
                    has_color = true;
                    has_scanner = true;
                } else if name.contains("sp") {
                    model = "RICOH SP Series".to_string();
                } else if name.contains("im") {
                    model = "RICOH IM Series".to_string();
                    has_color = true;
                    has_scanner = true;
                } else {
                    model = "RICOH Printer".to_string();
                    has_color = true;
                    has_scanner = true;
                }
            } else {
                model = "Network Printer".to_string();
                has_scanner = probe.web_reachable();
            }
        }
    }

    // Port 9100 alone is specific enough to override an inconclusive
    // hostname check.
    if probe.raw_print && !is_printer {
        is_printer = true;
        model = "Network Printer (Port 9100)".to_string();
        has_scanner = probe.web_reachable();
        if hostname.is_none() {
            hostname = Some(DiscoveredDevice::synthesized_hostname(probe.address));
        }
    }

    if !is_printer {
        return None;
    }

    Some(DiscoveredDevice {
        address: probe.address,
        hostname: hostname
            .unwrap_or_else(|| DiscoveredDevice::synthesized_hostname(probe.address)),
        model,
        has_color,
        has_scanner,
        has_fax: false,
        toner_black: 0,
        toner_cyan: 0,
        toner_magenta: 0,
        toner_yellow: 0,
        serial_number: None,
        location: None,
    })
}

/// Merge a telemetry reading into a classified device.
///
/// Enrichment can only add: unset fields never overwrite classifier values,
/// and a chromatic toner level above zero upgrades the color verdict but a
/// zero level never downgrades it.
pub fn apply_enrichment(device: &mut DiscoveredDevice, reading: &TelemetryReading) {
    if let Some(model) = &reading.model {
        device.model = model.clone();
    }
    if let Some(serial) = &reading.serial_number {
        device.serial_number = Some(serial.clone());
    }
    if let Some(location) = &reading.location {
        device.location = Some(location.clone());
    }
    if let Some(level) = reading.toner_black {
        device.toner_black = level;
    }
    if let Some(level) = reading.toner_cyan {
        device.toner_cyan = level;
    }
    if let Some(level) = reading.toner_magenta {
        device.toner_magenta = level;
    }
    if let Some(level) = reading.toner_yellow {
        device.toner_yellow = level;
    }

    if device.has_chromatic_toner() {
        device.has_color = true;
    }
}
