//! CSV output formatting.

use crate::scanner::SweepReport;
use std::io;

/// Print discovered devices as CSV on stdout.
pub fn print_csv(report: &SweepReport) -> io::Result<()> {
    let mut writer = csv::Writer::from_writer(io::stdout());

    writer.write_record([
        "address",
        "hostname",
        "model",
        "has_color",
        "has_scanner",
        "has_fax",
        "toner_black",
        "toner_cyan",
        "toner_magenta",
        "toner_yellow",
        "serial_number",
        "location",
    ])?;

    for device in &report.devices {
        writer.write_record([
            device.address.to_string(),
            device.hostname.clone(),
            device.model.clone(),
            device.has_color.to_string(),
            device.has_scanner.to_string(),
            device.has_fax.to_string(),
            device.toner_black.to_string(),
            device.toner_cyan.to_string(),
            device.toner_magenta.to_string(),
            device.toner_yellow.to_string(),
            device.serial_number.clone().unwrap_or_default(),
            device.location.clone().unwrap_or_default(),
        ])?;
    }

    writer.flush()
}
