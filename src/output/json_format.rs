//! JSON output formatting.

use crate::scanner::SweepReport;
use std::io;

/// Print a sweep report as pretty JSON.
pub fn print_json(report: &SweepReport) -> io::Result<()> {
    let json = serde_json::to_string_pretty(report)?;
    println!("{json}");
    Ok(())
}
