//! Plain text output formatting.
//!
//! Produces human-readable output with colors and formatting.

use crate::provision::BatchReport;
use crate::scanner::SweepReport;
use console::style;
use std::io::{self, Write};

const RULE: &str = "───────────────────────────────────────────────────────────────";
const DOUBLE_RULE: &str = "═══════════════════════════════════════════════════════════════";

/// Print a sweep report in human-readable plain text format.
pub fn print_sweep(report: &SweepReport) -> io::Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();

    writeln!(out)?;
    writeln!(out, "{}", style(DOUBLE_RULE).cyan())?;
    writeln!(
        out,
        "                    {} Discovery Results",
        style("printfleet").cyan().bold()
    )?;
    writeln!(out, "{}", style(DOUBLE_RULE).cyan())?;
    writeln!(out)?;

    writeln!(out, "  {} {}", style("Range:").bold(), report.range)?;
    writeln!(
        out,
        "  {} {}",
        style("Sweep ID:").bold(),
        style(report.id.short()).dim()
    )?;
    writeln!(
        out,
        "  {} {} addresses surveyed in {:.2}s, {} printers found",
        style("Statistics:").bold(),
        report.attempted,
        report.duration_ms as f64 / 1000.0,
        style(report.matched).green().bold()
    )?;
    writeln!(out)?;

    if report.devices.is_empty() {
        writeln!(out, "  {}", style("No printers discovered.").dim())?;
    } else {
        writeln!(out, "  {}", style(RULE).dim())?;
        writeln!(
            out,
            "  {:<16}  {:<24}  {:<26}  {}",
            style("ADDRESS").bold(),
            style("HOSTNAME").bold(),
            style("MODEL").bold(),
            style("CAPABILITIES").bold()
        )?;
        writeln!(out, "  {}", style(RULE).dim())?;

        for device in &report.devices {
            let mut caps = Vec::new();
            if device.has_color {
                caps.push("color");
            }
            if device.has_scanner {
                caps.push("scan");
            }
            if device.has_fax {
                caps.push("fax");
            }

            writeln!(
                out,
                "  {:<16}  {:<24}  {:<26}  {}",
                device.address,
                truncate_string(&device.hostname, 24),
                truncate_string(&device.model, 26),
                style(caps.join(",")).dim()
            )?;
        }

        writeln!(out, "  {}", style(RULE).dim())?;
    }

    writeln!(out)?;
    Ok(())
}

/// Print a sweep header before surveying begins.
pub fn print_sweep_header(range: &str, attempted: usize, concurrency: usize) {
    println!();
    println!(
        "{} {} v{}",
        style("Starting").cyan(),
        style("printfleet").cyan().bold(),
        env!("CARGO_PKG_VERSION")
    );
    println!("{} Range: {}", style("•").dim(), style(range).white().bold());
    println!(
        "{} Surveying {} addresses ({} concurrent)...",
        style("•").dim(),
        style(attempted).white().bold(),
        concurrency
    );
    println!();
}

/// Print a batch provisioning report.
pub fn print_batch(report: &BatchReport) -> io::Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();

    writeln!(out)?;
    writeln!(
        out,
        "  {} user '{}' provisioned to {}/{} device(s)",
        if report.success {
            style("✓").green().bold()
        } else {
            style("✗").red().bold()
        },
        report.user_name,
        style(report.succeeded).green().bold(),
        report.attempted
    )?;

    for address in &report.succeeded_devices {
        writeln!(out, "    {} {}", style("✓").green(), address)?;
    }
    for error in &report.errors {
        writeln!(out, "    {} {}", style("✗").red(), error)?;
    }

    writeln!(out)?;
    Ok(())
}

/// Print an error message.
pub fn print_error(msg: &str) {
    eprintln!("{} {}", style("Error:").red().bold(), msg);
}

/// Print a warning message.
pub fn print_warning(msg: &str) {
    eprintln!("{} {}", style("Warning:").yellow().bold(), msg);
}

/// Print a success message.
pub fn print_success(msg: &str) {
    println!("{} {}", style("✓").green().bold(), msg);
}

/// Print an info message.
pub fn print_info(msg: &str) {
    println!("{} {}", style("ℹ").blue().bold(), msg);
}

/// Truncate a string to a maximum length, adding ellipsis if truncated.
fn truncate_string(s: &str, max_len: usize) -> String {
    if s.len() <= max_len {
        s.to_string()
    } else {
        format!("{}...", &s[..max_len.saturating_sub(3)])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_string() {
        assert_eq!(truncate_string("hello", 10), "hello");
        assert_eq!(truncate_string("hello world", 8), "hello...");
    }
}
