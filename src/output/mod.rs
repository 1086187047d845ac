//! Output formatting utilities.
//!
//! Sweep reports render as plain text, JSON, or CSV; batch provisioning
//! reports render as plain text or JSON.

mod csv_format;
mod json_format;
mod plain;

use crate::cli::OutputFormat;
use crate::scanner::SweepReport;
use std::io;

pub use plain::{
    print_batch, print_error, print_info, print_success, print_sweep_header, print_warning,
};

/// Format and print a sweep report.
pub fn print_sweep(report: &SweepReport, format: OutputFormat) -> io::Result<()> {
    match format {
        OutputFormat::Plain => plain::print_sweep(report),
        OutputFormat::Json => json_format::print_json(report),
        OutputFormat::Csv => csv_format::print_csv(report),
    }
}
