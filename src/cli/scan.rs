//! Scan subcommand implementation.
//!
//! Handles the `printfleet scan <range>` command for printer discovery.

use crate::cli::OutputFormat;
use crate::config::AppSettings;
use crate::error::CliResult;
use crate::output;
use crate::scanner::{run_sweep, SweepConfig};
use crate::types::ScanRange;
use clap::Parser;
use std::time::Duration;

/// Sweep a subnet for printers.
#[derive(Parser, Debug)]
pub struct ScanCommand {
    /// Range to sweep in CIDR notation (at most 256 usable addresses)
    ///
    /// Examples:
    ///   192.168.1.0/24     Whole office subnet
    ///   192.168.1.10       Single address
    #[arg(value_name = "RANGE")]
    pub range: String,

    /// Maximum number of concurrent address surveys
    #[arg(short = 'c', long)]
    pub concurrency: Option<usize>,

    /// Per-probe connect timeout in milliseconds
    #[arg(short = 't', long)]
    pub timeout: Option<u64>,

    /// Survey rate limit per second (0 = unlimited)
    #[arg(short = 'r', long = "rate")]
    pub rate_limit: Option<u32>,

    /// Output format for results
    #[arg(short, long, value_enum)]
    pub output: Option<OutputFormat>,
}

impl ScanCommand {
    /// Execute the scan command.
    pub async fn execute(
        &self,
        settings: &AppSettings,
        verbose: bool,
        quiet: bool,
    ) -> CliResult<()> {
        // Range validation happens here, before any socket is opened
        let range = ScanRange::parse(&self.range)?;

        let concurrency = self.concurrency.unwrap_or(settings.default_concurrency);
        let timeout_ms = self.timeout.unwrap_or(settings.default_probe_timeout_ms);
        let rate_limit = self.rate_limit.unwrap_or(settings.default_rate_limit);
        let format = self.output.unwrap_or_else(|| {
            settings
                .default_output_format
                .parse()
                .unwrap_or(OutputFormat::Plain)
        });

        if !quiet && format == OutputFormat::Plain {
            output::print_sweep_header(&self.range, range.usable_host_count() as usize, concurrency);
        }

        let config = SweepConfig::new(range)
            .with_concurrency(concurrency)
            .with_probe_timeout(Duration::from_millis(timeout_ms))
            .with_rate_limit(rate_limit);
        let config = if verbose { config.with_verbose() } else { config };

        // No telemetry enricher is wired up: the SNMP path is disabled, so
        // devices keep classifier defaults
        let report = run_sweep(config, None).await?;

        output::print_sweep(&report, format)?;

        Ok(())
    }
}
