//! # printfleet - Printer Fleet Discovery & Provisioning
//!
//! printfleet manages a fleet of network-attached multifunction printers:
//! it discovers them on a LAN and pushes per-user access configuration onto
//! each device by driving its administrative web interface.
//!
//! ## Features
//!
//! - **Subnet discovery**: bounded-concurrency sweeps classifying hosts as
//!   printers from port probes and reverse DNS, no vendor protocol needed
//! - **Browser-emulated provisioning**: per-device authenticated sessions,
//!   one-time anti-forgery token handling, busy-retry with backoff
//! - **Partial-failure tolerance**: every device gets an independent
//!   outcome; one failing device never aborts a batch
//! - **Optional telemetry enrichment**: pluggable per-device consumable and
//!   model lookup that degrades silently when unavailable
//!
//! ## Example Usage
//!
//! ```rust,ignore
//! use printfleet::scanner::{run_sweep, SweepConfig};
//! use printfleet::types::ScanRange;
//!
//! #[tokio::main]
//! async fn main() {
//!     let range = ScanRange::parse("192.168.1.0/24").unwrap();
//!     let report = run_sweep(SweepConfig::new(range), None).await.unwrap();
//!
//!     for device in &report.devices {
//!         println!("{} {} ({})", device.address, device.hostname, device.model);
//!     }
//! }
//! ```
//!
//! ## Architecture
//!
//! The library is organized into several modules:
//!
//! - [`types`] - Core data model: ranges, devices, user payloads
//! - [`scanner`] - Port probing, classification, and the sweep driver
//! - [`provision`] - Protocol client, session cache, and batch orchestrator
//! - [`config`] - Settings and administrator credentials
//! - [`error`] - Per-concern error types
//! - [`output`] - Output formatting utilities

pub mod cli;
pub mod config;
pub mod error;
pub mod output;
pub mod provision;
pub mod scanner;
pub mod types;

// Re-export commonly used types
pub use error::{CliError, ProvisionError, ScanError};
pub use provision::{
    BatchReport, Orchestrator, ProvisionOutcome, Provisioner, RetryPolicy, RicohWebClient,
};
pub use scanner::{run_sweep, SweepConfig, SweepReport, TelemetryEnricher};
pub use types::{DiscoveredDevice, ScanRange, UserPayload};
