//! Provisioning engine - pushes per-user access configuration onto devices.
//!
//! [`RicohWebClient`] drives one device's admin web UI through its rotating
//! one-time-token protocol; [`Orchestrator`] sequences a user across a batch
//! of devices with busy-retry and aggregates per-device outcomes.

mod orchestrator;
mod payload;
mod retry;
mod session;
mod web_client;

pub use orchestrator::{BatchReport, Orchestrator, ProvisionOutcome, Provisioner};
pub use retry::{Backoff, RetryPolicy};
pub use session::{DeviceSession, SessionStore};
pub use web_client::RicohWebClient;
