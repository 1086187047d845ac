//! Batch provisioning of one user across a device list.
//!
//! Devices are provisioned strictly one at a time: each device call is a
//! multi-round-trip stateful flow with rotating tokens, and the devices
//! themselves rate-limit their admin UIs. Determinism wins over throughput
//! here. No outcome from one device can abort the rest of the batch.

use crate::provision::retry::RetryPolicy;
use crate::types::UserPayload;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;
use std::net::IpAddr;

/// Terminal result of provisioning one device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProvisionOutcome {
    /// The device accepted the user entry.
    Success,
    /// The device admin UI is held by another session; transient.
    Busy,
    /// Terminal failure with a human-readable reason.
    Failure(String),
}

impl fmt::Display for ProvisionOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Success => write!(f, "success"),
            Self::Busy => write!(f, "device busy"),
            Self::Failure(reason) => write!(f, "{reason}"),
        }
    }
}

/// Anything that can push one user onto one device.
///
/// [`RicohWebClient`](crate::provision::RicohWebClient) is the production
/// implementation; tests substitute scripted ones.
#[async_trait]
pub trait Provisioner: Send + Sync {
    async fn provision_user(&self, address: IpAddr, user: &UserPayload) -> ProvisionOutcome;
}

/// Aggregate result of one user's batch, consumed by the management layer
/// to create assignment records and render messages.
#[derive(Debug, Clone, Serialize)]
pub struct BatchReport {
    /// True when at least one device succeeded; partial success is still
    /// success at the batch level, detail stays in `errors`.
    pub success: bool,
    pub user_name: String,
    /// Devices attempted.
    pub attempted: usize,
    /// Devices that accepted the user.
    pub succeeded: usize,
    /// Addresses that succeeded, in attempt order.
    pub succeeded_devices: Vec<IpAddr>,
    /// One formatted entry per device that did not succeed.
    pub errors: Vec<String>,
    pub provisioned_at: DateTime<Utc>,
}

/// Sequences provisioning of one user across N devices with busy-retry.
#[derive(Debug)]
pub struct Orchestrator<P> {
    client: P,
    retry: RetryPolicy,
}

impl<P: Provisioner> Orchestrator<P> {
    /// Create an orchestrator with the default busy-retry policy.
    pub fn new(client: P) -> Self {
        Self {
            client,
            retry: RetryPolicy::default(),
        }
    }

    /// Substitute the retry policy.
    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Provision `user` onto every device, independently and sequentially.
    ///
    /// The orchestrator persists nothing; on success the caller owns
    /// recording the assignment.
    pub async fn provision_user(&self, user: &UserPayload, devices: &[IpAddr]) -> BatchReport {
        let mut succeeded_devices = Vec::new();
        let mut errors = Vec::new();

        tracing::info!(
            user = %user.display_name,
            devices = devices.len(),
            "starting provisioning batch"
        );

        for &address in devices {
            match self.provision_device(address, user).await {
                ProvisionOutcome::Success => succeeded_devices.push(address),
                ProvisionOutcome::Busy => errors.push(format!(
                    "{address}: device busy after {} attempts",
                    self.retry.max_attempts()
                )),
                ProvisionOutcome::Failure(reason) => errors.push(format!("{address}: {reason}")),
            }
        }

        let succeeded = succeeded_devices.len();
        tracing::info!(
            user = %user.display_name,
            succeeded,
            failed = errors.len(),
            "provisioning batch finished"
        );

        BatchReport {
            success: succeeded > 0,
            user_name: user.display_name.clone(),
            attempted: devices.len(),
            succeeded,
            succeeded_devices,
            errors,
            provisioned_at: Utc::now(),
        }
    }

    /// Drive one device to a terminal outcome under the retry policy.
    async fn provision_device(&self, address: IpAddr, user: &UserPayload) -> ProvisionOutcome {
        let mut attempt = 1u32;
        loop {
            let outcome = self.client.provision_user(address, user).await;

            if self.retry.retryable(&outcome) && attempt < self.retry.max_attempts() {
                let delay = self.retry.delay_after(attempt);
                tracing::info!(
                    %address,
                    attempt,
                    max_attempts = self.retry.max_attempts(),
                    delay_ms = delay.as_millis() as u64,
                    "device busy, waiting before retry"
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
                continue;
            }

            break outcome;
        }
    }
}
