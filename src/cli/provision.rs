//! Provision subcommand implementation.
//!
//! Handles `printfleet provision --user <payload.json> <device>...`. The
//! payload file is the plain user record handed over by the management
//! layer; the folder password can be injected just-in-time from an
//! environment variable instead of living in the file.

use crate::config::AppSettings;
use crate::error::{CliError, CliResult};
use crate::output;
use crate::provision::{Orchestrator, RetryPolicy, RicohWebClient};
use crate::types::UserPayload;
use clap::Parser;
use std::net::IpAddr;
use std::path::PathBuf;
use std::time::Duration;

/// Provision a user onto a list of devices.
#[derive(Parser, Debug)]
pub struct ProvisionCommand {
    /// Path to the user payload JSON file
    #[arg(short, long, value_name = "PATH")]
    pub user: PathBuf,

    /// Device addresses to provision, in order
    #[arg(value_name = "DEVICE", required = true)]
    pub devices: Vec<IpAddr>,

    /// Read the network folder password from this environment variable
    /// instead of the payload file
    #[arg(long, value_name = "VAR")]
    pub password_env: Option<String>,

    /// Total attempts per busy device
    #[arg(long, default_value = "3")]
    pub retry_attempts: u32,

    /// Delay between attempts in seconds
    #[arg(long, default_value = "5")]
    pub retry_delay: u64,

    /// Print the batch report as JSON
    #[arg(long)]
    pub json: bool,
}

impl ProvisionCommand {
    /// Execute the provision command.
    pub async fn execute(&self, settings: &AppSettings, quiet: bool) -> CliResult<()> {
        let content = std::fs::read_to_string(&self.user)?;
        let mut payload: UserPayload =
            serde_json::from_str(&content).map_err(|e| CliError::Payload(e.to_string()))?;

        if let Some(var) = &self.password_env {
            payload.folder_password = std::env::var(var).map_err(|_| {
                CliError::Other(format!("environment variable '{var}' is not set"))
            })?;
        }

        if !quiet && !self.json {
            output::print_info(&format!(
                "provisioning '{}' to {} device(s)",
                payload.display_name,
                self.devices.len()
            ));
        }

        let client = RicohWebClient::with_timeout(
            &settings.admin_user,
            &settings.admin_password,
            Duration::from_millis(settings.http_timeout_ms),
        );
        let orchestrator = Orchestrator::new(client).with_retry_policy(RetryPolicy::fixed(
            self.retry_attempts,
            Duration::from_secs(self.retry_delay),
        ));

        let report = orchestrator.provision_user(&payload, &self.devices).await;

        if self.json {
            let json = serde_json::to_string_pretty(&report)
                .map_err(|e| CliError::Other(e.to_string()))?;
            println!("{json}");
        } else {
            output::print_batch(&report)?;
        }

        if !report.success {
            return Err(CliError::Other(
                "provisioning failed on every device".to_string(),
            ));
        }

        Ok(())
    }
}
