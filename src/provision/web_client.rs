//! Browser-emulating protocol client for the device admin web UI.
//!
//! Ricoh-class devices expose user administration only through their
//! embedded web server, guarded by a rotating one-time token (`wimToken`)
//! embedded in every page. Provisioning a user therefore drives the UI the
//! way a browser would:
//!
//! ```text
//! UNAUTHENTICATED -> AUTHENTICATING -> AUTHENTICATED
//!     -> list-page token -> add-user form (fresh token + slot index)
//!     -> submission -> SUCCESS | BUSY | FAILURE
//! ```
//!
//! Tokens rotate per page load and are single-use: every submission must
//! carry the token from the page fetched immediately before it, never an
//! earlier one.

use crate::error::{ProvisionError, ProvisionResult};
use crate::provision::orchestrator::{ProvisionOutcome, Provisioner};
use crate::provision::payload::build_submission;
use crate::provision::session::{DeviceSession, SessionStore};
use crate::types::UserPayload;
use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use regex::Regex;
use reqwest::StatusCode;
use std::net::IpAddr;
use std::sync::OnceLock;
use std::time::Duration;

// Fixed path templates on the device's embedded web server.
const AUTH_FORM_PATH: &str = "web/guest/es/websys/webArch/authForm.cgi";
const LOGIN_PATH: &str = "web/guest/es/websys/webArch/login.cgi";
const ADDRESS_LIST_PATH: &str = "web/entry/es/address/adrsList.cgi";
const ADD_USER_FORM_PATH: &str = "web/entry/es/address/adrsGetUser.cgi";
const SET_USER_PATH: &str = "web/entry/es/address/adrsSetUser.cgi";

/// Body markers for a dead admin session. The device answers 200 either way.
const SESSION_TIMEOUT_MARKERS: &[&str] = &["Tiempo de sesi\u{f3}n agotado", "TIMEOUT"];
/// Body markers for "the panel or another session holds the address book".
const BUSY_MARKERS: &[&str] = &["BUSY", "est\u{e1} siendo utilizado"];

fn token_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#"name="wimToken"\s+value="(\d+)""#).unwrap())
}

fn entry_index_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#"name="entryIndexIn"\s+value="(\d{5})""#).unwrap())
}

/// Scrape the one-time token from a device page.
pub(crate) fn extract_token(body: &str) -> Option<String> {
    token_pattern()
        .captures(body)
        .map(|caps| caps[1].to_string())
}

/// Scrape the device-assigned address book slot from the add-user form.
pub(crate) fn extract_entry_index(body: &str) -> Option<String> {
    entry_index_pattern()
        .captures(body)
        .map(|caps| caps[1].to_string())
}

fn snippet(body: &str) -> String {
    body.chars().take(200).collect()
}

/// Token and slot index scraped from the add-user form.
struct AddUserForm {
    token: String,
    entry_index: String,
}

/// Stateful client provisioning users through a device's admin web UI.
///
/// Holds one [`SessionStore`] for its lifetime, so repeated calls to the
/// same device skip re-authentication.
#[derive(Debug)]
pub struct RicohWebClient {
    admin_user: String,
    admin_password: String,
    http_port: u16,
    sessions: SessionStore,
}

impl RicohWebClient {
    /// Default per-request timeout against a device.
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

    /// Create a client using the given administrator credentials.
    pub fn new(admin_user: impl Into<String>, admin_password: impl Into<String>) -> Self {
        Self::with_timeout(admin_user, admin_password, Self::DEFAULT_TIMEOUT)
    }

    /// Create a client with a specific per-request timeout.
    pub fn with_timeout(
        admin_user: impl Into<String>,
        admin_password: impl Into<String>,
        timeout: Duration,
    ) -> Self {
        Self {
            admin_user: admin_user.into(),
            admin_password: admin_password.into(),
            http_port: 80,
            sessions: SessionStore::new(timeout),
        }
    }

    /// Override the device web server port (embedded servers occasionally
    /// sit behind a forwarder; tests use this too).
    pub fn with_http_port(mut self, port: u16) -> Self {
        self.http_port = port;
        self
    }

    fn url(&self, address: IpAddr, path: &str) -> String {
        if self.http_port == 80 {
            format!("http://{address}/{path}")
        } else {
            format!("http://{}:{}/{path}", address, self.http_port)
        }
    }

    /// Provision one user onto one device.
    ///
    /// Never panics or propagates a raw fault: every failure mode collapses
    /// into an outcome, and a failure on this device cannot disturb cached
    /// sessions for other devices.
    pub async fn provision_user(&self, address: IpAddr, user: &UserPayload) -> ProvisionOutcome {
        match self.drive(address, user).await {
            Ok(outcome) => outcome,
            Err(e) => {
                tracing::warn!(%address, error = %e, "provisioning failed");
                ProvisionOutcome::Failure(e.to_string())
            }
        }
    }

    /// Check whether the device web interface answers at all.
    pub async fn test_connection(&self, address: IpAddr) -> bool {
        let Ok(entry) = self.sessions.entry(address) else {
            return false;
        };
        let session = entry.lock().await;
        match session.client.get(self.url(address, "")).send().await {
            Ok(resp) => resp.status() == StatusCode::OK,
            Err(_) => false,
        }
    }

    /// Run the full state machine for one device call.
    async fn drive(
        &self,
        address: IpAddr,
        user: &UserPayload,
    ) -> ProvisionResult<ProvisionOutcome> {
        let entry = self.sessions.entry(address)?;
        let mut session = entry.lock().await;

        self.authenticate(address, &mut session).await?;
        let list_token = self.fetch_list_token(address, &session).await?;
        let form = self.fetch_add_user_form(address, &session, &list_token).await?;
        self.submit(address, &mut session, user, form).await
    }

    /// Ensure the session is authenticated, logging in if the device
    /// challenges us. A cached live session performs zero HTTP calls.
    async fn authenticate(
        &self,
        address: IpAddr,
        session: &mut DeviceSession,
    ) -> ProvisionResult<()> {
        if session.authenticated {
            tracing::debug!(%address, "reusing cached device session");
            return Ok(());
        }

        // Probe a protected page; some devices serve it without any login
        let list_url = self.url(address, ADDRESS_LIST_PATH);
        let probe = session.client.get(&list_url).send().await?;
        if probe.status() == StatusCode::OK {
            let body = probe.text().await?;
            if extract_token(&body).is_some() {
                tracing::debug!(%address, "device requires no authentication");
                session.authenticated = true;
                return Ok(());
            }
        }

        tracing::info!(%address, user = %self.admin_user, "authenticating against device");
        let login_page = session
            .client
            .get(self.url(address, AUTH_FORM_PATH))
            .send()
            .await?;
        let body = login_page.text().await?;
        let login_token = extract_token(&body).ok_or_else(|| {
            tracing::error!(%address, body = %snippet(&body), "login page has no token");
            ProvisionError::TokenNotFound {
                page: "login page",
                snippet: snippet(&body),
            }
        })?;

        let password = if self.admin_password.is_empty() {
            String::new()
        } else {
            BASE64.encode(&self.admin_password)
        };
        let login_form = [
            ("wimToken", login_token),
            ("userid_work", String::new()),
            ("userid", BASE64.encode(&self.admin_user)),
            ("password_work", String::new()),
            ("password", password),
            ("open", String::new()),
        ];
        session
            .client
            .post(self.url(address, LOGIN_PATH))
            .form(&login_form)
            .send()
            .await?;

        // Confirm by re-probing the protected page for a token
        let verify = session.client.get(&list_url).send().await?;
        let status = verify.status();
        let body = verify.text().await?;
        if status == StatusCode::OK && extract_token(&body).is_some() {
            tracing::debug!(%address, "authentication succeeded");
            session.authenticated = true;
            Ok(())
        } else {
            Err(ProvisionError::AuthenticationFailed(format!(
                "device rejected administrator credentials (status {status})"
            )))
        }
    }

    /// Fetch the address list page and scrape its token.
    async fn fetch_list_token(
        &self,
        address: IpAddr,
        session: &DeviceSession,
    ) -> ProvisionResult<String> {
        let resp = session
            .client
            .get(self.url(address, ADDRESS_LIST_PATH))
            .send()
            .await?;
        if resp.status() != StatusCode::OK {
            return Err(ProvisionError::UnexpectedStatus(resp.status().as_u16()));
        }

        let body = resp.text().await?;
        extract_token(&body).ok_or_else(|| {
            tracing::error!(%address, body = %snippet(&body), "address list has no token");
            ProvisionError::TokenNotFound {
                page: "address list",
                snippet: snippet(&body),
            }
        })
    }

    /// Begin an add-user transaction. The device answers with a freshly
    /// rotated token and usually a pre-assigned slot index.
    async fn fetch_add_user_form(
        &self,
        address: IpAddr,
        session: &DeviceSession,
        list_token: &str,
    ) -> ProvisionResult<AddUserForm> {
        let resp = session
            .client
            .post(self.url(address, ADD_USER_FORM_PATH))
            .form(&[
                ("mode", "ADDUSER"),
                ("outputSpecifyModeIn", "DEFAULT"),
                ("wimToken", list_token),
            ])
            .send()
            .await?;
        if resp.status() != StatusCode::OK {
            return Err(ProvisionError::UnexpectedStatus(resp.status().as_u16()));
        }

        let body = resp.text().await?;
        let token = extract_token(&body).ok_or_else(|| {
            tracing::error!(%address, body = %snippet(&body), "add-user form has no token");
            ProvisionError::TokenNotFound {
                page: "add-user form",
                snippet: snippet(&body),
            }
        })?;

        // Missing index is not fatal; the device assigns one on submit
        let entry_index = extract_entry_index(&body).unwrap_or_default();
        tracing::debug!(%address, entry_index = %entry_index, "add-user form fetched");

        Ok(AddUserForm { token, entry_index })
    }

    /// Submit the user entry and interpret the device's answer.
    async fn submit(
        &self,
        address: IpAddr,
        session: &mut DeviceSession,
        user: &UserPayload,
        form: AddUserForm,
    ) -> ProvisionResult<ProvisionOutcome> {
        let fields = build_submission(user, &form.token, &form.entry_index);

        // The device UI distinguishes interactive form posts from plain
        // API calls; mark the request the way its own JavaScript does
        let resp = session
            .client
            .post(self.url(address, SET_USER_PATH))
            .header("X-Requested-With", "XMLHttpRequest")
            .header(reqwest::header::REFERER, self.url(address, ADDRESS_LIST_PATH))
            .form(&fields)
            .send()
            .await?;

        let status = resp.status();
        let body = resp.text().await?;

        if SESSION_TIMEOUT_MARKERS.iter().any(|m| body.contains(m)) {
            session.invalidate();
            return Err(ProvisionError::SessionTimeout);
        }
        if BUSY_MARKERS.iter().any(|m| body.contains(m)) {
            tracing::info!(%address, "device busy");
            return Ok(ProvisionOutcome::Busy);
        }
        if status.is_success() || status.is_redirection() {
            tracing::info!(%address, user = %user.display_name, "user provisioned");
            Ok(ProvisionOutcome::Success)
        } else {
            Err(ProvisionError::UnexpectedStatus(status.as_u16()))
        }
    }
}

#[async_trait]
impl Provisioner for RicohWebClient {
    async fn provision_user(&self, address: IpAddr, user: &UserPayload) -> ProvisionOutcome {
        RicohWebClient::provision_user(self, address, user).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_token() {
        let body = r#"<input type="hidden" name="wimToken" value="1967121800">"#;
        assert_eq!(extract_token(body).as_deref(), Some("1967121800"));
    }

    #[test]
    fn test_extract_token_ignores_non_numeric() {
        let body = r#"<input name="wimToken" value="abcdef">"#;
        assert_eq!(extract_token(body), None);
    }

    #[test]
    fn test_extract_token_missing() {
        assert_eq!(extract_token("<html>login required</html>"), None);
    }

    #[test]
    fn test_extract_entry_index() {
        let body = r#"<input type="hidden" name="entryIndexIn" value="00012">"#;
        assert_eq!(extract_entry_index(body).as_deref(), Some("00012"));
    }

    #[test]
    fn test_extract_entry_index_requires_fixed_width() {
        let body = r#"<input name="entryIndexIn" value="12">"#;
        assert_eq!(extract_entry_index(body), None);
    }

    #[test]
    fn test_url_omits_default_port() {
        let client = RicohWebClient::new("admin", "");
        let address: IpAddr = "192.168.1.10".parse().unwrap();
        assert_eq!(
            client.url(address, ADDRESS_LIST_PATH),
            "http://192.168.1.10/web/entry/es/address/adrsList.cgi"
        );

        let client = client.with_http_port(8080);
        assert!(client
            .url(address, ADDRESS_LIST_PATH)
            .starts_with("http://192.168.1.10:8080/"));
    }
}
