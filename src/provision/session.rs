//! Per-device session cache.
//!
//! Each device gets its own HTTP client with its own cookie jar, plus a flag
//! recording whether the admin session behind those cookies is live. The
//! store is owned by the protocol client instance rather than living in a
//! process-wide global, so tests can run independent clients side by side.
//!
//! Sessions exist only for the life of the process; nothing is persisted.

use crate::error::ProvisionResult;
use std::collections::HashMap;
use std::net::IpAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Authentication state for one device.
#[derive(Debug, Clone)]
pub struct DeviceSession {
    /// Client holding the device's session cookies.
    pub client: reqwest::Client,
    /// Whether the cookies represent a live admin session.
    pub authenticated: bool,
}

impl DeviceSession {
    /// Mark the session dead. The next call re-authenticates from scratch.
    pub fn invalidate(&mut self) {
        self.authenticated = false;
    }
}

/// Map of device address to session, with per-entry mutual exclusion.
///
/// The outer lock only guards map access; callers hold an entry's own mutex
/// for the duration of a device flow, so concurrent batches touching the
/// same device serialize without blocking unrelated devices.
#[derive(Debug)]
pub struct SessionStore {
    timeout: Duration,
    entries: Mutex<HashMap<IpAddr, Arc<tokio::sync::Mutex<DeviceSession>>>>,
}

impl SessionStore {
    /// Create an empty store; `timeout` applies to every request made
    /// through the sessions it builds.
    pub fn new(timeout: Duration) -> Self {
        Self {
            timeout,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Get or create the session entry for a device.
    pub fn entry(&self, address: IpAddr) -> ProvisionResult<Arc<tokio::sync::Mutex<DeviceSession>>> {
        let mut entries = self.entries.lock().unwrap();
        if let Some(entry) = entries.get(&address) {
            return Ok(Arc::clone(entry));
        }

        let session = DeviceSession {
            client: build_client(self.timeout)?,
            authenticated: false,
        };
        let entry = Arc::new(tokio::sync::Mutex::new(session));
        entries.insert(address, Arc::clone(&entry));
        Ok(entry)
    }

    /// Number of cached device sessions.
    pub fn len(&self) -> usize {
        self.entries.lock().unwrap().len()
    }

    /// True when no session has been cached yet.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Build a client suitable for a device's embedded web server: cookie jar
/// for the session, no redirect following (the outcome interpreter needs to
/// see 3xx statuses), and tolerance for the self-signed certificates these
/// devices ship with.
fn build_client(timeout: Duration) -> reqwest::Result<reqwest::Client> {
    reqwest::Client::builder()
        .cookie_store(true)
        .timeout(timeout)
        .redirect(reqwest::redirect::Policy::none())
        .danger_accept_invalid_certs(true)
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_is_cached_per_address() {
        let store = SessionStore::new(Duration::from_secs(5));
        let a: IpAddr = "192.168.1.10".parse().unwrap();
        let b: IpAddr = "192.168.1.11".parse().unwrap();

        let first = store.entry(a).unwrap();
        let again = store.entry(a).unwrap();
        let other = store.entry(b).unwrap();

        assert!(Arc::ptr_eq(&first, &again));
        assert!(!Arc::ptr_eq(&first, &other));
        assert_eq!(store.len(), 2);
    }

    #[tokio::test]
    async fn test_new_sessions_start_unauthenticated() {
        let store = SessionStore::new(Duration::from_secs(5));
        let entry = store.entry("10.0.0.1".parse().unwrap()).unwrap();
        let mut session = entry.lock().await;
        assert!(!session.authenticated);

        session.authenticated = true;
        session.invalidate();
        assert!(!session.authenticated);
    }
}
