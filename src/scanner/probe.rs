//! TCP connect probing and reverse DNS resolution.
//!
//! The probe is connect-only: the socket is dropped as soon as the outcome
//! is known, and nothing is ever written to the peer. Refusal, timeout, and
//! unreachable hosts all collapse into "closed" — at the probe level an
//! unreachable port is a negative signal, not an error.

use std::net::{IpAddr, SocketAddr};
use std::time::Duration;
use tokio::net::TcpStream;
use tokio::time::timeout;
use trust_dns_resolver::TokioAsyncResolver;

/// Embedded web interface.
pub const PORT_HTTP: u16 = 80;
/// Embedded web interface over TLS.
pub const PORT_HTTPS: u16 = 443;
/// SNMP management.
pub const PORT_SNMP: u16 = 161;
/// Raw print spooler (JetDirect). Openness is a strong printer signal.
pub const PORT_RAW_PRINT: u16 = 9100;

/// Everything one address survey learned about a host.
///
/// Owned exclusively by the classifier that consumes it.
#[derive(Debug, Clone)]
pub struct ProbeResult {
    pub address: IpAddr,
    pub http: bool,
    pub https: bool,
    pub snmp: bool,
    pub raw_print: bool,
    /// Reverse DNS name, without the trailing dot, when one resolved.
    pub hostname: Option<String>,
}

impl ProbeResult {
    /// True when the embedded web interface answered on either port.
    pub fn web_reachable(&self) -> bool {
        self.http || self.https
    }
}

/// Attempt a TCP connect to `address:port` within `probe_timeout`.
///
/// Returns `true` only for a completed handshake. The connection is closed
/// immediately; no data is exchanged.
pub async fn probe_port(address: IpAddr, port: u16, probe_timeout: Duration) -> bool {
    let addr = SocketAddr::new(address, port);
    matches!(timeout(probe_timeout, TcpStream::connect(addr)).await, Ok(Ok(_)))
}

/// Resolve the PTR record for an address.
///
/// Any resolver failure (no record, NXDOMAIN, server timeout) yields `None`.
pub async fn resolve_hostname(resolver: &TokioAsyncResolver, address: IpAddr) -> Option<String> {
    match resolver.reverse_lookup(address).await {
        Ok(lookup) => lookup
            .iter()
            .next()
            .map(|ptr| ptr.to_string().trim_end_matches('.').to_string()),
        Err(e) => {
            tracing::trace!(%address, error = %e, "reverse lookup failed");
            None
        }
    }
}

/// Survey one address: all four port probes and the hostname lookup run
/// concurrently with each other.
pub async fn survey(
    resolver: &TokioAsyncResolver,
    address: IpAddr,
    probe_timeout: Duration,
) -> ProbeResult {
    let (http, https, snmp, raw_print, hostname) = tokio::join!(
        probe_port(address, PORT_HTTP, probe_timeout),
        probe_port(address, PORT_HTTPS, probe_timeout),
        probe_port(address, PORT_SNMP, probe_timeout),
        probe_port(address, PORT_RAW_PRINT, probe_timeout),
        resolve_hostname(resolver, address),
    );

    ProbeResult {
        address,
        http,
        https,
        snmp,
        raw_print,
        hostname,
    }
}
