//! Subnet range specification for printer sweeps.
//!
//! A `ScanRange` is a validated CIDR range. Validation happens at parse time,
//! before any socket is opened: ranges with more than 256 usable addresses
//! are rejected outright rather than partially scanned.

use crate::error::{ScanError, ScanResult};
use ipnetwork::IpNetwork;
use std::fmt;
use std::net::IpAddr;
use std::str::FromStr;

/// A CIDR range bounded to a size that is sane to sweep.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanRange {
    network: IpNetwork,
}

impl ScanRange {
    /// Maximum number of usable host addresses in a sweepable range (/24).
    pub const MAX_USABLE_HOSTS: u128 = 256;

    /// Parse and validate a CIDR string.
    ///
    /// A bare IP address is accepted as a /32 (or /128) range.
    pub fn parse(s: &str) -> ScanResult<Self> {
        let s = s.trim();

        let network: IpNetwork = if let Ok(ip) = s.parse::<IpAddr>() {
            IpNetwork::new(ip, if ip.is_ipv4() { 32 } else { 128 })
                .map_err(|_| ScanError::InvalidCidr(s.to_string()))?
        } else {
            s.parse()
                .map_err(|_| ScanError::InvalidCidr(s.to_string()))?
        };

        let range = Self { network };
        let count = range.usable_host_count();
        if count > Self::MAX_USABLE_HOSTS {
            return Err(ScanError::InvalidRange {
                count,
                max: Self::MAX_USABLE_HOSTS,
            });
        }

        Ok(range)
    }

    /// Number of host addresses that `expand` would yield.
    pub fn usable_host_count(&self) -> u128 {
        match self.network {
            IpNetwork::V4(net) => {
                let size = net.size() as u128;
                // Network and broadcast addresses are not usable hosts
                if net.prefix() < 31 {
                    size.saturating_sub(2)
                } else {
                    size
                }
            }
            IpNetwork::V6(net) => {
                let prefix = net.prefix() as u32;
                if prefix >= 128 {
                    1
                } else {
                    1u128 << (128 - prefix)
                }
            }
        }
    }

    /// Expand the range into every usable host address.
    ///
    /// For IPv4 prefixes shorter than /31, the network and broadcast
    /// addresses are excluded.
    pub fn expand(&self) -> Vec<IpAddr> {
        self.network
            .iter()
            .filter(|ip| {
                if let (IpNetwork::V4(net), IpAddr::V4(addr)) = (&self.network, ip) {
                    if net.prefix() < 31 {
                        return *addr != net.network() && *addr != net.broadcast();
                    }
                }
                true
            })
            .collect()
    }
}

impl FromStr for ScanRange {
    type Err = ScanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for ScanRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.network)
    }
}
