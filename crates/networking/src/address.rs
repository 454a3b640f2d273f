//! IP address + port value, stored IPv6-style with IPv4 mapped into it.

use std::fmt;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr};
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::AddressError;

/// Bytes 0..12 of an IPv4-mapped IPv6 address (`::ffff:0:0/96`).
const IPV4_MAPPED_PREFIX: [u8; 12] = [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0xff, 0xff];

const IPV6_LOCALHOST: [u8; 16] = [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1];

/// An IP address and port.
///
/// IPv4 addresses live in the last four bytes of an IPv4-mapped IPv6 address,
/// so every value is 16 address bytes plus a port. The cleared value is all
/// zeros with port 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct IpAddress {
    ipv6: [u8; 16],
    port: u16,
}

impl IpAddress {
    /// The all-zero address, port 0.
    pub const fn cleared() -> Self {
        Self {
            ipv6: [0; 16],
            port: 0,
        }
    }

    /// Stores a host-byte-order IPv4 address as mapped IPv6.
    pub fn from_ipv4(ip: u32, port: u16) -> Self {
        let mut ipv6 = [0u8; 16];
        ipv6[..12].copy_from_slice(&IPV4_MAPPED_PREFIX);
        ipv6[12..].copy_from_slice(&ip.to_be_bytes());
        Self { ipv6, port }
    }

    /// Stores raw network-order IPv6 bytes.
    pub const fn from_ipv6(ipv6: [u8; 16], port: u16) -> Self {
        Self { ipv6, port }
    }

    pub const fn ipv6_localhost(port: u16) -> Self {
        Self {
            ipv6: IPV6_LOCALHOST,
            port,
        }
    }

    /// Integer-to-address conversion: 0 yields the cleared address, anything
    /// else an IPv4 address with port 0.
    pub fn from_ipv4_int(ip: u32) -> Self {
        if ip == 0 {
            Self::cleared()
        } else {
            Self::from_ipv4(ip, 0)
        }
    }

    pub fn clear(&mut self) {
        *self = Self::cleared();
    }

    pub const fn port(&self) -> u16 {
        self.port
    }

    pub const fn ipv6_bytes(&self) -> [u8; 16] {
        self.ipv6
    }

    pub fn is_ipv4(&self) -> bool {
        self.ipv6[..12] == IPV4_MAPPED_PREFIX
    }

    /// The host-byte-order IPv4 value, if this is an IPv4-mapped address.
    pub fn ipv4(&self) -> Option<u32> {
        if !self.is_ipv4() {
            return None;
        }
        let [a, b, c, d] = [self.ipv6[12], self.ipv6[13], self.ipv6[14], self.ipv6[15]];
        Some(u32::from_be_bytes([a, b, c, d]))
    }

    /// True when all sixteen address bytes are zero. The port is ignored.
    pub fn is_all_zero(&self) -> bool {
        self.ipv6.iter().all(|b| *b == 0)
    }

    /// `::1` or mapped `127.0.0.1`.
    pub fn is_localhost(&self) -> bool {
        self.ipv6 == IPV6_LOCALHOST || self.ipv4() == Some(u32::from(Ipv4Addr::LOCALHOST))
    }

    pub fn ip_addr(&self) -> IpAddr {
        match self.ipv4() {
            Some(v4) => IpAddr::V4(Ipv4Addr::from(v4)),
            None => IpAddr::V6(Ipv6Addr::from(self.ipv6)),
        }
    }

    /// Canonical text: dotted decimal for IPv4, RFC 5952 for IPv6. With a
    /// port, IPv6 is bracketed (`[::1]:80`).
    pub fn to_string_with_port(&self, with_port: bool) -> String {
        match (self.ip_addr(), with_port) {
            (IpAddr::V4(v4), true) => format!("{v4}:{}", self.port),
            (IpAddr::V4(v4), false) => v4.to_string(),
            (IpAddr::V6(v6), true) => format!("[{v6}]:{}", self.port),
            (IpAddr::V6(v6), false) => v6.to_string(),
        }
    }
}

impl From<SocketAddr> for IpAddress {
    fn from(addr: SocketAddr) -> Self {
        match addr {
            SocketAddr::V4(v4) => Self::from_ipv4(u32::from(*v4.ip()), v4.port()),
            SocketAddr::V6(v6) => Self::from_ipv6(v6.ip().octets(), v6.port()),
        }
    }
}

impl fmt::Display for IpAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_string_with_port(true))
    }
}

impl FromStr for IpAddress {
    type Err = AddressError;

    /// Accepts `a.b.c.d`, `a.b.c.d:port`, bare IPv6, `[ipv6]` and
    /// `[ipv6]:port`. A missing port is 0. Host names are not resolved.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Ok(addr) = s.parse::<SocketAddr>() {
            if let SocketAddr::V6(v6) = addr {
                if v6.scope_id() != 0 {
                    return Err(AddressError::Scoped(s.to_string()));
                }
            }
            return Ok(Self::from(addr));
        }

        if let Ok(ip) = s.parse::<IpAddr>() {
            return Ok(match ip {
                IpAddr::V4(v4) => Self::from_ipv4(u32::from(v4), 0),
                IpAddr::V6(v6) => Self::from_ipv6(v6.octets(), 0),
            });
        }

        if let Some(inner) = s.strip_prefix('[').and_then(|rest| rest.strip_suffix(']')) {
            if let Ok(v6) = inner.parse::<Ipv6Addr>() {
                return Ok(Self::from_ipv6(v6.octets(), 0));
            }
        }

        Err(AddressError::Parse(s.to_string()))
    }
}

impl Serialize for IpAddress {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string_with_port(true))
    }
}

impl<'de> Deserialize<'de> for IpAddress {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}

/// Parses an IPv4 string into a host-order integer; 0 when the text is not
/// an IPv4 address.
pub fn ipv4_from_string(text: &str) -> u32 {
    text.parse::<IpAddress>()
        .ok()
        .and_then(|addr| addr.ipv4())
        .unwrap_or(0)
}

/// Formats a host-order IPv4 integer in dotted decimal; 0 yields an empty
/// string.
pub fn ipv4_to_string(ip: u32) -> String {
    if ip == 0 {
        return String::new();
    }
    IpAddress::from_ipv4(ip, 0).to_string_with_port(false)
}
