//! Registry side effects of fake-IP callbacks.
//!
//! Fake-IP completions carry an identity and an address the host cannot hold
//! directly, so they are parked under reserved names and the host receives
//! plain values.

use serde::Serialize;
use tracing::{info, warn};

use crate::address::{IpAddress, ipv4_to_string};
use crate::identity::NetworkingIdentity;
use crate::registry::NetworkingRegistries;

/// `EResult` value for success.
pub const RESULT_OK: i32 = 1;

/// Most ports a single fake-IP request can return.
pub const MAX_RETURN_PORTS: usize = 8;

/// A completed fake-IP request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FakeIpResult {
    pub result: i32,
    pub identity: NetworkingIdentity,
    /// Host-order IPv4, 0 when none was assigned.
    pub ip: u32,
    pub ports: Vec<u16>,
}

/// Host-facing form of a [`FakeIpResult`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FakeIpEvent {
    pub result: i32,
    pub steam_id: u64,
    pub ip: String,
    pub ports: Vec<u16>,
}

/// Host-facing result of a remote fake-IP lookup for a connection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RemoteFakeIpEvent {
    pub connection: u32,
    pub result: i32,
    pub ip_address: String,
    pub port: u16,
}

/// Stores a successful assignment's identity under the reserved identity
/// name and converts the result for the host.
pub fn record_fake_ip_result(regs: &NetworkingRegistries, fake_ip: &FakeIpResult) -> FakeIpEvent {
    if fake_ip.result == RESULT_OK {
        let name = &regs.settings().fake_ip_identity_name;
        regs.identities.insert(name, fake_ip.identity.clone());
        info!(
            name = %name,
            ip = %ipv4_to_string(fake_ip.ip),
            "stored fake IP identity"
        );
    } else {
        warn!(result = fake_ip.result, "fake IP request failed");
    }

    FakeIpEvent {
        result: fake_ip.result,
        steam_id: fake_ip
            .identity
            .as_steam_id()
            .map(|id| id.as_u64())
            .unwrap_or(0),
        ip: ipv4_to_string(fake_ip.ip),
        ports: fake_ip
            .ports
            .iter()
            .take(MAX_RETURN_PORTS)
            .copied()
            .filter(|p| *p != 0)
            .collect(),
    }
}

/// Caches a connection's remote fake address under the reserved address
/// name when the lookup succeeded.
pub fn record_remote_fake_ip(
    regs: &NetworkingRegistries,
    connection: u32,
    result: i32,
    address: IpAddress,
) -> RemoteFakeIpEvent {
    if result == RESULT_OK {
        let name = &regs.settings().remote_fake_ip_address_name;
        regs.addresses.insert(name, address);
        info!(name = %name, connection, address = %address, "cached remote fake IP");
    } else {
        warn!(connection, result, "remote fake IP lookup failed");
    }

    RemoteFakeIpEvent {
        connection,
        result,
        ip_address: address.to_string_with_port(false),
        port: address.port(),
    }
}
