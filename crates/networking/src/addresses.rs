//! Named IP addresses.

use serde::Serialize;
use tracing::debug;

use crate::address::IpAddress;
use crate::registry::{NamedStore, truncate_to_buffer};
use crate::settings::Settings;

/// One row of [`AddressRegistry::enumerate`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AddressEntry {
    pub reference_name: String,
    pub localhost: bool,
    /// Host-order IPv4, or 0 for IPv6 addresses.
    pub ip_address: u32,
}

/// IP address + port values keyed by reference name.
#[derive(Debug)]
pub struct AddressRegistry {
    store: NamedStore<IpAddress>,
    string_buffer_len: usize,
}

impl AddressRegistry {
    pub fn new(settings: &Settings) -> Self {
        Self {
            store: NamedStore::new("address", settings.insert_on_read),
            string_buffer_len: settings.string_buffer_len,
        }
    }

    /// Inserts a cleared address under `name` unless one exists. Always
    /// returns `true`.
    pub fn add(&self, name: &str) -> bool {
        self.store.ensure(name);
        true
    }

    /// Copy of the stored address. Never inserts.
    pub fn get(&self, name: &str) -> Option<IpAddress> {
        self.store.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.store.contains(name)
    }

    pub fn insert(&self, name: &str, addr: IpAddress) {
        self.store.replace(name, addr);
    }

    pub fn clear(&self, name: &str) {
        self.store.update(name, IpAddress::clear);
    }

    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// `ip` is host byte order.
    pub fn set_ipv4(&self, name: &str, ip: u32, port: u16) {
        self.insert(name, IpAddress::from_ipv4(ip, port));
    }

    /// `ipv6` is network byte order.
    pub fn set_ipv6(&self, name: &str, ipv6: [u8; 16], port: u16) {
        self.insert(name, IpAddress::from_ipv6(ipv6, port));
    }

    pub fn set_ipv6_localhost(&self, name: &str, port: u16) {
        self.insert(name, IpAddress::ipv6_localhost(port));
    }

    pub fn is_ipv4(&self, name: &str) -> bool {
        self.store.read(name, IpAddress::is_ipv4)
    }

    pub fn get_ipv4(&self, name: &str) -> Option<u32> {
        self.store.read(name, IpAddress::ipv4)
    }

    pub fn get_port(&self, name: &str) -> u16 {
        self.store.read(name, IpAddress::port)
    }

    pub fn is_all_zero(&self, name: &str) -> bool {
        self.store.read(name, IpAddress::is_all_zero)
    }

    pub fn is_localhost(&self, name: &str) -> bool {
        self.store.read(name, IpAddress::is_localhost)
    }

    /// Parses `host[:port]` into the entry. On failure the entry keeps its
    /// previous value.
    pub fn parse(&self, name: &str, text: &str) -> bool {
        match text.parse::<IpAddress>() {
            Ok(addr) => {
                self.insert(name, addr);
                true
            }
            Err(e) => {
                debug!(name = %name, error = %e, "address parse failed");
                false
            }
        }
    }

    pub fn to_string(&self, name: &str, with_port: bool) -> String {
        let text = self
            .store
            .read(name, |addr| addr.to_string_with_port(with_port));
        truncate_to_buffer(text, self.string_buffer_len)
    }

    /// Snapshot of every entry, in unspecified order.
    pub fn enumerate(&self) -> Vec<AddressEntry> {
        self.store.snapshot(|name, addr| AddressEntry {
            reference_name: name.to_string(),
            localhost: addr.is_localhost(),
            ip_address: addr.ipv4().unwrap_or(0),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> AddressRegistry {
        AddressRegistry::new(&Settings::default())
    }

    #[test]
    fn add_then_clear() {
        let reg = registry();
        reg.add("a");
        assert!(reg.is_all_zero("a"));
        reg.set_ipv4("a", 0x0102_0304, 9);
        reg.clear("a");
        assert!(reg.is_all_zero("a"));
        assert_eq!(reg.get_port("a"), 0);
    }

    #[test]
    fn srv_addr_scenario() {
        let reg = registry();
        reg.add("srv_addr");
        reg.set_ipv4("srv_addr", 0x7F00_0001, 27015);
        assert!(reg.is_ipv4("srv_addr"));
        assert_eq!(reg.get_ipv4("srv_addr"), Some(0x7F00_0001));
        assert_eq!(reg.to_string("srv_addr", true), "127.0.0.1:27015");
        assert_eq!(reg.to_string("srv_addr", false), "127.0.0.1");
        assert!(reg.is_localhost("srv_addr"));
    }

    #[test]
    fn ipv6_storage() {
        let reg = registry();
        let bytes = [0x20, 0x01, 0x0d, 0xb8, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0x42];
        reg.set_ipv6("v6", bytes, 443);
        assert!(!reg.is_ipv4("v6"));
        assert_eq!(reg.get_ipv4("v6"), None);
        assert_eq!(reg.to_string("v6", true), "[2001:db8::42]:443");
        assert_eq!(reg.get("v6").unwrap().ipv6_bytes(), bytes);
    }

    #[test]
    fn ipv6_localhost() {
        let reg = registry();
        reg.set_ipv6_localhost("lo", 0);
        assert!(reg.is_localhost("lo"));
        assert!(!reg.is_all_zero("lo"));
        assert_eq!(reg.to_string("lo", true), "[::1]:0");
    }

    #[test]
    fn parse_failure_keeps_previous() {
        let reg = registry();
        assert!(reg.parse("p", "8.8.4.4:53"));
        assert!(!reg.parse("p", "dns.google:53"));
        assert_eq!(reg.to_string("p", true), "8.8.4.4:53");
    }

    #[test]
    fn parse_roundtrip_through_registry() {
        let reg = registry();
        for text in ["127.0.0.1:80", "[::1]:8080", "[2001:db8::1]:1"] {
            assert!(reg.parse("r", text));
            let first = reg.get("r").unwrap();
            let rendered = reg.to_string("r", true);
            assert!(reg.parse("r", &rendered));
            assert_eq!(reg.get("r").unwrap(), first);
        }
        reg.parse("r", "127.0.0.1:80");
        assert_eq!(reg.to_string("r", true), "127.0.0.1:80");
    }

    #[test]
    fn never_added_read_creates_entry() {
        let reg = registry();
        assert_eq!(reg.get_ipv4("never_added").unwrap_or(0), 0);
        let names: Vec<String> = reg.enumerate().into_iter().map(|e| e.reference_name).collect();
        assert!(names.contains(&"never_added".to_string()));
    }

    #[test]
    fn enumerate_reports_localhost_and_ipv4() {
        let reg = registry();
        reg.set_ipv4("v4", 0xC0A8_0001, 1);
        reg.set_ipv6_localhost("lo", 2);
        let mut entries = reg.enumerate();
        entries.sort_by(|a, b| a.reference_name.cmp(&b.reference_name));
        assert_eq!(
            entries,
            vec![
                AddressEntry {
                    reference_name: "lo".into(),
                    localhost: true,
                    ip_address: 0,
                },
                AddressEntry {
                    reference_name: "v4".into(),
                    localhost: false,
                    ip_address: 0xC0A8_0001,
                },
            ]
        );
    }

    #[test]
    fn overwrite_keeps_count() {
        let reg = registry();
        reg.add("a");
        reg.add("b");
        reg.set_ipv4("a", 1, 1);
        reg.parse("b", "[::1]:1");
        assert_eq!(reg.enumerate().len(), 2);
    }
}
