//! Named peer identities.

use serde::Serialize;
use steamserver_steamid::SteamId;
use tracing::debug;

use crate::address::IpAddress;
use crate::addresses::AddressRegistry;
use crate::error::IdentityError;
use crate::identity::NetworkingIdentity;
use crate::registry::{NamedStore, truncate_to_buffer};
use crate::settings::Settings;

/// One row of [`IdentityRegistry::enumerate`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IdentityEntry {
    pub reference_name: String,
    /// SteamID64 when the identity holds one, else 0.
    pub steam_id: u64,
    /// Kind tag, see [`crate::IdentityKind::tag`].
    pub identity_type: i32,
}

/// Peer identities keyed by reference name.
///
/// Setting a value replaces whatever kind the entry held before. Getters
/// return `None` when the entry holds a different kind.
#[derive(Debug)]
pub struct IdentityRegistry {
    store: NamedStore<NetworkingIdentity>,
    string_buffer_len: usize,
}

impl IdentityRegistry {
    pub fn new(settings: &Settings) -> Self {
        Self {
            store: NamedStore::new("identity", settings.insert_on_read),
            string_buffer_len: settings.string_buffer_len,
        }
    }

    /// Inserts an invalid identity under `name` unless one exists. Always
    /// returns `true`.
    pub fn add(&self, name: &str) -> bool {
        self.store.ensure(name);
        true
    }

    /// Copy of the stored identity. Never inserts.
    pub fn get(&self, name: &str) -> Option<NetworkingIdentity> {
        self.store.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.store.contains(name)
    }

    /// Stores `identity` under `name`, overwriting any previous value.
    pub fn insert(&self, name: &str, identity: NetworkingIdentity) {
        self.store.replace(name, identity);
    }

    pub fn clear(&self, name: &str) {
        self.store.update(name, |id| *id = NetworkingIdentity::Invalid);
    }

    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Stores the individual public SteamID for a 32-bit account id.
    pub fn set_steam_id(&self, name: &str, account_id: u32) {
        self.insert(
            name,
            NetworkingIdentity::steam_id(SteamId::from_account_id(account_id)),
        );
    }

    pub fn set_steam_id64(&self, name: &str, steam_id: u64) {
        self.insert(name, NetworkingIdentity::steam_id(SteamId::from_u64(steam_id)));
    }

    /// The 32-bit account id of a SteamID identity.
    pub fn get_steam_id(&self, name: &str) -> Option<u32> {
        self.store
            .read(name, |id| id.as_steam_id().map(SteamId::account_id))
    }

    pub fn get_steam_id64(&self, name: &str) -> Option<u64> {
        self.store
            .read(name, |id| id.as_steam_id().map(SteamId::as_u64))
    }

    pub fn set_xbox_pairwise_id(&self, name: &str, id: &str) -> bool {
        self.set_checked(name, NetworkingIdentity::xbox_pairwise_id(id))
    }

    pub fn get_xbox_pairwise_id(&self, name: &str) -> Option<String> {
        self.store
            .read(name, |id| id.as_xbox_pairwise_id().map(str::to_string))
    }

    pub fn set_psn_id(&self, name: &str, psn_id: u64) {
        self.insert(name, NetworkingIdentity::SonyPsn(psn_id));
    }

    pub fn get_psn_id(&self, name: &str) -> Option<u64> {
        self.store.read(name, NetworkingIdentity::as_psn_id)
    }

    /// Copies the address stored as `address_name` into this identity.
    ///
    /// Returns `false`, leaving the identity untouched, when `address_name`
    /// is not in `addresses`.
    pub fn set_ip_addr(
        &self,
        name: &str,
        addresses: &AddressRegistry,
        address_name: &str,
    ) -> bool {
        match addresses.get(address_name) {
            Some(addr) => {
                self.insert(name, NetworkingIdentity::ip(addr));
                true
            }
            None => {
                debug!(name = %name, address = %address_name, "unknown address reference");
                false
            }
        }
    }

    pub fn get_ip_addr(&self, name: &str) -> Option<IpAddress> {
        self.store.read(name, NetworkingIdentity::ip_addr)
    }

    /// Host-order IPv4 of an IP identity, if the address is IPv4.
    pub fn get_ipv4(&self, name: &str) -> Option<u32> {
        self.store.read(name, NetworkingIdentity::ipv4)
    }

    pub fn set_generic_bytes(&self, name: &str, data: &[u8]) -> bool {
        self.set_checked(name, NetworkingIdentity::generic_bytes(data))
    }

    pub fn get_generic_bytes(&self, name: &str) -> Option<Vec<u8>> {
        self.store
            .read(name, |id| id.as_generic_bytes().map(<[u8]>::to_vec))
    }

    pub fn set_generic_string(&self, name: &str, value: &str) -> bool {
        self.set_checked(name, NetworkingIdentity::generic_string(value))
    }

    pub fn get_generic_string(&self, name: &str) -> Option<String> {
        self.store
            .read(name, |id| id.as_generic_string().map(str::to_string))
    }

    pub fn set_localhost(&self, name: &str) {
        self.insert(name, NetworkingIdentity::LocalHost);
    }

    pub fn is_localhost(&self, name: &str) -> bool {
        self.store.read(name, NetworkingIdentity::is_localhost)
    }

    pub fn is_invalid(&self, name: &str) -> bool {
        self.store.read(name, NetworkingIdentity::is_invalid)
    }

    /// Decodes `text` into the entry. Malformed text leaves it unchanged.
    pub fn parse(&self, name: &str, text: &str) -> bool {
        match text.parse::<NetworkingIdentity>() {
            Ok(identity) => {
                self.insert(name, identity);
                true
            }
            Err(e) => {
                debug!(name = %name, error = %e, "identity parse failed");
                false
            }
        }
    }

    /// Canonical `type:data` text, cut to the string buffer size.
    pub fn to_string(&self, name: &str) -> String {
        let text = self.store.read(name, NetworkingIdentity::to_string);
        truncate_to_buffer(text, self.string_buffer_len)
    }

    /// Snapshot of every entry, in unspecified order.
    pub fn enumerate(&self) -> Vec<IdentityEntry> {
        self.store.snapshot(|name, id| IdentityEntry {
            reference_name: name.to_string(),
            steam_id: id.as_steam_id().map(SteamId::as_u64).unwrap_or(0),
            identity_type: id.kind().tag(),
        })
    }

    fn set_checked(&self, name: &str, identity: Result<NetworkingIdentity, IdentityError>) -> bool {
        match identity {
            Ok(identity) => {
                self.insert(name, identity);
                true
            }
            Err(e) => {
                debug!(name = %name, error = %e, "identity rejected");
                false
            }
        }
    }
}
