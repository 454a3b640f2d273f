//! Named handles for Steam game-server networking values.
//!
//! Host scripting code cannot hold native identity or address structs, so it
//! builds them up under caller-chosen names and networking calls resolve the
//! names later. Option lists for socket creation are converted here as well.

pub mod address;
pub mod addresses;
pub mod error;
pub mod fake_ip;
pub mod identities;
pub mod identity;
pub mod options;
pub mod registry;
pub mod settings;

// Re-export primary types.
pub use address::{IpAddress, ipv4_from_string, ipv4_to_string};
pub use addresses::{AddressEntry, AddressRegistry};
pub use error::{AddressError, IdentityError, NetworkingError, OptionError, SettingsError};
pub use fake_ip::{
    FakeIpEvent, FakeIpResult, RemoteFakeIpEvent, record_fake_ip_result, record_remote_fake_ip,
};
pub use identities::{IdentityEntry, IdentityRegistry};
pub use identity::{
    IdentityKind, MAX_GENERIC_BYTES, MAX_GENERIC_STRING, MAX_STRING_LEN, MAX_XBOX_PAIRWISE_ID,
    NetworkingIdentity,
};
pub use options::{
    ConfigData, ConfigDataType, ConfigKey, ConfigValue, ConfigValueArray, OptionConverter,
};
pub use registry::NetworkingRegistries;
pub use settings::{Settings, default_settings_path};
pub use steamserver_steamid::SteamId;
