//! Peer identity values and their `type:data` text form.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use steamserver_steamid::SteamId;

use crate::address::IpAddress;
use crate::error::IdentityError;

/// Maximum generic byte payload.
pub const MAX_GENERIC_BYTES: usize = 32;

/// Generic string buffer size, terminator included.
pub const MAX_GENERIC_STRING: usize = 32;

/// Xbox pairwise id buffer size, terminator included.
pub const MAX_XBOX_PAIRWISE_ID: usize = 33;

/// Text buffer size for identities and addresses, terminator included.
pub const MAX_STRING_LEN: usize = 128;

/// Identity kind tags as reported to the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IdentityKind {
    Invalid,
    IpAddress,
    GenericString,
    GenericBytes,
    UnknownType,
    SteamId,
    XboxPairwiseId,
    SonyPsn,
}

impl IdentityKind {
    /// Numeric tag used across the host boundary.
    pub fn tag(self) -> i32 {
        match self {
            IdentityKind::Invalid => 0,
            IdentityKind::IpAddress => 1,
            IdentityKind::GenericString => 2,
            IdentityKind::GenericBytes => 3,
            IdentityKind::UnknownType => 4,
            IdentityKind::SteamId => 16,
            IdentityKind::XboxPairwiseId => 17,
            IdentityKind::SonyPsn => 18,
        }
    }
}

impl fmt::Display for IdentityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IdentityKind::Invalid => write!(f, "invalid"),
            IdentityKind::IpAddress => write!(f, "ip_address"),
            IdentityKind::GenericString => write!(f, "generic_string"),
            IdentityKind::GenericBytes => write!(f, "generic_bytes"),
            IdentityKind::UnknownType => write!(f, "unknown"),
            IdentityKind::SteamId => write!(f, "steam_id"),
            IdentityKind::XboxPairwiseId => write!(f, "xbox_pairwise_id"),
            IdentityKind::SonyPsn => write!(f, "sony_psn"),
        }
    }
}

/// Identifies a remote peer. Exactly one kind is held at a time.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum NetworkingIdentity {
    #[default]
    Invalid,
    SteamId(SteamId),
    XboxPairwiseId(String),
    SonyPsn(u64),
    IpAddress(IpAddress),
    /// `::1`, port 0.
    LocalHost,
    GenericString(String),
    GenericBytes(Vec<u8>),
    /// A well-formed `prefix:data` string of a kind this build does not know.
    Unknown(String),
}

impl NetworkingIdentity {
    pub fn steam_id(id: SteamId) -> Self {
        NetworkingIdentity::SteamId(id)
    }

    /// IP identity. The localhost address with port 0 becomes [`Self::LocalHost`].
    pub fn ip(addr: IpAddress) -> Self {
        if addr == IpAddress::ipv6_localhost(0) {
            NetworkingIdentity::LocalHost
        } else {
            NetworkingIdentity::IpAddress(addr)
        }
    }

    pub fn generic_string(value: &str) -> Result<Self, IdentityError> {
        check_len("generic string", value.len(), 0, MAX_GENERIC_STRING - 1)?;
        Ok(NetworkingIdentity::GenericString(value.to_string()))
    }

    pub fn generic_bytes(data: &[u8]) -> Result<Self, IdentityError> {
        check_len("generic bytes", data.len(), 0, MAX_GENERIC_BYTES)?;
        Ok(NetworkingIdentity::GenericBytes(data.to_vec()))
    }

    pub fn xbox_pairwise_id(id: &str) -> Result<Self, IdentityError> {
        check_len("xbox pairwise id", id.len(), 1, MAX_XBOX_PAIRWISE_ID - 1)?;
        Ok(NetworkingIdentity::XboxPairwiseId(id.to_string()))
    }

    pub fn kind(&self) -> IdentityKind {
        match self {
            NetworkingIdentity::Invalid => IdentityKind::Invalid,
            NetworkingIdentity::SteamId(_) => IdentityKind::SteamId,
            NetworkingIdentity::XboxPairwiseId(_) => IdentityKind::XboxPairwiseId,
            NetworkingIdentity::SonyPsn(_) => IdentityKind::SonyPsn,
            NetworkingIdentity::IpAddress(_) | NetworkingIdentity::LocalHost => {
                IdentityKind::IpAddress
            }
            NetworkingIdentity::GenericString(_) => IdentityKind::GenericString,
            NetworkingIdentity::GenericBytes(_) => IdentityKind::GenericBytes,
            NetworkingIdentity::Unknown(_) => IdentityKind::UnknownType,
        }
    }

    /// Only checks the kind; a non-invalid value may still be malformed.
    pub fn is_invalid(&self) -> bool {
        matches!(self, NetworkingIdentity::Invalid)
    }

    pub fn is_localhost(&self) -> bool {
        match self {
            NetworkingIdentity::LocalHost => true,
            NetworkingIdentity::IpAddress(addr) => addr.is_localhost(),
            _ => false,
        }
    }

    pub fn as_steam_id(&self) -> Option<SteamId> {
        match self {
            NetworkingIdentity::SteamId(id) => Some(*id),
            _ => None,
        }
    }

    pub fn ip_addr(&self) -> Option<IpAddress> {
        match self {
            NetworkingIdentity::IpAddress(addr) => Some(*addr),
            NetworkingIdentity::LocalHost => Some(IpAddress::ipv6_localhost(0)),
            _ => None,
        }
    }

    pub fn ipv4(&self) -> Option<u32> {
        self.ip_addr().and_then(|addr| addr.ipv4())
    }

    pub fn as_generic_string(&self) -> Option<&str> {
        match self {
            NetworkingIdentity::GenericString(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_generic_bytes(&self) -> Option<&[u8]> {
        match self {
            NetworkingIdentity::GenericBytes(b) => Some(b),
            _ => None,
        }
    }

    pub fn as_xbox_pairwise_id(&self) -> Option<&str> {
        match self {
            NetworkingIdentity::XboxPairwiseId(id) => Some(id),
            _ => None,
        }
    }

    pub fn as_psn_id(&self) -> Option<u64> {
        match self {
            NetworkingIdentity::SonyPsn(id) => Some(*id),
            _ => None,
        }
    }
}

fn check_len(
    kind: &'static str,
    len: usize,
    min: usize,
    max: usize,
) -> Result<(), IdentityError> {
    if len < min {
        return Err(IdentityError::Empty(kind));
    }
    if len > max {
        return Err(IdentityError::TooLong { kind, len, max });
    }
    Ok(())
}

impl fmt::Display for NetworkingIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NetworkingIdentity::Invalid => write!(f, "invalid"),
            NetworkingIdentity::SteamId(id) => write!(f, "steamid:{id}"),
            NetworkingIdentity::XboxPairwiseId(id) => write!(f, "xboxpwid:{id}"),
            NetworkingIdentity::SonyPsn(id) => write!(f, "psn:{id}"),
            NetworkingIdentity::IpAddress(addr) => write!(f, "ip:{addr}"),
            NetworkingIdentity::LocalHost => write!(f, "ip:{}", IpAddress::ipv6_localhost(0)),
            NetworkingIdentity::GenericString(s) => write!(f, "str:{s}"),
            NetworkingIdentity::GenericBytes(b) => write!(f, "gen:{}", hex::encode(b)),
            NetworkingIdentity::Unknown(raw) => f.write_str(raw),
        }
    }
}

impl FromStr for NetworkingIdentity {
    type Err = IdentityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "invalid" {
            return Ok(NetworkingIdentity::Invalid);
        }

        if let Some(rest) = s.strip_prefix("steamid:") {
            let id: SteamId = rest.parse()?;
            if !id.is_valid() {
                return Err(steamserver_steamid::SteamIdError::Invalid(id.as_u64()).into());
            }
            return Ok(NetworkingIdentity::SteamId(id));
        }

        if let Some(rest) = s.strip_prefix("ip:") {
            let addr: IpAddress = rest.parse()?;
            return Ok(NetworkingIdentity::ip(addr));
        }

        if let Some(rest) = s.strip_prefix("str:") {
            return NetworkingIdentity::generic_string(rest);
        }

        if let Some(rest) = s.strip_prefix("gen:") {
            let data = hex::decode(rest).map_err(|_| IdentityError::Malformed(s.to_string()))?;
            return NetworkingIdentity::generic_bytes(&data);
        }

        if let Some(rest) = s.strip_prefix("xboxpwid:") {
            return NetworkingIdentity::xbox_pairwise_id(rest);
        }

        if let Some(rest) = s.strip_prefix("psn:") {
            let id = rest
                .parse::<u64>()
                .map_err(|_| IdentityError::Malformed(s.to_string()))?;
            return Ok(NetworkingIdentity::SonyPsn(id));
        }

        if looks_like_identity(s) {
            return Ok(NetworkingIdentity::Unknown(s.to_string()));
        }

        Err(IdentityError::Malformed(s.to_string()))
    }
}

/// `prefix:data` where the prefix is `[a-z0-9_]+`, total length 4..128.
fn looks_like_identity(s: &str) -> bool {
    if s.len() < 4 || s.len() >= MAX_STRING_LEN {
        return false;
    }
    let Some((prefix, _)) = s.split_once(':') else {
        return false;
    };
    !prefix.is_empty()
        && prefix
            .bytes()
            .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'_')
}

impl Serialize for NetworkingIdentity {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for NetworkingIdentity {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PEER: u64 = 76561198000000000;

    #[test]
    fn default_is_invalid() {
        let id = NetworkingIdentity::default();
        assert!(id.is_invalid());
        assert_eq!(id.kind().tag(), 0);
        assert_eq!(id.to_string(), "invalid");
    }

    #[test]
    fn steam_id_text_form() {
        let id = NetworkingIdentity::steam_id(SteamId::from_u64(PEER));
        assert_eq!(id.to_string(), "steamid:76561198000000000");
        assert_eq!(id.kind(), IdentityKind::SteamId);
        assert_eq!(id.kind().tag(), 16);
        let back: NetworkingIdentity = id.to_string().parse().unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn parse_rejects_invalid_steam_id() {
        assert!("steamid:0".parse::<NetworkingIdentity>().is_err());
        assert!("steamid:abc".parse::<NetworkingIdentity>().is_err());
        assert!("steamid: 76561198000000000".parse::<NetworkingIdentity>().is_err());
    }

    #[test]
    fn kinds_are_exclusive() {
        let id = NetworkingIdentity::steam_id(SteamId::from_u64(12345));
        assert_eq!(id.ipv4(), None);
        assert_eq!(id.as_generic_bytes(), None);
        assert_eq!(id.as_generic_string(), None);
        assert!(!id.is_localhost());
        assert!(!id.is_invalid());
    }

    #[test]
    fn localhost_normalization() {
        let id = NetworkingIdentity::ip(IpAddress::ipv6_localhost(0));
        assert_eq!(id, NetworkingIdentity::LocalHost);
        assert_eq!(id.to_string(), "ip:[::1]:0");
        assert_eq!("ip:[::1]:0".parse::<NetworkingIdentity>().unwrap(), id);

        let with_port = NetworkingIdentity::ip(IpAddress::ipv6_localhost(80));
        assert!(matches!(with_port, NetworkingIdentity::IpAddress(_)));
        assert!(with_port.is_localhost());
    }

    #[test]
    fn ip_identity() {
        let id: NetworkingIdentity = "ip:10.1.2.3:27015".parse().unwrap();
        assert_eq!(id.ipv4(), Some(0x0A01_0203));
        assert_eq!(id.ip_addr().unwrap().port(), 27015);
        assert_eq!(id.to_string(), "ip:10.1.2.3:27015");
    }

    #[test]
    fn generic_string_bounds() {
        assert!(NetworkingIdentity::generic_string(&"a".repeat(31)).is_ok());
        let err = NetworkingIdentity::generic_string(&"a".repeat(32)).unwrap_err();
        assert!(matches!(err, IdentityError::TooLong { max: 31, .. }));
    }

    #[test]
    fn empty_generic_payloads_allowed() {
        let s = NetworkingIdentity::generic_string("").unwrap();
        assert_eq!(s.as_generic_string(), Some(""));
        assert_eq!(s.to_string(), "str:");
        assert_eq!("str:".parse::<NetworkingIdentity>().unwrap(), s);

        let b = NetworkingIdentity::generic_bytes(&[]).unwrap();
        assert_eq!(b.as_generic_bytes(), Some(&[][..]));
        assert_eq!(b.to_string(), "gen:");

        assert!(matches!(
            NetworkingIdentity::xbox_pairwise_id(""),
            Err(IdentityError::Empty(_))
        ));
    }

    #[test]
    fn generic_bytes_bounds_and_hex() {
        let id = NetworkingIdentity::generic_bytes(&[0xde, 0xad, 0xbe, 0xef]).unwrap();
        assert_eq!(id.to_string(), "gen:deadbeef");
        assert_eq!("gen:DEADBEEF".parse::<NetworkingIdentity>().unwrap(), id);
        assert!(NetworkingIdentity::generic_bytes(&[0u8; 32]).is_ok());
        assert!(NetworkingIdentity::generic_bytes(&[0u8; 33]).is_err());
        assert!("gen:abc".parse::<NetworkingIdentity>().is_err());
    }

    #[test]
    fn platform_ids() {
        let psn: NetworkingIdentity = "psn:123456789".parse().unwrap();
        assert_eq!(psn.as_psn_id(), Some(123456789));
        assert_eq!(psn.kind().tag(), 18);

        let xbox = NetworkingIdentity::xbox_pairwise_id("ABCDEF0123").unwrap();
        assert_eq!(xbox.to_string(), "xboxpwid:ABCDEF0123");
        assert_eq!(xbox.as_xbox_pairwise_id(), Some("ABCDEF0123"));
        assert!(NetworkingIdentity::xbox_pairwise_id(&"x".repeat(33)).is_err());
    }

    #[test]
    fn unknown_kind_is_kept_verbatim() {
        let id: NetworkingIdentity = "stadia:998877".parse().unwrap();
        assert_eq!(id.kind(), IdentityKind::UnknownType);
        assert_eq!(id.to_string(), "stadia:998877");
    }

    #[test]
    fn malformed_strings_rejected() {
        for text in ["", "abc", "nocolon", ":data", "Bad:data", "a-b:c"] {
            assert!(text.parse::<NetworkingIdentity>().is_err(), "{text}");
        }
        let long = format!("x:{}", "y".repeat(200));
        assert!(long.parse::<NetworkingIdentity>().is_err());
    }
}
