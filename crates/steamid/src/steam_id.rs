use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::SteamIdError;
use crate::account::{AccountType, Universe};

/// Instance value used by desktop clients.
pub const DESKTOP_INSTANCE: u32 = 1;

/// Highest instance value an individual account may carry.
pub const WEB_INSTANCE: u32 = 4;

const ACCOUNT_INSTANCE_MASK: u32 = 0x000f_ffff;

/// Chat instance flags, taken from the top bits of the instance field.
pub const CHAT_INSTANCE_FLAG_CLAN: u32 = (ACCOUNT_INSTANCE_MASK + 1) >> 1;
pub const CHAT_INSTANCE_FLAG_LOBBY: u32 = (ACCOUNT_INSTANCE_MASK + 1) >> 2;
pub const CHAT_INSTANCE_FLAG_MMS_LOBBY: u32 = (ACCOUNT_INSTANCE_MASK + 1) >> 3;

/// A 64-bit Steam account identifier.
///
/// Bit layout, least significant first:
/// - `0..32` account id
/// - `32..52` instance
/// - `52..56` account type
/// - `56..64` universe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SteamId(u64);

impl SteamId {
    /// Wraps a raw SteamID64 without validation.
    pub const fn from_u64(raw: u64) -> Self {
        Self(raw)
    }

    /// Assembles a SteamID from its parts.
    pub fn from_parts(
        account_id: u32,
        instance: u32,
        account_type: AccountType,
        universe: Universe,
    ) -> Self {
        let raw = u64::from(account_id)
            | (u64::from(instance & ACCOUNT_INSTANCE_MASK) << 32)
            | (u64::from(account_type.bits() & 0x0f) << 52)
            | (u64::from(universe.bits()) << 56);
        Self(raw)
    }

    /// Builds the public, desktop-instance individual SteamID for an account id.
    pub fn from_account_id(account_id: u32) -> Self {
        Self::from_parts(
            account_id,
            DESKTOP_INSTANCE,
            AccountType::Individual,
            Universe::Public,
        )
    }

    pub const fn as_u64(self) -> u64 {
        self.0
    }

    /// The 32-bit account id (the low half of the SteamID64).
    pub const fn account_id(self) -> u32 {
        self.0 as u32
    }

    pub const fn instance(self) -> u32 {
        ((self.0 >> 32) as u32) & ACCOUNT_INSTANCE_MASK
    }

    pub fn account_type(self) -> AccountType {
        AccountType::from_bits(((self.0 >> 52) & 0x0f) as u8)
    }

    pub fn universe(self) -> Universe {
        Universe::from_bits((self.0 >> 56) as u8)
    }

    /// Structural validity check matching the Steam client's rules.
    pub fn is_valid(self) -> bool {
        let account_type = self.account_type();
        if matches!(account_type, AccountType::Invalid | AccountType::Unknown(_)) {
            return false;
        }
        if matches!(self.universe(), Universe::Invalid | Universe::Unknown(_)) {
            return false;
        }

        match account_type {
            AccountType::Individual => self.account_id() != 0 && self.instance() <= WEB_INSTANCE,
            AccountType::Clan => self.account_id() != 0 && self.instance() == 0,
            AccountType::GameServer => self.account_id() != 0,
            _ => true,
        }
    }

    pub fn is_anon_account(self) -> bool {
        matches!(
            self.account_type(),
            AccountType::AnonUser | AccountType::AnonGameServer
        )
    }

    pub fn is_anon_user_account(self) -> bool {
        self.account_type() == AccountType::AnonUser
    }

    pub fn is_chat_account(self) -> bool {
        self.account_type() == AccountType::Chat
    }

    pub fn is_clan_account(self) -> bool {
        self.account_type() == AccountType::Clan
    }

    /// Faked-up SteamID standing in for a console (PSN) friend.
    pub fn is_console_user_account(self) -> bool {
        self.account_type() == AccountType::ConsoleUser
    }

    pub fn is_individual_account(self) -> bool {
        matches!(
            self.account_type(),
            AccountType::Individual | AccountType::ConsoleUser
        )
    }

    pub fn is_game_server_account(self) -> bool {
        matches!(
            self.account_type(),
            AccountType::GameServer | AccountType::AnonGameServer
        )
    }

    pub fn is_lobby(self) -> bool {
        self.account_type() == AccountType::Chat
            && self.instance() & CHAT_INSTANCE_FLAG_LOBBY != 0
    }
}

impl From<u64> for SteamId {
    fn from(raw: u64) -> Self {
        Self(raw)
    }
}

impl From<SteamId> for u64 {
    fn from(id: SteamId) -> Self {
        id.0
    }
}

impl fmt::Display for SteamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for SteamId {
    type Err = SteamIdError;

    /// Parses a decimal SteamID64. No validity check is applied.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<u64>()
            .map(SteamId)
            .map_err(|_| SteamIdError::Parse(s.to_string()))
    }
}
