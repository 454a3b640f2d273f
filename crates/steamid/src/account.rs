use std::fmt;

use serde::{Deserialize, Serialize};

/// Steam account type, stored in bits 52..56 of a SteamID64.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountType {
    Invalid,
    Individual,
    Multiseat,
    GameServer,
    AnonGameServer,
    Pending,
    ContentServer,
    Clan,
    Chat,
    ConsoleUser,
    AnonUser,
    /// Any value at or past the end of the known range.
    Unknown(u8),
}

impl AccountType {
    /// Decodes the 4-bit account type field.
    pub fn from_bits(bits: u8) -> Self {
        match bits {
            0 => AccountType::Invalid,
            1 => AccountType::Individual,
            2 => AccountType::Multiseat,
            3 => AccountType::GameServer,
            4 => AccountType::AnonGameServer,
            5 => AccountType::Pending,
            6 => AccountType::ContentServer,
            7 => AccountType::Clan,
            8 => AccountType::Chat,
            9 => AccountType::ConsoleUser,
            10 => AccountType::AnonUser,
            other => AccountType::Unknown(other),
        }
    }

    /// Encodes back to the 4-bit field value.
    pub fn bits(self) -> u8 {
        match self {
            AccountType::Invalid => 0,
            AccountType::Individual => 1,
            AccountType::Multiseat => 2,
            AccountType::GameServer => 3,
            AccountType::AnonGameServer => 4,
            AccountType::Pending => 5,
            AccountType::ContentServer => 6,
            AccountType::Clan => 7,
            AccountType::Chat => 8,
            AccountType::ConsoleUser => 9,
            AccountType::AnonUser => 10,
            AccountType::Unknown(bits) => bits & 0x0f,
        }
    }
}

impl fmt::Display for AccountType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AccountType::Invalid => write!(f, "invalid"),
            AccountType::Individual => write!(f, "individual"),
            AccountType::Multiseat => write!(f, "multiseat"),
            AccountType::GameServer => write!(f, "game_server"),
            AccountType::AnonGameServer => write!(f, "anon_game_server"),
            AccountType::Pending => write!(f, "pending"),
            AccountType::ContentServer => write!(f, "content_server"),
            AccountType::Clan => write!(f, "clan"),
            AccountType::Chat => write!(f, "chat"),
            AccountType::ConsoleUser => write!(f, "console_user"),
            AccountType::AnonUser => write!(f, "anon_user"),
            AccountType::Unknown(bits) => write!(f, "unknown({bits})"),
        }
    }
}

/// Steam universe, stored in the top byte of a SteamID64.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Universe {
    Invalid,
    Public,
    Beta,
    Internal,
    Dev,
    Unknown(u8),
}

impl Universe {
    pub fn from_bits(bits: u8) -> Self {
        match bits {
            0 => Universe::Invalid,
            1 => Universe::Public,
            2 => Universe::Beta,
            3 => Universe::Internal,
            4 => Universe::Dev,
            other => Universe::Unknown(other),
        }
    }

    pub fn bits(self) -> u8 {
        match self {
            Universe::Invalid => 0,
            Universe::Public => 1,
            Universe::Beta => 2,
            Universe::Internal => 3,
            Universe::Dev => 4,
            Universe::Unknown(bits) => bits,
        }
    }
}

impl fmt::Display for Universe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Universe::Invalid => write!(f, "invalid"),
            Universe::Public => write!(f, "public"),
            Universe::Beta => write!(f, "beta"),
            Universe::Internal => write!(f, "internal"),
            Universe::Dev => write!(f, "dev"),
            Universe::Unknown(bits) => write!(f, "unknown({bits})"),
        }
    }
}
