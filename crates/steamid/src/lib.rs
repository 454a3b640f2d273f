pub mod account;
pub mod steam_id;

// Re-export primary types.
pub use account::{AccountType, Universe};
pub use steam_id::{
    CHAT_INSTANCE_FLAG_CLAN, CHAT_INSTANCE_FLAG_LOBBY, CHAT_INSTANCE_FLAG_MMS_LOBBY,
    DESKTOP_INSTANCE, SteamId, WEB_INSTANCE,
};

/// Errors for SteamID operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SteamIdError {
    #[error("not a SteamID64: {0}")]
    Parse(String),

    #[error("invalid SteamID: {0}")]
    Invalid(u64),
}
