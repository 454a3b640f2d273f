//! Error types for the networking registries.

/// Failures building or parsing an IP address.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AddressError {
    #[error("invalid address: {0}")]
    Parse(String),

    #[error("scoped IPv6 addresses are not supported: {0}")]
    Scoped(String),
}

/// Failures building or parsing a networking identity.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IdentityError {
    #[error("malformed identity string: {0}")]
    Malformed(String),

    #[error("invalid SteamID in identity: {0}")]
    SteamId(#[from] steamserver_steamid::SteamIdError),

    #[error("invalid address in identity: {0}")]
    Address(#[from] AddressError),

    #[error("{kind} payload too long ({len} > {max})")]
    TooLong {
        kind: &'static str,
        len: usize,
        max: usize,
    },

    #[error("{0} payload is empty")]
    Empty(&'static str),
}

/// Failures converting host option triples into config values.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum OptionError {
    #[error("option {index}: expected [key, type, value], got {got}")]
    Shape { index: usize, got: String },

    #[error("option {index}: {field} is not an integer")]
    NotInteger { index: usize, field: &'static str },

    #[error("option {index}: value {value} out of range for {kind}")]
    OutOfRange {
        index: usize,
        kind: &'static str,
        value: String,
    },

    #[error("option {index}: expected {expected} value, got {got}")]
    WrongType {
        index: usize,
        expected: &'static str,
        got: String,
    },

    #[error("option {index}: string value too long ({len} > {max})")]
    StringTooLong { index: usize, len: usize, max: usize },
}

/// Failures loading registry settings.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid setting: {0}")]
    Invalid(String),
}

/// Any error produced by this crate.
#[derive(Debug, thiserror::Error)]
pub enum NetworkingError {
    #[error(transparent)]
    Address(#[from] AddressError),

    #[error(transparent)]
    Identity(#[from] IdentityError),

    #[error(transparent)]
    Option(#[from] OptionError),

    #[error(transparent)]
    Settings(#[from] SettingsError),
}
