//! Conversion of host option triples into connection config values.
//!
//! The host hands over an ordered list of `[key, type, value]` arrays when it
//! creates a listen socket or connection. Each triple becomes one
//! [`ConfigValue`]; order and duplicates are preserved so the SDK decides
//! precedence.

use std::fmt;

use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::error::OptionError;
use crate::settings::Settings;

/// A connection configuration key (`ESteamNetworkingConfigValue`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct ConfigKey(pub i32);

impl ConfigKey {
    pub const INVALID: ConfigKey = ConfigKey(0);
    pub const FAKE_PACKET_LOSS_SEND: ConfigKey = ConfigKey(2);
    pub const FAKE_PACKET_LOSS_RECV: ConfigKey = ConfigKey(3);
    pub const FAKE_PACKET_LAG_SEND: ConfigKey = ConfigKey(4);
    pub const FAKE_PACKET_LAG_RECV: ConfigKey = ConfigKey(5);
    pub const SEND_BUFFER_SIZE: ConfigKey = ConfigKey(9);
    pub const SEND_RATE_MIN: ConfigKey = ConfigKey(10);
    pub const SEND_RATE_MAX: ConfigKey = ConfigKey(11);
    pub const NAGLE_TIME: ConfigKey = ConfigKey(12);
    pub const IP_ALLOW_WITHOUT_AUTH: ConfigKey = ConfigKey(23);
    pub const TIMEOUT_INITIAL: ConfigKey = ConfigKey(24);
    pub const TIMEOUT_CONNECTED: ConfigKey = ConfigKey(25);
    pub const UNENCRYPTED: ConfigKey = ConfigKey(34);
    pub const SYMMETRIC_CONNECT: ConfigKey = ConfigKey(37);
    pub const LOCAL_VIRTUAL_PORT: ConfigKey = ConfigKey(38);
    pub const CALLBACK_CONNECTION_STATUS_CHANGED: ConfigKey = ConfigKey(201);
}

/// Data type of a config value (`ESteamNetworkingConfigDataType`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConfigDataType {
    Int32,
    Int64,
    Float,
    String,
    Ptr,
}

impl ConfigDataType {
    /// Maps a host type tag. Tags 1–4 select the scalar and string types;
    /// anything else is treated as a pointer.
    pub fn from_tag(tag: i64) -> Self {
        match tag {
            1 => ConfigDataType::Int32,
            2 => ConfigDataType::Int64,
            3 => ConfigDataType::Float,
            4 => ConfigDataType::String,
            _ => ConfigDataType::Ptr,
        }
    }

    pub fn tag(self) -> i32 {
        match self {
            ConfigDataType::Int32 => 1,
            ConfigDataType::Int64 => 2,
            ConfigDataType::Float => 3,
            ConfigDataType::String => 4,
            ConfigDataType::Ptr => 5,
        }
    }
}

impl fmt::Display for ConfigDataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigDataType::Int32 => write!(f, "int32"),
            ConfigDataType::Int64 => write!(f, "int64"),
            ConfigDataType::Float => write!(f, "float"),
            ConfigDataType::String => write!(f, "string"),
            ConfigDataType::Ptr => write!(f, "ptr"),
        }
    }
}

/// Payload of one config value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum ConfigData {
    Int32(i32),
    Int64(i64),
    Float(f32),
    String(String),
    /// Opaque host object handle; 0 is null.
    Ptr(u64),
}

impl ConfigData {
    pub fn data_type(&self) -> ConfigDataType {
        match self {
            ConfigData::Int32(_) => ConfigDataType::Int32,
            ConfigData::Int64(_) => ConfigDataType::Int64,
            ConfigData::Float(_) => ConfigDataType::Float,
            ConfigData::String(_) => ConfigDataType::String,
            ConfigData::Ptr(_) => ConfigDataType::Ptr,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConfigValue {
    pub key: ConfigKey,
    pub data: ConfigData,
}

/// The converted option list. Owns its values; dropping it releases them.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ConfigValueArray {
    values: Vec<ConfigValue>,
}

impl ConfigValueArray {
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn as_slice(&self) -> &[ConfigValue] {
        &self.values
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ConfigValue> {
        self.values.iter()
    }
}

impl<'a> IntoIterator for &'a ConfigValueArray {
    type Item = &'a ConfigValue;
    type IntoIter = std::slice::Iter<'a, ConfigValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.iter()
    }
}

impl IntoIterator for ConfigValueArray {
    type Item = ConfigValue;
    type IntoIter = std::vec::IntoIter<ConfigValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.into_iter()
    }
}

/// Converts host option triples, copying strings into bounded owned buffers.
#[derive(Debug, Clone)]
pub struct OptionConverter {
    max_string_len: usize,
}

impl OptionConverter {
    pub fn new(settings: &Settings) -> Self {
        Self {
            max_string_len: settings.max_option_string_len,
        }
    }

    /// Converts every triple in order. The first bad triple fails the whole
    /// list.
    pub fn convert(&self, options: &[Value]) -> Result<ConfigValueArray, OptionError> {
        let values = options
            .iter()
            .enumerate()
            .map(|(index, option)| self.convert_one(index, option))
            .collect::<Result<Vec<_>, _>>()?;
        debug!(count = values.len(), "converted config options");
        Ok(ConfigValueArray { values })
    }

    fn convert_one(&self, index: usize, option: &Value) -> Result<ConfigValue, OptionError> {
        let triple = match option.as_array() {
            Some(items) if items.len() == 3 => items,
            _ => {
                return Err(OptionError::Shape {
                    index,
                    got: option.to_string(),
                });
            }
        };

        let key = triple[0].as_i64().ok_or(OptionError::NotInteger {
            index,
            field: "key",
        })?;
        let key = i32::try_from(key).map_err(|_| OptionError::OutOfRange {
            index,
            kind: "key",
            value: key.to_string(),
        })?;
        let tag = triple[1].as_i64().ok_or(OptionError::NotInteger {
            index,
            field: "type",
        })?;

        let value = &triple[2];
        let data = match ConfigDataType::from_tag(tag) {
            ConfigDataType::Int32 => {
                let raw = integer(index, value)?;
                let v = i32::try_from(raw).map_err(|_| OptionError::OutOfRange {
                    index,
                    kind: "int32",
                    value: raw.to_string(),
                })?;
                ConfigData::Int32(v)
            }
            ConfigDataType::Int64 => ConfigData::Int64(integer(index, value)?),
            ConfigDataType::Float => {
                let v = value.as_f64().ok_or_else(|| OptionError::WrongType {
                    index,
                    expected: "float",
                    got: value.to_string(),
                })?;
                ConfigData::Float(v as f32)
            }
            ConfigDataType::String => {
                let s = value.as_str().ok_or_else(|| OptionError::WrongType {
                    index,
                    expected: "string",
                    got: value.to_string(),
                })?;
                if s.len() > self.max_string_len {
                    return Err(OptionError::StringTooLong {
                        index,
                        len: s.len(),
                        max: self.max_string_len,
                    });
                }
                ConfigData::String(s.to_owned())
            }
            ConfigDataType::Ptr => match value {
                Value::Null => ConfigData::Ptr(0),
                other => ConfigData::Ptr(other.as_u64().ok_or_else(|| OptionError::WrongType {
                    index,
                    expected: "object handle",
                    got: other.to_string(),
                })?),
            },
        };

        Ok(ConfigValue {
            key: ConfigKey(key),
            data,
        })
    }
}

impl Default for OptionConverter {
    fn default() -> Self {
        Self::new(&Settings::default())
    }
}

fn integer(index: usize, value: &Value) -> Result<i64, OptionError> {
    if let Some(v) = value.as_i64() {
        return Ok(v);
    }
    if value.as_u64().is_some() {
        return Err(OptionError::OutOfRange {
            index,
            kind: "int64",
            value: value.to_string(),
        });
    }
    Err(OptionError::WrongType {
        index,
        expected: "integer",
        got: value.to_string(),
    })
}
