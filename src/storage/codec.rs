use std::fmt;
use std::str::FromStr;

use serde::{de::DeserializeOwned, Serialize};

use crate::error::StoreError;

/// Encoding used for storage units.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Codec {
    #[default]
    Json,
    /// Indented JSON, easier to diff and hand-edit.
    JsonPretty,
    #[cfg(feature = "bitcode")]
    Bitcode,
}

impl Codec {
    /// File extension of units written with this codec.
    pub fn extension(&self) -> &'static str {
        match self {
            Codec::Json | Codec::JsonPretty => "json",
            #[cfg(feature = "bitcode")]
            Codec::Bitcode => "bin",
        }
    }

    pub fn encode<T: Serialize>(&self, value: &T) -> Result<Vec<u8>, StoreError> {
        let encoded = match self {
            Codec::Json => serde_json::to_vec(value).map_err(|e| e.to_string()),
            Codec::JsonPretty => serde_json::to_vec_pretty(value).map_err(|e| e.to_string()),
            #[cfg(feature = "bitcode")]
            Codec::Bitcode => bitcode::serialize(value).map_err(|e| e.to_string()),
        };
        encoded.map_err(StoreError::Serialization)
    }

    pub fn decode<T: DeserializeOwned>(&self, bytes: &[u8]) -> Result<T, StoreError> {
        let decoded = match self {
            Codec::Json | Codec::JsonPretty => {
                serde_json::from_slice(bytes).map_err(|e| e.to_string())
            }
            #[cfg(feature = "bitcode")]
            Codec::Bitcode => bitcode::deserialize(bytes).map_err(|e| e.to_string()),
        };
        decoded.map_err(StoreError::Serialization)
    }
}

impl fmt::Display for Codec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Codec::Json => "json",
            Codec::JsonPretty => "json-pretty",
            #[cfg(feature = "bitcode")]
            Codec::Bitcode => "bitcode",
        };
        f.write_str(name)
    }
}

impl FromStr for Codec {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(Codec::Json),
            "json-pretty" | "pretty" => Ok(Codec::JsonPretty),
            #[cfg(feature = "bitcode")]
            "bitcode" | "bin" => Ok(Codec::Bitcode),
            other => Err(format!("unknown codec: {}", other)),
        }
    }
}
