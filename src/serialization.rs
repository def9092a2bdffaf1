//! Serialization capability for opaque frame bodies.
//!
//! Framing never looks inside context, payload or full-envelope frames; it
//! hands structured values to a [`Serializer`] and writes whatever bytes come
//! back. The encoding must stay stable across versions since the last frame
//! of every envelope is its direct output.

use bytes::Bytes;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::types::Result;

/// Bytes-in/bytes-out encoding of structured values.
pub trait Serializer: Send + Sync {
    /// Short name for diagnostics.
    fn name(&self) -> &'static str;

    fn encode<T: Serialize + ?Sized>(&self, value: &T) -> Result<Bytes>;

    fn decode<T: DeserializeOwned>(&self, bytes: &[u8]) -> Result<T>;
}

/// MessagePack with named fields.
#[derive(Debug, Clone, Copy, Default)]
pub struct MsgpackSerializer;

impl Serializer for MsgpackSerializer {
    fn name(&self) -> &'static str {
        "msgpack"
    }

    fn encode<T: Serialize + ?Sized>(&self, value: &T) -> Result<Bytes> {
        Ok(Bytes::from(rmp_serde::to_vec_named(value)?))
    }

    fn decode<T: DeserializeOwned>(&self, bytes: &[u8]) -> Result<T> {
        Ok(rmp_serde::from_slice(bytes)?)
    }
}

/// Compact JSON.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonSerializer;

impl Serializer for JsonSerializer {
    fn name(&self) -> &'static str {
        "json"
    }

    fn encode<T: Serialize + ?Sized>(&self, value: &T) -> Result<Bytes> {
        Ok(Bytes::from(serde_json::to_vec(value)?))
    }

    fn decode<T: DeserializeOwned>(&self, bytes: &[u8]) -> Result<T> {
        Ok(serde_json::from_slice(bytes)?)
    }
}

/// Encoding selected by configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum WireEncoding {
    #[default]
    #[serde(rename = "msgpack")]
    MsgPack,
    Json,
}

impl Serializer for WireEncoding {
    fn name(&self) -> &'static str {
        match self {
            WireEncoding::MsgPack => MsgpackSerializer.name(),
            WireEncoding::Json => JsonSerializer.name(),
        }
    }

    fn encode<T: Serialize + ?Sized>(&self, value: &T) -> Result<Bytes> {
        match self {
            WireEncoding::MsgPack => MsgpackSerializer.encode(value),
            WireEncoding::Json => JsonSerializer.encode(value),
        }
    }

    fn decode<T: DeserializeOwned>(&self, bytes: &[u8]) -> Result<T> {
        match self {
            WireEncoding::MsgPack => MsgpackSerializer.decode(bytes),
            WireEncoding::Json => JsonSerializer.decode(bytes),
        }
    }
}
