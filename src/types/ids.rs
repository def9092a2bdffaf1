//! Strongly-typed identifiers.
//!
//! All IDs are validated at construction time and implement common traits.

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Caller-generated correlation token linking a reply to its request.
///
/// Always travels as its UTF-8 text bytes, in request and reply frames alike.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MessageId(String);

impl MessageId {
    /// Fresh UUID v4 token.
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    pub fn from_string(s: String) -> Result<Self, &'static str> {
        if s.is_empty() {
            return Err("MessageId cannot be empty");
        }
        Ok(Self(s))
    }

    /// Parse a token received as raw frame bytes.
    pub fn from_bytes(b: &[u8]) -> Result<Self, &'static str> {
        let s = std::str::from_utf8(b).map_err(|_| "MessageId must be valid UTF-8")?;
        Self::from_string(s.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }
}

impl Default for MessageId {
    fn default() -> Self {
        Self::new()
    }
}

impl TryFrom<String> for MessageId {
    type Error = &'static str;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::from_string(s)
    }
}

impl From<MessageId> for String {
    fn from(id: MessageId) -> Self {
        id.0
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Return-path token issued by the broker or peer when a request arrived.
///
/// Opaque bytes, echoed back verbatim; never re-encoded.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Bytes", into = "Bytes")]
pub struct ReplyId(Bytes);

impl ReplyId {
    pub fn from_bytes(b: impl Into<Bytes>) -> Result<Self, &'static str> {
        let b = b.into();
        if b.is_empty() {
            return Err("ReplyId cannot be empty");
        }
        Ok(Self(b))
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Cheap clone of the underlying buffer for framing.
    pub fn to_frame(&self) -> Bytes {
        self.0.clone()
    }
}

impl TryFrom<Bytes> for ReplyId {
    type Error = &'static str;

    fn try_from(b: Bytes) -> Result<Self, Self::Error> {
        Self::from_bytes(b)
    }
}

impl From<ReplyId> for Bytes {
    fn from(id: ReplyId) -> Self {
        id.0
    }
}

impl fmt::Display for ReplyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.escape_ascii())
    }
}
