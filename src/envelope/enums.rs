//! Core enumerations for envelopes.
//!
//! Canonical definitions for the RPC wire protocol.

use serde::{Deserialize, Serialize};
use std::fmt;

/// RPC message kind carried in the type frame.
///
/// Numeric codes are the stable discriminants shared with peers; the label
/// is what `name()` and serde produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MessageType {
    Call = 1,
    Cast = 2,
    CastFanout = 3,
    Notify = 4,
    NotifyFanout = 5,
    Reply = 6,
    Ack = 7,
}

impl MessageType {
    pub const ALL: [MessageType; 7] = [
        MessageType::Call,
        MessageType::Cast,
        MessageType::CastFanout,
        MessageType::Notify,
        MessageType::NotifyFanout,
        MessageType::Reply,
        MessageType::Ack,
    ];

    pub fn code(self) -> u8 {
        self as u8
    }

    pub fn name(self) -> &'static str {
        match self {
            MessageType::Call => "CALL",
            MessageType::Cast => "CAST",
            MessageType::CastFanout => "CAST_FANOUT",
            MessageType::Notify => "NOTIFY",
            MessageType::NotifyFanout => "NOTIFY_FANOUT",
            MessageType::Reply => "REPLY",
            MessageType::Ack => "ACK",
        }
    }

    pub fn from_code(code: u8) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.code() == code)
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.name() == name)
    }

    /// Accepts either the label or the decimal code, as found in a type frame.
    pub fn parse_label(label: &str) -> Option<Self> {
        Self::from_name(label).or_else(|| label.parse::<u8>().ok().and_then(Self::from_code))
    }

    /// Kinds that may open an exchange (as opposed to answering one).
    pub fn is_request(self) -> bool {
        matches!(
            self,
            MessageType::Call
                | MessageType::Cast
                | MessageType::CastFanout
                | MessageType::Notify
                | MessageType::NotifyFanout
        )
    }
}

impl fmt::Display for MessageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Envelope shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnvelopeKind {
    Request,
    Reply,
}
