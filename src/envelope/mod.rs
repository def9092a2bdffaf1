//! Envelope model - the logical message before framing.
//!
//! An envelope is built by the dispatch layer for one outbound message,
//! consumed by exactly one `send`, and dropped. Two shapes exist:
//! - **Request**: an outbound call/cast/notify with routing metadata
//! - **Reply**: the answer to a prior request, carrying its return path
//!
//! `Envelope` is the tagged union over both, used where the shape is only
//! known at runtime.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

use crate::types::{Error, MessageId, ReplyId, Result};

pub mod enums;

pub use enums::*;

/// Descriptive destination of a request. Diagnostics only; never framed on
/// its own.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Target {
    pub topic: String,

    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub server: Option<String>,

    #[serde(default)]
    pub fanout: bool,
}

impl Target {
    pub fn new(topic: impl Into<String>) -> Self {
        Self {
            topic: topic.into(),
            server: None,
            fanout: false,
        }
    }

    pub fn with_server(mut self, server: impl Into<String>) -> Self {
        self.server = Some(server.into());
        self
    }

    pub fn with_fanout(mut self) -> Self {
        self.fanout = true;
        self
    }

    /// Default routing key: `topic`, or `topic.server` when addressed.
    pub fn routing_key(&self) -> String {
        match &self.server {
            Some(server) => format!("{}.{}", self.topic, server),
            None => self.topic.clone(),
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.server, self.fanout) {
            (_, true) => write!(f, "{} (fanout)", self.topic),
            (Some(server), false) => write!(f, "{}.{}", self.topic, server),
            (None, false) => f.write_str(&self.topic),
        }
    }
}

/// Outbound call, cast or notification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Request {
    pub msg_type: MessageType,
    pub target: Target,
    pub message_id: MessageId,
    pub routing_key: String,
    pub context: Value,
    pub message: Value,
}

impl Request {
    /// Build a request with a fresh message id and the target's default
    /// routing key.
    pub fn new(msg_type: MessageType, target: Target, context: Value, message: Value) -> Result<Self> {
        if !msg_type.is_request() {
            return Err(Error::validation(format!(
                "{} is not a request message type",
                msg_type
            )));
        }
        let routing_key = target.routing_key();
        Ok(Self {
            msg_type,
            target,
            message_id: MessageId::new(),
            routing_key,
            context,
            message,
        })
    }

    pub fn with_routing_key(mut self, routing_key: impl Into<String>) -> Self {
        self.routing_key = routing_key.into();
        self
    }

    pub fn with_message_id(mut self, message_id: MessageId) -> Self {
        self.message_id = message_id;
        self
    }
}

/// Outcome carried by a reply: a result, or a serialized failure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ReplyBody {
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub result: Option<Value>,

    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub failure: Option<Value>,

    #[serde(default)]
    pub log_failure: bool,
}

impl ReplyBody {
    pub fn success(result: Value) -> Self {
        Self {
            result: Some(result),
            ..Self::default()
        }
    }

    pub fn failure(failure: Value, log_failure: bool) -> Self {
        Self {
            result: None,
            failure: Some(failure),
            log_failure,
        }
    }

    pub fn is_failure(&self) -> bool {
        self.failure.is_some()
    }
}

/// Response to a prior request.
///
/// `msg_type` must be [`MessageType::Reply`]; reply senders refuse anything
/// else without writing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reply {
    pub msg_type: MessageType,
    pub reply_id: ReplyId,
    pub message_id: MessageId,
    pub body: ReplyBody,
}

impl Reply {
    pub fn new(reply_id: ReplyId, message_id: MessageId, body: ReplyBody) -> Self {
        Self {
            msg_type: MessageType::Reply,
            reply_id,
            message_id,
            body,
        }
    }

    pub fn ensure_reply_type(&self) -> Result<()> {
        if self.msg_type != MessageType::Reply {
            return Err(Error::InvalidReplyType {
                found: self.msg_type,
            });
        }
        Ok(())
    }
}

/// Either envelope shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Envelope {
    Request(Request),
    Reply(Reply),
}

impl Envelope {
    pub fn kind(&self) -> EnvelopeKind {
        match self {
            Envelope::Request(_) => EnvelopeKind::Request,
            Envelope::Reply(_) => EnvelopeKind::Reply,
        }
    }

    pub fn message_id(&self) -> &MessageId {
        match self {
            Envelope::Request(r) => &r.message_id,
            Envelope::Reply(r) => &r.message_id,
        }
    }

    pub fn msg_type(&self) -> MessageType {
        match self {
            Envelope::Request(r) => r.msg_type,
            Envelope::Reply(r) => r.msg_type,
        }
    }
}

impl From<Request> for Envelope {
    fn from(r: Request) -> Self {
        Envelope::Request(r)
    }
}

impl From<Reply> for Envelope {
    fn from(r: Reply) -> Self {
        Envelope::Reply(r)
    }
}
