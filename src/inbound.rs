//! Inverse parsers for the four outbound frame layouts.
//!
//! A receiver that gets a complete multipart message (see
//! [`crate::transport::codec::read_multipart`]) uses these to recover the
//! envelope. Layout mismatches are validation errors; body decoding errors
//! come from the serializer.

use bytes::Bytes;
use serde_json::Value;

use crate::envelope::{MessageType, Reply, Request};
use crate::serialization::Serializer;
use crate::types::{Error, MessageId, ReplyId, Result};

/// Decoded proxy request. The target never travels in this layout.
#[derive(Debug, Clone, PartialEq)]
pub struct ProxyRequestFrames {
    pub msg_type: MessageType,
    pub routing_key: String,
    pub message_id: MessageId,
    pub context: Value,
    pub message: Value,
}

/// Decoded proxy reply, with the metadata frames alongside the full reply.
#[derive(Debug, Clone, PartialEq)]
pub struct ProxyReplyFrames {
    pub msg_type: MessageType,
    pub reply_id: ReplyId,
    pub message_id: MessageId,
    pub reply: Reply,
}

/// Decoded direct reply: the leading identity frame and the reply.
#[derive(Debug, Clone, PartialEq)]
pub struct DirectReplyFrames {
    pub reply_id: ReplyId,
    pub reply: Reply,
}

fn expect_len(frames: &[Bytes], n: usize, layout: &str) -> Result<()> {
    if frames.len() != n {
        return Err(Error::validation(format!(
            "{} expects {} frames, got {}",
            layout,
            n,
            frames.len()
        )));
    }
    Ok(())
}

fn expect_delimiter(frames: &[Bytes], index: usize) -> Result<()> {
    if !frames[index].is_empty() {
        return Err(Error::validation(format!(
            "frame {} must be an empty delimiter, got {} bytes",
            index,
            frames[index].len()
        )));
    }
    Ok(())
}

fn text<'a>(frame: &'a [u8], field: &str) -> Result<&'a str> {
    std::str::from_utf8(frame).map_err(|_| Error::validation(format!("{} is not valid UTF-8", field)))
}

fn message_type(frame: &[u8]) -> Result<MessageType> {
    let label = text(frame, "message type")?;
    MessageType::parse_label(label)
        .ok_or_else(|| Error::validation(format!("unknown message type: {:?}", label)))
}

fn message_id(frame: &[u8]) -> Result<MessageId> {
    MessageId::from_bytes(frame).map_err(Error::validation)
}

fn reply_id(frame: &Bytes) -> Result<ReplyId> {
    ReplyId::from_bytes(frame.clone()).map_err(Error::validation)
}

pub fn parse_proxy_request<Z: Serializer>(
    frames: &[Bytes],
    serializer: &Z,
) -> Result<ProxyRequestFrames> {
    expect_len(frames, 6, "proxy request")?;
    expect_delimiter(frames, 0)?;
    Ok(ProxyRequestFrames {
        msg_type: message_type(&frames[1])?,
        routing_key: text(&frames[2], "routing key")?.to_string(),
        message_id: message_id(&frames[3])?,
        context: serializer.decode(&frames[4])?,
        message: serializer.decode(&frames[5])?,
    })
}

pub fn parse_proxy_reply<Z: Serializer>(frames: &[Bytes], serializer: &Z) -> Result<ProxyReplyFrames> {
    expect_len(frames, 5, "proxy reply")?;
    expect_delimiter(frames, 0)?;
    let msg_type = message_type(&frames[1])?;
    if msg_type != MessageType::Reply {
        return Err(Error::InvalidReplyType { found: msg_type });
    }
    Ok(ProxyReplyFrames {
        msg_type,
        reply_id: reply_id(&frames[2])?,
        message_id: message_id(&frames[3])?,
        reply: serializer.decode(&frames[4])?,
    })
}

pub fn parse_direct_request<Z: Serializer>(frames: &[Bytes], serializer: &Z) -> Result<Request> {
    expect_len(frames, 2, "direct request")?;
    expect_delimiter(frames, 0)?;
    serializer.decode(&frames[1])
}

pub fn parse_direct_reply<Z: Serializer>(frames: &[Bytes], serializer: &Z) -> Result<DirectReplyFrames> {
    expect_len(frames, 3, "direct reply")?;
    expect_delimiter(frames, 1)?;
    Ok(DirectReplyFrames {
        reply_id: reply_id(&frames[0])?,
        reply: serializer.decode(&frames[2])?,
    })
}
