//! Senders for direct (peer-to-peer) topology.
//!
//! The socket pairing already addresses the peer, so all metadata rides
//! inside the single serialized envelope. A reply leads with the peer
//! identity so the routing socket can strip it, and only then the delimiter.

use async_trait::async_trait;
use bytes::Bytes;

use super::{write_frames, Sender};
use crate::envelope::{Reply, Request};
use crate::serialization::{Serializer, WireEncoding};
use crate::transport::FrameSink;
use crate::types::Result;

/// `""`, request.
#[derive(Debug, Clone, Default)]
pub struct DirectRequestSender<Z = WireEncoding> {
    serializer: Z,
}

impl<Z: Serializer> DirectRequestSender<Z> {
    pub fn new(serializer: Z) -> Self {
        Self { serializer }
    }
}

#[async_trait]
impl<Z: Serializer> Sender for DirectRequestSender<Z> {
    type Envelope = Request;

    fn frames(&self, request: &Request) -> Result<Vec<Bytes>> {
        Ok(vec![Bytes::new(), self.serializer.encode(request)?])
    }

    async fn send<S: FrameSink + ?Sized>(&self, socket: &mut S, request: &Request) -> Result<()> {
        let frames = self.frames(request)?;
        write_frames(socket, frames).await?;

        tracing::debug!(
            "Sending {} message {} to target {}",
            request.msg_type,
            request.message_id,
            request.target,
        );
        Ok(())
    }
}

/// reply id, `""`, reply.
#[derive(Debug, Clone, Default)]
pub struct DirectReplySender<Z = WireEncoding> {
    serializer: Z,
}

impl<Z: Serializer> DirectReplySender<Z> {
    pub fn new(serializer: Z) -> Self {
        Self { serializer }
    }
}

#[async_trait]
impl<Z: Serializer> Sender for DirectReplySender<Z> {
    type Envelope = Reply;

    fn frames(&self, reply: &Reply) -> Result<Vec<Bytes>> {
        reply.ensure_reply_type()?;
        Ok(vec![
            reply.reply_id.to_frame(),
            Bytes::new(),
            self.serializer.encode(reply)?,
        ])
    }

    async fn send<S: FrameSink + ?Sized>(&self, socket: &mut S, reply: &Reply) -> Result<()> {
        tracing::debug!(
            "Replying to {} (failure={})",
            reply.message_id,
            reply.body.is_failure()
        );

        let frames = match self.frames(reply) {
            Ok(frames) => frames,
            Err(e) => {
                tracing::error!("Refusing to frame reply {}: {}", reply.message_id, e);
                return Err(e);
            }
        };
        write_frames(socket, frames).await
    }
}
