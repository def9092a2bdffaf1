//! Frame sink over a tokio byte stream.

use async_trait::async_trait;
use bytes::Bytes;
use std::time::Duration;
use tokio::io::AsyncWrite;

use super::codec::write_frame;
use super::FrameSink;
use crate::types::WireConfig;

/// Writes frames with [`write_frame`], each bounded by a write timeout.
#[derive(Debug)]
pub struct StreamSocket<W> {
    writer: W,
    peer: String,
    write_timeout: Duration,
}

impl<W: AsyncWrite + Unpin + Send> StreamSocket<W> {
    pub fn new(writer: W, peer: impl Into<String>, write_timeout: Duration) -> Self {
        Self {
            writer,
            peer: peer.into(),
            write_timeout,
        }
    }

    pub fn from_config(writer: W, peer: impl Into<String>, config: &WireConfig) -> Self {
        Self::new(writer, peer, config.write_timeout)
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

#[async_trait]
impl<W: AsyncWrite + Unpin + Send> FrameSink for StreamSocket<W> {
    async fn send_frame(&mut self, frame: Bytes, more: bool) -> std::io::Result<()> {
        tokio::time::timeout(self.write_timeout, write_frame(&mut self.writer, &frame, more))
            .await
            .map_err(|_| {
                tracing::warn!(
                    peer = %self.peer,
                    "Write timeout ({}ms), frame not delivered",
                    self.write_timeout.as_millis()
                );
                std::io::Error::new(std::io::ErrorKind::TimedOut, "write timeout")
            })?
    }

    fn peers(&self) -> Vec<String> {
        vec![self.peer.clone()]
    }
}
