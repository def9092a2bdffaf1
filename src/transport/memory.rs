//! In-memory frame sink.

use async_trait::async_trait;
use bytes::Bytes;

use super::FrameSink;

/// Records every frame written, in order, with its MORE flag.
///
/// Can be armed to fail a given write attempt, leaving the frames before it
/// recorded, which is what a real socket holds after a mid-message failure.
#[derive(Debug, Default)]
pub struct MemorySocket {
    frames: Vec<(Bytes, bool)>,
    attempts: usize,
    fail_at: Option<usize>,
    peers: Vec<String>,
}

impl MemorySocket {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_peer(mut self, peer: impl Into<String>) -> Self {
        self.peers.push(peer.into());
        self
    }

    /// Fail the write attempt with zero-based index `n` with `BrokenPipe`.
    pub fn fail_on_write(mut self, n: usize) -> Self {
        self.fail_at = Some(n);
        self
    }

    /// All recorded `(body, more)` pairs.
    pub fn frames(&self) -> &[(Bytes, bool)] {
        &self.frames
    }

    pub fn bodies(&self) -> Vec<Bytes> {
        self.frames.iter().map(|(b, _)| b.clone()).collect()
    }

    pub fn more_flags(&self) -> Vec<bool> {
        self.frames.iter().map(|(_, m)| *m).collect()
    }

    /// Recorded frames grouped into complete messages. Trailing frames of an
    /// unterminated message are left out.
    pub fn messages(&self) -> Vec<Vec<Bytes>> {
        let mut messages = Vec::new();
        let mut current = Vec::new();
        for (body, more) in &self.frames {
            current.push(body.clone());
            if !more {
                messages.push(std::mem::take(&mut current));
            }
        }
        messages
    }
}

#[async_trait]
impl FrameSink for MemorySocket {
    async fn send_frame(&mut self, frame: Bytes, more: bool) -> std::io::Result<()> {
        let attempt = self.attempts;
        self.attempts += 1;
        if self.fail_at == Some(attempt) {
            return Err(std::io::Error::new(
                std::io::ErrorKind::BrokenPipe,
                format!("injected failure on write {}", attempt),
            ));
        }
        self.frames.push((frame, more));
        Ok(())
    }

    fn peers(&self) -> Vec<String> {
        self.peers.clone()
    }
}
