//! Multipart transport boundary.
//!
//! Senders write through [`FrameSink`], an ordered frame writer with an
//! explicit "more frames follow" marker. A sink is single-writer: frames of
//! one message must be contiguous, so callers serialize access per socket.
//!
//! - [`StreamSocket`]: frames onto any tokio byte stream via [`codec`]
//! - [`MemorySocket`]: records frames in memory, with write-failure injection

use async_trait::async_trait;
use bytes::Bytes;

pub mod codec;
mod memory;
mod stream;

pub use memory::MemorySocket;
pub use stream::StreamSocket;

/// Ordered multipart writer.
#[async_trait]
pub trait FrameSink: Send {
    /// Write one frame; `more` marks that another frame of the same message
    /// follows.
    async fn send_frame(&mut self, frame: Bytes, more: bool) -> std::io::Result<()>;

    /// Connected peers, for diagnostics.
    fn peers(&self) -> Vec<String> {
        Vec::new()
    }
}

/// Write `frames` as one message: MORE on every frame but the last.
///
/// The first failed write aborts the rest; frames already written stay on the
/// wire.
pub async fn send_multipart<S: FrameSink + ?Sized>(
    socket: &mut S,
    frames: Vec<Bytes>,
) -> std::io::Result<()> {
    let last = frames.len().saturating_sub(1);
    for (i, frame) in frames.into_iter().enumerate() {
        socket.send_frame(frame, i < last).await?;
    }
    Ok(())
}
