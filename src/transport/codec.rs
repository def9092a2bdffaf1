//! Frame codec for multipart messages on a byte stream.
//!
//! Frame format (ZMTP 3.x style, no greeting or handshake):
//! ```text
//! ┌──────────┬──────────────────────┬──────────────────┐
//! │ flags 1B │ size: 1B or 8B (BE)  │ body             │
//! └──────────┴──────────────────────┴──────────────────┘
//! ```
//! `flags` bit 0 = MORE (another frame of the same message follows),
//! bit 1 = LONG (size is a u64 instead of a u8), bit 2 = COMMAND (rejected).
//! Bodies of 255 bytes or fewer always use the short form.

use bytes::Bytes;
use tokio::io::{AsyncReadExt, AsyncWriteExt};

/// Another frame of the same message follows.
pub const FLAG_MORE: u8 = 0x01;
/// Size field is 8 bytes.
pub const FLAG_LONG: u8 = 0x02;
/// Command frame (not used by this protocol).
pub const FLAG_COMMAND: u8 = 0x04;

const MAX_SHORT_BODY: usize = u8::MAX as usize;

/// One decoded frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub body: Bytes,
    pub more: bool,
}

/// Encode the flags byte and size field for a body of `len` bytes.
///
/// Returns the header buffer and how many of its bytes are used.
pub fn encode_header(len: usize, more: bool) -> ([u8; 9], usize) {
    let mut header = [0u8; 9];
    let mut flags = if more { FLAG_MORE } else { 0 };
    if len <= MAX_SHORT_BODY {
        header[0] = flags;
        header[1] = len as u8;
        (header, 2)
    } else {
        flags |= FLAG_LONG;
        header[0] = flags;
        header[1..9].copy_from_slice(&(len as u64).to_be_bytes());
        (header, 9)
    }
}

/// Read one frame from the stream.
///
/// Returns `None` on clean EOF before the flags byte.
/// `max_frame_bytes` caps the maximum accepted body size.
pub async fn read_frame<R: AsyncReadExt + Unpin>(
    reader: &mut R,
    max_frame_bytes: u64,
) -> std::io::Result<Option<Frame>> {
    let flags = match reader.read_u8().await {
        Ok(b) => b,
        Err(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => return Ok(None),
        Err(e) => return Err(e),
    };

    if flags & FLAG_COMMAND != 0 {
        return Err(std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            "Unexpected command frame",
        ));
    }
    if flags & !(FLAG_MORE | FLAG_LONG) != 0 {
        return Err(std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            format!("Reserved frame flag bits set: 0x{:02X}", flags),
        ));
    }

    let size = if flags & FLAG_LONG != 0 {
        reader.read_u64().await?
    } else {
        u64::from(reader.read_u8().await?)
    };
    if size > max_frame_bytes {
        return Err(std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            format!("Frame too large: {} bytes", size),
        ));
    }

    let mut body = vec![0u8; size as usize];
    reader.read_exact(&mut body).await?;

    Ok(Some(Frame {
        body: Bytes::from(body),
        more: flags & FLAG_MORE != 0,
    }))
}

/// Write one frame to the stream. The writer is flushed after the last frame
/// of a message.
pub async fn write_frame<W: AsyncWriteExt + Unpin>(
    writer: &mut W,
    body: &[u8],
    more: bool,
) -> std::io::Result<()> {
    let (header, header_len) = encode_header(body.len(), more);
    writer.write_all(&header[..header_len]).await?;
    writer.write_all(body).await?;
    if !more {
        writer.flush().await?;
    }
    Ok(())
}

/// Read frames until one arrives without the MORE flag.
///
/// Returns `None` on clean EOF between messages; EOF inside a message is an
/// `UnexpectedEof` error.
pub async fn read_multipart<R: AsyncReadExt + Unpin>(
    reader: &mut R,
    max_frame_bytes: u64,
) -> std::io::Result<Option<Vec<Bytes>>> {
    let mut frames = Vec::new();
    loop {
        match read_frame(reader, max_frame_bytes).await? {
            Some(frame) => {
                let more = frame.more;
                frames.push(frame.body);
                if !more {
                    return Ok(Some(frames));
                }
            }
            None if frames.is_empty() => return Ok(None),
            None => {
                return Err(std::io::Error::new(
                    std::io::ErrorKind::UnexpectedEof,
                    format!("EOF after {} frame(s) of an unfinished message", frames.len()),
                ))
            }
        }
    }
}
