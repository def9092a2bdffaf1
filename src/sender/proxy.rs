//! Senders for broker-mediated (proxy) topology.
//!
//! Both layouts open with the empty delimiter so the broker can split its
//! return path from the envelope, then carry routing and correlation
//! metadata as plain frames the broker reads without decoding payloads.

use async_trait::async_trait;
use bytes::Bytes;

use super::{type_frame, write_frames, Sender};
use crate::envelope::{Reply, Request};
use crate::serialization::{Serializer, WireEncoding};
use crate::transport::FrameSink;
use crate::types::{Result, TypeRendering};

/// `""`, type, routing key, message id, context, message.
#[derive(Debug, Clone, Default)]
pub struct ProxyRequestSender<Z = WireEncoding> {
    serializer: Z,
    type_rendering: TypeRendering,
}

impl<Z: Serializer> ProxyRequestSender<Z> {
    pub fn new(serializer: Z) -> Self {
        Self {
            serializer,
            type_rendering: TypeRendering::default(),
        }
    }

    pub fn with_type_rendering(mut self, type_rendering: TypeRendering) -> Self {
        self.type_rendering = type_rendering;
        self
    }
}

#[async_trait]
impl<Z: Serializer> Sender for ProxyRequestSender<Z> {
    type Envelope = Request;

    fn frames(&self, request: &Request) -> Result<Vec<Bytes>> {
        Ok(vec![
            Bytes::new(),
            type_frame(request.msg_type, self.type_rendering),
            Bytes::copy_from_slice(request.routing_key.as_bytes()),
            Bytes::copy_from_slice(request.message_id.as_bytes()),
            self.serializer.encode(&request.context)?,
            self.serializer.encode(&request.message)?,
        ])
    }

    async fn send<S: FrameSink + ?Sized>(&self, socket: &mut S, request: &Request) -> Result<()> {
        let frames = self.frames(request)?;
        write_frames(socket, frames).await?;

        tracing::debug!(
            "->[proxy:{:?}] Sending {} message {} to target {}",
            socket.peers(),
            request.msg_type,
            request.message_id,
            request.target,
        );
        Ok(())
    }
}

/// `""`, type, reply id, message id, reply.
#[derive(Debug, Clone, Default)]
pub struct ProxyReplySender<Z = WireEncoding> {
    serializer: Z,
    type_rendering: TypeRendering,
}

impl<Z: Serializer> ProxyReplySender<Z> {
    pub fn new(serializer: Z) -> Self {
        Self {
            serializer,
            type_rendering: TypeRendering::default(),
        }
    }

    pub fn with_type_rendering(mut self, type_rendering: TypeRendering) -> Self {
        self.type_rendering = type_rendering;
        self
    }
}

#[async_trait]
impl<Z: Serializer> Sender for ProxyReplySender<Z> {
    type Envelope = Reply;

    fn frames(&self, reply: &Reply) -> Result<Vec<Bytes>> {
        reply.ensure_reply_type()?;
        Ok(vec![
            Bytes::new(),
            type_frame(reply.msg_type, self.type_rendering),
            reply.reply_id.to_frame(),
            Bytes::copy_from_slice(reply.message_id.as_bytes()),
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::envelope::{MessageType, ReplyBody, Target};
    use crate::serialization::JsonSerializer;
    use crate::transport::MemorySocket;
    use crate::types::{Error, MessageId, ReplyId};
    use serde_json::{json, Value};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tracing_test::traced_test;

    fn request() -> Request {
        Request::new(
            MessageType::Call,
            Target::new("rpc").with_server("server1"),
            json!({"user": "admin"}),
            json!({"method": "echo", "args": {"x": 1}}),
        )
        .unwrap()
        .with_message_id(MessageId::from_string("abc-123".to_string()).unwrap())
    }

    fn reply() -> Reply {
        Reply::new(
            ReplyId::from_bytes(&b"R1"[..]).unwrap(),
            MessageId::from_string("abc-123".to_string()).unwrap(),
            ReplyBody::success(json!("ok")),
        )
    }

    #[tokio::test]
    #[traced_test]
    async fn test_request_frames_and_event() {
        let sender = ProxyRequestSender::new(JsonSerializer);
        let mut socket = MemorySocket::new().with_peer("tcp://broker:9501");
        sender.send(&mut socket, &request()).await.unwrap();

        let bodies = socket.bodies();
        assert_eq!(bodies.len(), 6);
        assert!(bodies[0].is_empty());
        assert_eq!(&bodies[1][..], b"CALL");
        assert_eq!(&bodies[2][..], b"rpc.server1");
        assert_eq!(&bodies[3][..], b"abc-123");
        assert_eq!(
            serde_json::from_slice::<Value>(&bodies[4]).unwrap(),
            json!({"user": "admin"})
        );
        assert_eq!(socket.more_flags(), vec![true, true, true, true, true, false]);

        assert!(logs_contain("Sending CALL message abc-123 to target rpc.server1"));
        assert!(logs_contain("tcp://broker:9501"));
    }

    #[tokio::test]
    async fn test_reply_frames() {
        let sender = ProxyReplySender::new(JsonSerializer);
        let mut socket = MemorySocket::new();
        sender.send(&mut socket, &reply()).await.unwrap();

        let bodies = socket.bodies();
        assert_eq!(bodies.len(), 5);
        assert!(bodies[0].is_empty());
        assert_eq!(&bodies[1][..], b"REPLY");
        assert_eq!(&bodies[2][..], b"R1");
        assert_eq!(&bodies[3][..], b"abc-123");
        let decoded: Reply = serde_json::from_slice(&bodies[4]).unwrap();
        assert_eq!(decoded, reply());
        assert_eq!(socket.more_flags(), vec![true, true, true, true, false]);
    }

    #[tokio::test]
    #[traced_test]
    async fn test_non_reply_type_writes_nothing() {
        let sender = ProxyReplySender::new(JsonSerializer);
        let mut socket = MemorySocket::new();
        let mut bad = reply();
        bad.msg_type = MessageType::Call;

        let err = sender.send(&mut socket, &bad).await.unwrap_err();
        assert!(matches!(err, Error::InvalidReplyType { found: MessageType::Call }));
        assert!(socket.frames().is_empty());
        assert!(logs_contain("Replying to abc-123 (failure=false)"));
        assert!(logs_contain("Refusing to frame reply abc-123"));
    }

    /// Fails the `fail_at`-th (zero-based) encode, JSON otherwise.
    #[derive(Debug)]
    struct FailingSerializer {
        encodes: AtomicUsize,
        fail_at: usize,
    }

    impl FailingSerializer {
        fn new(fail_at: usize) -> Self {
            Self {
                encodes: AtomicUsize::new(0),
                fail_at,
            }
        }
    }

    impl Serializer for FailingSerializer {
        fn name(&self) -> &'static str {
            "failing"
        }

        fn encode<T: serde::Serialize + ?Sized>(&self, value: &T) -> Result<Bytes> {
            if self.encodes.fetch_add(1, Ordering::SeqCst) == self.fail_at {
                return Err(Error::Serialization("boom".to_string()));
            }
            JsonSerializer.encode(value)
        }

        fn decode<T: serde::de::DeserializeOwned>(&self, bytes: &[u8]) -> Result<T> {
            JsonSerializer.decode(bytes)
        }
    }

    #[tokio::test]
    async fn test_message_encode_failure_writes_nothing() {
        // Context encodes fine, the message body (second encode) fails.
        let sender = ProxyRequestSender::new(FailingSerializer::new(1));
        let mut socket = MemorySocket::new();

        let err = sender.send(&mut socket, &request()).await.unwrap_err();
        assert!(matches!(err, Error::Serialization(ref msg) if msg == "boom"));
        assert!(!err.socket_compromised());
        assert!(socket.frames().is_empty());
    }

    #[tokio::test]
    async fn test_reply_encode_failure_writes_nothing() {
        let sender = ProxyReplySender::new(FailingSerializer::new(0));
        let mut socket = MemorySocket::new();

        let err = sender.send(&mut socket, &reply()).await.unwrap_err();
        assert!(matches!(err, Error::Serialization(_)));
        assert!(socket.frames().is_empty());
    }

    #[tokio::test]
    async fn test_code_rendering() {
        let sender = ProxyReplySender::new(JsonSerializer).with_type_rendering(TypeRendering::Code);
        let frames = sender.frames(&reply()).unwrap();
        assert_eq!(&frames[1][..], b"6");
    }
}
