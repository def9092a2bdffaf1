//! Envelope senders.
//!
//! Each sender maps one envelope shape, in one topology, to a fixed ordered
//! frame sequence:
//!
//! ```text
//! proxy  request:  ""  type  routing_key  message_id  context  message
//! proxy  reply:    ""  type  reply_id     message_id  reply
//! direct request:  ""  request
//! direct reply:    reply_id  ""  reply
//! ```
//!
//! Every frame but the last carries MORE. Senders are stateless: all frames
//! are encoded before the first write, so a serialization failure never
//! leaves a partial message on the socket. A transport failure aborts the
//! remaining frames and the socket must be treated as compromised.

use async_trait::async_trait;
use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::envelope::{Envelope, EnvelopeKind, MessageType};
use crate::serialization::{Serializer, WireEncoding};
use crate::transport::{send_multipart, FrameSink};
use crate::types::{Error, Result, TypeRendering, WireConfig};

mod direct;
mod proxy;

pub use direct::{DirectReplySender, DirectRequestSender};
pub use proxy::{ProxyReplySender, ProxyRequestSender};

/// Delivery topology.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Topology {
    /// Through a broker that routes on the metadata frames.
    Proxy,
    /// Point-to-point; the socket pairing does the addressing.
    Direct,
}

impl Topology {
    /// Number of frames a well-formed envelope of `kind` produces.
    pub fn frame_count(self, kind: EnvelopeKind) -> usize {
        match (self, kind) {
            (Topology::Proxy, EnvelopeKind::Request) => 6,
            (Topology::Proxy, EnvelopeKind::Reply) => 5,
            (Topology::Direct, EnvelopeKind::Request) => 2,
            (Topology::Direct, EnvelopeKind::Reply) => 3,
        }
    }
}

/// Frames one envelope shape onto a socket.
#[async_trait]
pub trait Sender: Send + Sync {
    type Envelope: Send + Sync;

    /// Build the complete frame sequence without writing anything.
    fn frames(&self, envelope: &Self::Envelope) -> Result<Vec<Bytes>>;

    /// Write the envelope as one multipart message.
    async fn send<S: FrameSink + ?Sized>(
        &self,
        socket: &mut S,
        envelope: &Self::Envelope,
    ) -> Result<()>;
}

/// Render a message type into its text frame.
pub(crate) fn type_frame(msg_type: MessageType, rendering: TypeRendering) -> Bytes {
    match rendering {
        TypeRendering::Name => Bytes::from_static(msg_type.name().as_bytes()),
        TypeRendering::Code => Bytes::from(msg_type.code().to_string()),
    }
}

/// Write frames, mapping transport failures into the crate error.
pub(crate) async fn write_frames<S: FrameSink + ?Sized>(
    socket: &mut S,
    frames: Vec<Bytes>,
) -> Result<()> {
    send_multipart(socket, frames).await.map_err(|e| {
        tracing::warn!("Frame write failed, socket may hold a partial message: {}", e);
        Error::Io(e)
    })
}

/// Lookup table of all four senders keyed by (topology, kind).
#[derive(Debug, Clone)]
pub struct SenderSet<Z = WireEncoding> {
    proxy_request: ProxyRequestSender<Z>,
    proxy_reply: ProxyReplySender<Z>,
    direct_request: DirectRequestSender<Z>,
    direct_reply: DirectReplySender<Z>,
}

impl SenderSet<WireEncoding> {
    pub fn from_config(config: &WireConfig) -> Self {
        Self::new(config.encoding, config.type_rendering)
    }
}

impl Default for SenderSet<WireEncoding> {
    fn default() -> Self {
        Self::from_config(&WireConfig::default())
    }
}

impl<Z: Serializer + Clone> SenderSet<Z> {
    pub fn new(serializer: Z, type_rendering: TypeRendering) -> Self {
        Self {
            proxy_request: ProxyRequestSender::new(serializer.clone())
                .with_type_rendering(type_rendering),
            proxy_reply: ProxyReplySender::new(serializer.clone())
                .with_type_rendering(type_rendering),
            direct_request: DirectRequestSender::new(serializer.clone()),
            direct_reply: DirectReplySender::new(serializer),
        }
    }

    pub fn proxy_request(&self) -> &ProxyRequestSender<Z> {
        &self.proxy_request
    }

    pub fn proxy_reply(&self) -> &ProxyReplySender<Z> {
        &self.proxy_reply
    }

    pub fn direct_request(&self) -> &DirectRequestSender<Z> {
        &self.direct_request
    }

    pub fn direct_reply(&self) -> &DirectReplySender<Z> {
        &self.direct_reply
    }

    /// Frames the selected sender would write for `envelope`.
    pub fn frames(&self, topology: Topology, envelope: &Envelope) -> Result<Vec<Bytes>> {
        match (topology, envelope) {
            (Topology::Proxy, Envelope::Request(r)) => self.proxy_request.frames(r),
            (Topology::Proxy, Envelope::Reply(r)) => self.proxy_reply.frames(r),
            (Topology::Direct, Envelope::Request(r)) => self.direct_request.frames(r),
            (Topology::Direct, Envelope::Reply(r)) => self.direct_reply.frames(r),
        }
    }

    /// Send `envelope` with the sender registered for (`topology`, its kind).
    pub async fn send<S: FrameSink + ?Sized>(
        &self,
        topology: Topology,
        socket: &mut S,
        envelope: &Envelope,
    ) -> Result<()> {
        tracing::trace!(
            "Dispatching {:?} envelope over {:?} topology",
            envelope.kind(),
            topology
        );
        match (topology, envelope) {
            (Topology::Proxy, Envelope::Request(r)) => self.proxy_request.send(socket, r).await,
            (Topology::Proxy, Envelope::Reply(r)) => self.proxy_reply.send(socket, r).await,
            (Topology::Direct, Envelope::Request(r)) => self.direct_request.send(socket, r).await,
            (Topology::Direct, Envelope::Reply(r)) => self.direct_reply.send(socket, r).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::envelope::{Reply, ReplyBody, Request, Target};
    use crate::serialization::JsonSerializer;
    use crate::transport::MemorySocket;
    use crate::types::{MessageId, ReplyId};
    use serde_json::json;

    fn request() -> Request {
        Request::new(MessageType::Call, Target::new("rpc"), json!({}), json!({"x": 1}))
            .unwrap()
            .with_routing_key("rpc.server1")
    }

    fn reply() -> Reply {
        Reply::new(
            ReplyId::from_bytes(&b"R1"[..]).unwrap(),
            MessageId::from_string("abc-123".to_string()).unwrap(),
            ReplyBody::success(json!("ok")),
        )
    }

    #[test]
    fn test_type_frame_renderings() {
        assert_eq!(type_frame(MessageType::Call, TypeRendering::Name), Bytes::from_static(b"CALL"));
        assert_eq!(type_frame(MessageType::Reply, TypeRendering::Code), Bytes::from_static(b"6"));
    }

    #[tokio::test]
    async fn test_dispatch_table_selects_by_topology_and_kind() {
        let senders = SenderSet::new(JsonSerializer, TypeRendering::Name);
        let envelopes = [Envelope::from(request()), Envelope::from(reply())];

        for topology in [Topology::Proxy, Topology::Direct] {
            for envelope in &envelopes {
                let mut socket = MemorySocket::new();
                senders.send(topology, &mut socket, envelope).await.unwrap();
                assert_eq!(
                    socket.frames().len(),
                    topology.frame_count(envelope.kind()),
                    "{:?} {:?}",
                    topology,
                    envelope.kind()
                );
                assert_eq!(
                    socket.bodies(),
                    senders.frames(topology, envelope).unwrap()
                );
            }
        }
    }

    #[tokio::test]
    async fn test_timeout_keeps_io_error() {
        let senders: SenderSet = SenderSet::default();
        let (client, _server) = tokio::io::duplex(1);
        let mut socket = crate::transport::StreamSocket::new(
            client,
            "duplex",
            std::time::Duration::from_millis(20),
        );
        let err = senders
            .send(Topology::Direct, &mut socket, &Envelope::from(request()))
            .await
            .unwrap_err();
        match &err {
            Error::Io(e) => assert_eq!(e.kind(), std::io::ErrorKind::TimedOut),
            other => panic!("expected io error, got {other:?}"),
        }
        assert!(err.socket_compromised());
    }

    #[test]
    fn test_from_config_honours_rendering() {
        let config = WireConfig {
            type_rendering: TypeRendering::Code,
            ..WireConfig::default()
        };
        let senders = SenderSet::from_config(&config);
        let frames = senders.frames(Topology::Proxy, &Envelope::from(request())).unwrap();
        assert_eq!(&frames[1][..], b"1");
    }
}
