//! Stream integration tests — senders over TCP, decoded by the frame codec.

use rpc_framing::inbound::{parse_direct_reply, parse_proxy_request};
use rpc_framing::transport::codec::read_multipart;
use rpc_framing::transport::StreamSocket;
use rpc_framing::types::{MessageId, ReplyId, WireConfig};
use rpc_framing::{Envelope, MessageType, Reply, ReplyBody, Request, SenderSet, Target, Topology};
use serde_json::json;
use tokio::net::{TcpListener, TcpStream};

/// Helper: connected (client, server) TCP pair on a random local port.
async fn tcp_pair() -> (TcpStream, TcpStream) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (client, accepted) = tokio::join!(TcpStream::connect(addr), listener.accept());
    (client.unwrap(), accepted.unwrap().0)
}

#[tokio::test]
async fn proxy_request_over_tcp() {
    let config = WireConfig::default();
    let senders = SenderSet::from_config(&config);
    let (client, mut server) = tcp_pair().await;
    let peer = client.peer_addr().unwrap().to_string();
    let mut socket = StreamSocket::from_config(client, peer, &config);

    let request = Request::new(
        MessageType::Call,
        Target::new("compute"),
        json!({"tenant": "demo"}),
        json!({"method": "resize", "args": {"flavor": 3}}),
    )
    .unwrap();
    senders
        .send(Topology::Proxy, &mut socket, &Envelope::from(request.clone()))
        .await
        .unwrap();

    let frames = read_multipart(&mut server, config.max_frame_bytes)
        .await
        .unwrap()
        .unwrap();
    let parsed = parse_proxy_request(&frames, &config.encoding).unwrap();
    assert_eq!(parsed.msg_type, MessageType::Call);
    assert_eq!(parsed.routing_key, "compute");
    assert_eq!(parsed.message_id, request.message_id);
    assert_eq!(parsed.message, request.message);
}

#[tokio::test]
async fn consecutive_replies_stay_contiguous() {
    let config = WireConfig::default();
    let senders = SenderSet::from_config(&config);
    let (client, mut server) = tcp_pair().await;
    let mut socket = StreamSocket::from_config(client, "router", &config);

    let replies: Vec<Reply> = (0..3)
        .map(|i| {
            Reply::new(
                ReplyId::from_bytes(format!("peer-{i}").into_bytes()).unwrap(),
                MessageId::new(),
                ReplyBody::success(json!(i)),
            )
        })
        .collect();

    for reply in &replies {
        senders
            .send(Topology::Direct, &mut socket, &Envelope::from(reply.clone()))
            .await
            .unwrap();
    }
    drop(socket);

    for reply in &replies {
        let frames = read_multipart(&mut server, config.max_frame_bytes)
            .await
            .unwrap()
            .unwrap();
        let parsed = parse_direct_reply(&frames, &config.encoding).unwrap();
        assert_eq!(&parsed.reply_id, &reply.reply_id);
        assert_eq!(&parsed.reply, reply);
    }
    assert!(read_multipart(&mut server, config.max_frame_bytes)
        .await
        .unwrap()
        .is_none());
}
