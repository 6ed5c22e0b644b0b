//! Shared utilities for integration testing.

use std::net::SocketAddr;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;

use ackd::config::ListenerConfig;
use ackd::http::AckServer;
use ackd::lifecycle::Reaper;
use ackd::net::Listener;

/// Start a server on an ephemeral loopback port and return its address
/// and the reaper observing its workers.
pub async fn start_server() -> (SocketAddr, Reaper) {
    let config = ListenerConfig {
        bind_address: "127.0.0.1:0".to_string(),
        backlog: 5,
    };
    let listener = Listener::bind(&config).await.unwrap();
    let addr = listener.local_addr().unwrap();

    let reaper = Reaper::spawn();
    let server = AckServer::new(reaper.clone());
    tokio::spawn(async move {
        let _ = server.run(listener).await;
    });

    (addr, reaper)
}

/// Send a request and collect everything the server writes back until
/// it closes the connection.
pub async fn send_and_collect(addr: SocketAddr, request: &[u8]) -> Vec<u8> {
    let mut stream = TcpStream::connect(addr).await.unwrap();
    stream.write_all(request).await.unwrap();

    let mut reply = Vec::new();
    stream.read_to_end(&mut reply).await.unwrap();
    reply
}

/// Like `send_and_collect`, but tolerates a connection reset. The server
/// closes with unread bytes still queued when a request exceeds its
/// single bounded read, which surfaces as RST rather than FIN.
#[allow(dead_code)]
pub async fn send_and_collect_lossy(addr: SocketAddr, request: &[u8]) -> Vec<u8> {
    let mut stream = TcpStream::connect(addr).await.unwrap();
    let _ = stream.write_all(request).await;

    let mut reply = Vec::new();
    match stream.read_to_end(&mut reply).await {
        Ok(_) => {}
        Err(e) if e.kind() == std::io::ErrorKind::ConnectionReset => {}
        Err(e) => panic!("unexpected read error: {}", e),
    }
    reply
}
