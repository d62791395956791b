mod common;

use std::net::SocketAddr;
use std::sync::Arc;

use common::{Scratch, split_response};
use lantern::files::DocumentRoot;
use lantern::logging::{AccessLog, MemorySink};
use lantern::server::Server;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;

async fn start(root: &Scratch) -> (SocketAddr, Arc<MemorySink>) {
    let sink = Arc::new(MemorySink::new());
    let log = AccessLog::new(sink.clone());

    let server = Server::bind("127.0.0.1:0", DocumentRoot::new(root.path()), log)
        .await
        .unwrap();
    let addr = server.local_addr().unwrap();
    tokio::spawn(server.run());

    (addr, sink)
}

async fn fetch(addr: SocketAddr, request: &[u8]) -> Vec<u8> {
    let mut stream = TcpStream::connect(addr).await.unwrap();
    stream.write_all(request).await.unwrap();

    // A dropped connection may surface as a reset instead of a clean EOF.
    let mut raw = Vec::new();
    let _ = stream.read_to_end(&mut raw).await;
    raw
}

#[tokio::test]
async fn test_serves_over_tcp() {
    let dir = Scratch::new("server-basic");
    dir.write("index.html", "<h1>hello</h1>");
    let (addr, sink) = start(&dir).await;

    let raw = fetch(addr, b"GET / HTTP/1.1\r\nHost: localhost\r\n\r\n").await;
    let (status, _, body) = split_response(&raw);

    assert_eq!(status, "HTTP/1.1 200 OK");
    assert_eq!(body, b"<h1>hello</h1>");

    let lines = sink.lines();
    assert_eq!(lines.len(), 1);
    assert!(lines[0].contains(" – 127.0.0.1:"));
    assert!(lines[0].ends_with("\"GET / HTTP/1.1\" – 200"));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_requests_get_their_own_bodies() {
    let dir = Scratch::new("server-concurrent");
    let a: Vec<u8> = std::iter::repeat(b'a').take(200_000).collect();
    let b: Vec<u8> = std::iter::repeat(b'b').take(150_000).collect();
    dir.write("a.txt", &a);
    dir.write("b.txt", &b);
    let (addr, sink) = start(&dir).await;

    let mut tasks = Vec::new();
    for i in 0..16 {
        let (path, expected) = if i % 2 == 0 {
            ("/a.txt", a.clone())
        } else {
            ("/b.txt", b.clone())
        };
        tasks.push(tokio::spawn(async move {
            let request = format!("GET {path} HTTP/1.1\r\n\r\n");
            let raw = fetch(addr, request.as_bytes()).await;
            let (status, _, body) = split_response(&raw);
            assert_eq!(status, "HTTP/1.1 200 OK");
            assert!(body == expected, "body mixed up for {path}");
        }));
    }

    for task in tasks {
        task.await.unwrap();
    }

    // Logging happens before the socket is dropped, so every line is in by now.
    let lines = sink.lines();
    assert_eq!(lines.len(), 16);
    assert!(lines.iter().all(|line| line.starts_with("[INFO] ") && line.ends_with(" – 200")));
}

#[tokio::test]
async fn test_malformed_request_gets_no_bytes() {
    let dir = Scratch::new("server-malformed");
    dir.write("index.html", "home");
    let (addr, sink) = start(&dir).await;

    let raw = fetch(addr, b"GET /\r\n\r\n").await;

    assert!(raw.is_empty());
    assert!(sink.lines().is_empty());
}

#[tokio::test]
async fn test_server_keeps_accepting_after_bad_clients() {
    let dir = Scratch::new("server-resilient");
    dir.write("ok.txt", "ok");
    let (addr, _) = start(&dir).await;

    // A client that connects and leaves without sending anything.
    drop(TcpStream::connect(addr).await.unwrap());
    let _ = fetch(addr, b"nonsense\r\n").await;

    let raw = fetch(addr, b"GET /ok.txt HTTP/1.1\r\n\r\n").await;
    let (status, _, body) = split_response(&raw);
    assert_eq!(status, "HTTP/1.1 200 OK");
    assert_eq!(body, b"ok");
}

#[tokio::test]
async fn test_bind_failure_is_reported() {
    let dir = Scratch::new("server-bind");
    let log = AccessLog::new(Arc::new(MemorySink::new()));

    let result = Server::bind("not-an-address", DocumentRoot::new(dir.path()), log).await;
    assert!(result.is_err());
}

#[tokio::test]
async fn test_failed_shutdown_signal_keeps_serving() {
    let dir = Scratch::new("server-signal-error");
    dir.write("ok.txt", "ok");
    let log = AccessLog::new(Arc::new(MemorySink::new()));
    let server = Server::bind("127.0.0.1:0", DocumentRoot::new(dir.path()), log)
        .await
        .unwrap();
    let addr = server.local_addr().unwrap();

    let handle = tokio::spawn(server.run_until(async {
        Err(std::io::Error::other("signal handler unavailable"))
    }));

    let raw = fetch(addr, b"GET /ok.txt HTTP/1.1\r\n\r\n").await;
    let (status, _, body) = split_response(&raw);
    assert_eq!(status, "HTTP/1.1 200 OK");
    assert_eq!(body, b"ok");
    assert!(!handle.is_finished());

    handle.abort();
}

#[tokio::test]
async fn test_shutdown_signal_stops_server() {
    let dir = Scratch::new("server-signal-ok");
    let log = AccessLog::new(Arc::new(MemorySink::new()));
    let server = Server::bind("127.0.0.1:0", DocumentRoot::new(dir.path()), log)
        .await
        .unwrap();
    let addr = server.local_addr().unwrap();

    server.run_until(async { Ok(()) }).await;

    assert!(TcpStream::connect(addr).await.is_err());
}
