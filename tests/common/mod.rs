//! Shared utilities for gateway integration testing.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use serde_json::json;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

/// Start a mock backend API.
///
/// Serves its schema document at `/.api-core` and answers every other
/// request with `<name>:<path>` so tests can assert which backend was hit
/// and with what rewritten path. The returned counter tracks non-schema
/// hits.
pub async fn start_api_backend(
    addr: SocketAddr,
    name: &'static str,
    edges: &'static [(&'static str, &'static str)],
) -> Arc<AtomicU32> {
    let listener = TcpListener::bind(addr).await.unwrap();
    let hits = Arc::new(AtomicU32::new(0));
    let counter = hits.clone();

    let metadata = json!({
        "name": name,
        "edges": edges
            .iter()
            .map(|(edge, plural)| json!({ "name": edge, "pluralName": plural }))
            .collect::<Vec<_>>(),
    })
    .to_string();

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((socket, _)) => {
                    let counter = counter.clone();
                    let metadata = metadata.clone();
                    tokio::spawn(async move {
                        serve_one(socket, name, metadata, counter).await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    hits
}

async fn serve_one(
    mut socket: TcpStream,
    name: &'static str,
    metadata: String,
    hits: Arc<AtomicU32>,
) {
    let path = match read_request_path(&mut socket).await {
        Some(path) => path,
        None => return,
    };

    let (content_type, body) = if path == "/.api-core" {
        ("application/json", metadata)
    } else {
        hits.fetch_add(1, Ordering::SeqCst);
        ("text/plain", format!("{name}:{path}"))
    };

    let response = format!(
        "HTTP/1.1 200 OK\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        content_type,
        body.len(),
        body
    );
    let _ = socket.write_all(response.as_bytes()).await;
    let _ = socket.shutdown().await;
}

/// Read the request head and extract the path from the request line.
async fn read_request_path(socket: &mut TcpStream) -> Option<String> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];

    while !buf.windows(4).any(|w| w == b"\r\n\r\n") {
        match socket.read(&mut chunk).await {
            Ok(0) | Err(_) => break,
            Ok(n) => buf.extend_from_slice(&chunk[..n]),
        }
    }

    let head = String::from_utf8_lossy(&buf);
    let request_line = head.lines().next()?;
    request_line.split_whitespace().nth(1).map(str::to_owned)
}

/// A reqwest client that never reuses connections, so each request sees
/// the current listener state.
#[allow(dead_code)]
pub fn test_client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .build()
        .unwrap()
}
