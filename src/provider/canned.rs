//! One-shot local HTTP server answering a single request with a fixed reply.

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

/// Bind on a free port, answer the first request with `status` and `body`,
/// and return the base URL plus a handle yielding the raw request text.
pub async fn serve_once(status: u16, body: &str) -> (String, tokio::task::JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base = format!("http://{}", listener.local_addr().unwrap());
    let body = body.to_string();

    let handle = tokio::spawn(async move {
        let (mut sock, _) = listener.accept().await.unwrap();
        let request = read_request(&mut sock).await;

        let reply = format!(
            "HTTP/1.1 {status} Canned\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
            body.len()
        );
        sock.write_all(reply.as_bytes()).await.unwrap();
        sock.shutdown().await.ok();
        request
    });

    (base, handle)
}

// Headers up to the blank line, then exactly content-length bytes of body.
async fn read_request(sock: &mut tokio::net::TcpStream) -> String {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];
    let header_end = loop {
        let n = sock.read(&mut chunk).await.unwrap();
        assert!(n > 0, "client closed before sending headers");
        buf.extend_from_slice(&chunk[..n]);
        if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos + 4;
        }
    };

    let head = String::from_utf8_lossy(&buf[..header_end]).to_lowercase();
    let want = head
        .lines()
        .find_map(|l| l.strip_prefix("content-length:"))
        .and_then(|v| v.trim().parse::<usize>().ok())
        .unwrap_or(0);

    while buf.len() < header_end + want {
        let n = sock.read(&mut chunk).await.unwrap();
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
    }
    String::from_utf8_lossy(&buf).into_owned()
}

pub fn request() -> crate::wire::LlmRequest {
    use crate::wire::{Instruction, LlmRequest, Tx};
    LlmRequest {
        schema_version: "v1".into(),
        stage: crate::planner::Stage::Optimizing,
        transaction: Tx { id: uuid::Uuid::new_v4(), timestamp: chrono::Utc::now() },
        instruction: Instruction {
            system: "SYSTEM TEXT".into(),
            user: "USER TEXT".into(),
        },
        input: serde_json::json!({}),
        output_schema: serde_json::json!({}),
    }
}
