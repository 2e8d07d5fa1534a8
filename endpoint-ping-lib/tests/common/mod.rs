//! Minimal HTTP/1.1 responder for integration tests.
//!
//! Routes:
//! - `/status/<code>` answers with `<code>` and an empty body, then closes
//! - `/big/<code>` answers with `<code>` and a 256 KiB body, keeping the
//!   connection alive for the next request
//! - `/slow` never answers
//! - anything else answers 200

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;

const BIG_BODY_LEN: usize = 256 * 1024;

pub struct TestServer {
    addr: SocketAddr,
    requests: Arc<AtomicUsize>,
    open_connections: Arc<AtomicUsize>,
    handle: JoinHandle<()>,
}

impl TestServer {
    pub async fn start() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let requests = Arc::new(AtomicUsize::new(0));
        let open_connections = Arc::new(AtomicUsize::new(0));

        let handle = {
            let requests = Arc::clone(&requests);
            let open_connections = Arc::clone(&open_connections);
            tokio::spawn(async move {
                loop {
                    let Ok((stream, _)) = listener.accept().await else {
                        tokio::time::sleep(Duration::from_millis(5)).await;
                        continue;
                    };
                    let requests = Arc::clone(&requests);
                    let open_connections = Arc::clone(&open_connections);
                    open_connections.fetch_add(1, Ordering::SeqCst);
                    tokio::spawn(async move {
                        serve_connection(stream, &requests).await;
                        open_connections.fetch_sub(1, Ordering::SeqCst);
                    });
                }
            })
        };

        Self {
            addr,
            requests,
            open_connections,
            handle,
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    pub fn requests(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }

    pub fn open_connections(&self) -> usize {
        self.open_connections.load(Ordering::SeqCst)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Port on 127.0.0.1 with nothing listening.
pub fn unreachable_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    format!("http://127.0.0.1:{}/", port)
}

async fn serve_connection(stream: TcpStream, requests: &AtomicUsize) {
    let mut reader = BufReader::new(stream);

    loop {
        let Some(path) = read_request_path(&mut reader).await else {
            return;
        };
        requests.fetch_add(1, Ordering::SeqCst);

        if path == "/slow" {
            tokio::time::sleep(Duration::from_secs(60)).await;
            return;
        }

        let (code, keep_alive, body_len) = route(&path);
        let connection = if keep_alive { "keep-alive" } else { "close" };
        let head = format!(
            "HTTP/1.1 {} Test\r\nContent-Length: {}\r\nConnection: {}\r\n\r\n",
            code, body_len, connection
        );

        let stream = reader.get_mut();
        if stream.write_all(head.as_bytes()).await.is_err() {
            return;
        }
        if body_len > 0 && stream.write_all(&vec![b'x'; body_len]).await.is_err() {
            return;
        }
        let _ = stream.flush().await;

        if !keep_alive {
            let _ = stream.shutdown().await;
            return;
        }
    }
}

fn route(path: &str) -> (u16, bool, usize) {
    let path = path.split('?').next().unwrap_or(path);
    if let Some(code) = path.strip_prefix("/status/") {
        (code.parse().unwrap_or(400), false, 0)
    } else if let Some(code) = path.strip_prefix("/big/") {
        (code.parse().unwrap_or(400), true, BIG_BODY_LEN)
    } else {
        (200, false, 0)
    }
}

/// Read one request head and return its path. `None` on EOF or error.
async fn read_request_path(reader: &mut BufReader<TcpStream>) -> Option<String> {
    let mut request_line = String::new();
    if reader.read_line(&mut request_line).await.ok()? == 0 {
        return None;
    }

    loop {
        let mut header = String::new();
        if reader.read_line(&mut header).await.ok()? == 0 {
            return None;
        }
        if header == "\r\n" || header == "\n" {
            break;
        }
    }

    request_line.split_whitespace().nth(1).map(str::to_string)
}
