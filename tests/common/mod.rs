//! Shared utilities for integration tests.

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

use obs_fortnite::config::GatewayConfig;
use obs_fortnite::http::HttpServer;
use obs_fortnite::lifecycle::Shutdown;

/// What the mock provider saw of one inbound request.
#[derive(Debug, Clone)]
#[allow(dead_code)]
pub struct MockRequest {
    pub path: String,
    pub api_key: Option<String>,
}

/// Start a programmable mock stats provider on an ephemeral port.
pub async fn start_mock_provider<F, Fut>(f: F) -> SocketAddr
where
    F: Fn(MockRequest) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = (u16, String)> + Send + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let f = Arc::new(f);

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    let f = f.clone();
                    tokio::spawn(async move {
                        let head = read_head(&mut socket).await;
                        let (status, body) = f(parse_head(&head)).await;
                        let status_text = match status {
                            200 => "200 OK",
                            401 => "401 Unauthorized",
                            403 => "403 Forbidden",
                            404 => "404 Not Found",
                            429 => "429 Too Many Requests",
                            500 => "500 Internal Server Error",
                            503 => "503 Service Unavailable",
                            _ => "200 OK",
                        };

                        let response = format!(
                            "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                            status_text,
                            body.len(),
                            body
                        );
                        let _ = socket.write_all(response.as_bytes()).await;
                        let _ = socket.shutdown().await;
                        tokio::time::sleep(Duration::from_millis(10)).await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    addr
}

async fn read_head(socket: &mut tokio::net::TcpStream) -> String {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    loop {
        match socket.read(&mut chunk).await {
            Ok(0) | Err(_) => break,
            Ok(n) => {
                buf.extend_from_slice(&chunk[..n]);
                if buf.windows(4).any(|w| w == b"\r\n\r\n") {
                    break;
                }
            }
        }
    }
    String::from_utf8_lossy(&buf).into_owned()
}

fn parse_head(head: &str) -> MockRequest {
    let mut lines = head.lines();
    let path = lines
        .next()
        .and_then(|line| line.split_whitespace().nth(1))
        .unwrap_or_default()
        .to_string();
    let api_key = lines.find_map(|line| {
        let (name, value) = line.split_once(':')?;
        name.eq_ignore_ascii_case("trn-api-key")
            .then(|| value.trim().to_string())
    });
    MockRequest { path, api_key }
}

/// Profile body in the provider's format.
#[allow(dead_code)]
pub fn profile_body(kills: &str, wins: &str, kdr: &str) -> String {
    serde_json::json!({
        "accountId": "0000",
        "lifeTimeStats": [
            {"key": "Matches Played", "value": "5,000"},
            {"key": "Wins", "value": wins},
            {"key": "Kills", "value": kills},
            {"key": "K/d", "value": kdr}
        ]
    })
    .to_string()
}

/// Gateway config pointing at a mock provider, with a short permit interval.
pub fn gateway_config(provider: SocketAddr, interval_ms: u64, token_env: &str) -> GatewayConfig {
    let mut config = GatewayConfig::default();
    config.listener.bind_address = "127.0.0.1:0".into();
    config.upstream.base_url = format!("http://{}", provider);
    config.upstream.token_env = token_env.into();
    config.upstream.timeout_secs = 5;
    config.rate_limit.interval_ms = interval_ms;
    config
}

/// Start the gateway on an ephemeral port. Keep the `Shutdown` alive for
/// as long as the server should run.
pub async fn start_gateway(config: GatewayConfig) -> (SocketAddr, Shutdown) {
    let shutdown = Shutdown::new();
    let server = HttpServer::new(config).unwrap();
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let server_shutdown = shutdown.subscribe();

    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    (addr, shutdown)
}

pub fn http_client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}
