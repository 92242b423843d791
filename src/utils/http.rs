// src/utils/http.rs

//! HTTP client utilities.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;

use crate::error::{FetchError, Result};
use crate::models::SourceConfig;

/// Single-GET fetch capability used by every pipeline stage.
///
/// Implementations must report a missing resource as [`FetchError::NotFound`]
/// and an expired deadline as [`FetchError::Timeout`].
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, url: &str, timeout: Duration) -> std::result::Result<Vec<u8>, FetchError>;
}

/// Create a configured asynchronous HTTP client.
pub fn create_async_client(config: &SourceConfig) -> Result<reqwest::Client> {
    let client = reqwest::Client::builder()
        .user_agent(&config.user_agent)
        .build()?;
    Ok(client)
}

/// [`Fetcher`] backed by a shared `reqwest` client.
#[derive(Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }

    pub fn from_config(config: &SourceConfig) -> Result<Self> {
        Ok(Self::new(create_async_client(config)?))
    }

    fn classify(url: &str, error: reqwest::Error) -> FetchError {
        if error.is_timeout() {
            FetchError::Timeout {
                url: url.to_string(),
            }
        } else {
            FetchError::Transport {
                url: url.to_string(),
                message: error.to_string(),
            }
        }
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &str, timeout: Duration) -> std::result::Result<Vec<u8>, FetchError> {
        let response = self
            .client
            .get(url)
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| Self::classify(url, e))?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(FetchError::NotFound {
                url: url.to_string(),
            });
        }

        let response = response
            .error_for_status()
            .map_err(|e| Self::classify(url, e))?;
        let body = response.bytes().await.map_err(|e| Self::classify(url, e))?;
        Ok(body.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Serve `response` to every connection; returns the base URL.
    async fn serve(response: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            while let Ok((mut socket, _)) = listener.accept().await {
                tokio::spawn(async move {
                    let mut request = Vec::new();
                    let mut buf = [0u8; 1024];
                    while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                        match socket.read(&mut buf).await {
                            Ok(0) | Err(_) => return,
                            Ok(n) => request.extend_from_slice(&buf[..n]),
                        }
                    }
                    let _ = socket.write_all(response.as_bytes()).await;
                    let _ = socket.shutdown().await;
                });
            }
        });
        format!("http://{addr}")
    }

    /// Accept connections and never answer.
    async fn serve_silence() -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let mut held = Vec::new();
            while let Ok((socket, _)) = listener.accept().await {
                held.push(socket);
            }
        });
        format!("http://{addr}")
    }

    fn fetcher() -> HttpFetcher {
        HttpFetcher::new(reqwest::Client::builder().no_proxy().build().unwrap())
    }

    #[tokio::test]
    async fn test_success_returns_body() {
        let base = serve("HTTP/1.1 200 OK\r\nContent-Length: 7\r\nConnection: close\r\n\r\n<game/>").await;
        let body = fetcher()
            .fetch(&format!("{base}/game.xml"), Duration::from_secs(5))
            .await
            .unwrap();
        assert_eq!(body, b"<game/>");
    }

    #[tokio::test]
    async fn test_404_is_not_found() {
        let base = serve("HTTP/1.1 404 Not Found\r\nContent-Length: 0\r\nConnection: close\r\n\r\n").await;
        let url = format!("{base}/year_2012/month_01/day_01");
        let err = fetcher().fetch(&url, Duration::from_secs(5)).await.unwrap_err();
        assert_eq!(err, FetchError::NotFound { url });
    }

    #[tokio::test]
    async fn test_server_error_is_transport() {
        let base = serve(
            "HTTP/1.1 500 Internal Server Error\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
        )
        .await;
        let url = format!("{base}/boxscore.xml");
        let err = fetcher().fetch(&url, Duration::from_secs(5)).await.unwrap_err();
        assert!(matches!(err, FetchError::Transport { .. }), "{err:?}");
        assert_eq!(err.url(), url);
    }

    #[tokio::test]
    async fn test_silent_server_times_out() {
        let base = serve_silence().await;
        let url = format!("{base}/linescore.xml");
        let err = fetcher()
            .fetch(&url, Duration::from_millis(200))
            .await
            .unwrap_err();
        assert_eq!(err, FetchError::Timeout { url });
    }
}
