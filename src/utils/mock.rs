//! In-memory [`Fetcher`] for tests.

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;

use crate::error::FetchError;
use crate::utils::http::Fetcher;

#[derive(Debug, Clone)]
enum Canned {
    Body(Vec<u8>),
    Timeout,
    Transport,
}

/// Serves canned responses; any unregistered URL is `NotFound`.
#[derive(Debug, Default)]
pub struct MockFetcher {
    routes: Mutex<HashMap<String, Canned>>,
    requests: Mutex<Vec<String>>,
    latency: Duration,
    in_flight: AtomicUsize,
    peak: AtomicUsize,
}

impl MockFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn body(self, url: impl Into<String>, body: impl Into<Vec<u8>>) -> Self {
        self.set(url, Canned::Body(body.into()));
        self
    }

    pub fn timeout(self, url: impl Into<String>) -> Self {
        self.set(url, Canned::Timeout);
        self
    }

    pub fn broken(self, url: impl Into<String>) -> Self {
        self.set(url, Canned::Transport);
        self
    }

    /// Hold every request open for `latency` before answering.
    pub fn latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Replace the response for a URL after construction.
    pub fn respond(&self, url: impl Into<String>, body: impl Into<Vec<u8>>) {
        self.set(url, Canned::Body(body.into()));
    }

    fn set(&self, url: impl Into<String>, canned: Canned) {
        self.routes.lock().unwrap().insert(url.into(), canned);
    }

    pub fn request_count(&self, url: &str) -> usize {
        self.requests.lock().unwrap().iter().filter(|u| *u == url).count()
    }

    /// Highest number of requests that were open at the same time.
    pub fn peak_in_flight(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Fetcher for MockFetcher {
    async fn fetch(&self, url: &str, _timeout: Duration) -> Result<Vec<u8>, FetchError> {
        self.requests.lock().unwrap().push(url.to_string());
        let open = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(open, Ordering::SeqCst);
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        let canned = self.routes.lock().unwrap().get(url).cloned();
        match canned {
            Some(Canned::Body(body)) => Ok(body),
            Some(Canned::Timeout) => Err(FetchError::Timeout {
                url: url.to_string(),
            }),
            Some(Canned::Transport) => Err(FetchError::Transport {
                url: url.to_string(),
                message: "connection reset".to_string(),
            }),
            None => Err(FetchError::NotFound {
                url: url.to_string(),
            }),
        }
    }
}

/// Canned Gameday documents.
pub mod pages {
    /// Apache-style directory listing with the given entries.
    pub fn listing(entries: &[&str]) -> String {
        let items: String = entries
            .iter()
            .map(|e| format!("<li><a href=\"{e}\"> {e}</a></li>\n"))
            .collect();
        format!(
            "<html><body><h1>Index</h1><ul>\n<li><a href=\"../\"> Parent Directory</a></li>\n{items}</ul></body></html>"
        )
    }

    pub fn linescore(game_type: &str) -> String {
        format!(
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<!--Copyright 2012 MLB Advanced Media, L.P.-->\n<game id=\"x\" game_type=\"{game_type}\" home_name_abbrev=\"COL\"><linescore inning=\"1\"/></game>"
        )
    }
}
