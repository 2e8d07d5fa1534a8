//! Concurrent endpoint fetcher.
//!
//! This module provides the [`Fetcher`] that owns the shared HTTP client and
//! fans one GET out per endpoint. Each spawned task records exactly one
//! [`Outcome`] in a shared [`ResultCollector`]; the run waits for every task
//! before draining the collector.

use crate::collector::ResultCollector;
use crate::error::{FailureKind, PingError};
use crate::types::{FetchConfig, Outcome, Status, MAX_CONCURRENCY};
use futures::future::join_all;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Semaphore;
use tracing::{debug, info, warn};

/// Issues bounded-timeout HTTP GETs against a list of endpoints.
///
/// The inner `reqwest::Client` is cheap to clone and shares one connection
/// pool, so a `Fetcher` can be cloned into every task.
///
/// # Example
///
/// ```rust,no_run
/// use endpoint_ping_lib::{FetchConfig, Fetcher};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let fetcher = Fetcher::with_config(FetchConfig::default())?;
///     let outcomes = fetcher
///         .fetch_all(vec!["https://example.com".to_string()])
///         .await;
///
///     for outcome in outcomes {
///         println!("{}   -   {}", outcome.status, outcome.url);
///     }
///     Ok(())
/// }
/// ```
#[derive(Clone)]
pub struct Fetcher {
    /// Shared HTTP client, configured with the run timeout
    client: reqwest::Client,
    /// Configuration this fetcher was built with
    config: FetchConfig,
}

impl Fetcher {
    /// Create a fetcher with the default 30 second timeout and no cap.
    pub fn new() -> Result<Self, PingError> {
        Self::with_config(FetchConfig::default())
    }

    /// Create a fetcher with a custom configuration.
    pub fn with_config(config: FetchConfig) -> Result<Self, PingError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| PingError::client(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client, config })
    }

    /// Get the configuration for this fetcher.
    pub fn config(&self) -> &FetchConfig {
        &self.config
    }

    /// Probe a single endpoint.
    ///
    /// Never fails: transport errors, timeouts and malformed URLs come back
    /// as an [`Outcome`] carrying a [`FailureKind`]. The response is dropped
    /// before returning, which hands its connection back to the pool or
    /// closes it.
    pub async fn fetch_one(&self, endpoint: &str) -> Outcome {
        let start = Instant::now();
        debug!(endpoint, "probing");

        let status = match self.client.get(endpoint).send().await {
            Ok(response) => {
                let code = response.status().as_u16();
                drop(response);
                Status::Code(code)
            }
            Err(err) => {
                let kind = FailureKind::from(&err);
                debug!(endpoint, error = %err, kind = %kind, "probe failed");
                Status::Error(kind)
            }
        };

        debug!(
            endpoint,
            status = %status,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "probe finished"
        );
        Outcome::new(endpoint, status)
    }

    /// Probe every endpoint concurrently and return one outcome per endpoint.
    ///
    /// One task is spawned per endpoint. When the config carries a
    /// concurrency cap, tasks wait on a semaphore before sending; otherwise
    /// all requests are in flight at once. The returned outcomes are in
    /// completion order, not input order.
    pub async fn fetch_all(&self, endpoints: Vec<String>) -> Vec<Outcome> {
        let collector = Arc::new(ResultCollector::with_capacity(endpoints.len()));
        self.fetch_into(endpoints, &collector).await;
        collector.drain()
    }

    /// Probe every endpoint, appending outcomes to `collector`.
    ///
    /// Returns once every spawned task has finished. A task that panics is
    /// still accounted for with a [`FailureKind::Panicked`] outcome, so the
    /// collector always grows by exactly `endpoints.len()`.
    pub async fn fetch_into(&self, endpoints: Vec<String>, collector: &Arc<ResultCollector>) {
        let total = endpoints.len();
        let start = Instant::now();
        let limiter = self
            .config
            .concurrency
            .map(|n| Arc::new(Semaphore::new(n.clamp(1, MAX_CONCURRENCY))));

        info!(
            endpoints = total,
            concurrency = ?self.config.concurrency,
            timeout_ms = self.config.timeout.as_millis() as u64,
            "starting fetch run"
        );

        let tasks: Vec<_> = endpoints
            .into_iter()
            .map(|endpoint| {
                let fetcher = self.clone();
                let collector = Arc::clone(collector);
                let limiter = limiter.clone();
                let task_endpoint = endpoint.clone();

                let handle = tokio::spawn(async move {
                    // Held for the duration of the probe.
                    let _permit = match limiter {
                        Some(semaphore) => semaphore.acquire_owned().await.ok(),
                        None => None,
                    };
                    let outcome = fetcher.fetch_one(&task_endpoint).await;
                    collector.append(outcome);
                });
                (endpoint, handle)
            })
            .collect();

        let (endpoints, handles): (Vec<String>, Vec<_>) = tasks.into_iter().unzip();
        let joined = join_all(handles).await;

        for (endpoint, result) in endpoints.into_iter().zip(joined) {
            if let Err(join_err) = result {
                warn!(endpoint = %endpoint, error = %join_err, "probe task did not complete");
                collector.append(Outcome::failed(endpoint, FailureKind::Panicked));
            }
        }

        info!(
            endpoints = total,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "fetch run complete"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn quick_fetcher() -> Fetcher {
        Fetcher::with_config(FetchConfig::default().with_timeout(Duration::from_secs(2))).unwrap()
    }

    #[test]
    fn test_fetcher_keeps_config() {
        let config = FetchConfig::default()
            .with_timeout(Duration::from_secs(3))
            .with_concurrency(4);
        let fetcher = Fetcher::with_config(config.clone()).unwrap();
        assert_eq!(fetcher.config(), &config);
    }

    #[tokio::test]
    async fn test_malformed_url_is_recorded_not_raised() {
        let fetcher = quick_fetcher();
        let outcome = fetcher.fetch_one("not a url").await;
        assert_eq!(outcome.url, "not a url");
        assert_eq!(outcome.status, Status::Error(FailureKind::InvalidUrl));
    }

    #[tokio::test]
    async fn test_empty_endpoint_is_recorded_as_failure() {
        let fetcher = quick_fetcher();
        let outcome = fetcher.fetch_one("").await;
        assert_eq!(outcome.url, "");
        assert!(outcome.status.is_error());
    }

    #[tokio::test]
    async fn test_refused_connection_is_connect_failure() {
        // Bind then drop to get a port nothing is listening on.
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let fetcher = quick_fetcher();
        let outcome = fetcher.fetch_one(&format!("http://127.0.0.1:{}/", port)).await;
        assert_eq!(outcome.status, Status::Error(FailureKind::Connect));
    }

    #[tokio::test]
    async fn test_fetch_all_with_no_endpoints() {
        let fetcher = quick_fetcher();
        assert!(fetcher.fetch_all(Vec::new()).await.is_empty());
    }

    #[tokio::test]
    async fn test_oversized_concurrency_cap_still_runs() {
        let mut config = FetchConfig::default().with_timeout(Duration::from_secs(2));
        config.concurrency = Some(usize::MAX);
        let fetcher = Fetcher::with_config(config).unwrap();

        let outcomes = fetcher.fetch_all(vec!["bogus".to_string()]).await;
        assert_eq!(outcomes.len(), 1);
        assert_eq!(outcomes[0].status, Status::Error(FailureKind::InvalidUrl));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_fetch_all_counts_every_failure() {
        let fetcher = quick_fetcher();
        let endpoints: Vec<String> = (0..20).map(|i| format!("bogus-{}", i)).collect();
        let outcomes = fetcher.fetch_all(endpoints).await;
        assert_eq!(outcomes.len(), 20);
        assert!(outcomes.iter().all(|o| o.status.is_error()));
    }
}
