//! # Endpoint Ping Library
//!
//! Concurrent HTTP status checks for a list of endpoints.
//!
//! A run spawns one task per endpoint, each issuing a single GET through a
//! shared client with a fixed timeout. Every task records exactly one
//! [`Outcome`] in a mutex-guarded [`ResultCollector`], and the run waits on
//! all tasks before the outcomes are drained and written out.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use endpoint_ping_lib::{read_endpoint_list, write_report, Fetcher, ReportFormat};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let endpoints = read_endpoint_list("urls.txt").await?;
//!     let outcomes = Fetcher::new()?.fetch_all(endpoints).await;
//!     write_report("result.txt", &outcomes, ReportFormat::Text).await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Failure model
//!
//! - Per-endpoint transport failures (timeouts, refused connections, DNS
//!   errors, malformed URLs) become [`Status::Error`] outcomes and never stop
//!   the run.
//! - Reading the endpoint list, loading configuration and writing the report
//!   return [`PingError`].

pub use collector::ResultCollector;
pub use config::{
    env_config_from, load_env_config, merge_configs, parse_timeout, ConfigManager,
    DefaultsConfig, EnvConfig, FileConfig,
};
pub use endpoints::{parse_endpoint_list, read_endpoint_list};
pub use error::{FailureKind, PingError};
pub use fetcher::Fetcher;
pub use report::{format_line, render_report, write_report, TEXT_SEPARATOR};
pub use types::{
    FetchConfig, Outcome, ReportFormat, Status, DEFAULT_OUTPUT, DEFAULT_TIMEOUT, MAX_CONCURRENCY,
};

mod collector;
mod config;
mod endpoints;
mod error;
mod fetcher;
mod report;
mod types;

// Type alias for convenience
pub type Result<T> = std::result::Result<T, PingError>;

// Library version and metadata
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
