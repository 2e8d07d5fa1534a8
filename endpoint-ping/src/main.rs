//! Endpoint Ping CLI Application
//!
//! Reads a comma-separated list of URLs, probes every endpoint concurrently
//! and writes one status line per endpoint to a report file.

mod ui;

use clap::builder::styling::{AnsiColor, Effects, Styles};
use clap::Parser;
use endpoint_ping_lib::{
    load_env_config, parse_timeout, read_endpoint_list, write_report, ConfigManager, EnvConfig,
    FetchConfig, Fetcher, FileConfig, PingError, ReportFormat, DEFAULT_OUTPUT, MAX_CONCURRENCY,
};
use std::path::PathBuf;
use std::process;
use std::time::{Duration, Instant};
use tracing::debug;
use tracing_subscriber::EnvFilter;

const STYLES: Styles = Styles::styled()
    .header(AnsiColor::Yellow.on_default().effects(Effects::BOLD))
    .usage(AnsiColor::Yellow.on_default().effects(Effects::BOLD))
    .literal(AnsiColor::Green.on_default().effects(Effects::BOLD))
    .placeholder(AnsiColor::Cyan.on_default());

/// CLI arguments for endpoint-ping
#[derive(Parser, Debug)]
#[command(name = "endpoint-ping")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(author = "Sai Dutt G.V <gvs46@protonmail.com>")]
#[command(about = "Check the HTTP status of a list of endpoints concurrently")]
#[command(
    long_about = "Check the HTTP status of a list of endpoints concurrently.\n\nThe endpoint list is a file holding one comma-separated line of URLs. Every endpoint gets one GET request; the status code, or an ERROR(<kind>) marker for transport failures, is written to the report file."
)]
#[command(styles = STYLES)]
pub struct Args {
    /// Path to the comma-separated list of endpoint URLs
    #[arg(short = 'l', long = "list", value_name = "FILE", help_heading = "Input")]
    pub list: Option<PathBuf>,

    /// Path to the report file [default: result.txt]
    #[arg(short = 'o', long = "output", value_name = "FILE", help_heading = "Output")]
    pub output: Option<String>,

    /// Report format: text, json or csv [default: text]
    #[arg(long = "format", value_name = "FORMAT", help_heading = "Output")]
    pub format: Option<ReportFormat>,

    /// Suppress the banner and the run summary
    #[arg(short = 'q', long = "quiet", help_heading = "Output")]
    pub quiet: bool,

    /// Per-request timeout, e.g. 30s, 2m, 500ms [default: 30s]
    #[arg(short = 't', long = "timeout", value_name = "DURATION", value_parser = parse_timeout_arg, help_heading = "Performance")]
    pub timeout: Option<Duration>,

    /// Cap on in-flight requests (default: one request per endpoint, no cap)
    #[arg(short = 'c', long = "concurrency", value_name = "N", value_parser = parse_concurrency_arg, help_heading = "Performance")]
    pub concurrency: Option<usize>,

    /// Use specific config file instead of automatic discovery
    #[arg(long = "config", value_name = "FILE", help_heading = "Configuration")]
    pub config: Option<String>,

    /// Verbose logging
    #[arg(short = 'v', long = "verbose", help_heading = "Configuration")]
    pub verbose: bool,
}

/// Everything a run needs after CLI, environment and config files are merged.
#[derive(Debug, Clone, PartialEq)]
struct RunSettings {
    fetch: FetchConfig,
    output: String,
    format: ReportFormat,
}

fn parse_timeout_arg(value: &str) -> Result<Duration, String> {
    parse_timeout(value).map_err(|e| e.to_string())
}

fn parse_concurrency_arg(value: &str) -> Result<usize, String> {
    match value.trim().parse::<usize>() {
        Ok(n) if (1..=MAX_CONCURRENCY).contains(&n) => Ok(n),
        _ => Err(format!(
            "'{}' is not a number between 1 and {}",
            value, MAX_CONCURRENCY
        )),
    }
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    init_logging(args.verbose);

    if !args.quiet {
        ui::print_banner();
    }

    if let Err(e) = run(args).await {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

/// Install the stderr tracing subscriber.
///
/// `RUST_LOG` wins when set; otherwise only warnings are shown unless
/// `--verbose` asks for debug output from our own crates.
fn init_logging(verbose: bool) {
    let default_filter = if verbose {
        "warn,endpoint_ping=debug,endpoint_ping_lib=debug"
    } else {
        "warn"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn run(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    let list_path = args
        .list
        .clone()
        .ok_or("Please provide path to list of endpoints. Use -h for help.")?;

    let settings = build_settings(&args)?;
    debug!(?settings, "resolved settings");

    let endpoints = read_endpoint_list(&list_path).await?;
    let fetcher = Fetcher::with_config(settings.fetch.clone())?;

    let start_time = Instant::now();
    let outcomes = fetcher.fetch_all(endpoints).await;
    let duration = start_time.elapsed();

    write_report(&settings.output, &outcomes, settings.format).await?;

    if !args.quiet {
        ui::print_summary(
            &ui::RunSummary::from_outcomes(&outcomes),
            duration,
            &settings.output,
        );
    }

    Ok(())
}

/// Build run settings from CLI arguments with config file integration.
///
/// Precedence order (highest to lowest):
/// 1. CLI arguments
/// 2. Environment variables (EP_*)
/// 3. Config file (--config, EP_CONFIG, or discovered local/XDG files)
/// 4. Built-in defaults
///
/// Any config file that exists but does not load is a setup error.
fn build_settings(args: &Args) -> Result<RunSettings, PingError> {
    let env_config = load_env_config();
    let config_manager = ConfigManager::new();

    let file_config = if let Some(path) = args.config.as_ref().or(env_config.config.as_ref()) {
        debug!(path = %path, "using explicit config file");
        config_manager.load_file(path)?
    } else {
        config_manager.discover_and_load()?
    };

    resolve_settings(args, &env_config, file_config)
}

fn resolve_settings(
    args: &Args,
    env_config: &EnvConfig,
    file_config: FileConfig,
) -> Result<RunSettings, PingError> {
    let mut fetch = FetchConfig::default();
    let mut output = DEFAULT_OUTPUT.to_string();
    let mut format = ReportFormat::default();

    // Step 1: config file (already validated on load)
    if let Some(defaults) = file_config.defaults {
        if let Some(timeout) = defaults.timeout {
            fetch.timeout = parse_timeout(&timeout)?;
        }
        if let Some(concurrency) = defaults.concurrency {
            fetch = fetch.with_concurrency(concurrency);
        }
        if let Some(path) = defaults.output {
            output = path;
        }
        if let Some(name) = defaults.format {
            format = name.parse()?;
        }
        if let Some(user_agent) = defaults.user_agent {
            fetch = fetch.with_user_agent(user_agent);
        }
    }

    // Step 2: environment variables
    if let Some(timeout) = env_config.timeout {
        fetch.timeout = timeout;
    }
    if let Some(concurrency) = env_config.concurrency {
        fetch = fetch.with_concurrency(concurrency);
    }
    if let Some(path) = &env_config.output {
        output = path.clone();
    }
    if let Some(env_format) = env_config.format {
        format = env_format;
    }

    // Step 3: CLI arguments
    if let Some(timeout) = args.timeout {
        fetch.timeout = timeout;
    }
    if let Some(concurrency) = args.concurrency {
        fetch = fetch.with_concurrency(concurrency);
    }
    if let Some(path) = &args.output {
        output = path.clone();
    }
    if let Some(cli_format) = args.format {
        format = cli_format;
    }

    if output.trim().is_empty() {
        return Err(PingError::config("Please provide Path to output file"));
    }

    Ok(RunSettings {
        fetch,
        output,
        format,
    })
}
