//! Console output for the endpoint-ping CLI.
//!
//! The banner and the end-of-run summary. Per-endpoint results only go to
//! the report file, never to the terminal.

use console::style;
use endpoint_ping_lib::{Outcome, Status};
use std::time::Duration;

/// Print the start-up banner.
pub fn print_banner() {
    println!(
        "{} {} {}",
        style("endpoint-ping").bold().cyan(),
        style(format!("v{}", env!("CARGO_PKG_VERSION"))).dim(),
        style("· concurrent HTTP status checks").dim(),
    );
    println!();
}

/// Counts shown after a run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub total: usize,
    pub success: usize,
    pub redirect: usize,
    pub client_error: usize,
    pub server_error: usize,
    pub other: usize,
    pub failed: usize,
}

impl RunSummary {
    pub fn from_outcomes(outcomes: &[Outcome]) -> Self {
        let mut summary = RunSummary {
            total: outcomes.len(),
            ..Default::default()
        };

        for outcome in outcomes {
            match outcome.status {
                Status::Code(200..=299) => summary.success += 1,
                Status::Code(300..=399) => summary.redirect += 1,
                Status::Code(400..=499) => summary.client_error += 1,
                Status::Code(500..=599) => summary.server_error += 1,
                Status::Code(_) => summary.other += 1,
                Status::Error(_) => summary.failed += 1,
            }
        }

        summary
    }
}

/// Print the final summary bar with colored counts.
pub fn print_summary(summary: &RunSummary, duration: Duration, report_path: &str) {
    println!(
        "  {}",
        style("────────────────────────────────────────────────────").dim()
    );

    let mut parts = vec![
        style(format!("{} 2xx", summary.success)).green().to_string(),
        style(format!("{} 3xx", summary.redirect)).cyan().to_string(),
        style(format!("{} 4xx", summary.client_error))
            .yellow()
            .to_string(),
        style(format!("{} 5xx", summary.server_error))
            .red()
            .to_string(),
    ];
    if summary.other > 0 {
        parts.push(style(format!("{} other", summary.other)).dim().to_string());
    }
    parts.push(
        style(format!("{} failed", summary.failed))
            .red()
            .bold()
            .to_string(),
    );

    let separator = format!("  {}  ", style("|").dim());
    println!(
        "  {} endpoint{} in {:.1}s  {}  {}",
        style(summary.total).bold(),
        if summary.total == 1 { "" } else { "s" },
        duration.as_secs_f64(),
        style("|").dim(),
        parts.join(separator.as_str()),
    );
    println!("  {} {}", style("Report written to").dim(), report_path);
}
