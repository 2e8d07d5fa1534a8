//! Report rendering and persistence.
//!
//! Outcomes are written in the order they were drained from the collector.
//! The text layout is one `<status-or-error>   -   <url>` line per outcome.

use crate::error::PingError;
use crate::types::{Outcome, ReportFormat};
use std::path::Path;
use tokio::io::{AsyncWriteExt, BufWriter};
use tracing::debug;

/// Separator between status and URL in text reports.
pub const TEXT_SEPARATOR: &str = "   -   ";

/// Format one outcome as a text report line, including the newline.
pub fn format_line(outcome: &Outcome) -> String {
    format!("{}{}{}\n", outcome.status, TEXT_SEPARATOR, outcome.url)
}

/// Render all outcomes in the requested format.
pub fn render_report(outcomes: &[Outcome], format: ReportFormat) -> serde_json::Result<String> {
    match format {
        ReportFormat::Text => Ok(outcomes.iter().map(format_line).collect()),
        ReportFormat::Json => {
            let mut json = serde_json::to_string_pretty(outcomes)?;
            json.push('\n');
            Ok(json)
        }
        ReportFormat::Csv => {
            let mut csv = String::from("status,url\n");
            for outcome in outcomes {
                csv.push_str(&format!("{},{}\n", outcome.status, csv_field(&outcome.url)));
            }
            Ok(csv)
        }
    }
}

fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

/// Write a report to `path`, truncating any existing file.
///
/// The file is flushed and synced to disk before returning. Every failure
/// along the way is a `PingError::OutputError`.
pub async fn write_report<P: AsRef<Path>>(
    path: P,
    outcomes: &[Outcome],
    format: ReportFormat,
) -> Result<(), PingError> {
    let path = path.as_ref();
    let display = path.to_string_lossy();
    let output_err = |what: &str, e: std::io::Error| {
        PingError::output_error(display.clone(), format!("{}: {}", what, e))
    };

    let body = render_report(outcomes, format).map_err(|e| {
        PingError::output_error(display.clone(), format!("Could not render report: {}", e))
    })?;

    let file = tokio::fs::File::create(path)
        .await
        .map_err(|e| output_err("Could not create output file", e))?;
    let mut writer = BufWriter::new(file);

    writer
        .write_all(body.as_bytes())
        .await
        .map_err(|e| output_err("Failed to write report", e))?;
    writer
        .flush()
        .await
        .map_err(|e| output_err("Failed to flush report", e))?;
    writer
        .into_inner()
        .sync_all()
        .await
        .map_err(|e| output_err("Could not sync with file", e))?;

    debug!(path = %path.display(), lines = outcomes.len(), format = %format, "report written");
    Ok(())
}
