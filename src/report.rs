//! Structured run report for downstream tool consumption.
//!
//! Written as JSON alongside the output table when requested, carrying
//! the run configuration and conversion statistics.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

use crate::conversion::{BadRecordPolicy, ConversionSummary};

/// Complete report of a conversion run.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    /// Tool version
    pub version: String,
    /// Timestamp of run (ISO 8601)
    pub timestamp: String,
    pub input: String,
    pub output: String,
    /// Bad-record policy the run was executed under
    pub policy: String,
    pub statistics: ConversionSummary,
}

impl RunReport {
    pub fn new(
        input: &Path,
        output: &Path,
        policy: BadRecordPolicy,
        summary: &ConversionSummary,
    ) -> Self {
        let timestamp = OffsetDateTime::now_utc()
            .format(&Rfc3339)
            .unwrap_or_default();
        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            timestamp,
            input: input.display().to_string(),
            output: output.display().to_string(),
            policy: format!("{policy:?}").to_lowercase(),
            statistics: summary.clone(),
        }
    }
}

pub fn write_report(path: &Path, report: &RunReport) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("failed to create report {}", path.display()))?;
    serde_json::to_writer_pretty(BufWriter::new(file), report)
        .with_context(|| format!("failed to write report {}", path.display()))?;
    Ok(())
}
