use tracing::info;

use crate::classifier::classify;
use crate::error::Result;
use crate::exporter::{export, summary, ExportFormat, Summary};
use crate::models::{AccountRecord, FlippedAccount};
use crate::parser::parse_report;

/// Outcome of one parse → classify → export pass over an uploaded report.
pub struct Analysis {
    pub records: Vec<AccountRecord>,
    pub flipped: Vec<FlippedAccount>,
    pub summary: Summary,
    pub export: Vec<u8>,
}

pub fn analyze(bytes: &[u8], format: ExportFormat) -> Result<Analysis> {
    let records = parse_report(bytes)?;
    let flipped = classify(&records);
    let summary = summary(&flipped);
    let export = export(&flipped, format)?;
    info!(
        records = records.len(),
        flipped = summary.count,
        asset = summary.tally.asset,
        liability = summary.tally.liability,
        "analyzed balance report"
    );
    Ok(Analysis {
        records,
        flipped,
        summary,
        export,
    })
}
