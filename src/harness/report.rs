use std::path::Path;

use serde::Serialize;

use crate::error::HarnessError;
use crate::workload::WorkloadSpec;

use super::metrics::{LatencyPercentiles, RateUnit, RunMetrics, format_x100};
use super::{RunMode, RunPlan};

/// Characters of each payload shown in the preview block.
pub const PREVIEW_CHARS: usize = 63;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Protect,
    Reveal,
}

impl Phase {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Phase::Protect => "PROTECT",
            Phase::Reveal => "REVEAL",
        }
    }
}

/// Outcome of one timed phase.
#[derive(Debug, Clone, Serialize)]
pub struct PhaseReport {
    pub phase: Phase,
    pub mode: RunMode,
    pub byte_count: u64,
    pub record_count: u64,
    pub elapsed_ms: u64,
    pub elapsed_seconds_x100: u64,
    pub rate_x100: u64,
    pub rate_unit: RateUnit,
    pub records_per_second_x100: u64,
    pub latency: Option<LatencyPercentiles>,
    pub started_at: String,
    pub finished_at: String,
}

impl PhaseReport {
    #[must_use]
    pub fn new(
        phase: Phase,
        mode: RunMode,
        metrics: &RunMetrics,
        latency: Option<LatencyPercentiles>,
        started_at: String,
        finished_at: String,
    ) -> Self {
        let rate_unit = mode.rate_unit();
        Self {
            phase,
            mode,
            byte_count: metrics.byte_count,
            record_count: metrics.record_count,
            elapsed_ms: u64::try_from(metrics.elapsed.as_millis()).unwrap_or(u64::MAX),
            elapsed_seconds_x100: metrics.elapsed_seconds_x100(),
            rate_x100: metrics.rate_x100(rate_unit),
            rate_unit,
            records_per_second_x100: metrics.records_per_second_x100(),
            latency,
            started_at,
            finished_at,
        }
    }
}

/// First characters of plaintext, ciphertext and revealed text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Preview {
    pub plaintext: String,
    pub ciphertext: String,
    pub revealed: String,
}

impl Preview {
    #[must_use]
    pub fn new(plaintext: &str, ciphertext: &str, revealed: &str) -> Self {
        Self {
            plaintext: truncate_preview(plaintext),
            ciphertext: truncate_preview(ciphertext),
            revealed: truncate_preview(revealed),
        }
    }
}

/// Full protect -> reveal run.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub endpoint: String,
    pub policy: String,
    pub mode: RunMode,
    pub protect: PhaseReport,
    pub reveal: PhaseReport,
    pub preview: Preview,
    pub round_trip_ok: bool,
}

#[must_use]
pub fn truncate_preview(text: &str) -> String {
    text.chars().take(PREVIEW_CHARS).collect()
}

/// Echo of the run parameters, printed before any request is sent.
#[must_use]
pub fn input_lines(plan: &RunPlan, spec: &WorkloadSpec) -> Vec<String> {
    let mut lines = Vec::new();
    lines.push(" Input Parameters:".to_owned());
    lines.push(format!("  CRDPHost: {}", plan.endpoint));
    lines.push(format!("  ProtectionPolicy: {}", plan.policy));
    lines.push(format!("  Username: {}", plan.username));
    lines.push(format!("  BulkProtection: {}", matches!(plan.mode, RunMode::Bulk)));
    if let Some(path) = spec.source_file.as_deref() {
        lines.push(format!("  Input File: {}", path.display()));
        lines.push(format!("  FileEncoding: {}", spec.file_encoding.as_str()));
        return lines;
    }
    lines.push(format!("  BatchSize: {}", spec.batch_count));
    lines.push(format!("  CharacterSet: {}", spec.character_set.as_str()));
    lines.push(format!("  Length: {}", spec.length));
    lines.push(format!("  FreshPerRecord: {}", spec.fresh));
    lines
}

#[must_use]
pub fn phase_summary_line(report: &PhaseReport) -> String {
    let line = format!(
        "CRDP Test Completed - {}. {} bytes processed. Process time: {} sec.  Rate: {} {}.",
        report.phase.as_str(),
        report.byte_count,
        format_x100(report.elapsed_seconds_x100),
        format_x100(report.rate_x100),
        report.rate_unit.suffix()
    );
    match report.mode {
        RunMode::Discrete => format!(
            "{}  Records: {} ({} rec/s).",
            line,
            report.record_count,
            format_x100(report.records_per_second_x100)
        ),
        RunMode::Bulk => line,
    }
}

#[must_use]
pub fn latency_line(latency: &LatencyPercentiles) -> String {
    format!(
        "  Latency per call: p50 {}us, p90 {}us, p99 {}us, max {}us",
        latency.p50_us, latency.p90_us, latency.p99_us, latency.max_us
    )
}

/// Human-readable report, one entry per output line.
#[must_use]
pub fn report_lines(report: &RunReport) -> Vec<String> {
    let mut lines = Vec::new();
    for phase in [&report.protect, &report.reveal] {
        lines.push(phase_summary_line(phase));
        if let Some(latency) = phase.latency.as_ref() {
            lines.push(latency_line(latency));
        }
    }
    lines.push("Plaintext (PT), CipherText (CT), and RevealText (RT) are as follows:".to_owned());
    lines.push(format!(" PT: {}", report.preview.plaintext));
    lines.push(format!(" CT: {}", report.preview.ciphertext));
    lines.push(format!(" RT: {}", report.preview.revealed));
    lines.push(format!(
        "Round trip: {}",
        if report.round_trip_ok {
            "verified"
        } else {
            "MISMATCH"
        }
    ));
    lines
}

pub fn print_report(report: &RunReport) {
    for line in report_lines(report) {
        println!("{}", line);
    }
}

/// Writes the report as pretty-printed JSON.
///
/// # Errors
///
/// Returns an error if the report cannot be serialized or written.
pub async fn export_json(path: &Path, report: &RunReport) -> Result<(), HarnessError> {
    let body = serde_json::to_vec_pretty(report).map_err(|err| HarnessError::WriteReport {
        path: path.to_path_buf(),
        source: std::io::Error::other(err),
    })?;
    tokio::fs::write(path, body)
        .await
        .map_err(|err| HarnessError::WriteReport {
            path: path.to_path_buf(),
            source: err,
        })
}
