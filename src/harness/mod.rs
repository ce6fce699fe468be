//! Protect -> reveal timing harness.
//!
//! Only the network calls sit inside a timed window: workload construction,
//! file reads and latency bookkeeping happen outside it.
mod metrics;
mod report;


use std::time::{Duration, Instant};

use chrono::{SecondsFormat, Utc};
use serde::Serialize;
use tracing::{info, warn};

use crate::client::{Protected, ProtectedBatch, ProtectionApi};
use crate::error::AppResult;
use crate::workload::Workload;

pub use metrics::{
    FIXED_POINT_SCALE, LatencyHistogram, LatencyPercentiles, RateUnit, RunMetrics, format_x100,
};
pub use report::{
    PREVIEW_CHARS, Phase, PhaseReport, Preview, RunReport, export_json, input_lines,
    latency_line, phase_summary_line, print_report, report_lines, truncate_preview,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RunMode {
    /// One request per record.
    Discrete,
    /// One request for the whole batch.
    Bulk,
}

impl RunMode {
    #[must_use]
    pub const fn from_bulk_flag(bulk: bool) -> Self {
        if bulk { RunMode::Bulk } else { RunMode::Discrete }
    }

    #[must_use]
    pub const fn rate_unit(self) -> RateUnit {
        match self {
            RunMode::Discrete => RateUnit::BytesPerSecond,
            RunMode::Bulk => RateUnit::MegabytesPerSecond,
        }
    }
}

/// Fixed inputs of one run.
#[derive(Debug, Clone)]
pub struct RunPlan {
    pub endpoint: String,
    pub policy: String,
    pub username: String,
    pub mode: RunMode,
}

/// Protect-phase output, handed to the reveal phase unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProtectOutcome {
    Discrete(Vec<Protected>),
    Bulk(ProtectedBatch),
}

impl ProtectOutcome {
    #[must_use]
    pub fn first_ciphertext(&self) -> Option<&str> {
        match self {
            ProtectOutcome::Discrete(records) => {
                records.first().map(|record| record.ciphertext.as_str())
            }
            ProtectOutcome::Bulk(batch) => batch.ciphertexts.first().map(String::as_str),
        }
    }
}

struct TimedWindow {
    started_at: String,
    started: Instant,
}

struct WindowTiming {
    elapsed: Duration,
    started_at: String,
    finished_at: String,
}

impl TimedWindow {
    fn open(phase: Phase) -> Self {
        let started_at = now_rfc3339();
        info!("*** CRDP {} Test Started *** start time: {}", phase.as_str(), started_at);
        Self {
            started_at,
            started: Instant::now(),
        }
    }

    fn close(self) -> WindowTiming {
        let elapsed = self.started.elapsed();
        let finished_at = now_rfc3339();
        info!("--> End time: {}", finished_at);
        WindowTiming {
            elapsed,
            started_at: self.started_at,
            finished_at,
        }
    }
}

fn now_rfc3339() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Runs one protect phase followed by one reveal phase over `workload`.
///
/// The first failing call ends the run; no partial report is produced.
///
/// # Errors
///
/// Returns the first client error, or an error if latency bookkeeping fails.
pub async fn run<A>(api: &A, plan: &RunPlan, workload: &Workload) -> AppResult<RunReport>
where
    A: ProtectionApi + Sync + ?Sized,
{
    let (protected, protect_report) = match plan.mode {
        RunMode::Discrete => protect_discrete(api, plan, workload).await?,
        RunMode::Bulk => protect_bulk(api, plan, workload).await?,
    };
    let (revealed, reveal_report) = match &protected {
        ProtectOutcome::Discrete(records) => reveal_discrete(api, plan, workload, records).await?,
        ProtectOutcome::Bulk(batch) => reveal_bulk(api, plan, workload, batch).await?,
    };

    let round_trip_ok = match workload.matches_revealed(&revealed) {
        Ok(ok) => ok,
        Err(err) => {
            warn!("Could not compare revealed data: {}", err);
            false
        }
    };
    if !round_trip_ok {
        warn!("Revealed data does not match the submitted plaintext.");
    }

    let preview = Preview::new(
        workload.records.first().map_or("", String::as_str),
        protected.first_ciphertext().unwrap_or(""),
        revealed.first().map_or("", String::as_str),
    );

    Ok(RunReport {
        endpoint: plan.endpoint.clone(),
        policy: plan.policy.clone(),
        mode: plan.mode,
        protect: protect_report,
        reveal: reveal_report,
        preview,
        round_trip_ok,
    })
}

async fn protect_discrete<A>(
    api: &A,
    plan: &RunPlan,
    workload: &Workload,
) -> AppResult<(ProtectOutcome, PhaseReport)>
where
    A: ProtectionApi + Sync + ?Sized,
{
    let mut protected = Vec::with_capacity(workload.record_count());
    let mut latencies = Vec::with_capacity(workload.record_count());

    let window = TimedWindow::open(Phase::Protect);
    for record in &workload.records {
        let call = Instant::now();
        protected.push(api.protect(record, &plan.policy).await?);
        latencies.push(call.elapsed());
    }
    let timing = window.close();

    let report = phase_report(Phase::Protect, RunMode::Discrete, workload, timing, &latencies)?;
    Ok((ProtectOutcome::Discrete(protected), report))
}

async fn protect_bulk<A>(
    api: &A,
    plan: &RunPlan,
    workload: &Workload,
) -> AppResult<(ProtectOutcome, PhaseReport)>
where
    A: ProtectionApi + Sync + ?Sized,
{
    info!("--> CRDP Bulk PROTECT processing {} records...", workload.record_count());
    let window = TimedWindow::open(Phase::Protect);
    let batch = api.protect_bulk(&workload.records, &plan.policy).await?;
    let timing = window.close();

    let report = phase_report(Phase::Protect, RunMode::Bulk, workload, timing, &[])?;
    Ok((ProtectOutcome::Bulk(batch), report))
}

async fn reveal_discrete<A>(
    api: &A,
    plan: &RunPlan,
    workload: &Workload,
    protected: &[Protected],
) -> AppResult<(Vec<String>, PhaseReport)>
where
    A: ProtectionApi + Sync + ?Sized,
{
    let mut revealed = Vec::with_capacity(protected.len());
    let mut latencies = Vec::with_capacity(protected.len());

    let window = TimedWindow::open(Phase::Reveal);
    for record in protected {
        let call = Instant::now();
        revealed.push(
            api.reveal(
                &record.ciphertext,
                &plan.policy,
                &record.version,
                &plan.username,
            )
            .await?,
        );
        latencies.push(call.elapsed());
    }
    let timing = window.close();

    let report = phase_report(Phase::Reveal, RunMode::Discrete, workload, timing, &latencies)?;
    Ok((revealed, report))
}

async fn reveal_bulk<A>(
    api: &A,
    plan: &RunPlan,
    workload: &Workload,
    batch: &ProtectedBatch,
) -> AppResult<(Vec<String>, PhaseReport)>
where
    A: ProtectionApi + Sync + ?Sized,
{
    info!("--> CRDP Bulk REVEAL processing {} records...", batch.ciphertexts.len());
    let window = TimedWindow::open(Phase::Reveal);
    let revealed = api
        .reveal_bulk(&batch.ciphertexts, &plan.policy, &batch.version, &plan.username)
        .await?;
    let timing = window.close();

    let report = phase_report(Phase::Reveal, RunMode::Bulk, workload, timing, &[])?;
    Ok((revealed, report))
}

fn phase_report(
    phase: Phase,
    mode: RunMode,
    workload: &Workload,
    timing: WindowTiming,
    latencies: &[Duration],
) -> AppResult<PhaseReport> {
    let metrics = RunMetrics::new(
        workload.byte_count,
        workload.record_count() as u64,
        timing.elapsed,
    );
    let latency = if latencies.is_empty() {
        None
    } else {
        let mut histogram = LatencyHistogram::new()?;
        for latency in latencies {
            histogram.record(*latency)?;
        }
        histogram.percentiles()
    };
    Ok(PhaseReport::new(
        phase,
        mode,
        &metrics,
        latency,
        timing.started_at,
        timing.finished_at,
    ))
}
