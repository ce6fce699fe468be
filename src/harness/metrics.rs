use std::time::Duration;

use hdrhistogram::Histogram;
use serde::Serialize;

use crate::error::HarnessError;

const MICROS_PER_SECOND: u128 = 1_000_000;
const MICROS_PER_CENTISECOND: u128 = 10_000;
/// Rates and durations are kept as fixed-point values scaled by this factor.
pub const FIXED_POINT_SCALE: u64 = 100;

/// Unit a phase's headline rate is reported in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RateUnit {
    BytesPerSecond,
    MegabytesPerSecond,
}

impl RateUnit {
    #[must_use]
    pub const fn suffix(self) -> &'static str {
        match self {
            RateUnit::BytesPerSecond => "Bps",
            RateUnit::MegabytesPerSecond => "MB/s",
        }
    }
}

/// Volume processed in one timed window.
///
/// Derived values are hundredths (`_x100`) so `3.20 MB/s` is `320`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunMetrics {
    pub byte_count: u64,
    pub record_count: u64,
    pub elapsed: Duration,
}

impl RunMetrics {
    #[must_use]
    pub const fn new(byte_count: u64, record_count: u64, elapsed: Duration) -> Self {
        Self {
            byte_count,
            record_count,
            elapsed,
        }
    }

    #[must_use]
    pub const fn elapsed_seconds_x100(&self) -> u64 {
        saturate(self.elapsed.as_micros().saturating_div(MICROS_PER_CENTISECOND))
    }

    #[must_use]
    pub const fn bytes_per_second_x100(&self) -> u64 {
        per_second_x100(self.byte_count, MICROS_PER_SECOND, self.elapsed)
    }

    /// Megabytes are 10^6 bytes, so bytes per microsecond equals MB/s.
    #[must_use]
    pub const fn megabytes_per_second_x100(&self) -> u64 {
        per_second_x100(self.byte_count, 1, self.elapsed)
    }

    #[must_use]
    pub const fn records_per_second_x100(&self) -> u64 {
        per_second_x100(self.record_count, MICROS_PER_SECOND, self.elapsed)
    }

    #[must_use]
    pub const fn rate_x100(&self, unit: RateUnit) -> u64 {
        match unit {
            RateUnit::BytesPerSecond => self.bytes_per_second_x100(),
            RateUnit::MegabytesPerSecond => self.megabytes_per_second_x100(),
        }
    }
}

/// `amount * per_micro * 100 / elapsed_micros`, or 0 for a zero-length window.
const fn per_second_x100(amount: u64, per_micro: u128, elapsed: Duration) -> u64 {
    let scaled = (amount as u128)
        .saturating_mul(per_micro)
        .saturating_mul(FIXED_POINT_SCALE as u128);
    match scaled.checked_div(elapsed.as_micros()) {
        Some(value) => saturate(value),
        None => 0,
    }
}

const fn saturate(value: u128) -> u64 {
    if value > u64::MAX as u128 {
        u64::MAX
    } else {
        value as u64
    }
}

/// Renders a hundredths value as `units.hh`.
#[must_use]
pub fn format_x100(value: u64) -> String {
    format!("{}.{:02}", value / FIXED_POINT_SCALE, value % FIXED_POINT_SCALE)
}

/// Per-call latency distribution for discrete runs, in microseconds.
#[derive(Debug)]
pub struct LatencyHistogram {
    hist: Histogram<u64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LatencyPercentiles {
    pub p50_us: u64,
    pub p90_us: u64,
    pub p99_us: u64,
    pub max_us: u64,
}

impl LatencyHistogram {
    /// # Errors
    ///
    /// Returns an error if the histogram cannot be created.
    pub fn new() -> Result<Self, HarnessError> {
        let hist = Histogram::<u64>::new(3).map_err(|err| HarnessError::CreateHistogram {
            message: err.to_string(),
        })?;
        Ok(Self { hist })
    }

    /// # Errors
    ///
    /// Returns an error if the value cannot be recorded.
    pub fn record(&mut self, latency: Duration) -> Result<(), HarnessError> {
        let micros = u64::try_from(latency.as_micros()).unwrap_or(u64::MAX).max(1);
        self.hist
            .record(micros)
            .map_err(|err| HarnessError::RecordLatency {
                message: err.to_string(),
            })
    }

    #[must_use]
    pub fn count(&self) -> u64 {
        self.hist.len()
    }

    #[must_use]
    pub fn percentiles(&self) -> Option<LatencyPercentiles> {
        if self.count() == 0 {
            return None;
        }
        Some(LatencyPercentiles {
            p50_us: self.hist.value_at_quantile(0.5),
            p90_us: self.hist.value_at_quantile(0.9),
            p99_us: self.hist.value_at_quantile(0.99),
            max_us: self.hist.max(),
        })
    }
}
