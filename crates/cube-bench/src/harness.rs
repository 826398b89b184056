//! The measurement contract: run an operation exactly once, bracketed by
//! wall-clock, CPU-time, and resident-memory readings.

use crate::metrics::{MetricsError, ProcessProbe};
use serde::{Deserialize, Serialize};
use std::time::Instant;

const BYTES_PER_MIB: f64 = 1024.0 * 1024.0;

/// Derived quantities for a single operation invocation. Memory is a delta
/// of process-wide counters and can come out negative under allocator or
/// GC-like noise; callers get a directional signal, not a tight number.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Measurement {
    pub wall_time_s: f64,
    pub cpu_time_s: f64,
    pub memory_delta_mb: f64,
}

impl Measurement {
    pub const ZERO: Self = Self {
        wall_time_s: 0.0,
        cpu_time_s: 0.0,
        memory_delta_mb: 0.0,
    };
}

#[derive(Debug, Clone)]
pub struct Measured<T> {
    pub output: T,
    pub metrics: Measurement,
}

/// Invoke `op` once and capture the four derived quantities around it. Probe
/// failures surface as `MetricsError`; the operation's own output is handed
/// back untouched.
pub fn measure<T>(probe: &ProcessProbe, op: impl FnOnce() -> T) -> Result<Measured<T>, MetricsError> {
    let rss_before = probe.resident_memory_bytes()?;
    let cpu_before = probe.cpu_time()?;
    let wall_start = Instant::now();

    let output = op();

    let wall_elapsed = wall_start.elapsed();
    let cpu_after = probe.cpu_time()?;
    let rss_after = probe.resident_memory_bytes()?;

    let metrics = Measurement {
        wall_time_s: wall_elapsed.as_secs_f64(),
        cpu_time_s: cpu_after.saturating_sub(cpu_before).as_secs_f64(),
        memory_delta_mb: (rss_after as f64 - rss_before as f64) / BYTES_PER_MIB,
    };

    Ok(Measured { output, metrics })
}
