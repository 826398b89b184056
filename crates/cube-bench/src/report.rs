//! Fixed-layout rendering of the collected measurements: a markdown table
//! with one block per scenario, persisted under a fixed filename, plus an
//! optional JSON baseline artifact for tooling.

use crate::Dims;
use crate::scenarios::{ScenarioKind, ScenarioResult};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

/// The report file the run overwrites on every invocation.
pub const REPORT_FILE_NAME: &str = "comprehensive_summary.md";

const COL_CASE: usize = 20;
const COL_OP: usize = 26;
const COL_NESTED: usize = 21;
const COL_DENSE: usize = 22;

fn separator() -> String {
    format!(
        "|{}|{}|{}|{}|",
        "-".repeat(COL_CASE),
        "-".repeat(COL_OP),
        "-".repeat(COL_NESTED),
        "-".repeat(COL_DENSE)
    )
}

fn text_row(case: &str, operation: &str, nested: &str, dense: &str) -> String {
    format!(
        "|{case:<cw$}|{operation:<ow$}|{nested:<nw$}|{dense:<dw$}|",
        cw = COL_CASE,
        ow = COL_OP,
        nw = COL_NESTED,
        dw = COL_DENSE,
    )
}

fn metric_row(label: &str, note: &str, nested: f64, dense: f64) -> String {
    let case = format!("       **{label}**");
    format!(
        "|{case:<cw$}|{note:<ow$}|{nested:^nw$.4}|{dense:^dw$.4}|",
        cw = COL_CASE,
        ow = COL_OP,
        nw = COL_NESTED,
        dw = COL_DENSE,
    )
}

/// Render the five scenario blocks. Each block shows wall time, CPU time,
/// and memory delta for the nested column vs the dense column; sentinel
/// outcomes render as 0.0000 like any other value.
#[must_use]
pub fn render_markdown(dims: Dims, results: &[ScenarioResult]) -> String {
    let mut md = Vec::new();
    md.push(text_row(
        " **Test Case**",
        " **Operation**",
        " **Nested 3-D Vec**",
        " **Dense Buffer**",
    ));
    md.push(separator());

    for result in results {
        let kind = result.kind;
        md.push(text_row(
            &format!(" **{}. {}**", kind.number(), kind.label()),
            &format!(" {}", kind.operation()),
            "",
            "",
        ));

        let dims_note = if kind == ScenarioKind::Creation {
            format!(" `[{:5} x{:5} x{:5}]`", dims.x, dims.y, dims.z)
        } else {
            String::new()
        };
        md.push(metric_row(
            "Time:",
            &dims_note,
            result.nested.metrics.wall_time_s,
            result.dense.metrics.wall_time_s,
        ));
        md.push(metric_row(
            "CPU Time:",
            "",
            result.nested.metrics.cpu_time_s,
            result.dense.metrics.cpu_time_s,
        ));
        md.push(metric_row(
            "Memory:",
            "",
            result.nested.metrics.memory_delta_mb,
            result.dense.metrics.memory_delta_mb,
        ));
        md.push(separator());
    }

    let mut out = md.join("\n");
    out.push('\n');
    out
}

pub fn write_report(path: &Path, markdown: &str) -> Result<(), String> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .map_err(|err| format!("failed creating {}: {err}", parent.display()))?;
        }
    }
    fs::write(path, markdown).map_err(|err| format!("failed writing {}: {err}", path.display()))
}

/// Machine-readable companion to the markdown table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BaselineReport {
    pub schema_version: u8,
    pub generated_at_unix_ms: u128,
    pub dims: Dims,
    pub seed: u64,
    pub scenarios: Vec<ScenarioResult>,
}

impl BaselineReport {
    #[must_use]
    pub fn new(dims: Dims, seed: u64, scenarios: Vec<ScenarioResult>) -> Self {
        Self {
            schema_version: 1,
            generated_at_unix_ms: now_unix_ms(),
            dims,
            seed,
            scenarios,
        }
    }
}

fn now_unix_ms() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| d.as_millis())
}

pub fn write_baseline(path: &Path, baseline: &BaselineReport) -> Result<(), String> {
    let raw = serde_json::to_string_pretty(baseline)
        .map_err(|err| format!("failed serializing baseline: {err}"))?;
    write_report(path, &raw)
}
