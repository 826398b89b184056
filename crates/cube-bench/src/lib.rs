#![forbid(unsafe_code)]

pub mod harness;
pub mod metrics;
pub mod report;
pub mod scenarios;

use crate::metrics::{MetricsError, ProcessProbe};
use crate::report::{BaselineReport, REPORT_FILE_NAME};
use crate::scenarios::{
    ScenarioResult, run_copying, run_creation, run_dot, run_multiply, run_statistics,
};
use cube_random::{DEFAULT_RNG_SEED, DeterministicRng};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::str::FromStr;

/// Logical shape of the cubes under comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dims {
    pub x: usize,
    pub y: usize,
    pub z: usize,
}

impl Dims {
    #[must_use]
    pub const fn cubed(n: usize) -> Self {
        Self { x: n, y: n, z: n }
    }

    /// Checked product of the three axes; `None` when the count does not
    /// fit a `usize`.
    #[must_use]
    pub fn element_count(&self) -> Option<usize> {
        self.x.checked_mul(self.y)?.checked_mul(self.z)
    }
}

impl std::fmt::Display for Dims {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}x{}", self.x, self.y, self.z)
    }
}

impl FromStr for Dims {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let mut parts = raw.split('x');
        let mut next_dim = |axis: &str| {
            parts
                .next()
                .ok_or_else(|| format!("dims missing {axis} axis in {raw:?}"))?
                .trim()
                .parse::<usize>()
                .map_err(|err| format!("bad {axis} axis in {raw:?}: {err}"))
        };
        let x = next_dim("x")?;
        let y = next_dim("y")?;
        let z = next_dim("z")?;
        if parts.next().is_some() {
            return Err(format!("dims {raw:?} has more than three axes"));
        }
        Ok(Self { x, y, z })
    }
}

#[derive(Debug, Clone)]
pub struct BenchConfig {
    pub dims: Dims,
    pub seed: u64,
    pub report_path: PathBuf,
    pub baseline_path: Option<PathBuf>,
}

impl BenchConfig {
    #[must_use]
    pub fn default_paths() -> Self {
        Self {
            dims: Dims::cubed(200),
            seed: DEFAULT_RNG_SEED,
            report_path: PathBuf::from(REPORT_FILE_NAME),
            baseline_path: None,
        }
    }
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self::default_paths()
    }
}

/// The linear measurement sequence: create both representations, then reuse
/// the first nested cube as the common base for every later scenario.
pub fn run_comparison_suite(cfg: &BenchConfig) -> Result<Vec<ScenarioResult>, MetricsError> {
    let probe = ProcessProbe::for_current_process();
    let mut rng = DeterministicRng::new(cfg.seed);

    println!("running scenario 1/5: creation ({})", cfg.dims);
    let (pair, creation) = run_creation(&probe, cfg.dims, &mut rng)?;

    println!("running scenario 2/5: copying");
    let copying = run_copying(&probe, &pair)?;

    println!("running scenario 3/5: statistics");
    let statistics = run_statistics(&probe, &pair)?;

    println!("running scenario 4/5: multiply");
    let multiply = run_multiply(&probe, &pair, &mut rng)?;

    println!("running scenario 5/5: dot");
    let dot = run_dot(&probe, &pair, &mut rng)?;

    Ok(vec![creation, copying, statistics, multiply, dot])
}

/// Run the suite, write the markdown report (and the optional JSON
/// baseline), and hand back the rendered table.
pub fn run_and_persist(cfg: &BenchConfig) -> Result<String, String> {
    let results = run_comparison_suite(cfg).map_err(|err| err.to_string())?;

    let markdown = report::render_markdown(cfg.dims, &results);
    report::write_report(&cfg.report_path, &markdown)?;

    if let Some(baseline_path) = &cfg.baseline_path {
        let baseline = BaselineReport::new(cfg.dims, cfg.seed, results);
        report::write_baseline(baseline_path, &baseline)?;
    }

    Ok(markdown)
}

#[cfg(test)]
mod tests {
    use super::{BenchConfig, Dims};
    use std::path::PathBuf;

    #[test]
    fn dims_parse_round_trip() {
        let dims: Dims = "4x5x6".parse().expect("well-formed dims");
        assert_eq!(dims, Dims { x: 4, y: 5, z: 6 });
        assert_eq!(dims.to_string(), "4x5x6");
        assert_eq!(dims.element_count(), Some(120));
    }

    #[test]
    fn dims_element_count_is_overflow_checked() {
        let dims = Dims {
            x: usize::MAX,
            y: 2,
            z: 1,
        };
        assert_eq!(dims.element_count(), None);
        assert_eq!(Dims::cubed(2).element_count(), Some(8));
    }

    #[test]
    fn dims_parse_rejects_malformed_input() {
        assert!("4x5".parse::<Dims>().is_err());
        assert!("4x5x6x7".parse::<Dims>().is_err());
        assert!("axbxc".parse::<Dims>().is_err());
    }

    #[test]
    fn default_config_targets_fixed_report_name() {
        let cfg = BenchConfig::default_paths();
        assert_eq!(cfg.dims, Dims::cubed(200));
        assert_eq!(cfg.report_path, PathBuf::from("comprehensive_summary.md"));
        assert!(cfg.baseline_path.is_none());
    }
}
