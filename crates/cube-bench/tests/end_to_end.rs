use cube_bench::report::BaselineReport;
use cube_bench::{BenchConfig, Dims, run_and_persist, run_comparison_suite};
use std::fs;
use std::path::PathBuf;

fn temp_path(name: &str) -> PathBuf {
    let ts = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map_or(0, |d| d.as_nanos());
    std::env::temp_dir().join(format!("cube_bench_e2e_{name}_{ts}"))
}

fn small_config() -> BenchConfig {
    BenchConfig {
        dims: Dims::cubed(2),
        seed: 1234,
        report_path: temp_path("summary.md"),
        baseline_path: None,
    }
}

#[test]
fn full_sequence_produces_five_blocks_with_sane_fields() {
    let cfg = small_config();
    let results = run_comparison_suite(&cfg).expect("suite should run");
    assert_eq!(results.len(), 5);

    for result in &results {
        for outcome in [&result.nested, &result.dense] {
            assert!(
                outcome.metrics.wall_time_s >= 0.0,
                "negative wall time in {:?}",
                result.kind
            );
            assert!(
                outcome.metrics.cpu_time_s >= 0.0,
                "negative cpu time in {:?}",
                result.kind
            );
            // Memory deltas may dip below zero from measurement noise; only
            // assert they are finite.
            assert!(outcome.metrics.memory_delta_mb.is_finite());
        }
    }

    let dot = results.last().expect("dot scenario present");
    assert!(dot.dense.is_sentinel(), "dense dot must be a zero sentinel");
    assert!(!dot.nested.is_sentinel());
}

#[test]
fn report_file_is_written_with_all_scenarios() {
    let cfg = small_config();
    let markdown = run_and_persist(&cfg).expect("run should persist a report");

    let persisted = fs::read_to_string(&cfg.report_path).expect("report file readable");
    assert_eq!(persisted, markdown);
    for block in [
        "**1. Creation**",
        "**2. Copying**",
        "**3. Stat Calc**",
        "**4. Multiply**",
        "**5. Dot**",
    ] {
        assert!(persisted.contains(block), "missing {block} in report");
    }

    let _ = fs::remove_file(cfg.report_path);
}

#[test]
fn baseline_artifact_matches_suite_shape() {
    let mut cfg = small_config();
    cfg.baseline_path = Some(temp_path("baseline.json"));

    run_and_persist(&cfg).expect("run should persist artifacts");

    let baseline_path = cfg.baseline_path.expect("baseline path configured");
    let raw = fs::read_to_string(&baseline_path).expect("baseline readable");
    let baseline: BaselineReport = serde_json::from_str(&raw).expect("baseline parses");

    assert_eq!(baseline.schema_version, 1);
    assert_eq!(baseline.dims, Dims::cubed(2));
    assert_eq!(baseline.seed, 1234);
    assert_eq!(baseline.scenarios.len(), 5);
    let dot = baseline.scenarios.last().expect("dot scenario");
    assert!(dot.dense.error.as_deref().is_some_and(|e| !e.is_empty()));

    let _ = fs::remove_file(cfg.report_path);
    let _ = fs::remove_file(baseline_path);
}
