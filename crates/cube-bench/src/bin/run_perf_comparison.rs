#![forbid(unsafe_code)]

use cube_bench::{BenchConfig, Dims, run_and_persist};
use std::path::PathBuf;

fn main() {
    if let Err(err) = run() {
        eprintln!("run_perf_comparison failed: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), String> {
    let mut cfg = BenchConfig::default_paths();

    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--dims" => {
                let value = args
                    .next()
                    .ok_or_else(|| "--dims requires a value like 200x200x200".to_string())?;
                cfg.dims = value.parse::<Dims>()?;
            }
            "--seed" => {
                let value = args
                    .next()
                    .ok_or_else(|| "--seed requires a value".to_string())?;
                cfg.seed = value
                    .parse::<u64>()
                    .map_err(|err| format!("bad seed {value:?}: {err}"))?;
            }
            "--output" => {
                let value = args
                    .next()
                    .ok_or_else(|| "--output requires a path".to_string())?;
                cfg.report_path = PathBuf::from(value);
            }
            "--json-baseline" => {
                let value = args
                    .next()
                    .ok_or_else(|| "--json-baseline requires a path".to_string())?;
                cfg.baseline_path = Some(PathBuf::from(value));
            }
            "--help" | "-h" => {
                println!(
                    "Usage: cargo run -p cube-bench --bin run_perf_comparison -- \
                     [--dims <XxYxZ>] [--seed <u64>] [--output <path>] [--json-baseline <path>]"
                );
                return Ok(());
            }
            unknown => return Err(format!("unknown argument: {unknown}")),
        }
    }

    println!("## Nested 3-D Vec vs Dense Buffer Performance Comparison ##\n");
    let markdown = run_and_persist(&cfg)?;
    println!("\n{markdown}");
    println!("report written to {}", cfg.report_path.display());
    if let Some(baseline_path) = &cfg.baseline_path {
        println!("baseline written to {}", baseline_path.display());
    }
    Ok(())
}
