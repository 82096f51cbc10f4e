use std::process;

use clap::Parser;
use vec3_bench::{Bench, BenchConfig};

/// Command-line surface of `vec3-bench`. Every benchmark parameter is
/// compiled in, so only `--help` and `--version` are accepted.
#[derive(Parser)]
#[command(
    name = "vec3-bench",
    about = "vec3-bench: interleaved Vector3 addition throughput (MFLOPS)",
    version
)]
struct Cli {}

/// Stderr-only logging so stdout carries nothing but the report.
fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter("warn")
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();
}

/// Allocate, print the header, run the timed loop and print the summary.
fn run(config: BenchConfig) -> Result<(), Box<dyn std::error::Error>> {
    let mut bench = Bench::setup(config)?;
    println!("{}", bench.header());
    let report = bench.run();
    println!("{report}");
    Ok(())
}

/// Entry point: reject stray arguments, then run the benchmark
fn main() {
    let Cli {} = Cli::parse();
    init_tracing();

    if let Err(e) = run(BenchConfig::default()) {
        eprintln!("error: {e}");
        process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn cli_accepts_no_arguments() {
        assert!(Cli::try_parse_from(["vec3-bench"]).is_ok());
    }

    #[test]
    fn cli_rejects_extra_arguments() {
        assert!(Cli::try_parse_from(["vec3-bench", "1000"]).is_err());
        assert!(Cli::try_parse_from(["vec3-bench", "--runs", "5"]).is_err());
    }

    #[test]
    fn run_small_config() {
        let config = BenchConfig {
            array_size: 64,
            runs: 2,
            alignment: 16,
        };
        assert!(run(config).is_ok());
    }

    #[test]
    fn run_reports_allocation_failure() {
        let config = BenchConfig {
            array_size: 8,
            runs: 1,
            alignment: 48,
        };
        let err = run(config).unwrap_err();
        assert!(err.to_string().contains("input a"));
    }
}
