use std::process::Command;

/// Helper to get the vec3-bench binary path.
fn bench_bin() -> std::path::PathBuf {
    let mut path = std::path::PathBuf::from(env!("CARGO_BIN_EXE_vec3-bench"));
    // Fallback for test environments
    if !path.exists() {
        path = std::path::PathBuf::from("target/debug/vec3-bench");
    }
    path
}

fn field<'a>(stdout: &'a str, label: &str) -> &'a str {
    stdout
        .lines()
        .find_map(|l| l.strip_prefix(label))
        .unwrap_or_else(|| panic!("missing line {label:?} in:\n{stdout}"))
}

// ================================================================
// full benchmark run
// ================================================================

#[test]
fn full_run_report() {
    let output = Command::new(bench_bin())
        .output()
        .expect("failed to run vec3-bench");
    assert!(output.status.success());
    assert!(
        output.stderr.is_empty(),
        "{}",
        String::from_utf8_lossy(&output.stderr)
    );

    let stdout = String::from_utf8_lossy(&output.stdout);
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines.len(), 7, "{stdout}");
    assert!(lines[0].starts_with("Benchmarking Vector3 Addition ("));
    assert!(lines[0].ends_with(" Optimized)..."));
    assert_eq!(lines[1], "Array Size: 250000 | Runs: 500");
    assert!(!lines[2].is_empty() && lines[2].chars().all(|c| c == '-'));

    let total = field(&stdout, "Total Time   : ")
        .strip_suffix(" seconds")
        .unwrap();
    let avg = field(&stdout, "Avg Time/Run : ")
        .strip_suffix(" seconds")
        .unwrap();
    let mflops = field(&stdout, "Throughput   : ")
        .strip_suffix(" MFLOPS")
        .unwrap();

    // six decimals on the timings, two on throughput
    assert_eq!(total.split('.').nth(1).map(str::len), Some(6));
    assert_eq!(avg.split('.').nth(1).map(str::len), Some(6));
    assert_eq!(mflops.split('.').nth(1).map(str::len), Some(2));

    let total: f64 = total.parse().unwrap();
    let avg: f64 = avg.parse().unwrap();
    let mflops: f64 = mflops.parse().unwrap();
    assert!(total > 0.0);
    assert!(avg <= total);
    assert!(mflops > 0.0);

    // output[0] is (0,0,0) + (0,0,0) on every run
    assert_eq!(field(&stdout, "Sink Value   : "), "0.000000");
}

// ================================================================
// argument surface
// ================================================================

#[test]
fn rejects_arguments() {
    let output = Command::new(bench_bin())
        .arg("--size")
        .arg("10")
        .output()
        .expect("failed to run vec3-bench");
    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
}

#[test]
fn prints_version() {
    let output = Command::new(bench_bin())
        .arg("--version")
        .output()
        .expect("failed to run vec3-bench");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("vec3-bench"));
}
