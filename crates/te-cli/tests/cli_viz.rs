use std::path::PathBuf;
use std::process::{Command, Output};

fn bin_path() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_trigeff"))
}

fn repo_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../..").canonicalize().unwrap()
}

fn fixture_path(name: &str) -> PathBuf {
    repo_root().join("tests/fixtures").join(name)
}

fn run(args: &[&str]) -> Output {
    Command::new(bin_path())
        .args(args)
        .output()
        .unwrap_or_else(|e| panic!("failed to run {:?} {:?}: {}", bin_path(), args, e))
}

#[test]
fn viz_distributions_contract() {
    let spec = fixture_path("met_scan.yaml");
    assert!(spec.exists(), "missing fixture: {}", spec.display());

    let out = run(&[
        "viz",
        "distributions",
        "--spec",
        spec.to_string_lossy().as_ref(),
        "--bins",
        "50",
        "--min",
        "0.0",
        "--max",
        "100.0",
    ]);
    assert!(
        out.status.success(),
        "viz distributions should succeed, stderr={}",
        String::from_utf8_lossy(&out.stderr)
    );

    let v: serde_json::Value =
        serde_json::from_slice(&out.stdout).expect("stdout should be valid JSON");
    assert_eq!(v["schema_version"], "trigeff_distributions_v0");
    assert_eq!(v["quantity"], "met");
    assert_eq!(v["bin_edges"].as_array().unwrap().len(), 51);

    let series = v["series"].as_array().expect("series should be array");
    assert_eq!(series.len(), 3);
    for s in series {
        let y = s["y"].as_array().unwrap();
        assert_eq!(y.len(), 50);
        assert_eq!(y.len(), s["yerr_lo"].as_array().unwrap().len());
        assert_eq!(y.len(), s["yerr_hi"].as_array().unwrap().len());
    }
}

#[test]
fn viz_resolution_contract() {
    let spec = fixture_path("met_scan.yaml");

    let out = run(&[
        "viz",
        "resolution",
        "--spec",
        spec.to_string_lossy().as_ref(),
        "--bins",
        "40",
        "--min",
        "-20.0",
        "--max",
        "20.0",
    ]);
    assert!(
        out.status.success(),
        "viz resolution should succeed, stderr={}",
        String::from_utf8_lossy(&out.stderr)
    );

    let v: serde_json::Value =
        serde_json::from_slice(&out.stdout).expect("stdout should be valid JSON");
    assert_eq!(v["schema_version"], "trigeff_resolution_v0");
    assert_eq!(v["offline_column"], "puppi_met_nomu");

    let series = v["series"].as_array().expect("series should be array");
    assert_eq!(series.len(), 2);
    // Default triggers exactly on the offline value: every residual is 0.
    assert_eq!(series[0]["label"], "Default");
    assert_eq!(series[0]["entries"], 20.0);
    let y: Vec<f64> = series[0]["y"]
        .as_array()
        .unwrap()
        .iter()
        .map(|x| x.as_f64().unwrap())
        .collect();
    assert_eq!(y[20], 20.0);
}

#[test]
fn version_prints_the_workspace_version() {
    let out = run(&["version"]);
    assert!(out.status.success());
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.starts_with("trigeff "), "unexpected version output: {}", stdout);
}
