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
fn rates_contract() {
    let spec = fixture_path("met_scan.yaml");
    assert!(spec.exists(), "missing fixture: {}", spec.display());

    let out = run(&["rates", "--spec", spec.to_string_lossy().as_ref(), "--quantity", "met"]);
    assert!(
        out.status.success(),
        "rates should succeed, stderr={}",
        String::from_utf8_lossy(&out.stderr)
    );

    let v: serde_json::Value =
        serde_json::from_slice(&out.stdout).expect("stdout should be valid JSON");
    assert_eq!(v["schema_version"], "trigeff_rates_v0");
    assert_eq!(v["quantity"], "met");
    assert_eq!(v["reference"], "Default");

    let edges = v["bin_edges"].as_array().expect("bin_edges should be array");
    assert_eq!(edges.len(), 101);

    let series = v["series"].as_array().expect("series should be array");
    assert_eq!(series.len(), 2);
    assert_eq!(series[0]["label"], "Default");
    assert_eq!(series[0]["n_events"], 80);

    // Cumulative rates never increase with the threshold bin.
    for s in series {
        let rates: Vec<f64> =
            s["rates"].as_array().unwrap().iter().map(|x| x.as_f64().unwrap()).collect();
        assert_eq!(rates.len(), 100);
        for w in rates.windows(2) {
            assert!(w[0] >= w[1], "rates increased: {} -> {}", w[0], w[1]);
        }
    }

    // Target rates are the reference curve read off at its thresholds.
    let default_rates = series[0]["rates"].as_array().unwrap();
    let targets = v["target_rates"].as_array().unwrap();
    assert_eq!(default_rates[30], targets[0]);
    assert_eq!(default_rates[60], targets[1]);
}

#[test]
fn rates_rejects_unknown_quantity() {
    let spec = fixture_path("met_scan.yaml");
    let out = run(&["rates", "--spec", spec.to_string_lossy().as_ref(), "--quantity", "jet"]);
    assert!(!out.status.success());
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("jet"), "stderr should name the quantity: {}", stderr);
}
