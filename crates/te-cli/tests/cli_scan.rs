use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use std::time::{SystemTime, UNIX_EPOCH};

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

fn tmp_dir(name: &str) -> PathBuf {
    let mut p = std::env::temp_dir();
    let nanos = SystemTime::now().duration_since(UNIX_EPOCH).unwrap().as_nanos();
    p.push(format!("trigeff-{}-{}-{}", name, std::process::id(), nanos));
    p
}

fn read_json(path: &Path) -> serde_json::Value {
    serde_json::from_slice(&std::fs::read(path).unwrap())
        .unwrap_or_else(|e| panic!("invalid JSON at {}: {}", path.display(), e))
}

#[test]
fn scan_writes_the_artifact_bundle() {
    let spec = fixture_path("met_scan.yaml");
    assert!(spec.exists(), "missing fixture: {}", spec.display());
    let out_dir = tmp_dir("scan");

    let out = run(&[
        "scan",
        "--spec",
        spec.to_string_lossy().as_ref(),
        "--out-dir",
        out_dir.to_string_lossy().as_ref(),
        "--threads",
        "1",
    ]);
    assert!(
        out.status.success(),
        "scan should succeed, stderr={}",
        String::from_utf8_lossy(&out.stderr)
    );

    for name in [
        "thresholds.json",
        "rates_met.json",
        "efficiency_met.json",
        "distributions_met.json",
        "resolution_met.json",
    ] {
        assert!(out_dir.join(name).exists(), "missing artifact {}", name);
    }

    let thresholds = read_json(&out_dir.join("thresholds.json"));
    assert_eq!(thresholds["schema_version"], "trigeff_thresholds_v0");

    let distributions = read_json(&out_dir.join("distributions_met.json"));
    let series = distributions["series"].as_array().unwrap();
    // Offline reference spectrum plus one per configuration.
    assert_eq!(series.len(), 3);
    assert_eq!(series[0]["name"], "puppi_met_nomu");
    assert_eq!(series[0]["error_model"], "garwood_poisson_68");

    let resolution = read_json(&out_dir.join("resolution_met.json"));
    let series = resolution["series"].as_array().unwrap();
    assert_eq!(series.len(), 2);
    // The zero-suppressed configuration reads 10 GeV high on every event.
    let zs: Vec<f64> = series[1]["y"]
        .as_array()
        .unwrap()
        .iter()
        .map(|x| x.as_f64().unwrap())
        .collect();
    let edges: Vec<f64> = resolution["bin_edges"]
        .as_array()
        .unwrap()
        .iter()
        .map(|x| x.as_f64().unwrap())
        .collect();
    let hot = zs.iter().position(|&y| y > 0.0).unwrap();
    assert_eq!(edges[hot], 10.0);
    assert_eq!(zs.iter().sum::<f64>(), 20.0);

    let _ = std::fs::remove_dir_all(&out_dir);
}

#[test]
fn scan_refuses_a_non_empty_out_dir_without_overwrite() {
    let spec = fixture_path("met_scan.yaml");
    let out_dir = tmp_dir("nonempty");
    std::fs::create_dir_all(&out_dir).unwrap();
    std::fs::write(out_dir.join("stale.json"), "{}").unwrap();

    let out = run(&[
        "scan",
        "--spec",
        spec.to_string_lossy().as_ref(),
        "--out-dir",
        out_dir.to_string_lossy().as_ref(),
    ]);
    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("--overwrite"));

    let _ = std::fs::remove_dir_all(&out_dir);
}

#[test]
fn repeated_scans_are_identical_up_to_meta() {
    let spec = fixture_path("met_scan.yaml");
    let dir_a = tmp_dir("idem-a");
    let dir_b = tmp_dir("idem-b");

    for dir in [&dir_a, &dir_b] {
        let out = run(&[
            "scan",
            "--spec",
            spec.to_string_lossy().as_ref(),
            "--out-dir",
            dir.to_string_lossy().as_ref(),
            "--threads",
            "1",
        ]);
        assert!(out.status.success(), "stderr={}", String::from_utf8_lossy(&out.stderr));
    }

    for name in ["thresholds.json", "rates_met.json", "efficiency_met.json"] {
        let mut a = read_json(&dir_a.join(name));
        let mut b = read_json(&dir_b.join(name));
        // Meta carries a timestamp; everything else must match exactly.
        a.as_object_mut().unwrap().remove("meta");
        b.as_object_mut().unwrap().remove("meta");
        assert_eq!(a, b, "artifact {} differs between identical runs", name);
    }

    let _ = std::fs::remove_dir_all(&dir_a);
    let _ = std::fs::remove_dir_all(&dir_b);
}
