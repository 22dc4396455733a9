use assert_cmd::Command;
use predicates::prelude::*;
use std::io::Write;
use tempfile::NamedTempFile;

fn connlab() -> Command {
    Command::cargo_bin("connlab").unwrap()
}

fn json_file(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

/// Three channels of 1 s at 64 Hz: 8 Hz sine, 16 Hz sine, 8 Hz cosine
fn recording_json() -> String {
    let rows: Vec<Vec<f64>> = (0..3)
        .map(|c| {
            (0..64)
                .map(|t| {
                    let t = t as f64 / 64.0;
                    match c {
                        0 => (2.0 * std::f64::consts::PI * 8.0 * t).sin(),
                        1 => (2.0 * std::f64::consts::PI * 16.0 * t).sin(),
                        _ => (2.0 * std::f64::consts::PI * 8.0 * t).cos(),
                    }
                })
                .collect()
        })
        .collect();
    serde_json::json!({ "sampling_frequency": 64.0, "data": rows }).to_string()
}

/// Evoked set with three gradiometers, one magnetometer and one EEG channel
fn evoked_json() -> String {
    let units = [201, 201, 112, 107, 201];
    let channels: Vec<serde_json::Value> = units
        .iter()
        .enumerate()
        .map(|(i, unit)| {
            serde_json::json!({
                "name": format!("CH {}", i),
                "unit": unit,
                "position": [i as f32, 0.0, 0.0]
            })
        })
        .collect();
    let data: Vec<Vec<f64>> = (0..5)
        .map(|c| (0..80).map(|t| ((c + 1) as f64 * t as f64 * 0.07).sin()).collect())
        .collect();
    serde_json::json!({
        "info": { "channels": channels, "bads": ["CH 1"], "sampling_frequency": 100.0 },
        "data": data
    })
    .to_string()
}

fn stdout_json(assert: &assert_cmd::assert::Assert) -> serde_json::Value {
    let stdout = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    serde_json::from_str(&stdout).unwrap()
}

// =============================================================================
// GENERAL
// =============================================================================

#[test]
fn test_no_args_shows_help() {
    connlab()
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage:"));
}

#[test]
fn test_version_flag() {
    connlab()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("connlab"));
}

#[test]
fn test_help_lists_subcommands() {
    connlab()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("psd"))
        .stdout(predicate::str::contains("csd"))
        .stdout(predicate::str::contains("connectivity"));
}

// =============================================================================
// PSD SUBCOMMAND
// =============================================================================

#[test]
fn test_psd_unpadded() {
    let file = json_file(&recording_json());
    let assert = connlab()
        .args(["psd", "--file"])
        .arg(file.path())
        .args(["--no-zero-pad", "--compact"])
        .assert()
        .success();

    let result = stdout_json(&assert);
    assert_eq!(result["nfft"], 64);
    assert_eq!(result["window"], "hanning");
    assert_eq!(result["freq_bins"].as_array().unwrap().len(), 33);
    assert_eq!(result["freq_bins"][32], 32.0);

    let psd = result["psd"].as_array().unwrap();
    assert_eq!(psd.len(), 3);
    let row: Vec<f64> = psd[1]
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v.as_f64().unwrap())
        .collect();
    let peak = (0..row.len())
        .max_by(|&a, &b| row[a].partial_cmp(&row[b]).unwrap())
        .unwrap();
    assert_eq!(peak, 16);
}

#[test]
fn test_psd_selected_channels_to_file() {
    let file = json_file(&recording_json());
    let out = NamedTempFile::new().unwrap();
    connlab()
        .args(["psd", "--file"])
        .arg(file.path())
        .args(["--channels", "2", "0", "--window", "ones", "--output"])
        .arg(out.path())
        .assert()
        .success();

    let written: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(out.path()).unwrap()).unwrap();
    assert_eq!(written["channels"], serde_json::json!([2, 0]));
    assert_eq!(written["window"], "ones");
    // 2 * 64 - 1 -> 128
    assert_eq!(written["nfft"], 128);
}

#[test]
fn test_psd_missing_file() {
    connlab()
        .args(["psd", "--file", "/nonexistent/recording.json"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Error"));
}

#[test]
fn test_psd_channel_out_of_range() {
    let file = json_file(&recording_json());
    connlab()
        .args(["psd", "--file"])
        .arg(file.path())
        .args(["--channels", "3"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("out of range"));
}

#[test]
fn test_psd_oversized_nfft_rejected() {
    let file = json_file(&recording_json());
    connlab()
        .args(["psd", "--file"])
        .arg(file.path())
        .args(["--nfft", &usize::MAX.to_string()])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("FFT length"));
}

// =============================================================================
// CSD SUBCOMMAND
// =============================================================================

#[test]
fn test_csd_seed_against_targets() {
    let file = json_file(&recording_json());
    let assert = connlab()
        .args(["csd", "--file"])
        .arg(file.path())
        .args(["--seed", "0", "--channels", "0", "2", "--no-zero-pad"])
        .assert()
        .success();

    let result = stdout_json(&assert);
    assert_eq!(result["seed"], 0);
    assert_eq!(result["real"].as_array().unwrap().len(), 2);
    // Auto-spectrum is real
    for value in result["imag"][0].as_array().unwrap() {
        assert!(value.as_f64().unwrap().abs() < 1e-9);
    }
}

#[test]
fn test_csd_all_pairs() {
    let file = json_file(&recording_json());
    let assert = connlab()
        .args(["csd", "--all-pairs", "--compact", "--file"])
        .arg(file.path())
        .assert()
        .success();

    let result = stdout_json(&assert);
    let all = result.as_array().unwrap();
    assert_eq!(all.len(), 3);
    assert_eq!(all[2]["seed"], 2);
    assert_eq!(all[2]["channels"], serde_json::json!([0, 1, 2]));
}

// =============================================================================
// CONNECTIVITY SUBCOMMAND
// =============================================================================

#[test]
fn test_connectivity_sensor_level() {
    let evoked = json_file(&evoked_json());
    let assert = connlab()
        .args(["connectivity", "--quiet", "--evoked"])
        .arg(evoked.path())
        .assert()
        .success();

    let network = stdout_json(&assert);
    assert_eq!(network["method"], "COR");
    assert_eq!(network["status"]["kind"], "computed");
    assert_eq!(network["nodes"].as_array().unwrap().len(), 3);
    assert_eq!(network["edges"].as_array().unwrap().len(), 3);
}

#[test]
fn test_connectivity_settings_file() {
    let evoked = json_file(&evoked_json());
    let settings = json_file(r#"{"method": "XCOR", "exclude_bads": true}"#);
    let assert = connlab()
        .args(["connectivity", "--quiet", "--evoked"])
        .arg(evoked.path())
        .arg("--settings")
        .arg(settings.path())
        .assert()
        .success();

    let network = stdout_json(&assert);
    assert_eq!(network["method"], "XCOR");
    assert_eq!(network["nodes"].as_array().unwrap().len(), 2);
}

#[test]
fn test_connectivity_threshold_drops_edges() {
    let evoked = json_file(&evoked_json());
    let assert = connlab()
        .args(["connectivity", "--quiet", "--threshold", "1.5", "--evoked"])
        .arg(evoked.path())
        .assert()
        .success();

    let network = stdout_json(&assert);
    assert_eq!(network["nodes"].as_array().unwrap().len(), 3);
    assert!(network["edges"].as_array().unwrap().is_empty());
}

#[test]
fn test_connectivity_unsupported_method() {
    let evoked = json_file(&evoked_json());
    let assert = connlab()
        .args(["connectivity", "--quiet", "--method", "PLV", "--evoked"])
        .arg(evoked.path())
        .assert()
        .code(3)
        .stderr(predicate::str::contains("not supported"));

    let network = stdout_json(&assert);
    assert_eq!(network["status"]["kind"], "unsupported_method");
    assert_eq!(network["status"]["method"], "PLV");
}

#[test]
fn test_connectivity_missing_evoked() {
    connlab()
        .args([
            "connectivity",
            "--quiet",
            "--evoked",
            "/nonexistent/evoked.json",
        ])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("No usable data"));
}

#[test]
fn test_connectivity_source_level_unsupported() {
    let evoked = json_file(&evoked_json());
    let settings = json_file(r#"{"do_source_loc": true}"#);
    connlab()
        .args(["connectivity", "--evoked"])
        .arg(evoked.path())
        .arg("--settings")
        .arg(settings.path())
        .assert()
        .code(3)
        .stderr(predicate::str::contains("Source-level"));
}
