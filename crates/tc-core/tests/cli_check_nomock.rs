//! No-mock CLI tests for tc-core.
//!
//! Runs the real binary against config files in a temp dir. Every command is
//! isolated from the caller's environment: `TTS_CONFIG` and `TTS_CONFIG_DIR`
//! are cleared and XDG points at an empty directory.

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::{json, Value};
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

fn tc_core(temp: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("tc-core").expect("tc-core binary should exist");
    cmd.env_remove("TTS_CONFIG")
        .env_remove("TTS_CONFIG_DIR")
        .env_remove("RUST_LOG")
        .env_remove("TC_LOG")
        .env("XDG_CONFIG_HOME", temp.path().join("empty-xdg"));
    cmd
}

fn write_config(temp: &TempDir, content: Value) -> PathBuf {
    let path = temp.path().join("config.json");
    fs::write(&path, serde_json::to_string_pretty(&content).unwrap()).expect("write config");
    path
}

fn ljspeech_config() -> Value {
    json!({
        "text_cleaner": "phoneme_cleaners",
        "output_path": "/tmp/tts-run",
        "audio": {"sample_rate": 22050},
        "datasets": [{
            "name": "ljspeech",
            "path": "/data/LJSpeech-1.1/",
            "meta_file_train": "metadata.csv"
        }]
    })
}

fn stdout_json(output: &std::process::Output) -> Value {
    serde_json::from_slice(&output.stdout).expect("stdout should be JSON")
}

mod check {
    use super::*;

    #[test]
    fn clean_config_exits_zero() {
        let temp = TempDir::new().unwrap();
        let path = write_config(&temp, ljspeech_config());
        tc_core(&temp)
            .args(["check", "--config"])
            .arg(&path)
            .assert()
            .code(0)
            .stdout(predicate::str::contains("✓ no violations"));
    }

    #[test]
    fn violations_exit_one_with_paths() {
        let temp = TempDir::new().unwrap();
        let mut config = ljspeech_config();
        config["datasets"][0]
            .as_object_mut()
            .unwrap()
            .remove("meta_file_train");
        config["gst"] = json!({"gst_num_heads": 1});
        let path = write_config(&temp, config);

        let output = tc_core(&temp)
            .args(["check", "--format", "json", "--config"])
            .arg(&path)
            .output()
            .unwrap();
        assert_eq!(output.status.code(), Some(1));

        let response = stdout_json(&output);
        assert_eq!(response["status"], "invalid");
        assert_eq!(response["record"], "TacotronGSTConfig");
        assert_eq!(response["source"], "cli_argument");
        assert_eq!(response["violation_count"], 2);
        assert_eq!(
            response["violations"][0]["path"],
            json!(["datasets", 0, "meta_file_train"])
        );
        assert_eq!(response["violations"][0]["kind"], "missing_required");
        assert_eq!(response["violations"][1]["path"], json!(["gst", "gst_num_heads"]));
        assert_eq!(response["violations"][1]["kind"], "out_of_range");
    }

    #[test]
    fn defaults_only_report_required_fields() {
        let temp = TempDir::new().unwrap();
        let output = tc_core(&temp)
            .args(["check", "-f", "json", "--schema", "tts"])
            .output()
            .unwrap();
        assert_eq!(output.status.code(), Some(1));

        let response = stdout_json(&output);
        assert_eq!(response["source"], "builtin_default");
        assert!(response["path"].is_null());
        let kinds: Vec<&str> = response["violations"]
            .as_array()
            .unwrap()
            .iter()
            .filter_map(|v| v["kind"].as_str())
            .collect();
        assert!(!kinds.is_empty());
        assert!(kinds.iter().all(|k| *k == "missing_required"));
    }

    #[test]
    fn set_overrides_apply_after_file() {
        let temp = TempDir::new().unwrap();
        let path = write_config(&temp, ljspeech_config());
        tc_core(&temp)
            .args(["check", "-f", "summary", "--set", "audio.sample_rate=256", "--config"])
            .arg(&path)
            .assert()
            .code(1)
            .stdout(predicate::str::contains(
                "[TacotronGSTConfig] check: INVALID (1 violation(s))",
            ));
    }

    #[test]
    fn numeric_set_value_for_string_field() {
        let temp = TempDir::new().unwrap();
        let output = tc_core(&temp)
            .args(["check", "-f", "json", "--schema", "gst", "--set", "gst_style_input_wav=123"])
            .output()
            .unwrap();
        assert_eq!(output.status.code(), Some(0));
        let response = stdout_json(&output);
        assert_eq!(response["status"], "ok");
        assert_eq!(response["violation_count"], 0);
    }

    #[test]
    fn env_config_path_is_used() {
        let temp = TempDir::new().unwrap();
        let path = write_config(&temp, json!({"gst_num_heads": 6}));
        let output = tc_core(&temp)
            .env("TTS_CONFIG", &path)
            .args(["check", "-f", "json", "--schema", "gst"])
            .output()
            .unwrap();
        assert_eq!(output.status.code(), Some(0));
        let response = stdout_json(&output);
        assert_eq!(response["source"], "environment");
        assert_eq!(response["status"], "ok");
    }

    #[test]
    fn unknown_key_is_config_error() {
        let temp = TempDir::new().unwrap();
        let mut config = ljspeech_config();
        config["audio"]["sample_rte"] = json!(22050);
        let path = write_config(&temp, config);
        tc_core(&temp)
            .args(["check", "--config"])
            .arg(&path)
            .assert()
            .code(11)
            .stderr(predicate::str::contains("sample_rte"));
    }

    #[test]
    fn malformed_json_is_config_error() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.json");
        fs::write(&path, "{\"audio\": ").unwrap();
        tc_core(&temp)
            .args(["check", "--config"])
            .arg(&path)
            .assert()
            .code(11)
            .stderr(predicate::str::contains("not valid JSON"));
    }

    #[test]
    fn missing_file_is_io_error() {
        let temp = TempDir::new().unwrap();
        tc_core(&temp)
            .args(["check", "--config"])
            .arg(temp.path().join("nope.json"))
            .assert()
            .code(21)
            .stderr(predicate::str::contains("cannot read config file"));
    }

    #[test]
    fn malformed_set_is_args_error() {
        let temp = TempDir::new().unwrap();
        tc_core(&temp)
            .args(["check", "--set", "audio.sample_rate"])
            .assert()
            .code(10)
            .stderr(predicate::str::contains("expected key=value"));
    }

    #[test]
    fn unknown_schema_is_args_error() {
        let temp = TempDir::new().unwrap();
        tc_core(&temp)
            .args(["check", "--schema", "wavenet"])
            .assert()
            .code(10)
            .stderr(predicate::str::contains("unknown schema"));
    }
}

mod inspect {
    use super::*;

    #[test]
    fn defaults_print_plain_json() {
        let temp = TempDir::new().unwrap();
        let output = tc_core(&temp)
            .args(["defaults", "--schema", "gst"])
            .output()
            .unwrap();
        assert_eq!(output.status.code(), Some(0));
        let defaults = stdout_json(&output);
        assert_eq!(defaults["gst_num_heads"], 4);
        assert!(defaults["gst_style_input_wav"].is_null());
    }

    #[test]
    fn defaults_encode_infinite_max_seq_len() {
        let temp = TempDir::new().unwrap();
        let output = tc_core(&temp)
            .args(["defaults", "--schema", "tts"])
            .output()
            .unwrap();
        let defaults = stdout_json(&output);
        assert_eq!(defaults["max_seq_len"], "inf");
        assert_eq!(defaults["datasets"].as_array().map(Vec::len), Some(1));
    }

    #[test]
    fn describe_json_lists_fields() {
        let temp = TempDir::new().unwrap();
        let output = tc_core(&temp)
            .args(["describe", "-s", "gst", "-f", "json"])
            .output()
            .unwrap();
        assert_eq!(output.status.code(), Some(0));
        let description = stdout_json(&output);
        assert_eq!(description["name"], "GSTConfig");
        let heads = description["fields"]
            .as_array()
            .unwrap()
            .iter()
            .find(|f| f["name"] == "gst_num_heads")
            .cloned()
            .unwrap();
        assert_eq!(heads["min"], 2.0);
        assert_eq!(heads["max"], 10.0);
    }

    #[test]
    fn describe_human_shows_inheritance() {
        let temp = TempDir::new().unwrap();
        tc_core(&temp)
            .args(["describe", "--schema", "tacotron-gst"])
            .assert()
            .success()
            .stdout(predicate::str::starts_with(
                "# TacotronGSTConfig (extends BaseTTSConfig)",
            ));
    }

    #[test]
    fn schemas_lists_registry() {
        let temp = TempDir::new().unwrap();
        tc_core(&temp)
            .arg("schemas")
            .assert()
            .success()
            .stdout(predicate::str::contains("tacotron-gst"))
            .stdout(predicate::str::contains("audio"));
    }

    #[test]
    fn version_json() {
        let temp = TempDir::new().unwrap();
        let output = tc_core(&temp).args(["version", "-f", "json"]).output().unwrap();
        let info = stdout_json(&output);
        assert_eq!(info["tc_core_version"], env!("CARGO_PKG_VERSION"));
    }

    #[test]
    fn help_exits_zero() {
        let temp = TempDir::new().unwrap();
        tc_core(&temp)
            .arg("--help")
            .assert()
            .success()
            .stdout(predicate::str::contains("check"));
    }

    #[test]
    fn unknown_command_is_args_error() {
        let temp = TempDir::new().unwrap();
        tc_core(&temp)
            .arg("nonexistent-command")
            .assert()
            .code(10)
            .stderr(predicate::str::contains("error"));
    }
}
