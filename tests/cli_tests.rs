//! CLI integration tests

use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::json;

fn audio_capture_bin(config_home: &Path) -> Command {
    let mut cmd = Command::cargo_bin("audio-capture").expect("binary exists");
    // Keep the user's real config out of the tests
    cmd.env("XDG_CONFIG_HOME", config_home).env_remove("RUST_LOG");
    cmd
}

/// One command per line: init, start, `frames` stereo frames of 128 samples, finish
fn write_session(path: &Path, frames: usize) {
    let mut lines = vec![
        json!({
            "command": "init",
            "config": {"sampleRate": 44100, "numChannels": 2},
            "options": {}
        }),
        json!({"command": "start", "bufferSize": 128}),
    ];
    for i in 0..frames {
        let level = i as f32 / 10.0;
        lines.push(json!({
            "command": "record",
            "buffer": [vec![level; 128], vec![-level; 128]]
        }));
    }
    lines.push(json!({"command": "finish"}));

    let body: Vec<String> = lines.iter().map(|l| l.to_string()).collect();
    std::fs::write(path, body.join("\n")).unwrap();
}

#[test]
fn help_output() {
    let dir = tempfile::tempdir().unwrap();
    audio_capture_bin(dir.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--time-limit"))
        .stdout(predicate::str::contains("--encoding"))
        .stdout(predicate::str::contains("--channels"))
        .stdout(predicate::str::contains("replay"))
        .stdout(predicate::str::contains("config"));
}

#[test]
fn version_output() {
    let dir = tempfile::tempdir().unwrap();
    audio_capture_bin(dir.path())
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("audio-capture"))
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn config_help() {
    let dir = tempfile::tempdir().unwrap();
    audio_capture_bin(dir.path())
        .args(["config", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("init"))
        .stdout(predicate::str::contains("list"))
        .stdout(predicate::str::contains("path"));
}

#[test]
#[cfg(target_os = "linux")]
fn config_path_follows_xdg() {
    let dir = tempfile::tempdir().unwrap();
    audio_capture_bin(dir.path())
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("audio-capture"))
        .stdout(predicate::str::contains("config.toml"));
}

#[test]
#[cfg(target_os = "linux")]
fn config_init_set_get() {
    let dir = tempfile::tempdir().unwrap();
    audio_capture_bin(dir.path())
        .args(["config", "init"])
        .assert()
        .success();
    assert!(dir.path().join("audio-capture").join("config.toml").exists());

    audio_capture_bin(dir.path())
        .args(["config", "init"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));

    audio_capture_bin(dir.path())
        .args(["config", "set", "encoding", "flac"])
        .assert()
        .success();

    audio_capture_bin(dir.path())
        .args(["config", "get", "encoding"])
        .assert()
        .success()
        .stdout(predicate::str::contains("flac"));

    audio_capture_bin(dir.path())
        .args(["config", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("time_limit"))
        .stdout(predicate::str::contains("20m"));
}

#[test]
fn config_set_rejects_bad_values() {
    let dir = tempfile::tempdir().unwrap();
    audio_capture_bin(dir.path())
        .args(["config", "set", "encoding", "mp3"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Unknown encoding"));

    audio_capture_bin(dir.path())
        .args(["config", "set", "api_key", "x"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Unknown key"));
}

#[test]
fn invalid_time_limit_is_usage_error() {
    let dir = tempfile::tempdir().unwrap();
    audio_capture_bin(dir.path())
        .args(["--time-limit", "soon"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Invalid time limit"));
}

#[test]
#[cfg(target_os = "linux")]
fn invalid_time_limit_in_config_file_is_usage_error() {
    let dir = tempfile::tempdir().unwrap();
    let app_dir = dir.path().join("audio-capture");
    std::fs::create_dir_all(&app_dir).unwrap();
    std::fs::write(app_dir.join("config.toml"), "time_limit = \"abc\"\n").unwrap();

    audio_capture_bin(dir.path())
        .arg("record")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("time_limit"));
}

#[test]
fn invalid_encoding_is_usage_error() {
    let dir = tempfile::tempdir().unwrap();
    audio_capture_bin(dir.path())
        .args(["--encoding", "mp3"])
        .assert()
        .code(2);
}

#[test]
fn replay_writes_wav() {
    let dir = tempfile::tempdir().unwrap();
    let commands = dir.path().join("session.jsonl");
    let output = dir.path().join("take.wav");
    write_session(&commands, 3);

    audio_capture_bin(dir.path())
        .arg("replay")
        .arg(&commands)
        .arg("--output")
        .arg(&output)
        .assert()
        .success()
        .stdout(predicate::str::contains(r#"{"command":"loaded"}"#))
        .stdout(predicate::str::contains(r#""command":"complete""#))
        .stdout(predicate::str::contains(r#""type":"audio/wav""#));

    let bytes = std::fs::read(&output).unwrap();
    assert_eq!(bytes.len(), 1580);

    let reader = hound::WavReader::open(&output).unwrap();
    let spec = reader.spec();
    assert_eq!(spec.channels, 2);
    assert_eq!(spec.sample_rate, 44100);
    assert_eq!(spec.bits_per_sample, 16);
    assert_eq!(reader.len(), 768);
}

#[test]
fn replay_skips_unknown_commands() {
    let dir = tempfile::tempdir().unwrap();
    let commands = dir.path().join("session.jsonl");
    write_session(&commands, 1);
    let mut body = std::fs::read_to_string(&commands).unwrap();
    body.insert_str(0, "{\"command\":\"exportMP3\"}\nnot json\n");
    std::fs::write(&commands, body).unwrap();

    audio_capture_bin(dir.path())
        .arg("replay")
        .arg(&commands)
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""command":"complete""#))
        .stderr(predicate::str::contains("Skipped 2"));
}

#[test]
fn replay_flac_without_audio_fails() {
    let dir = tempfile::tempdir().unwrap();
    let commands = dir.path().join("session.jsonl");
    write_session(&commands, 0);

    audio_capture_bin(dir.path())
        .args(["--encoding", "flac", "replay"])
        .arg(&commands)
        .assert()
        .code(1)
        .stdout(predicate::str::contains(r#""command":"failed""#));
}

#[test]
fn replay_missing_file_fails() {
    let dir = tempfile::tempdir().unwrap();
    audio_capture_bin(dir.path())
        .args(["replay", "does-not-exist.jsonl"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Failed to open"));
}
