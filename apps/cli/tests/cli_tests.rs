//! biomon-cli 端到端测试

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

fn cli(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("biomon-cli").unwrap();
    cmd.arg("--config").arg(dir.path().join("config.toml"));
    cmd
}

#[test]
fn test_decode_prints_dashboard() {
    let dir = TempDir::new().unwrap();
    cli(&dir)
        .args(["decode", "D;27.5;1;0;1;0;CICLO_AERACAO;T", "--elapsed", "12"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "[t=12s] 27.5 °C | Agitador: LIGADO | Aeração: DESLIGADO | Bomba 1: LIGADO | Bomba 2: DESLIGADO | CICLO_AERACAO",
        ));
}

#[test]
fn test_decode_json() {
    let dir = TempDir::new().unwrap();
    let output = cli(&dir)
        .args(["decode", "D;30;0;0;0;1;CICLO_REPOUSO;T", "--json", "--elapsed", "5"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["temperature_celsius"], 30.0);
    assert_eq!(value["elapsed_seconds"], 5);
    assert_eq!(value["cycle_label"], "CICLO_REPOUSO");
}

#[test]
fn test_decode_rejects_bad_packets() {
    let dir = TempDir::new().unwrap();
    cli(&dir)
        .args(["decode", "X;27.5;1;0;1;0;CICLO;T"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Framing mismatch"));

    cli(&dir)
        .args(["decode", "D;27.5;1;0;1;CICLO;T"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Field count mismatch"));

    cli(&dir)
        .args(["decode", "D;abc;1;0;1;0;CICLO;T"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid temperature"));
}

#[test]
fn test_monitor_file_input_with_recording() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("packets.txt");
    let record = dir.path().join("session.bin");
    let csv = dir.path().join("series.csv");
    fs::write(
        &input,
        "D;27.5;1;0;1;0;A;T\r\nGARBAGE\nD;28.0;0;1;0;1;B;T\nD;xx;0;0;0;0;C;T\n",
    )
    .unwrap();

    cli(&dir)
        .arg("monitor")
        .arg("--input")
        .arg(&input)
        .arg("--record")
        .arg(&record)
        .arg("--csv")
        .arg(&csv)
        .assert()
        .success()
        .stdout(predicate::str::contains("27.5 °C | Agitador: LIGADO"))
        .stdout(predicate::str::contains("28.0 °C | Agitador: DESLIGADO"))
        .stdout(predicate::str::contains("GARBAGE").not())
        .stderr(predicate::str::contains("帧格式 1"))
        .stderr(predicate::str::contains("转换失败 1"));

    let csv = fs::read_to_string(&csv).unwrap();
    assert!(csv.starts_with("elapsed_s,temperature_c\n"));
    assert_eq!(csv.lines().count(), 3);

    let recording = biomon_tools::PacketRecording::load(&record).unwrap();
    assert_eq!(recording.packet_count(), 4);
    assert_eq!(recording.packets[1].raw, "GARBAGE");
}

#[test]
fn test_replay_recording() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("replay.bin");

    let mut recording = biomon_tools::PacketRecording::new(biomon_tools::RecordingMetadata {
        source: "test".to_string(),
        ..Default::default()
    });
    recording.add_packet(std::time::Duration::from_millis(0), "D;25.0;1;1;1;1;X;T");
    recording.add_packet(std::time::Duration::from_millis(100), "D;26.0;0;0;0;0;Y;T");
    recording.save(&path).unwrap();

    cli(&dir)
        .arg("replay")
        .arg("--input")
        .arg(&path)
        .args(["--speed", "100"])
        .assert()
        .success()
        .stdout(predicate::str::contains("25.0 °C | Agitador: LIGADO"))
        .stdout(predicate::str::contains("26.0 °C | Agitador: DESLIGADO | Aeração: DESLIGADO"));
}

#[test]
fn test_replay_rejects_bad_speed() {
    let dir = TempDir::new().unwrap();
    cli(&dir)
        .args(["replay", "--input", "missing.bin", "--speed", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("速度倍数"));
}

#[test]
fn test_replay_tiny_speed_fails_cleanly() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("slow.bin");

    let mut recording = biomon_tools::PacketRecording::new(biomon_tools::RecordingMetadata::default());
    recording.add_packet(std::time::Duration::from_millis(0), "D;25.0;1;1;1;1;X;T");
    recording.add_packet(std::time::Duration::from_millis(1000), "D;26.0;0;0;0;0;Y;T");
    recording.save(&path).unwrap();

    cli(&dir)
        .arg("replay")
        .arg("--input")
        .arg(&path)
        .args(["--speed", "1e-300"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("超出可表示的时长"))
        .stderr(predicate::str::contains("panicked").not());
}

#[test]
fn test_simulate_output_decodes() {
    let dir = TempDir::new().unwrap();
    let output = cli(&dir)
        .args(["simulate", "--count", "25", "--seed", "42"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines.len(), 25);
    for line in lines {
        assert!(biomon_protocol::decode(line, 0).is_some(), "{line}");
    }
}

#[test]
fn test_simulate_is_reproducible_with_seed() {
    let dir = TempDir::new().unwrap();
    let run = || {
        cli(&dir)
            .args(["simulate", "--count", "10", "--seed", "9", "--noise", "0.5"])
            .output()
            .unwrap()
            .stdout
    };
    assert_eq!(run(), run());
}

#[test]
fn test_config_set_get_check() {
    let dir = TempDir::new().unwrap();

    cli(&dir)
        .args(["config", "set", "display.series_capacity", "300"])
        .assert()
        .success();

    cli(&dir)
        .args(["config", "get", "display.series_capacity"])
        .assert()
        .success()
        .stdout("300\n");

    cli(&dir)
        .args(["config", "set", "display.nope", "1"])
        .assert()
        .failure();

    cli(&dir)
        .args(["config", "check"])
        .assert()
        .success()
        .stdout(predicate::str::contains("配置有效"));
}
