//! End-to-end tests for the `lenia` binary.

use std::process::{Command, Output};

use lenia::schema::SimulationConfig;
use lenia::snapshot::WorldSnapshot;

fn lenia(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_lenia"))
        .args(args)
        .output()
        .expect("failed to launch lenia binary")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

#[test]
fn smoke_test_exits_cleanly() {
    let output = lenia(&["--smoke-test"]);
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    assert!(stdout(&output).contains("Smoke test passed (11 frames)"));
}

#[test]
fn example_config_parses_back() {
    let output = lenia(&["--example"]);
    assert!(output.status.success());

    let text = stdout(&output);
    let json = &text[text.find('{').expect("no JSON in --example output")..];
    let config = SimulationConfig::from_json(json).unwrap();
    assert_eq!(config.seed, Some(42));
    assert_eq!(config.grid_size, SimulationConfig::default().grid_size);
    config.validate().unwrap();
}

#[test]
fn run_writes_snapshot() {
    let dir = tempfile::tempdir().unwrap();
    let config_path = dir.path().join("config.json");
    let snapshot_path = dir.path().join("out").join("world.lnws");
    std::fs::write(
        &config_path,
        r#"{"grid_size": 24, "kernel_radius": 4, "kernel_shape": "ring", "seed": 3}"#,
    )
    .unwrap();

    let output = lenia(&[
        config_path.to_str().unwrap(),
        "5",
        "--output",
        snapshot_path.to_str().unwrap(),
    ]);
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let snapshot = WorldSnapshot::load(&snapshot_path).unwrap();
    assert_eq!(snapshot.grid_size, 24);
    assert_eq!(snapshot.step, 5);
    assert!(snapshot.world.iter().all(|v| (0.0..=1.0).contains(v)));
}

#[test]
fn missing_arguments_fail() {
    assert!(!lenia(&[]).status.success());
    assert!(!lenia(&["/nonexistent/lenia-config.json"]).status.success());
    assert!(!lenia(&["--smoke-test-typo"]).status.success());
}
