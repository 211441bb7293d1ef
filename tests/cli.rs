// CLI behavior guard rails for the plugin-descriptor binary.
mod support;

use anyhow::{Context, Result};
use plugin_descriptor::{Descriptor, ENV_SAVE_STYLE, decode_yaml_str};
use serde_json::Value;
use std::io::Write;
use std::process::{Command, Stdio};
use tempfile::TempDir;

use support::{FULL, MINIMAL, bin_path, check_command, run_command, write_fixture};

#[test]
fn check_prints_summary() -> Result<()> {
    let fixture = write_fixture(FULL)?;
    let output = run_command(check_command(fixture.path()))?;
    let summary: Value =
        serde_json::from_slice(&output.stdout).context("summary should be JSON")?;
    assert_eq!(summary["name"], "Greeter");
    assert_eq!(summary["full_name"], "Greeter v2.1.0");
    assert_eq!(summary["authors"], serde_json::json!(["A", "B", "C"]));
    assert_eq!(summary["has_commands"], true);
    assert_eq!(summary["permissions"], 2);
    Ok(())
}

#[test]
fn check_reports_first_invalid_field() -> Result<()> {
    let fixture = write_fixture("name: Foo\nmain: m\n")?;
    let output = check_command(fixture.path())
        .output()
        .context("failed to run check")?;
    assert!(!output.status.success());
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("version is not defined"),
        "stderr was: {stderr}"
    );
    Ok(())
}

#[test]
fn check_reads_stdin() -> Result<()> {
    let mut child = Command::new(bin_path())
        .arg("check")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .context("spawning check")?;
    child
        .stdin
        .take()
        .context("stdin piped")?
        .write_all(MINIMAL.as_bytes())?;
    let output = child.wait_with_output()?;
    assert!(output.status.success());
    let summary: Value = serde_json::from_slice(&output.stdout)?;
    assert_eq!(summary["main"], "com.example.Main");
    assert_eq!(summary["permissions"], 0);
    Ok(())
}

#[test]
fn normalize_uses_legacy_keys_by_default() -> Result<()> {
    let fixture = write_fixture(FULL)?;
    let mut cmd = Command::new(bin_path());
    cmd.arg("normalize")
        .arg("--file")
        .arg(fixture.path())
        .env_remove(ENV_SAVE_STYLE);
    let output = run_command(cmd)?;
    let text = String::from_utf8(output.stdout)?;
    let doc = decode_yaml_str(&text)?;
    let keys: Vec<_> = doc.keys().map(String::as_str).collect();
    assert_eq!(
        keys,
        [
            "name",
            "main",
            "version",
            "command",
            "website",
            "description",
            "authors"
        ]
    );
    Ok(())
}

#[test]
fn normalize_symmetric_from_env_round_trips() -> Result<()> {
    let fixture = write_fixture(FULL)?;
    let mut cmd = Command::new(bin_path());
    cmd.arg("normalize")
        .arg("--file")
        .arg(fixture.path())
        .env(ENV_SAVE_STYLE, "symmetric");
    let output = run_command(cmd)?;
    let reparsed = Descriptor::from_reader(output.stdout.as_slice())?;
    assert_eq!(reparsed, Descriptor::from_yaml_str(FULL)?);
    Ok(())
}

#[test]
fn normalize_writes_json_output_file() -> Result<()> {
    let fixture = write_fixture(FULL)?;
    let dir = TempDir::new()?;
    let dest = dir.path().join("plugin.json");
    let mut cmd = Command::new(bin_path());
    cmd.arg("normalize")
        .arg("--file")
        .arg(fixture.path())
        .arg("--format")
        .arg("json")
        .arg("--symmetric")
        .arg("--output")
        .arg(&dest);
    let output = run_command(cmd)?;
    assert!(output.stdout.is_empty());

    let text = std::fs::read_to_string(&dest)?;
    let value: Value = serde_json::from_str(&text)?;
    assert!(value.get("commands").is_some());
    assert!(value.get("permissions").is_some());
    assert_eq!(Descriptor::from_json_str(&text)?.name(), "Greeter");
    Ok(())
}
