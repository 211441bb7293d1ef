#![allow(dead_code)]

use anyhow::{Context, Result, bail};
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::NamedTempFile;

pub const MINIMAL: &str = "\
name: Foo
version: '1.0'
main: com.example.Main
";

pub const FULL: &str = "\
name: Greeter
version: 2.1.0
main: com.example.greeter.Greeter
description: Says hello
website: https://example.com/greeter
author: A
authors: [B, C]
commands:
  greet:
    description: Greets a player
    usage: /greet <player>
    aliases: [hi, hello]
permissions:
  greeter.greet:
    description: Allows greeting
    default: true
  greeter.admin:
    default: op
    children:
      greeter.greet: true
";

pub fn bin_path() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_plugin-descriptor"))
}

pub fn write_fixture(contents: &str) -> Result<NamedTempFile> {
    let file = NamedTempFile::new().context("allocating fixture file")?;
    std::fs::write(file.path(), contents)
        .with_context(|| format!("writing fixture {}", file.path().display()))?;
    Ok(file)
}

pub fn run_command(mut cmd: Command) -> Result<Output> {
    let output = cmd
        .output()
        .with_context(|| format!("failed to spawn {:?}", cmd.get_program()))?;
    if !output.status.success() {
        bail!(
            "command {:?} failed with {:?}\nstdout:\n{}\nstderr:\n{}",
            cmd.get_program(),
            output.status.code(),
            String::from_utf8_lossy(&output.stdout),
            String::from_utf8_lossy(&output.stderr)
        );
    }
    Ok(output)
}

pub fn check_command(file: &Path) -> Command {
    let mut cmd = Command::new(bin_path());
    cmd.arg("check").arg("--file").arg(file);
    cmd
}
