//! Check or normalize a component descriptor.
//!
//! Usage:
//!   plugin-descriptor check --file plugin.yml
//!   plugin-descriptor check < plugin.yml
//!   plugin-descriptor normalize --format json --file plugin.yml
//!   plugin-descriptor normalize --symmetric --file plugin.yml --output plugin.yml

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use plugin_descriptor::{Descriptor, SaveOptions, SaveStyle};
use serde::Serialize;
use std::fs::File;
use std::io::{Read, stdin, stdout};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "plugin-descriptor")]
#[command(about = "Validate and re-emit plugin.yml component descriptors")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Validate a descriptor and print a one-line JSON summary.
    Check {
        /// Optional input file; reads stdin when omitted.
        #[arg(long)]
        file: Option<PathBuf>,
    },
    /// Validate a descriptor and write it back out in canonical key order.
    Normalize {
        /// Optional input file; reads stdin when omitted.
        #[arg(long)]
        file: Option<PathBuf>,
        #[arg(long, value_enum, default_value_t = Format::Yaml)]
        format: Format,
        /// Write `commands` and `permissions` so the output parses back unchanged.
        #[arg(long)]
        symmetric: bool,
        /// Destination file; stdout when omitted.
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Format {
    Yaml,
    Json,
}

#[derive(Serialize)]
struct Summary<'a> {
    name: &'a str,
    version: &'a str,
    main: &'a str,
    full_name: String,
    authors: &'a [String],
    has_commands: bool,
    permissions: usize,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    if let Err(err) = run() {
        eprintln!("{err:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Command::Check { file } => {
            let descriptor = load(file.as_deref())?;
            let summary = Summary {
                name: descriptor.name(),
                version: descriptor.version(),
                main: descriptor.main(),
                full_name: descriptor.full_name(),
                authors: descriptor.authors(),
                has_commands: descriptor.commands().is_some(),
                permissions: descriptor.permissions().map_or(0, |set| set.len()),
            };
            println!("{}", serde_json::to_string(&summary)?);
        }
        Command::Normalize {
            file,
            format,
            symmetric,
            output,
        } => {
            let descriptor = load(file.as_deref())?;
            let options = if symmetric {
                SaveOptions {
                    style: SaveStyle::Symmetric,
                }
            } else {
                SaveOptions::from_env()
            };
            write_descriptor(&descriptor, format, &options, output.as_deref())?;
        }
    }
    Ok(())
}

fn load(file: Option<&Path>) -> Result<Descriptor> {
    let mut buf = String::new();
    let origin = match file {
        Some(path) => {
            File::open(path)
                .with_context(|| format!("opening descriptor {}", path.display()))?
                .read_to_string(&mut buf)
                .with_context(|| format!("reading descriptor {}", path.display()))?;
            path.display().to_string()
        }
        None => {
            stdin()
                .read_to_string(&mut buf)
                .context("reading stdin for descriptor")?;
            "<stdin>".to_string()
        }
    };
    Descriptor::from_yaml_str(&buf).with_context(|| format!("invalid descriptor {origin}"))
}

fn write_descriptor(
    descriptor: &Descriptor,
    format: Format,
    options: &SaveOptions,
    output: Option<&Path>,
) -> Result<()> {
    match (output, format) {
        (Some(path), Format::Yaml) => descriptor
            .save_to_path(path, options)
            .with_context(|| format!("writing {}", path.display()))?,
        (Some(path), Format::Json) => descriptor
            .save_json_to_path(path, options)
            .with_context(|| format!("writing {}", path.display()))?,
        (None, Format::Yaml) => descriptor
            .save_with(stdout().lock(), options)
            .context("writing descriptor to stdout")?,
        (None, Format::Json) => descriptor
            .save_json(stdout().lock(), options)
            .context("writing descriptor to stdout")?,
    }
    Ok(())
}
