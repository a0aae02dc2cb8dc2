// Copyright 2025 the Schemcanvas Authors
// SPDX-License-Identifier: Apache-2.0

//! Schemcanvas: the headless core of an interactive schematic editor

pub mod config;
pub mod editing;
pub mod error;
pub mod geometry;
pub mod model;
pub mod replay;
pub mod settings;
pub mod tools;

use anyhow::{Context, Result};
use config::EditorConfig;
use replay::{Script, Snapshot};
use std::path::PathBuf;

const USAGE: &str = "Usage: schemcanvas [--config editor.toml] <script.json>";

/// Command-line arguments
#[derive(Debug, Clone, PartialEq, Eq)]
struct Args {
    config: Option<PathBuf>,
    script: PathBuf,
}

fn parse_args(args: impl IntoIterator<Item = String>) -> Result<Args> {
    let mut config = None;
    let mut script = None;
    let mut args = args.into_iter();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--config" | "-c" => {
                let path = args.next().context("--config needs a file argument")?;
                config = Some(PathBuf::from(path));
            }
            flag if flag.starts_with('-') => anyhow::bail!("unknown option {flag}\n{USAGE}"),
            _ if script.is_some() => anyhow::bail!("more than one script given\n{USAGE}"),
            _ => script = Some(PathBuf::from(&arg)),
        }
    }
    let script = script.with_context(|| format!("no script given\n{USAGE}"))?;
    Ok(Args { config, script })
}

/// Entry point for the schemcanvas binary: replay a script and print the
/// resulting diagram as JSON
pub fn run() -> Result<()> {
    // Initialize tracing subscriber (can be controlled via RUST_LOG env var)
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("schemcanvas=info".parse().context("bad log directive")?),
        )
        .init();

    let args = parse_args(std::env::args().skip(1))?;

    let config = match &args.config {
        Some(path) => EditorConfig::load(path)?,
        None => EditorConfig::default(),
    };
    let script = Script::load(&args.script)?;
    let mut session = config
        .build_session(script.element_rect())
        .context("Invalid configuration")?;

    tracing::info!("replaying {}", args.script.display());
    script.run(&mut session)?;

    println!("{}", Snapshot::capture(&session).to_json()?);
    Ok(())
}
