// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use playground_runner::annotation::AnnotationSession;
use playground_runner::bundle::SourceBundle;
use playground_runner::config::{load_and_validate_config, Config, RuntimeBuilder};
use playground_runner::engine::PipelineEvent;
use playground_runner::expectation::{check_expectation, expectation_path, ExpectationOutcome};
use playground_runner::observability::init_tracing;
use playground_runner::playground::RunCallbacks;
use playground_runner::records::LogRecord;
use playground_runner::workspace::copy_template_file;

/// Template file copied into a bundle by `copy-manifest`
const PACKAGE_MANIFEST_FILE: &str = "Package.swift";

/// Build and run Swift playgrounds, printing their per-line results
#[derive(Parser, Debug)]
#[command(name = "playground")]
#[command(about = "Build and run Swift playgrounds from the command line")]
struct Cli {
    /// YAML configuration file (built-in defaults when omitted)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log pipeline activity to stderr
    #[arg(long, short = 'v', global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compile and run a playground
    Run { file: PathBuf },
    /// Print the package description of a playground
    Manifest { file: PathBuf },
    /// Run playgrounds and compare their records with the stored expectations
    Test {
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
    /// Run playgrounds and rewrite their expectation files
    Overwrite {
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
    /// Copy the template package manifest into a playground bundle
    CopyManifest { file: PathBuf },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(if cli.verbose { "debug" } else { "warn" });

    if let Err(e) = dispatch(cli).await {
        eprintln!("❌ {:#}", e);
        std::process::exit(1);
    }
}

async fn dispatch(cli: Cli) -> Result<()> {
    let config = match &cli.config {
        Some(path) => load_and_validate_config(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => Config::default(),
    };
    let cancel = cancel_on_ctrl_c();

    match cli.command {
        Command::Run { file } => run(&config, &file, &cancel).await,
        Command::Manifest { file } => manifest(&config, &file, &cancel).await,
        Command::Test { files } => test(&config, &files, false, &cancel).await,
        Command::Overwrite { files } => test(&config, &files, true, &cancel).await,
        Command::CopyManifest { file } => copy_manifest(&config, &file),
    }
}

fn cancel_on_ctrl_c() -> CancellationToken {
    let cancel = CancellationToken::new();
    let trigger = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            trigger.cancel();
        }
    });
    cancel
}

fn write_stdout(bytes: &[u8]) {
    let mut out = io::stdout().lock();
    let _ = out.write_all(bytes);
    let _ = out.flush();
}

fn write_stderr(bytes: &[u8]) {
    let _ = io::stderr().write_all(bytes);
}

async fn run(config: &Config, file: &Path, cancel: &CancellationToken) -> Result<()> {
    println!("Building playground {}", file.display());
    let playground = RuntimeBuilder::from_config(config, file);
    let session = Mutex::new(AnnotationSession::new(config.annotations.clone()));

    let callbacks = RunCallbacks::new(|record: LogRecord| {
        if let Ok(json) = serde_json::to_string(&record) {
            println!("{}", json);
        }
        if let Ok(mut session) = session.lock() {
            session.push(record);
        }
    })
    .on_stdout(write_stdout)
    .on_stderr(write_stderr);

    let summary = playground
        .run(callbacks, cancel)
        .await
        .context("playground failed to execute")?;

    let session = session
        .into_inner()
        .map_err(|_| anyhow::anyhow!("annotation session poisoned"))?;
    println!();
    for (index, text) in session.annotations() {
        println!("{:>4}: {}", index + 1, text);
    }
    println!(
        "✅ Playground executed successfully ({} records, {} dropped)",
        summary.records, summary.dropped
    );
    Ok(())
}

async fn manifest(config: &Config, file: &Path, cancel: &CancellationToken) -> Result<()> {
    let playground = RuntimeBuilder::from_config(config, file);
    let (tx, mut rx) = mpsc::unbounded_channel();

    let result = playground.manifest(&tx, cancel).await;
    drop(tx);
    while let Some(event) = rx.recv().await {
        if let PipelineEvent::Stderr(bytes) = event {
            write_stderr(&bytes);
        }
    }

    let manifest = result.context("could not read the package description")?;
    println!("Manifest for playground {}", file.display());
    println!("{}", serde_json::to_string_pretty(&manifest)?);
    Ok(())
}

async fn test(
    config: &Config,
    files: &[PathBuf],
    overwrite: bool,
    cancel: &CancellationToken,
) -> Result<()> {
    println!("Found {} playground files.", files.len());
    let mut failures = 0usize;

    for file in files {
        let playground = RuntimeBuilder::from_config(config, file);
        let records = Mutex::new(Vec::new());
        let callbacks = RunCallbacks::new(|record| {
            if let Ok(mut records) = records.lock() {
                records.push(record);
            }
        })
        .on_stdout(write_stdout)
        .on_stderr(write_stderr);

        if let Err(e) = playground.run(callbacks, cancel).await {
            eprintln!("❌ {}: failed to run: {}", file.display(), e);
            failures += 1;
            continue;
        }

        let records = records
            .into_inner()
            .map_err(|_| anyhow::anyhow!("record buffer poisoned"))?;
        let path = expectation_path(file);
        match check_expectation(&records, &path, overwrite)? {
            ExpectationOutcome::Matched => println!("✅ {}", file.display()),
            ExpectationOutcome::Written if overwrite => {
                println!("📝 {}: expectation written", file.display())
            }
            ExpectationOutcome::Written => {
                println!("⚠️  {}: expectation not found, written", file.display())
            }
            ExpectationOutcome::Mismatch { expected, actual } => {
                failures += 1;
                eprintln!(
                    "❌ {}: output did not match expectation ({} expected records, {} actual)",
                    file.display(),
                    expected.len(),
                    actual.len()
                );
            }
        }
    }

    println!("\nFinished");
    if failures > 0 {
        bail!("{} of {} playgrounds failed", failures, files.len());
    }
    if !overwrite {
        println!("All playgrounds tested with no unexpected results.");
    }
    Ok(())
}

fn copy_manifest(config: &Config, file: &Path) -> Result<()> {
    let bundle = SourceBundle::from_entry(file);
    let target = copy_template_file(&config.template, bundle.root(), PACKAGE_MANIFEST_FILE)
        .context("copying the package manifest")?;
    println!("Copied {}", target.display());
    Ok(())
}
