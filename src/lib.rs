//! HashSweep - Duplicate File Finder & Cleaner
//!
//! Finds files with identical content by bucketing them by size and
//! confirming same-size candidates with SHA-256, then leaves them alone,
//! keeps the newest copy of each, or asks group by group.
//!
//! The pipeline is split into phases that share one [`stats::RunStats`]:
//!
//! 1. [`duplicates::DuplicateFinder::walk`] buckets files by size
//! 2. [`duplicates::DuplicateFinder::detect`] hashes candidate buckets
//! 3. [`actions::ResolutionEngine::resolve`] applies the chosen policy
//! 4. [`output::Summary`] reports the result
//!
//! [`run_app`] drives the phases for the command-line binary.

pub mod actions;
pub mod cli;
pub mod config;
pub mod duplicates;
pub mod error;
pub mod logging;
pub mod output;
pub mod progress;
pub mod scanner;
pub mod signal;
pub mod stats;
pub mod ui;

use std::io::{self, BufReader, Write};
use std::path::PathBuf;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use anyhow::{Context, Result};
use yansi::Paint;

use crate::actions::{GroupDecider, KeepNewest, Policy, ResolutionEngine};
use crate::cli::{Cli, OutputFormat};
use crate::config::{Config, ScanConfig};
use crate::duplicates::{DuplicateFinder, DuplicateGroup, FinderConfig};
use crate::error::ExitCode;
use crate::output::{DetectionOverview, JsonOutput, Summary};
use crate::progress::Progress;
use crate::scanner::ScanMode;
use crate::stats::RunStats;
use crate::ui::{theme, ActionChoice, ConsolePrompter, ConsoleReporter, PromptError};

type Prompter = ConsolePrompter<Box<dyn Write>>;

/// Run the application for parsed command-line arguments.
///
/// Returns [`ExitCode::Success`] after a normal summary or when the user
/// quits at a prompt, and [`ExitCode::Interrupted`] when Ctrl+C cut the run
/// short (the summary is still printed).
///
/// # Errors
///
/// Fails on configuration errors and on failures writing the summary.
/// Per-file problems during scanning or deletion are logged, not returned.
pub fn run_app(cli: Cli) -> Result<ExitCode> {
    logging::init_logging(cli.verbose, cli.quiet);
    theme::init(cli.no_color);

    let mut config = Config::load(cli.config.as_deref())?;
    config.merge_cli(&cli);
    log::debug!("Effective configuration: {:?}", config);

    let handler = signal::install_handler().context("Failed to set up Ctrl+C handling")?;
    let shutdown = handler.get_flag();

    let json = config.output == OutputFormat::Json;
    let mut console = console_writer(json, cli.quiet);
    let mut prompter: Option<Prompter> = None;

    let roots = if cli.paths.is_empty() {
        vec![PathBuf::from(".")]
    } else {
        cli.paths.clone()
    };

    let mode = match config.scan_mode() {
        Some(mode) => mode,
        None => match prompter_for(&mut prompter, json, &shutdown).ask_scan_mode(&roots) {
            Ok(mode) => mode,
            Err(PromptError::Interrupted) => return Ok(ExitCode::Interrupted),
            Err(PromptError::Closed) => return Ok(ExitCode::Success),
            Err(e) => return Err(e).context("Failed to read scan mode"),
        },
    };
    writeln!(
        console,
        "\n  {} {}",
        "Selected scan mode:".paint(theme::DIM),
        mode.label().paint(theme::KEY)
    )?;

    let scan = ScanConfig::new(roots, mode.is_recursive(), config.min_size);
    let finder = DuplicateFinder::new(
        FinderConfig::from_scan(&scan)
            .with_shutdown_flag(Arc::clone(&shutdown))
            .with_progress_callback(Arc::new(Progress::new(cli.quiet || json))),
    );

    writeln!(console, "\n  {}", "Finding duplicates...".paint(theme::DIM))?;
    let (groups, mut stats) = finder.find_duplicates(&scan.roots);

    if handler.is_shutdown_requested() {
        return report(&config, mode, &stats, &groups, true);
    }

    let overview = DetectionOverview::from_groups(&groups);
    overview.render(&mut console)?;
    if overview.is_empty() {
        return report(&config, mode, &stats, &groups, false);
    }

    let policy = match config.policy() {
        Some(policy) => policy,
        None => match prompter_for(&mut prompter, json, &shutdown).ask_action() {
            Ok(ActionChoice::Run(policy)) => policy,
            Ok(ActionChoice::Quit) | Err(PromptError::Closed) => {
                writeln!(console, "\n  {}", "Exiting program...".paint(theme::DIM))?;
                return Ok(ExitCode::Success);
            }
            Err(PromptError::Interrupted) => {
                return report(&config, mode, &stats, &groups, true);
            }
            Err(e) => return Err(e).context("Failed to read action"),
        },
    };

    let announcement = match policy {
        Policy::Interactive => "Starting interactive mode...",
        Policy::Auto => "Keeping newest files, deleting older duplicates...",
        Policy::Skip => "Skipping file deletion...",
    };
    writeln!(console, "\n  {}", announcement.paint(theme::DIM))?;

    let reporter = ConsoleReporter::new(console);
    let engine = ResolutionEngine::new(policy)
        .with_callback(&reporter)
        .with_shutdown_flag(Arc::clone(&shutdown));

    let mut keep_newest = KeepNewest;
    let decider: &mut dyn GroupDecider = match policy {
        Policy::Interactive => prompter_for(&mut prompter, json, &shutdown),
        Policy::Auto | Policy::Skip => &mut keep_newest,
    };

    let resolution = engine.resolve(groups, decider, &mut stats);
    let interrupted = resolution.interrupted || handler.is_shutdown_requested();

    report(&config, mode, &stats, &resolution.remaining, interrupted)
}

/// Print the final summary and pick the exit code.
fn report(
    config: &Config,
    mode: ScanMode,
    stats: &RunStats,
    remaining: &[DuplicateGroup],
    interrupted: bool,
) -> Result<ExitCode> {
    let exit_code = if interrupted {
        ExitCode::Interrupted
    } else {
        ExitCode::Success
    };
    let summary = Summary::new(mode, stats, remaining.len()).with_interrupted(interrupted);

    let mut stdout = io::stdout().lock();
    match config.output {
        OutputFormat::Json => JsonOutput::new(&summary, remaining, exit_code)
            .write_to(&mut stdout, true)
            .context("Failed to write JSON summary")?,
        OutputFormat::Text => summary
            .render(&mut stdout)
            .context("Failed to write summary")?,
    }
    stdout.flush()?;

    Ok(exit_code)
}

/// Where progress messages go: stderr when stdout carries JSON.
fn console_writer(json: bool, quiet: bool) -> Box<dyn Write> {
    if quiet {
        Box::new(io::sink())
    } else if json {
        Box::new(io::stderr())
    } else {
        Box::new(io::stdout())
    }
}

/// Lazily create the stdin prompter; non-interactive runs never read stdin.
fn prompter_for<'p>(
    slot: &'p mut Option<Prompter>,
    json: bool,
    shutdown: &Arc<AtomicBool>,
) -> &'p mut Prompter {
    slot.get_or_insert_with(|| {
        let out: Box<dyn Write> = if json {
            Box::new(io::stderr())
        } else {
            Box::new(io::stdout())
        };
        ConsolePrompter::new(BufReader::new(io::stdin()), out)
            .with_shutdown_flag(Arc::clone(shutdown))
    })
}
