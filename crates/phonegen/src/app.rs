//! Application entry point and dispatch.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use chrono::Local;
use tracing::{debug, warn};

use phonegen_cli::output::format_number;
use phonegen_cli::presenter::CLIResultPresenter;
use phonegen_cli::progress_bar::CLIProgressReporter;
use phonegen_cli::ui;
use phonegen_core::constants::exit_codes;
use phonegen_core::generator::BatchGenerator;
use phonegen_core::prefix::PrefixSelector;
use phonegen_core::progress::CancellationToken;
use phonegen_orchestration::interfaces::{
    ProgressReporter, ResultPresenter, RunOutcome, RunSummary, SessionEvent,
};
use phonegen_orchestration::session::{GenerationSession, SessionConfig};
use phonegen_store::{default_filename, ResultStore};

use crate::config::AppConfig;
use crate::version::full_version;

/// How often the event loop wakes to check for Ctrl+C.
const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Run the application and return the process exit code.
pub fn run(config: &AppConfig) -> Result<i32> {
    debug!(version = %full_version(), "Starting");

    // Handle shell completion
    if let Some(shell) = config.completion {
        let mut cmd = <AppConfig as clap::CommandFactory>::command();
        phonegen_cli::completion::generate_completion(&mut cmd, shell, &mut std::io::stdout());
        return Ok(exit_codes::SUCCESS);
    }

    let selector = PrefixSelector::standard();
    if config.list_groups {
        ui::print_groups(&selector);
        return Ok(exit_codes::SUCCESS);
    }

    let presenter = CLIResultPresenter::new(config.verbose, config.quiet);
    let mut store = ResultStore::new();

    let code = if let Some(path) = &config.load {
        run_load(config, path, &mut store, &presenter)?
    } else {
        run_generation(config, selector, &mut store, &presenter)?
    };

    write_outputs(config, &store)?;
    Ok(code)
}

fn run_load(
    config: &AppConfig,
    path: &Path,
    store: &mut ResultStore,
    presenter: &CLIResultPresenter,
) -> Result<i32> {
    let count = store
        .load(path)
        .with_context(|| format!("cannot load {}", path.display()))?;

    presenter.present_numbers(store.numbers(), config.display_limit);
    if !config.quiet {
        println!();
        ui::print_success(&format!(
            "Loaded {} numbers from {}",
            format_number(count as u64),
            path.display()
        ));
        println!("  Operators: {}", store.operator());
        println!("  Generated: {}", store.generation_time());
    }
    Ok(exit_codes::SUCCESS)
}

fn run_generation(
    config: &AppConfig,
    selector: PrefixSelector,
    store: &mut ResultStore,
    presenter: &CLIResultPresenter,
) -> Result<i32> {
    config.check_count()?;
    let session_config = SessionConfig {
        cancel_timeout: config.cancel_timeout_duration()?,
    };
    let request = config.request();
    let label = selector.label(&request.groups);

    let mut session = GenerationSession::new(
        Arc::new(BatchGenerator::new(config.generation_options())),
        selector,
        session_config,
    );

    // Set up Ctrl+C handler
    let interrupt = CancellationToken::new();
    ctrlc_handler(interrupt.clone());

    let started = Instant::now();
    session.start(&request)?;

    let reporter = CLIProgressReporter::new(request.target, config.quiet);
    let outcome = drive(&mut session, &interrupt, &reporter)?;
    reporter.complete();

    let summary = RunSummary::from_outcome(&outcome, request.target, started.elapsed(), &label);
    let code = match outcome {
        RunOutcome::Failed(err) => return Err(err).context("generation failed"),
        RunOutcome::Completed(result) => {
            store.replace_from_result(result, label, Local::now());
            exit_codes::SUCCESS
        }
        RunOutcome::Cancelled(result) => {
            store.replace_from_result(result, label, Local::now());
            exit_codes::ERROR_CANCELED
        }
    };

    presenter.present_numbers(store.numbers(), config.display_limit);
    presenter.present_summary(&summary);
    Ok(code)
}

/// Pump session events into the reporter until the run ends or is interrupted.
fn drive(
    session: &mut GenerationSession,
    interrupt: &CancellationToken,
    reporter: &dyn ProgressReporter,
) -> Result<RunOutcome> {
    loop {
        if interrupt.is_cancelled() {
            reporter.complete();
            return session
                .cancel()?
                .context("interrupted with no generation in progress");
        }
        match session.next_event_timeout(POLL_INTERVAL) {
            Some(SessionEvent::Progress { progress, .. }) => reporter.report(&progress),
            Some(SessionEvent::Finished { outcome, .. }) => return Ok(outcome),
            None if !session.is_running() => {
                anyhow::bail!("generation ended without reporting an outcome")
            }
            None => {}
        }
    }
}

fn write_outputs(config: &AppConfig, store: &ResultStore) -> Result<()> {
    if let Some(path) = &config.save {
        let path = output_path(path.as_ref(), "json");
        store
            .save(&path)
            .with_context(|| format!("cannot save {}", path.display()))?;
        if !config.quiet {
            ui::print_success(&format!("Saved to {}", path.display()));
        }
    }
    if let Some(path) = &config.export {
        let path = output_path(path.as_ref(), "txt");
        store
            .export(&path)
            .with_context(|| format!("cannot export {}", path.display()))?;
        if !config.quiet {
            ui::print_success(&format!("Exported to {}", path.display()));
        }
    }
    Ok(())
}

fn output_path(explicit: Option<&PathBuf>, extension: &str) -> PathBuf {
    explicit
        .cloned()
        .unwrap_or_else(|| PathBuf::from(default_filename(Local::now(), extension)))
}

fn ctrlc_handler(cancel: CancellationToken) {
    if let Err(e) = ctrlc::set_handler(move || cancel.cancel()) {
        warn!(error = %e, "Cannot install Ctrl+C handler; interrupts will not cancel cleanly");
    }
}
