//! CLI result presenter.

use std::io::{self, Write};

use phonegen_core::number::PhoneNumber;
use phonegen_orchestration::interfaces::{ResultPresenter, RunStatus, RunSummary};

use crate::output::{format_duration, format_number, write_number_list, write_plain_list};
use crate::ui;

/// CLI result presenter.
pub struct CLIResultPresenter {
    verbose: bool,
    quiet: bool,
}

impl CLIResultPresenter {
    #[must_use]
    pub fn new(verbose: bool, quiet: bool) -> Self {
        Self { verbose, quiet }
    }

    /// Summary lines, without styling.
    #[must_use]
    pub fn summary_lines(&self, summary: &RunSummary) -> Vec<String> {
        let mut lines = vec![
            format!(
                "Generated: {} / {}",
                format_number(summary.generated as u64),
                format_number(summary.target as u64)
            ),
            format!("Operators: {}", summary.operators),
            format!("Duration: {}", format_duration(summary.duration)),
        ];
        if self.verbose {
            lines.push(format!("Attempts: {}", format_number(summary.attempts)));
        }
        if summary.budget_exhausted {
            lines.push(format!(
                "Only {} unique numbers produced before the attempt limit was reached",
                format_number(summary.generated as u64)
            ));
        }
        lines
    }
}

impl ResultPresenter for CLIResultPresenter {
    fn present_numbers(&self, numbers: &[PhoneNumber], limit: usize) {
        let stdout = io::stdout();
        let mut out = stdout.lock();
        let written = if self.quiet {
            write_plain_list(&mut out, numbers, limit)
        } else {
            write_number_list(&mut out, numbers, limit)
        };
        // A closed pipe (e.g. `| head`) is not worth reporting.
        let _ = written.and_then(|()| out.flush());
    }

    fn present_summary(&self, summary: &RunSummary) {
        if self.quiet {
            return;
        }

        println!();
        match summary.status {
            RunStatus::Completed if summary.budget_exhausted => {
                ui::print_warning("Generation incomplete");
            }
            RunStatus::Completed => ui::print_success("Generation complete"),
            RunStatus::Cancelled => ui::print_warning("Generation cancelled; partial result kept"),
            RunStatus::Failed => {
                let reason = summary.error.as_deref().unwrap_or("unknown error");
                ui::print_error(&format!("Generation failed: {reason}"));
                return;
            }
        }
        for line in self.summary_lines(summary) {
            println!("  {line}");
        }
    }

    fn present_error(&self, error: &str) {
        ui::print_error(error);
    }
}
