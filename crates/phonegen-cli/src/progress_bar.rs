//! Terminal progress bar.

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};

use phonegen_core::progress::GenerationProgress;
use phonegen_orchestration::interfaces::ProgressReporter;

use crate::output::format_number;

const TEMPLATE: &str = "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}";

/// Progress reporter backed by an `indicatif` bar on stderr.
pub struct CLIProgressReporter {
    bar: ProgressBar,
}

impl CLIProgressReporter {
    /// Bar for a run of `target` numbers; drawn nowhere when `hidden`.
    #[must_use]
    pub fn new(target: usize, hidden: bool) -> Self {
        let bar = ProgressBar::with_draw_target(
            Some(target as u64),
            if hidden {
                ProgressDrawTarget::hidden()
            } else {
                ProgressDrawTarget::stderr()
            },
        );
        let style = ProgressStyle::with_template(TEMPLATE)
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=>-");
        bar.set_style(style);
        Self { bar }
    }

    /// Current bar position.
    #[must_use]
    pub fn position(&self) -> u64 {
        self.bar.position()
    }
}

impl ProgressReporter for CLIProgressReporter {
    fn report(&self, update: &GenerationProgress) {
        self.bar.set_length(update.target as u64);
        self.bar.set_position(update.generated as u64);
        self.bar
            .set_message(format!("{} attempts", format_number(update.attempts)));
    }

    fn complete(&self) {
        self.bar.finish_and_clear();
    }
}
