//! Application configuration from CLI flags and environment.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use tracing::warn;

use phonegen_core::constants::{
    DEFAULT_BATCH_SIZE, LARGE_REQUEST_THRESHOLD, MAX_UNCONFIRMED_REQUEST,
};
use phonegen_core::options::GenerationOptions;
use phonegen_core::request::GenerationRequest;

use crate::errors::AppError;

/// phonegen: bulk generator of unique, plan-valid mobile phone numbers.
#[derive(Parser, Debug)]
#[command(name = "phonegen", version, about)]
#[allow(clippy::struct_excessive_bools)]
pub struct AppConfig {
    /// How many unique numbers to generate.
    #[arg(short = 'n', long, default_value = "10", env = "PHONEGEN_COUNT")]
    pub count: usize,

    /// Carrier group to draw prefixes from (repeatable). None means all prefixes.
    #[arg(short = 'g', long = "group", value_name = "GROUP")]
    pub groups: Vec<String>,

    /// Print the carrier group table and exit.
    #[arg(long)]
    pub list_groups: bool,

    /// Seed for reproducible output.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Candidates drawn per batch.
    #[arg(long, default_value_t = DEFAULT_BATCH_SIZE)]
    pub batch_size: usize,

    /// Save the result as a JSON record (timestamped name if PATH is omitted).
    #[arg(long, value_name = "PATH", num_args = 0..=1)]
    pub save: Option<Option<PathBuf>>,

    /// Export the result as plain text (timestamped name if PATH is omitted).
    #[arg(long, value_name = "PATH", num_args = 0..=1)]
    pub export: Option<Option<PathBuf>>,

    /// Load a saved record instead of generating.
    #[arg(long, value_name = "PATH", conflicts_with_all = ["groups", "seed"])]
    pub load: Option<PathBuf>,

    /// Maximum numbers printed to stdout.
    #[arg(long, default_value = "1000")]
    pub display_limit: usize,

    /// Allow counts above one million.
    #[arg(long)]
    pub force: bool,

    /// How long to wait for a cancelled run to stop (e.g. "2s", "500ms").
    #[arg(long, default_value = "2s")]
    pub cancel_timeout: String,

    /// Quiet mode (only output the numbers).
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Verbose output and debug logging.
    #[arg(short, long)]
    pub verbose: bool,

    /// Generate shell completion.
    #[arg(long, value_enum)]
    pub completion: Option<clap_complete::Shell>,
}

impl AppConfig {
    /// Parse CLI arguments.
    #[must_use]
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }

    /// Parse the cancel timeout flag.
    pub fn cancel_timeout_duration(&self) -> Result<Duration, AppError> {
        parse_duration(&self.cancel_timeout).ok_or_else(|| {
            AppError::Config(format!("invalid cancel timeout: {:?}", self.cancel_timeout))
        })
    }

    /// Generation options from the flags, normalized.
    #[must_use]
    pub fn generation_options(&self) -> GenerationOptions {
        GenerationOptions {
            batch_size: self.batch_size,
            seed: self.seed,
            ..GenerationOptions::default()
        }
        .normalize()
    }

    /// The request described by `--count` and `--group`.
    #[must_use]
    pub fn request(&self) -> GenerationRequest {
        GenerationRequest::new(self.count, self.groups.iter().map(String::as_str))
    }

    /// Refuse very large counts without `--force`; warn about large ones.
    pub fn check_count(&self) -> Result<(), AppError> {
        if self.count > MAX_UNCONFIRMED_REQUEST && !self.force {
            return Err(AppError::ConfirmationRequired {
                count: self.count,
                limit: MAX_UNCONFIRMED_REQUEST,
            });
        }
        if self.count > LARGE_REQUEST_THRESHOLD {
            warn!(
                count = self.count,
                "Large request; generation may take a while and use a lot of memory"
            );
        }
        Ok(())
    }
}

/// Parse a duration string like "5m", "1h", "30s", "500ms".
fn parse_duration(s: &str) -> Option<Duration> {
    let s = s.trim();
    if let Some(mins) = s.strip_suffix('m') {
        let n: u64 = mins.parse().ok()?;
        Some(Duration::from_secs(n.checked_mul(60)?))
    } else if let Some(hours) = s.strip_suffix('h') {
        let n: u64 = hours.parse().ok()?;
        Some(Duration::from_secs(n.checked_mul(3600)?))
    } else if let Some(ms) = s.strip_suffix("ms") {
        let n: u64 = ms.parse().ok()?;
        Some(Duration::from_millis(n))
    } else if let Some(secs) = s.strip_suffix('s') {
        let n: u64 = secs.parse().ok()?;
        Some(Duration::from_secs(n))
    } else {
        let n: u64 = s.parse().ok()?;
        Some(Duration::from_secs(n))
    }
}
