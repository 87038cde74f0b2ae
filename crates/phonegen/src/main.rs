//! phonegen: bulk generator of unique, plan-valid mobile phone numbers.

use phonegen_cli::ui;
use phonegen_lib::{app, config, errors};
use tracing_subscriber::EnvFilter;

fn main() {
    let config = config::AppConfig::parse();

    // RUST_LOG wins; otherwise warnings only, or debug with --verbose.
    let default_level = if config.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let code = match app::run(&config) {
        Ok(code) => code,
        Err(err) => {
            ui::print_error(&format!("{err:#}"));
            errors::handle_error(&err)
        }
    };
    std::process::exit(code);
}
