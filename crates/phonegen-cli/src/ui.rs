//! UI helpers for CLI display.

use console::style;

use phonegen_core::prefix::PrefixSelector;

/// Check if color output is disabled via `NO_COLOR` env var.
#[must_use]
pub fn is_color_disabled() -> bool {
    std::env::var("NO_COLOR").is_ok()
}

/// Print a styled header.
pub fn print_header(text: &str) {
    if is_color_disabled() {
        println!("=== {text} ===");
    } else {
        println!("{}", style(format!("=== {text} ===")).bold().cyan());
    }
}

/// Print a success message.
pub fn print_success(text: &str) {
    if is_color_disabled() {
        println!("[OK] {text}");
    } else {
        println!("{} {text}", style("[OK]").green().bold());
    }
}

/// Print a warning to stderr.
pub fn print_warning(text: &str) {
    if is_color_disabled() {
        eprintln!("[WARN] {text}");
    } else {
        eprintln!("{} {text}", style("[WARN]").yellow().bold());
    }
}

/// Print an error message.
pub fn print_error(text: &str) {
    if is_color_disabled() {
        eprintln!("[ERROR] {text}");
    } else {
        eprintln!("{} {text}", style("[ERROR]").red().bold());
    }
}

/// One line per group: key, label and prefixes.
#[must_use]
pub fn group_table(selector: &PrefixSelector) -> Vec<String> {
    let mut lines: Vec<String> = selector
        .groups()
        .iter()
        .map(|g| format!("{:<8} {:<14} {}", g.key, g.label, g.prefixes.join(" ")))
        .collect();
    let universe = selector.universe();
    lines.push(format!("{:<8} {:<14} {} prefixes", "(none)", "All", universe.len()));
    lines
}

/// Print the group table.
pub fn print_groups(selector: &PrefixSelector) {
    print_header("Carrier groups");
    for line in group_table(selector) {
        println!("{line}");
    }
}
