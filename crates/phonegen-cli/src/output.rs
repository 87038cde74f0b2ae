//! CLI output formatting.

use std::io::{self, Write};
use std::time::Duration;

use phonegen_core::number::PhoneNumber;
use phonegen_store::export::group_thousands;

/// Format a duration for display.
#[must_use]
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
pub fn format_duration(d: Duration) -> String {
    let secs = d.as_secs_f64();
    if secs < 0.001 {
        format!("{:.2}µs", secs * 1_000_000.0)
    } else if secs < 1.0 {
        format!("{:.2}ms", secs * 1000.0)
    } else if secs < 60.0 {
        format!("{secs:.3}s")
    } else {
        let mins = (secs / 60.0).floor() as u64;
        let remaining = secs - (mins as f64 * 60.0);
        format!("{mins}m{remaining:.1}s")
    }
}

/// Format a number with thousand separators.
#[must_use]
pub fn format_number(n: u64) -> String {
    group_thousands(n)
}

/// Write up to `limit` numbers as `[i] number` lines.
///
/// When the list is longer, a trailer names how many were left out.
pub fn write_number_list<W: Write>(
    out: &mut W,
    numbers: &[PhoneNumber],
    limit: usize,
) -> io::Result<()> {
    let shown = numbers.len().min(limit);
    for (i, number) in numbers[..shown].iter().enumerate() {
        writeln!(out, "[{}] {number}", i + 1)?;
    }
    let hidden = numbers.len() - shown;
    if hidden > 0 {
        writeln!(
            out,
            "\n... {} more not shown; export to text to see the full list.",
            format_number(hidden as u64)
        )?;
    }
    Ok(())
}

/// Write numbers one per line with no decoration.
pub fn write_plain_list<W: Write>(
    out: &mut W,
    numbers: &[PhoneNumber],
    limit: usize,
) -> io::Result<()> {
    for number in numbers.iter().take(limit) {
        writeln!(out, "{number}")?;
    }
    Ok(())
}
