//! Plain-text export.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use tracing::debug;

use phonegen_core::number::PhoneNumber;

use crate::record::StoreError;

/// Entries written between explicit flushes.
pub const EXPORT_FLUSH_INTERVAL: usize = 1000;

const TITLE: &str = "Phone Number List";
const RULE_WIDTH: usize = 40;

/// Metadata printed in the export header.
#[derive(Debug, Clone, Copy)]
pub struct ExportHeader<'a> {
    /// Formatted generation timestamp.
    pub generated: &'a str,
    /// Display label of the selected groups.
    pub operators: &'a str,
}

/// Write the header and one `i. number` line per entry.
///
/// The writer is flushed every [`EXPORT_FLUSH_INTERVAL`] entries and once at
/// the end.
pub fn write_export<W: Write>(
    mut writer: W,
    numbers: &[PhoneNumber],
    header: ExportHeader<'_>,
) -> io::Result<()> {
    let rule = "=".repeat(RULE_WIDTH);
    writeln!(writer, "{TITLE}")?;
    writeln!(writer, "{rule}")?;
    writeln!(writer, "Generated: {}", header.generated)?;
    writeln!(writer, "Count: {}", group_thousands(numbers.len() as u64))?;
    writeln!(writer, "Operators: {}", header.operators)?;
    writeln!(writer, "{rule}")?;
    writeln!(writer)?;

    for (i, number) in numbers.iter().enumerate() {
        writeln!(writer, "{}. {number}", i + 1)?;
        if (i + 1) % EXPORT_FLUSH_INTERVAL == 0 {
            writer.flush()?;
        }
    }
    writer.flush()
}

/// Export `numbers` to a text file at `path`.
pub fn export_to_path(
    path: &Path,
    numbers: &[PhoneNumber],
    header: ExportHeader<'_>,
) -> Result<(), StoreError> {
    let file = File::create(path).map_err(|e| StoreError::io(path, e))?;
    write_export(BufWriter::new(file), numbers, header).map_err(|e| StoreError::io(path, e))?;
    debug!(path = %path.display(), count = numbers.len(), "Export written");
    Ok(())
}

/// Format a count with comma thousands separators.
#[must_use]
pub fn group_thousands(n: u64) -> String {
    let s = n.to_string();
    let mut result = String::with_capacity(s.len() + s.len() / 3);
    for (i, c) in s.chars().enumerate() {
        if i > 0 && (s.len() - i) % 3 == 0 {
            result.push(',');
        }
        result.push(c);
    }
    result
}
