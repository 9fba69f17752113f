//! Line-level table I/O and field extraction shared by the filter passes.
//!
//! Tables are treated as opaque lines: rows that survive a filter are
//! re-emitted byte-for-byte, so line terminators and field quoting pass
//! through exactly as found in the source.

use anyhow::Result;
use std::fs;
use std::path::Path;
use tracing::debug;

/// Strips a single leading U+FEFF byte-order mark, if present.
pub fn strip_bom(content: &str) -> &str {
    content.strip_prefix('\u{feff}').unwrap_or(content)
}

/// Splits table content into lines that keep their original terminators,
/// so concatenating kept lines reproduces the source bytes exactly.
pub fn split_lines(content: &str) -> Vec<&str> {
    content.split_inclusive('\n').collect()
}

/// Reads a source table into memory with any leading BOM stripped.
///
/// Returns `None` when the file is missing or holds zero lines; the
/// pipeline reports these as a stage diagnostic and moves on.
pub fn load_table(path: &Path) -> Result<Option<String>> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e.into()),
    };
    let content = strip_bom(&content);
    if content.is_empty() {
        return Ok(None);
    }
    Ok(Some(content.to_string()))
}

/// Writes table lines verbatim, in order, with no added terminators.
pub fn write_table(path: &Path, lines: &[&str]) -> Result<()> {
    debug!(path = %path.display(), lines = lines.len(), "Writing table");
    let mut out = String::with_capacity(lines.iter().map(|l| l.len()).sum());
    for line in lines {
        out.push_str(line);
    }
    fs::write(path, out)?;
    Ok(())
}

/// Extracts the field at `index` from a raw row.
///
/// Rows are split on the literal `','` with no quoted-field awareness, so
/// an embedded comma inside a quoted field splits that field. The ids this
/// tool matches on never contain commas.
///
/// The extracted value has one layer of surrounding double quotes removed,
/// then surrounding whitespace (including the terminator on a final field)
/// trimmed. Returns `None` when the row has too few fields.
pub fn extract_field(line: &str, index: usize) -> Option<&str> {
    let field = line.split(',').nth(index)?;
    let field = field.strip_prefix('"').unwrap_or(field);
    let field = field.strip_suffix('"').unwrap_or(field);
    Some(field.trim())
}
