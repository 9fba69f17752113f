//! Finalize step: move each `<table>_filtered.txt` over the canonical
//! `<table>.txt` name in the destination directory.

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use tracing::{debug, info};

/// The three tables this pipeline rewrites.
pub const TABLES: [&str; 3] = ["routes", "trips", "stop_times"];

/// Publishes every filtered table that exists, renaming it over the
/// canonical file name. Filtered files live in the destination directory,
/// so the rename never crosses filesystems and readers see either the old
/// table or the new one, never a missing file.
///
/// A table whose filter stage produced no output is skipped without error.
/// Returns the number of tables published.
pub fn publish(dest_dir: &Path) -> Result<usize> {
    let mut published = 0;

    for name in TABLES {
        let filtered = dest_dir.join(format!("{name}_filtered.txt"));
        let canonical = dest_dir.join(format!("{name}.txt"));

        if !filtered.exists() {
            debug!(table = name, "No filtered output, skipping publish");
            continue;
        }

        fs::rename(&filtered, &canonical)
            .with_context(|| format!("publishing {}", canonical.display()))?;
        info!(table = name, "Published {name}.txt");
        published += 1;
    }

    Ok(published)
}
