//! The three filter passes, operating on in-memory table lines.
//!
//! Each pass takes the full table (header first) and returns the lines to
//! write. File I/O stays in the pipeline driver so these stay testable
//! against plain string fixtures.

use std::collections::HashSet;

use crate::table::extract_field;

/// Result of one filter pass over a table.
pub struct FilterOutput<'a> {
    /// The header plus every kept data row, terminators intact.
    pub lines: Vec<&'a str>,
    /// Data rows kept, excluding the header.
    pub kept: usize,
}

/// Shared pass mechanics: the header is kept unconditionally, blank
/// (whitespace-only) rows are dropped, and every other row is put to the
/// predicate. Relative order is preserved. Callers hand in at least the
/// header line; empty tables are handled before the pass runs.
fn filter_rows<'a>(lines: &[&'a str], mut keep: impl FnMut(&'a str) -> bool) -> FilterOutput<'a> {
    let mut out = Vec::with_capacity(lines.len());
    out.push(lines[0]);

    for &line in &lines[1..] {
        if line.trim().is_empty() {
            continue;
        }
        if keep(line) {
            out.push(line);
        }
    }

    let kept = out.len() - 1;
    FilterOutput { lines: out, kept }
}

/// Keeps rows whose route id (field 0) is in the allow-set.
pub fn filter_routes<'a>(lines: &[&'a str], allowed: &HashSet<String>) -> FilterOutput<'a> {
    filter_rows(lines, |line| {
        extract_field(line, 0).is_some_and(|route_id| allowed.contains(route_id))
    })
}

/// Keeps rows whose route id (field 0) is in the allow-set and collects
/// the trip id (field 2) of every kept row.
///
/// A row with fewer than three fields has no trip id to collect and is
/// dropped outright, whatever its route id says.
pub fn filter_trips<'a>(
    lines: &[&'a str],
    allowed: &HashSet<String>,
) -> (FilterOutput<'a>, HashSet<String>) {
    let mut kept_trips = HashSet::new();

    let output = filter_rows(lines, |line| {
        let Some(trip_id) = extract_field(line, 2) else {
            return false;
        };
        let keep = extract_field(line, 0).is_some_and(|route_id| allowed.contains(route_id));
        if keep {
            kept_trips.insert(trip_id.to_string());
        }
        keep
    });

    (output, kept_trips)
}

/// Keeps rows whose trip id (field 0) survived the trip pass.
///
/// An empty trip set is a valid input and yields a header-only table.
pub fn filter_stop_times<'a>(lines: &[&'a str], kept_trips: &HashSet<String>) -> FilterOutput<'a> {
    filter_rows(lines, |line| {
        extract_field(line, 0).is_some_and(|trip_id| kept_trips.contains(trip_id))
    })
}
