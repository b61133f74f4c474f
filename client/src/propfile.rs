//! Static property file lookup.
//!
//! Read-only fallback source consulted when the property service is
//! unreachable. Format: one `key=value` per line, optional trailing CR
//! before the LF, only the first `=` on a line significant.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;


/// Scan `path` line by line for an exact match on `key`.
///
/// Stops at the first match. An unreadable file means the source is absent,
/// not an error, so lookup failures of every kind yield `None`.
pub fn find_key(path: &Path, key: &str) -> Option<String> {
    let file = File::open(path).ok()?;
    let reader = BufReader::new(file);

    for line in reader.lines() {
        let line = line.ok()?;
        let line = line.trim_end_matches('\r');
        let (name, value) = match line.split_once('=') {
            Some(pair) => pair,
            None => continue,
        };
        if name == key {
            return Some(value.to_string());
        }
    }
    None
}


// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
