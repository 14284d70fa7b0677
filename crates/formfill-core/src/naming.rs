//! Output file names.

use crate::pipeline::NormalizedRow;
use lazy_static::lazy_static;
use regex::Regex;
use std::collections::HashSet;

lazy_static! {
    static ref DISALLOWED_CHARS: Regex = Regex::new(r"[^A-Za-z0-9_\-, ]+").unwrap();
    static ref WHITESPACE: Regex = Regex::new(r"\s+").unwrap();
}

/// Used when nothing of the label survives cleaning.
pub const FALLBACK_NAME: &str = "objekt";

/// Human-readable name of a row's document before cleaning.
pub fn document_label(row: &NormalizedRow) -> String {
    if row.is_weg() {
        row.weg_name()
    } else {
        row.object_location()
    }
}

/// Reduce `value` to a portable file stem of at most `max_len` characters.
pub fn safe_filename(value: &str, max_len: usize) -> String {
    let value = value.replace('/', "-");
    let value = DISALLOWED_CHARS.replace_all(&value, "");
    let value = WHITESPACE.replace_all(&value, " ");

    let name: String = value.trim().chars().take(max_len).collect();
    let name = name.trim_end();
    if name.is_empty() {
        FALLBACK_NAME.to_string()
    } else {
        name.to_string()
    }
}

/// Hands out `.pdf` file names that are unique within one batch.
#[derive(Debug, Default)]
pub struct UniqueNames {
    taken: HashSet<String>,
}

impl UniqueNames {
    pub fn new() -> Self {
        Self::default()
    }

    /// `"<stem>.pdf"`, or `"<stem> (n).pdf"` with the first free n ≥ 2.
    pub fn claim(&mut self, stem: &str) -> String {
        let mut candidate = format!("{}.pdf", stem);
        let mut n = 1;
        while !self.taken.insert(candidate.clone()) {
            n += 1;
            candidate = format!("{} ({}).pdf", stem, n);
        }
        candidate
    }
}
