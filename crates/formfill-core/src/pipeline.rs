//! Row preparation: sanitize → normalize.
//!
//! Each stage produces its own type so later code can only see rows that
//! went through both passes.

use crate::address::{normalize_street_list, shorten_streets, split_multiple_objects};
use shared_types::columns;
use shared_types::Row;
use std::collections::BTreeMap;

/// A row with every cell reduced to clean, trimmed text.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SanitizedRow {
    values: BTreeMap<String, String>,
}

impl SanitizedRow {
    pub fn from_row(row: &Row) -> Self {
        let values = row
            .iter()
            .map(|(column, cell)| (column.to_string(), sanitize_text(&cell.to_text())))
            .collect();
        Self { values }
    }

    pub fn text(&self, column: &str) -> &str {
        self.values.get(column).map(String::as_str).unwrap_or("")
    }
}

/// Replace spreadsheet whitespace oddities and trim.
pub fn sanitize_text(value: &str) -> String {
    value
        .replace('\u{a0}', " ")
        .replace('\u{200b}', "")
        .replace('\u{2011}', "-")
        .trim()
        .to_string()
}

/// A sanitized row whose address columns list one full address per entry.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NormalizedRow {
    values: BTreeMap<String, String>,
}

impl NormalizedRow {
    pub fn from_sanitized(row: SanitizedRow) -> Self {
        let mut values = row.values;
        for column in columns::ADDRESS_COLUMNS {
            if let Some(value) = values.get_mut(column) {
                *value = normalize_street_list(value);
            }
        }
        Self { values }
    }

    /// Column value, empty when the column is missing.
    pub fn text(&self, column: &str) -> &str {
        self.values.get(column).map(String::as_str).unwrap_or("")
    }

    pub fn is_empty(&self, column: &str) -> bool {
        self.text(column).is_empty()
    }

    /// Entries of the object address column.
    pub fn object_addresses(&self) -> Vec<String> {
        split_multiple_objects(self.text(columns::OBJECT_STREET))
    }

    pub fn is_multi_object(&self) -> bool {
        self.object_addresses().len() > 1
    }

    /// No contract partner is named, so the condominium association
    /// (WEG) of the object is the partner.
    pub fn is_weg(&self) -> bool {
        self.is_empty(columns::PARTNER_COMPANY) && self.is_empty(columns::PARTNER_NAME)
    }

    /// `"<streets>, <postal code> <city>"` for the object.
    pub fn object_location(&self) -> String {
        format!(
            "{}, {} {}",
            shorten_streets(self.text(columns::OBJECT_STREET)),
            self.text(columns::OBJECT_POSTAL_CODE),
            self.text(columns::OBJECT_CITY)
        )
    }

    /// Synthesised partner name for a condominium association.
    pub fn weg_name(&self) -> String {
        format!("WEG {}", self.object_location())
    }
}

/// Run both preparation stages.
pub fn prepare(row: &Row) -> NormalizedRow {
    NormalizedRow::from_sanitized(SanitizedRow::from_row(row))
}
