//! Text output formatter
//!
//! One line per entry. Records print as `key = value`, followed by their
//! extra fields; the key is the record path when present, its name otherwise.

use gendata_core::parsers::PATH_FIELD;
use gendata_core::{Dataset, Entry, Record};
use serde_json::Value;

/// Key printed for the root record.
const ROOT_LABEL: &str = "$";

pub fn output_text(dataset: &Dataset) {
    for entry in dataset {
        println!("{}", format_entry(entry));
    }
}

fn format_entry(entry: &Entry) -> String {
    match entry {
        Entry::Record(record) => format_record(record),
        Entry::Value(value) => value.to_string(),
        Entry::Undefined => "undefined".to_string(),
    }
}

fn format_record(record: &Record) -> String {
    let key = record
        .field(PATH_FIELD)
        .and_then(Value::as_str)
        .unwrap_or(&record.name);
    let key = if key.is_empty() && record.is_root() {
        ROOT_LABEL
    } else {
        key
    };

    let extra: String = record
        .fields()
        .iter()
        .filter(|(name, _)| name.as_str() != PATH_FIELD)
        .map(|(name, value)| format!(" {}={}", name, value))
        .collect();
    format!("{} = {}{}", key, record.value, extra)
}
