//! Result accumulator.

use std::ops::{Deref, DerefMut};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::Record;

/// What the engine appends to the dataset for each visited node.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Collect {
    /// Append every record that was not omitted.
    #[default]
    Records,
    /// Append the last defined value returned by the node's parsers.
    Returns,
}

/// A single dataset entry.
#[derive(Debug, Clone)]
pub enum Entry {
    /// A visited record.
    Record(Arc<Record>),
    /// A value returned by a parser, or placed directly by one.
    Value(Value),
    /// A `None` return that a parser marked as defined.
    Undefined,
}

impl Entry {
    /// Returns the record, if this entry holds one.
    pub fn as_record(&self) -> Option<&Arc<Record>> {
        match self {
            Entry::Record(record) => Some(record),
            _ => None,
        }
    }

    /// Returns the value of this entry: the record value or the raw value.
    pub fn value(&self) -> Option<&Value> {
        match self {
            Entry::Record(record) => Some(&record.value),
            Entry::Value(value) => Some(value),
            Entry::Undefined => None,
        }
    }
}

impl From<Value> for Entry {
    fn from(value: Value) -> Self {
        Entry::Value(value)
    }
}

impl From<Arc<Record>> for Entry {
    fn from(record: Arc<Record>) -> Self {
        Entry::Record(record)
    }
}

impl Serialize for Entry {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        match self {
            Entry::Record(record) => Record::serialize(record, serializer),
            Entry::Value(value) => value.serialize(serializer),
            Entry::Undefined => serializer.serialize_unit(),
        }
    }
}

/// The ordered output of a traversal.
///
/// Parsers receive the dataset being built and may change it freely; the
/// engine keeps appending to whatever the dataset holds.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct Dataset {
    entries: Vec<Entry>,
}

impl Dataset {
    /// Creates an empty dataset.
    pub fn new() -> Self {
        Self::default()
    }

    /// Iterates over the record entries, skipping anything else.
    pub fn records(&self) -> impl Iterator<Item = &Arc<Record>> {
        self.entries.iter().filter_map(Entry::as_record)
    }

    /// Returns the names of the record entries.
    pub fn names(&self) -> Vec<&str> {
        self.records().map(|record| record.name.as_str()).collect()
    }

    /// Returns the values of all entries; undefined entries are skipped.
    pub fn values(&self) -> Vec<&Value> {
        self.entries.iter().filter_map(Entry::value).collect()
    }

    /// Replaces the whole content of the dataset.
    pub fn replace(&mut self, entries: impl IntoIterator<Item = Entry>) {
        self.entries.clear();
        self.entries.extend(entries);
    }

    /// Consumes the dataset, returning its entries.
    pub fn into_entries(self) -> Vec<Entry> {
        self.entries
    }

    /// Serializes the dataset to a JSON array.
    pub fn to_json(&self) -> Result<Value, serde_json::Error> {
        serde_json::to_value(self)
    }
}

impl Deref for Dataset {
    type Target = Vec<Entry>;

    fn deref(&self) -> &Self::Target {
        &self.entries
    }
}

impl DerefMut for Dataset {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.entries
    }
}

impl From<Vec<Entry>> for Dataset {
    fn from(entries: Vec<Entry>) -> Self {
        Self { entries }
    }
}

impl IntoIterator for Dataset {
    type Item = Entry;
    type IntoIter = std::vec::IntoIter<Entry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<'a> IntoIterator for &'a Dataset {
    type Item = &'a Entry;
    type IntoIter = std::slice::Iter<'a, Entry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
