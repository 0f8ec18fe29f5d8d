//! Tabular data types: cell values, records and data sets.

use serde::{Deserialize, Serialize};
use std::collections::btree_map;
use std::collections::BTreeMap;
use std::fmt;

/// A single scalar cell value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    /// Empty cell
    #[default]
    Empty,
    /// Boolean cell
    Bool(bool),
    /// Numeric cell
    Number(f64),
    /// Text cell
    Text(String),
}

impl CellValue {
    /// Read an untyped text field (a CSV cell): blank is empty, anything
    /// else is kept verbatim as text.
    pub fn from_field(raw: &str) -> Self {
        if raw.is_empty() {
            CellValue::Empty
        } else {
            CellValue::Text(raw.to_string())
        }
    }

    /// Check if the cell is empty (no value or empty text).
    pub fn is_empty(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::Text(s) => s.is_empty(),
            _ => false,
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Empty => Ok(()),
            CellValue::Bool(b) => write!(f, "{}", b),
            CellValue::Number(n) => {
                if n.fract() == 0.0 && n.abs() < 1e15 {
                    write!(f, "{}", *n as i64)
                } else {
                    write!(f, "{}", n)
                }
            }
            CellValue::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::Text(s.to_string())
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        CellValue::Text(s)
    }
}

impl From<f64> for CellValue {
    fn from(n: f64) -> Self {
        CellValue::Number(n)
    }
}

impl From<i64> for CellValue {
    fn from(n: i64) -> Self {
        CellValue::Number(n as f64)
    }
}

impl From<bool> for CellValue {
    fn from(b: bool) -> Self {
        CellValue::Bool(b)
    }
}

/// One data row, keyed by placeholder name.
///
/// Records are immutable once built. When the same key is supplied twice,
/// the later value wins.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record {
    values: BTreeMap<String, CellValue>,
}

impl Record {
    /// Get the value for a key.
    pub fn get(&self, key: &str) -> Option<&CellValue> {
        self.values.get(key)
    }

    /// Check if the record has a value for a key.
    pub fn contains_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// Iterate over keys and values in key order.
    pub fn iter(&self) -> btree_map::Iter<'_, String, CellValue> {
        self.values.iter()
    }

    /// Iterate over keys in key order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    /// Get the number of keys.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Check if the record has no keys.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for Record
where
    K: Into<String>,
    V: Into<CellValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut values = BTreeMap::new();
        for (key, value) in iter {
            values.insert(key.into(), value.into());
        }
        Self { values }
    }
}

impl<'a> IntoIterator for &'a Record {
    type Item = (&'a String, &'a CellValue);
    type IntoIter = btree_map::Iter<'a, String, CellValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.iter()
    }
}

/// An ordered sequence of records, in source row order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DataSet {
    /// Placeholder keys in column order (may contain duplicates)
    pub headers: Vec<String>,

    /// Records in row order
    pub records: Vec<Record>,
}

impl DataSet {
    /// Create a data set from headers and records.
    pub fn new(headers: Vec<String>, records: Vec<Record>) -> Self {
        Self { headers, records }
    }

    /// Get the number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Check if the data set has no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Iterate over records in row order.
    pub fn iter(&self) -> std::slice::Iter<'_, Record> {
        self.records.iter()
    }

    /// Check if a column exists for the given key.
    pub fn has_column(&self, key: &str) -> bool {
        self.headers.iter().any(|h| h == key)
    }
}

impl<'a> IntoIterator for &'a DataSet {
    type Item = &'a Record;
    type IntoIter = std::slice::Iter<'a, Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
