//! Type definitions for tabular data
//!
//! Every source format is decoded into a [`Table`]: an ordered list of column
//! names plus positional rows of [`CellValue`]s. Encoders read the same table
//! back, either as text (CSV, Excel, Parquet) or as native values (JSON).

use chrono::{Duration, NaiveDateTime};
use indexmap::IndexMap;
use std::collections::HashSet;
use std::fmt;

/// Represents a single value in a tabular record
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    /// Empty cell / JSON null
    Empty,
    /// String value
    String(String),
    /// Integer value
    Int(i64),
    /// Float value
    Float(f64),
    /// Boolean value
    Bool(bool),
    /// Date and time without timezone
    DateTime(NaiveDateTime),
    /// Elapsed time (spreadsheet duration cells)
    Duration(Duration),
}

impl CellValue {
    /// Convert cell value to its text form
    pub fn as_string(&self) -> String {
        match self {
            CellValue::Empty => String::new(),
            CellValue::String(s) => s.clone(),
            CellValue::Int(i) => itoa::Buffer::new().format(*i).to_string(),
            CellValue::Float(f) => f.to_string(),
            CellValue::Bool(b) => b.to_string(),
            CellValue::DateTime(dt) => dt.format("%Y-%m-%dT%H:%M:%S%.f").to_string(),
            CellValue::Duration(d) => format_duration(d),
        }
    }

    /// Convert cell value to a JSON value, keeping numbers and booleans native
    pub fn to_json(&self) -> serde_json::Value {
        use serde_json::Value;

        match self {
            CellValue::Empty => Value::Null,
            CellValue::String(s) => Value::String(s.clone()),
            CellValue::Int(i) => Value::from(*i),
            CellValue::Float(f) => serde_json::Number::from_f64(*f)
                .map(Value::Number)
                .unwrap_or(Value::Null),
            CellValue::Bool(b) => Value::Bool(*b),
            CellValue::DateTime(_) | CellValue::Duration(_) => Value::String(self.as_string()),
        }
    }

    /// Build a cell value from a JSON value.
    ///
    /// Nested arrays and objects are kept as their compact JSON text.
    pub fn from_json(value: &serde_json::Value) -> Self {
        use serde_json::Value;

        match value {
            Value::Null => CellValue::Empty,
            Value::Bool(b) => CellValue::Bool(*b),
            Value::Number(n) => match n.as_i64() {
                Some(i) => CellValue::Int(i),
                // above i64::MAX: keep the exact digits
                None if n.is_u64() => CellValue::String(n.to_string()),
                None => n.as_f64().map(CellValue::Float).unwrap_or(CellValue::Empty),
            },
            Value::String(s) => CellValue::String(s.clone()),
            Value::Array(_) | Value::Object(_) => CellValue::String(value.to_string()),
        }
    }

    /// Check if cell is empty
    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }
}

// [-]H:MM:SS with fractional seconds only when present
fn format_duration(d: &Duration) -> String {
    let negative = *d < Duration::zero();
    let sign = if negative { "-" } else { "" };
    let d = if negative { -*d } else { *d };
    let total_secs = d.num_seconds();
    let millis = d.num_milliseconds() - total_secs * 1000;
    let (hours, minutes, seconds) = (total_secs / 3600, (total_secs / 60) % 60, total_secs % 60);

    if millis > 0 {
        format!("{sign}{hours}:{minutes:02}:{seconds:02}.{millis:03}")
    } else {
        format!("{sign}{hours}:{minutes:02}:{seconds:02}")
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_string())
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::String(s.to_string())
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        CellValue::String(s)
    }
}

impl From<i64> for CellValue {
    fn from(i: i64) -> Self {
        CellValue::Int(i)
    }
}

impl From<f64> for CellValue {
    fn from(f: f64) -> Self {
        CellValue::Float(f)
    }
}

impl From<bool> for CellValue {
    fn from(b: bool) -> Self {
        CellValue::Bool(b)
    }
}

/// One row keyed by column name, in column order
pub type Record = IndexMap<String, CellValue>;

/// Decoded tabular data shared by every converter
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    /// Column names in output order
    pub columns: Vec<String>,
    /// Data rows, addressed by column position
    pub rows: Vec<Vec<CellValue>>,
}

impl Table {
    /// Create a table from a header and positional rows.
    ///
    /// Repeated column names get a numeric suffix (`a`, `a_2`, `a_3`) so
    /// keyed output never merges two columns.
    pub fn new(columns: Vec<String>, rows: Vec<Vec<CellValue>>) -> Self {
        Table {
            columns: unique_columns(columns),
            rows,
        }
    }

    /// Build a table from keyed records.
    ///
    /// The first record defines the columns. Later records missing one of
    /// those keys get an empty cell; keys the first record lacks are dropped.
    pub fn from_records(records: Vec<Record>) -> Self {
        let columns: Vec<String> = match records.first() {
            Some(first) => first.keys().cloned().collect(),
            None => return Table::default(),
        };

        let rows = records
            .into_iter()
            .enumerate()
            .map(|(idx, mut record)| {
                let row: Vec<CellValue> = columns
                    .iter()
                    .map(|col| record.swap_remove(col).unwrap_or(CellValue::Empty))
                    .collect();
                if !record.is_empty() {
                    tracing::debug!(
                        record = idx,
                        dropped = ?record.keys().collect::<Vec<_>>(),
                        "record has keys outside the first record's columns"
                    );
                }
                row
            })
            .collect();

        Table { columns, rows }
    }

    /// Number of data rows
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Check if the table has neither columns nor rows
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty() && self.rows.is_empty()
    }

    /// Cell at (row, column); short rows read as empty
    pub fn cell(&self, row: usize, col: usize) -> &CellValue {
        static EMPTY: CellValue = CellValue::Empty;
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .unwrap_or(&EMPTY)
    }

    /// Iterate rows as text, padded to the header width
    pub fn text_rows(&self) -> impl Iterator<Item = Vec<String>> + '_ {
        (0..self.rows.len()).map(move |row| {
            (0..self.columns.len())
                .map(|col| self.cell(row, col).as_string())
                .collect()
        })
    }

    /// Iterate rows as keyed records
    pub fn records(&self) -> impl Iterator<Item = Record> + '_ {
        (0..self.rows.len()).map(move |row| {
            self.columns
                .iter()
                .enumerate()
                .map(|(col, name)| (name.clone(), self.cell(row, col).clone()))
                .collect()
        })
    }
}

fn unique_columns(columns: Vec<String>) -> Vec<String> {
    let mut seen: HashSet<String> = HashSet::with_capacity(columns.len());
    columns
        .into_iter()
        .map(|name| {
            let mut unique = name.clone();
            let mut n = 2;
            while seen.contains(&unique) {
                unique = format!("{}_{}", name, n);
                n += 1;
            }
            if unique != name {
                tracing::debug!(column = %name, renamed = %unique, "repeated column name");
            }
            seen.insert(unique.clone());
            unique
        })
        .collect()
}
