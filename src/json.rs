//! JSON array-of-objects codec

use crate::error::{ConvertError, Result};
use crate::types::{CellValue, Record, Table};
use serde_json::{Map, Value};

/// Decode a JSON array of flat objects.
///
/// The first object defines the columns; see [`Table::from_records`] for how
/// later objects with other keys are handled.
pub fn read_table(data: &[u8]) -> Result<Table> {
    let value: Value = serde_json::from_slice(data)?;
    let items = match value {
        Value::Array(items) => items,
        other => {
            return Err(ConvertError::ReadError(format!(
                "Expected a JSON array of objects, found {}",
                json_type_name(&other)
            )))
        }
    };

    let mut records = Vec::with_capacity(items.len());
    for (idx, item) in items.into_iter().enumerate() {
        let object = match item {
            Value::Object(object) => object,
            other => {
                return Err(ConvertError::ReadError(format!(
                    "Element {} is {}, expected an object",
                    idx,
                    json_type_name(&other)
                )))
            }
        };
        if idx == 0 && object.is_empty() {
            return Err(ConvertError::ReadError(
                "Element 0 has no keys; the first object defines the columns".to_string(),
            ));
        }
        let record: Record = object
            .iter()
            .map(|(key, value)| (key.clone(), CellValue::from_json(value)))
            .collect();
        records.push(record);
    }

    let table = Table::from_records(records);
    tracing::debug!(columns = table.columns.len(), rows = table.row_count(), "decoded JSON");
    Ok(table)
}

/// Encode a table as a pretty-printed JSON array of objects
pub fn write_table(table: &Table) -> Result<Vec<u8>> {
    let items: Vec<Value> = table
        .records()
        .map(|record| {
            let object: Map<String, Value> = record
                .into_iter()
                .map(|(key, value)| (key, value.to_json()))
                .collect();
            Value::Object(object)
        })
        .collect();

    Ok(serde_json::to_vec_pretty(&Value::Array(items))?)
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_read_keeps_key_order() -> Result<()> {
        let table = read_table(br#"[{"z":1,"a":"x"},{"z":2,"a":"y"}]"#)?;
        assert_eq!(table.columns, vec!["z", "a"]);
        assert_eq!(table.cell(1, 0), &CellValue::Int(2));
        Ok(())
    }

    #[test]
    fn test_write_native_values() -> Result<()> {
        let table = Table::new(
            vec!["n".into(), "s".into(), "b".into(), "e".into()],
            vec![vec![
                CellValue::Float(2.5),
                "x".into(),
                CellValue::Bool(true),
                CellValue::Empty,
            ]],
        );
        let value: Value = serde_json::from_slice(&write_table(&table)?)?;
        assert_eq!(value, json!([{"n": 2.5, "s": "x", "b": true, "e": null}]));
        Ok(())
    }

    #[test]
    fn test_empty_array() -> Result<()> {
        let table = read_table(b"[]")?;
        assert!(table.is_empty());
        assert_eq!(write_table(&table)?, b"[]");
        Ok(())
    }

    #[test]
    fn test_rejects_non_arrays() {
        let err = read_table(br#"{"a":1}"#).unwrap_err();
        assert!(err.to_string().contains("array"));

        let err = read_table(b"[1, 2]").unwrap_err();
        assert!(err.to_string().contains("Element 0"));

        assert!(read_table(b"[{\"a\":").is_err());
    }

    #[test]
    fn test_first_object_needs_keys() {
        let err = read_table(b"[{}]").unwrap_err();
        assert!(err.to_string().contains("no keys"));

        // later empty objects are padded like any missing key
        let table = read_table(br#"[{"a":1},{}]"#).unwrap();
        assert_eq!(table.row_count(), 2);
        assert_eq!(table.cell(1, 0), &CellValue::Empty);
    }
}
