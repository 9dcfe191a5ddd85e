//! JSON-backed rows.
//!
//! Rows exported from span storage as newline-delimited JSON objects, one
//! object per row, with columns as top-level keys and endpoint values as
//! nested objects.

use crate::error::{Error, Result};
use crate::row::{Row, Udt};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::io::BufRead;

/// A span row held as a JSON object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JsonRow {
    columns: Map<String, Value>,
}

impl JsonRow {
    /// Parses one row from a JSON object string.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is not valid JSON or not an object.
    pub fn parse(line: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(line)?;
        Self::try_from(value)
    }
}

impl TryFrom<Value> for JsonRow {
    type Error = Error;

    fn try_from(value: Value) -> Result<Self> {
        match value {
            Value::Object(columns) => Ok(Self { columns }),
            _ => Err(Error::NotAnObject),
        }
    }
}

impl Row for JsonRow {
    type Udt = JsonUdt;

    fn string(&self, column: &str) -> Result<Option<String>> {
        get_string(&self.columns, column)
    }

    fn long(&self, column: &str) -> Result<Option<i64>> {
        get_non_null(&self.columns, column)
            .map(|value| {
                value
                    .as_i64()
                    .ok_or_else(|| Error::column_type(column, "long"))
            })
            .transpose()
    }

    fn boolean(&self, column: &str) -> Result<Option<bool>> {
        get_non_null(&self.columns, column)
            .map(|value| {
                value
                    .as_bool()
                    .ok_or_else(|| Error::column_type(column, "boolean"))
            })
            .transpose()
    }

    fn string_map(&self, column: &str) -> Result<Option<HashMap<String, String>>> {
        let Some(value) = get_non_null(&self.columns, column) else {
            return Ok(None);
        };
        let object = value
            .as_object()
            .ok_or_else(|| Error::column_type(column, "map<string, string>"))?;

        // Null and non-string entries are left out
        let map = object
            .iter()
            .filter_map(|(key, value)| value.as_str().map(|s| (key.clone(), s.to_string())))
            .collect();
        Ok(Some(map))
    }

    fn udt(&self, column: &str) -> Result<Option<JsonUdt>> {
        get_non_null(&self.columns, column)
            .map(|value| match value {
                Value::Object(fields) => Ok(JsonUdt {
                    fields: fields.clone(),
                }),
                _ => Err(Error::column_type(column, "udt")),
            })
            .transpose()
    }
}

/// A nested row value held as a JSON object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JsonUdt {
    fields: Map<String, Value>,
}

impl Udt for JsonUdt {
    fn string(&self, field: &str) -> Result<Option<String>> {
        get_string(&self.fields, field)
    }
}

/// Reads rows from newline-delimited JSON, skipping blank lines.
///
/// Each item is either a parsed row or the error for that line, so a single
/// bad line does not end the stream.
pub fn read_rows<B: BufRead>(reader: B) -> impl Iterator<Item = Result<JsonRow>> {
    reader.lines().filter_map(|line| match line {
        Ok(line) if line.trim().is_empty() => None,
        Ok(line) => Some(JsonRow::parse(&line)),
        Err(e) => Some(Err(e.into())),
    })
}

/// Gets a value, treating JSON null the same as an absent key.
fn get_non_null<'a>(object: &'a Map<String, Value>, key: &str) -> Option<&'a Value> {
    object.get(key).filter(|value| !value.is_null())
}

fn get_string(object: &Map<String, Value>, key: &str) -> Result<Option<String>> {
    match get_non_null(object, key) {
        None => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(_) => Err(Error::column_type(key, "string")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn row(value: Value) -> JsonRow {
        JsonRow::try_from(value).unwrap()
    }

    #[test]
    fn reads_typed_columns() {
        let row = row(json!({
            "id": "0000000000000003",
            "ts": 100,
            "shared": true,
            "tags": {"error": "boom", "http.status": "500"},
            "l_ep": {"service": "frontend", "port": 8080}
        }));

        assert_eq!(row.string("id").unwrap(), Some("0000000000000003".to_string()));
        assert_eq!(row.long("ts").unwrap(), Some(100));
        assert_eq!(row.boolean("shared").unwrap(), Some(true));

        let tags = row.string_map("tags").unwrap().unwrap();
        assert_eq!(tags.len(), 2);
        assert_eq!(tags.get("error").map(String::as_str), Some("boom"));

        let endpoint = row.udt("l_ep").unwrap().unwrap();
        assert_eq!(endpoint.string("service").unwrap(), Some("frontend".to_string()));
    }

    #[test]
    fn null_and_absent_columns_are_none() {
        let row = row(json!({"kind": null, "tags": null}));

        assert_eq!(row.string("kind").unwrap(), None);
        assert_eq!(row.string("parent_id").unwrap(), None);
        assert_eq!(row.long("ts").unwrap(), None);
        assert_eq!(row.boolean("shared").unwrap(), None);
        assert_eq!(row.string_map("tags").unwrap(), None);
        assert_eq!(row.udt("r_ep").unwrap(), None);
    }

    #[test]
    fn null_map_values_are_skipped() {
        let row = row(json!({"tags": {"error": null, "component": "grpc"}}));
        let tags = row.string_map("tags").unwrap().unwrap();

        assert!(!tags.contains_key("error"));
        assert_eq!(tags.len(), 1);
    }

    #[test]
    fn non_string_map_values_are_skipped() {
        let row = row(json!({"tags": {"error": 1, "http.status": 500, "component": "grpc"}}));
        let tags = row.string_map("tags").unwrap().unwrap();

        assert_eq!(tags.len(), 1);
        assert_eq!(tags.get("component").map(String::as_str), Some("grpc"));
    }

    #[test]
    fn wrong_types_are_errors() {
        let row = row(json!({
            "id": 3,
            "ts": "100",
            "shared": "yes",
            "tags": ["error"],
            "l_ep": "frontend"
        }));

        assert!(matches!(
            row.string("id"),
            Err(Error::ColumnType { expected: "string", .. })
        ));
        assert!(row.long("ts").is_err());
        assert!(row.boolean("shared").is_err());
        assert!(row.string_map("tags").is_err());
        assert!(row.udt("l_ep").is_err());
    }

    #[test]
    fn fractional_timestamp_is_not_a_long() {
        let row = row(json!({"ts": 1.5}));
        assert!(row.long("ts").is_err());
    }

    #[test]
    fn parse_rejects_non_objects() {
        assert!(matches!(JsonRow::parse("[1, 2]"), Err(Error::NotAnObject)));
        assert!(matches!(JsonRow::parse("{"), Err(Error::Json(_))));
    }

    #[test]
    fn read_rows_skips_blank_lines() {
        let data = "{\"id\":\"1\"}\n\n   \n{\"id\":\"2\"}\nnot json\n";
        let rows: Vec<Result<JsonRow>> = read_rows(data.as_bytes()).collect();

        assert_eq!(rows.len(), 3);
        assert!(rows[0].is_ok());
        assert!(rows[1].is_ok());
        assert!(rows[2].is_err());
    }
}
