//! Validation of raw source records into typed items
//!
//! Item sources deliver loosely shaped JSON records. They are checked once
//! here, so the rest of the crate can rely on every item having an id and a
//! finite position.

use crate::error::{OrderError, Result};
use crate::types::{Item, ItemId};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Names of the record fields holding the item id and position
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemSchema {
    pub id_field: String,
    pub position_field: String,
}

impl ItemSchema {
    /// Create a schema with custom field names
    pub fn new(id_field: impl Into<String>, position_field: impl Into<String>) -> Self {
        Self {
            id_field: id_field.into(),
            position_field: position_field.into(),
        }
    }
}

impl Default for ItemSchema {
    fn default() -> Self {
        Self::new("id", "position")
    }
}

/// Parse one record. `index` is the record's place in its collection and is
/// only used in error messages.
pub fn parse_item(index: usize, record: &Value, schema: &ItemSchema) -> Result<Item> {
    let Value::Object(fields) = record else {
        return Err(OrderError::invalid_item(index, "expected an object"));
    };

    let id = match fields.get(&schema.id_field) {
        Some(Value::String(s)) if !s.is_empty() => ItemId::from_string(s.as_str()),
        Some(Value::Number(n)) if n.is_u64() || n.is_i64() => ItemId::from_string(n.to_string()),
        Some(Value::String(_)) => {
            return Err(OrderError::invalid_item(
                index,
                format!("field '{}' is empty", schema.id_field),
            ))
        }
        Some(_) => {
            return Err(OrderError::invalid_item(
                index,
                format!("field '{}' must be a string or integer", schema.id_field),
            ))
        }
        None => {
            return Err(OrderError::invalid_item(
                index,
                format!("missing field '{}'", schema.id_field),
            ))
        }
    };

    let position = match fields.get(&schema.position_field) {
        Some(Value::Number(n)) => n.as_f64().filter(|p| p.is_finite()).ok_or_else(|| {
            OrderError::invalid_item(
                index,
                format!("field '{}' is not a finite number", schema.position_field),
            )
        })?,
        Some(_) => {
            return Err(OrderError::invalid_item(
                index,
                format!("field '{}' must be a number", schema.position_field),
            ))
        }
        None => {
            return Err(OrderError::invalid_item(
                index,
                format!("missing field '{}'", schema.position_field),
            ))
        }
    };

    let mut rest = fields.clone();
    rest.remove(&schema.id_field);
    rest.remove(&schema.position_field);

    Ok(Item {
        id,
        position,
        fields: rest,
    })
}

/// Parse a collection of records.
///
/// Accepts either a JSON array or an object with an `items` array.
pub fn parse_items(value: &Value, schema: &ItemSchema) -> Result<Vec<Item>> {
    let records = match value {
        Value::Array(records) => records,
        Value::Object(map) => match map.get("items") {
            Some(Value::Array(records)) => records,
            _ => {
                return Err(OrderError::invalid_item(
                    0,
                    "expected an array or an object with an 'items' array",
                ))
            }
        },
        _ => {
            return Err(OrderError::invalid_item(
                0,
                "expected an array or an object with an 'items' array",
            ))
        }
    };

    records
        .iter()
        .enumerate()
        .map(|(index, record)| parse_item(index, record, schema))
        .collect()
}

/// Parse a JSON document of records
pub fn parse_items_str(json: &str, schema: &ItemSchema) -> Result<Vec<Item>> {
    let value: Value = serde_json::from_str(json)?;
    parse_items(&value, schema)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_item() {
        let record = json!({"id": "a1", "position": 65536, "status": "todo", "title": "T"});
        let item = parse_item(0, &record, &ItemSchema::default()).unwrap();
        assert_eq!(item.id.as_str(), "a1");
        assert_eq!(item.position, 65536.0);
        assert_eq!(item.field("status"), Some(&json!("todo")));
        assert!(item.field("id").is_none());
        assert!(item.field("position").is_none());
    }

    #[test]
    fn test_numeric_id() {
        let record = json!({"id": 12, "position": 1.5});
        let item = parse_item(0, &record, &ItemSchema::default()).unwrap();
        assert_eq!(item.id.as_str(), "12");
        assert_eq!(item.position, 1.5);
    }

    #[test]
    fn test_custom_schema() {
        let schema = ItemSchema::new("AppDataId", "order");
        let record = json!({"AppDataId": "x", "order": 3});
        let item = parse_item(0, &record, &schema).unwrap();
        assert_eq!(item.id.as_str(), "x");
        assert_eq!(item.position, 3.0);
    }

    #[test]
    fn test_rejects_bad_records() {
        let schema = ItemSchema::default();
        let cases = [
            json!("not an object"),
            json!({"position": 1}),
            json!({"id": "", "position": 1}),
            json!({"id": 1.5, "position": 1}),
            json!({"id": "a"}),
            json!({"id": "a", "position": "1"}),
            json!({"id": "a", "position": null}),
        ];
        for record in cases {
            let result = parse_item(4, &record, &schema);
            assert!(
                matches!(result, Err(OrderError::InvalidItem { index: 4, .. })),
                "expected invalid item for {record}"
            );
        }
    }

    #[test]
    fn test_parse_items_array_and_wrapper() {
        let schema = ItemSchema::default();
        let array = json!([{"id": "1", "position": 1}, {"id": "2", "position": 2}]);
        assert_eq!(parse_items(&array, &schema).unwrap().len(), 2);

        let wrapped = json!({"items": [{"id": "1", "position": 1}]});
        assert_eq!(parse_items(&wrapped, &schema).unwrap().len(), 1);

        assert!(parse_items(&json!({"cards": []}), &schema).is_err());
    }

    #[test]
    fn test_parse_items_reports_index() {
        let value = json!([{"id": "1", "position": 1}, {"id": "2"}]);
        let err = parse_items(&value, &ItemSchema::default()).unwrap_err();
        assert!(matches!(err, OrderError::InvalidItem { index: 1, .. }));
    }

    #[test]
    fn test_parse_items_str_bad_json() {
        let err = parse_items_str("[{", &ItemSchema::default()).unwrap_err();
        assert!(matches!(err, OrderError::Json(_)));
    }
}
