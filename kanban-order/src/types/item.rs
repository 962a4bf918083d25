//! Item type: one card on the board

use super::ids::{GroupKey, ItemId};
use super::position::Positioned;
use crate::ingest::ItemSchema;
use serde::Serialize;
use serde_json::{Map, Value};

/// A card on the board.
///
/// `id` and `position` are typed. Every other field of the source record is
/// carried as-is in `fields`, including the grouping attribute, so the sink
/// receives the whole record back.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Item {
    pub id: ItemId,
    pub position: f64,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl Item {
    /// Create an item with no extra fields
    pub fn new(id: impl Into<ItemId>, position: f64) -> Self {
        Self {
            id: id.into(),
            position,
            fields: Map::new(),
        }
    }

    /// Set a field
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    /// Get a field
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    /// The group key under the given attribute
    pub fn group_key(&self, attribute: &str) -> GroupKey {
        GroupKey::from_value(self.fields.get(attribute))
    }

    /// Set a field in place
    pub fn set_field(&mut self, name: &str, value: Value) {
        self.fields.insert(name.to_string(), value);
    }

    /// Rewrite the grouping attribute, as done when an item changes lists
    pub fn set_group_key(&mut self, attribute: &str, key: &GroupKey) {
        self.fields.insert(attribute.to_string(), key.to_value());
    }

    /// Render the item as a flat record using the schema's field names
    pub fn to_record(&self, schema: &ItemSchema) -> Value {
        let mut record = self.fields.clone();
        record.insert(
            schema.id_field.clone(),
            Value::String(self.id.as_str().to_string()),
        );
        record.insert(schema.position_field.clone(), position_value(self.position));
        Value::Object(record)
    }
}

impl Positioned for Item {
    fn position(&self) -> f64 {
        self.position
    }

    fn set_position(&mut self, position: f64) {
        self.position = position;
    }
}

/// Whole positions render as JSON integers, fractional ones as floats
fn position_value(position: f64) -> Value {
    if super::position::is_integral(position) && position.abs() < (1u64 << 53) as f64 {
        Value::from(position as i64)
    } else {
        Value::from(position)
    }
}
