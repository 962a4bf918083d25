//! Identifier and key newtypes

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Stable identifier of an item, as supplied by the item source
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(String);

impl ItemId {
    /// Create an id from any string-like value
    pub fn from_string(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the inner string value
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ItemId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for ItemId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Value of the grouping attribute that buckets an item into a list.
///
/// Items whose attribute is missing or `null` carry the null key and are
/// grouped together like any other key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GroupKey(Option<String>);

impl GroupKey {
    /// Create a key from a string value
    pub fn new(key: impl Into<String>) -> Self {
        Self(Some(key.into()))
    }

    /// The key of items with a missing or null attribute
    pub fn null() -> Self {
        Self(None)
    }

    /// Derive a key from a raw attribute value.
    ///
    /// Strings are used as-is, other scalars by their JSON text.
    pub fn from_value(value: Option<&Value>) -> Self {
        match value {
            None | Some(Value::Null) => Self(None),
            Some(Value::String(s)) => Self(Some(s.clone())),
            Some(other) => Self(Some(other.to_string())),
        }
    }

    /// Attribute value to write back into a record for this key
    pub fn to_value(&self) -> Value {
        match &self.0 {
            Some(s) => Value::String(s.clone()),
            None => Value::Null,
        }
    }

    /// Check if this is the null key
    pub fn is_null(&self) -> bool {
        self.0.is_none()
    }

    /// Get the key as a string, if it is not null
    pub fn as_str(&self) -> Option<&str> {
        self.0.as_deref()
    }
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            Some(s) => f.write_str(s),
            None => f.write_str("null"),
        }
    }
}

impl From<&str> for GroupKey {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for GroupKey {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<Option<String>> for GroupKey {
    fn from(s: Option<String>) -> Self {
        Self(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_group_key_from_value() {
        assert_eq!(GroupKey::from_value(Some(&json!("todo"))), GroupKey::from("todo"));
        assert_eq!(GroupKey::from_value(Some(&json!(3))), GroupKey::from("3"));
        assert_eq!(GroupKey::from_value(Some(&json!(true))), GroupKey::from("true"));
        assert!(GroupKey::from_value(Some(&Value::Null)).is_null());
        assert!(GroupKey::from_value(None).is_null());
    }

    #[test]
    fn test_group_key_to_value() {
        assert_eq!(GroupKey::from("done").to_value(), json!("done"));
        assert_eq!(GroupKey::null().to_value(), Value::Null);
    }

    #[test]
    fn test_group_key_serialization() {
        assert_eq!(serde_json::to_string(&GroupKey::from("a")).unwrap(), "\"a\"");
        assert_eq!(serde_json::to_string(&GroupKey::null()).unwrap(), "null");
        let parsed: GroupKey = serde_json::from_str("null").unwrap();
        assert!(parsed.is_null());
    }

    #[test]
    fn test_item_id_conversions() {
        assert_eq!(ItemId::from_string("42").as_str(), "42");
        assert_eq!(ItemId::from("abc").to_string(), "abc");
    }
}
