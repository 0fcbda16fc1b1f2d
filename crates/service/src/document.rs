//! Persisted document model.
//!
//! The whole state of the service is one JSON object holding two ordered
//! arrays of free-form items. Items are kept as raw JSON maps so callers can
//! store any fields they like; only `id` is interpreted.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

pub const ID_FIELD: &str = "id";

/// One of the named arrays inside the [`Document`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Requests,
    History,
}

impl Collection {
    pub const ALL: [Collection; 2] = [Collection::Requests, Collection::History];

    pub fn as_str(&self) -> &'static str {
        match self {
            Collection::Requests => "requests",
            Collection::History => "history",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single record: an ordered JSON object carrying a string `id`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Item(Map<String, Value>);

impl Item {
    /// Build a fresh item with `id` as its first key; any `id` in `fields` is dropped.
    pub fn with_id(id: impl Into<String>, fields: Item) -> Self {
        let mut map = Map::with_capacity(fields.0.len() + 1);
        map.insert(ID_FIELD.to_string(), Value::String(id.into()));
        for (k, v) in fields.0 {
            if k != ID_FIELD {
                map.insert(k, v);
            }
        }
        Item(map)
    }

    /// The string id, if present. Non-string ids are treated as absent.
    pub fn id(&self) -> Option<&str> {
        self.0.get(ID_FIELD).and_then(Value::as_str)
    }

    pub fn has_id(&self, id: &str) -> bool {
        self.id() == Some(id)
    }

    /// Shallow merge: keys in `fields` overwrite, others are kept. `id` never changes.
    pub fn merge(&mut self, fields: Item) {
        for (k, v) in fields.0 {
            if k != ID_FIELD {
                self.0.insert(k, v);
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }
}

impl From<Map<String, Value>> for Item {
    fn from(map: Map<String, Value>) -> Self {
        Item(map)
    }
}

impl From<Item> for Value {
    fn from(item: Item) -> Self {
        Value::Object(item.0)
    }
}

/// Root object of the backing store.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    #[serde(default, deserialize_with = "nullable_items")]
    pub requests: Vec<Item>,
    #[serde(default, deserialize_with = "nullable_items")]
    pub history: Vec<Item>,
    /// Unknown top-level keys, carried through untouched.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn nullable_items<'de, D>(deserializer: D) -> Result<Vec<Item>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<Item>>::deserialize(deserializer)?.unwrap_or_default())
}

impl Document {
    pub fn items(&self, collection: Collection) -> &[Item] {
        match collection {
            Collection::Requests => &self.requests,
            Collection::History => &self.history,
        }
    }

    pub fn items_mut(&mut self, collection: Collection) -> &mut Vec<Item> {
        match collection {
            Collection::Requests => &mut self.requests,
            Collection::History => &mut self.history,
        }
    }

    pub fn find(&self, collection: Collection, id: &str) -> Option<&Item> {
        self.items(collection).iter().find(|item| item.has_id(id))
    }
}
