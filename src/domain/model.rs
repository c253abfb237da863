use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// One dataset row. Field names and value shapes depend on the dataset.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record {
    pub data: HashMap<String, Value>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.data.get(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.data.insert(key.into(), value.into());
    }
}

impl From<serde_json::Map<String, Value>> for Record {
    fn from(obj: serde_json::Map<String, Value>) -> Self {
        Self {
            data: obj.into_iter().collect(),
        }
    }
}

impl FromIterator<(String, Value)> for Record {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self {
            data: iter.into_iter().collect(),
        }
    }
}

/// Column descriptor. CKAN sends `{"id", "type"}`; CSV headers only carry an id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    pub id: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub field_type: Option<String>,
}

impl Field {
    pub fn named(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            field_type: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub records: Vec<Record>,
    pub total: u64,
    pub fields: Vec<Field>,
}

impl SearchResult {
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Parameters of a CKAN `datastore_search` call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchQuery {
    pub resource_id: String,
    #[serde(default)]
    pub q: String,
    #[serde(default = "default_limit")]
    pub limit: usize,
    #[serde(default)]
    pub offset: usize,
    #[serde(default)]
    pub filters: Option<Value>,
}

pub const DEFAULT_SEARCH_LIMIT: usize = 50;

fn default_limit() -> usize {
    DEFAULT_SEARCH_LIMIT
}

impl SearchQuery {
    pub fn new(resource_id: impl Into<String>) -> Self {
        Self {
            resource_id: resource_id.into(),
            q: String::new(),
            limit: DEFAULT_SEARCH_LIMIT,
            offset: 0,
            filters: None,
        }
    }

    pub fn with_text(mut self, q: impl Into<String>) -> Self {
        self.q = q.into();
        self
    }

    pub fn with_page(mut self, limit: usize, offset: usize) -> Self {
        self.limit = limit;
        self.offset = offset;
        self
    }

    pub fn with_filters(mut self, filters: Value) -> Self {
        self.filters = Some(filters);
        self
    }
}

/// A latitude/longitude pair. Both values are finite.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinates {
    pub fn new(lat: f64, lon: f64) -> Option<Self> {
        (lat.is_finite() && lon.is_finite()).then_some(Self { lat, lon })
    }
}

/// Display-ready projection of a record for the map and list views.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Playground {
    pub title: String,
    pub subtitle: String,
    pub coords: Option<Coordinates>,
    pub record: Record,
}
