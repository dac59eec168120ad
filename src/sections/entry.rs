use crate::sections::SectionKind;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

/// One configurable block of a storefront page, in its persisted shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionEntry {
    pub id: String,
    pub name: String,
    pub enabled: bool,
    pub order: u32,
    /// Layout hints (column count, autoplay, ...).
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub settings: Map<String, Value>,
    /// Editable copy. Missing keys fall back to render-time defaults.
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub content: Map<String, Value>,
}

impl SectionEntry {
    pub fn new(id: impl Into<String>, name: impl Into<String>, order: u32) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            enabled: true,
            order,
            settings: Map::new(),
            content: Map::new(),
        }
    }

    /// Registry kind, or `None` for ids this build does not know.
    pub fn kind(&self) -> Option<SectionKind> {
        SectionKind::from_id(&self.id)
    }

    /// Typed view of `content`. A map that does not fit `T` decodes as
    /// `T::default()`.
    pub fn content_as<T: DeserializeOwned + Default>(&self) -> T {
        decode_map(&self.id, "content", &self.content)
    }

    pub fn settings_as<T: DeserializeOwned + Default>(&self) -> T {
        decode_map(&self.id, "settings", &self.settings)
    }
}

fn decode_map<T: DeserializeOwned + Default>(id: &str, field: &str, map: &Map<String, Value>) -> T {
    if map.is_empty() {
        return T::default();
    }
    serde_json::from_value(Value::Object(map.clone())).unwrap_or_else(|e| {
        debug!(section = id, field, error = %e, "ignoring malformed section map");
        T::default()
    })
}
