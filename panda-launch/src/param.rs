//! Node parameter dictionaries backed by YAML mappings.

use std::path::Path;

use serde::Serialize;
use serde_yaml::{Mapping, Value};
use tracing::warn;

use crate::Error;

/// A string-keyed parameter dictionary, as consumed by ROS 2 nodes.
///
/// Insertion order is preserved so composed bundles render the way they were
/// declared.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ParamMap(Mapping);

impl ParamMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a map from any serializable value whose YAML form is a mapping.
    pub fn from_serialize<T: Serialize>(value: &T) -> Result<Self, Error> {
        match serde_yaml::to_value(value).map_err(Error::Serialize)? {
            Value::Mapping(mapping) => Ok(Self(mapping)),
            other => Err(Error::NotParameters(yaml_type_name(&other).to_owned())),
        }
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        self.0.insert(Value::String(key.into()), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Shallow update: every key of `other` is written over `self`, so the
    /// later writer wins on collision while non-overlapping keys survive.
    pub fn merge(&mut self, other: ParamMap) -> &mut Self {
        for (key, value) in other.0 {
            self.0.insert(key, value);
        }
        self
    }

    /// Wraps the whole map under a single key: `{scope: {..self..}}`.
    pub fn scoped(self, scope: impl Into<String>) -> ParamMap {
        let mut outer = Mapping::new();
        outer.insert(Value::String(scope.into()), Value::Mapping(self.0));
        Self(outer)
    }

    pub fn into_mapping(self) -> Mapping {
        self.0
    }

    pub fn as_mapping(&self) -> &Mapping {
        &self.0
    }
}

impl From<Mapping> for ParamMap {
    fn from(mapping: Mapping) -> Self {
        Self(mapping)
    }
}

fn yaml_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Sequence(_) => "sequence",
        Value::Mapping(_) => "mapping",
        Value::Tagged(_) => "tagged value",
    }
}

/// Loads a YAML resource file as a parameter map.
///
/// A missing or unreadable file is not an error: the resource is reported
/// absent and the caller composes without it. A file that is present but not
/// a top-level mapping is an error.
pub fn load_yaml(path: &Path) -> Result<Option<ParamMap>, Error> {
    let text = match fs_err::read_to_string(path) {
        Ok(text) => text,
        Err(e) => {
            warn!("skipping parameter file {:?}: {}", path, e);
            return Ok(None);
        }
    };
    let value: Value = serde_yaml::from_str(&text)
        .map_err(|e| Error::YamlParseFailure(path.to_owned(), e))?;
    match value {
        // an empty file deserializes to null; treat it like an absent resource
        Value::Null => Ok(None),
        Value::Mapping(mapping) => Ok(Some(ParamMap(mapping))),
        _ => Err(Error::NotAMapping(path.to_owned())),
    }
}
