//! Variable bindings of one evaluation run.

use std::collections::HashMap;

use serde::ser::SerializeMap;

use super::value::Value;

/// Ordered name to value mapping. New names are appended, reassignment
/// overwrites in place, iteration follows binding order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Context {
    bindings: Vec<(String, Value)>,
    index: HashMap<String, usize>,
}

impl Context {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_variable(&self, name: &str) -> Option<&Value> {
        self.index.get(name).map(|&i| &self.bindings[i].1)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Bind a new name. Returns false, leaving the context untouched, if the
    /// name is already bound.
    pub fn declare(&mut self, name: &str, value: Value) -> bool {
        if self.contains(name) {
            return false;
        }
        self.index.insert(name.to_string(), self.bindings.len());
        self.bindings.push((name.to_string(), value));
        true
    }

    /// Overwrite an existing binding. Returns false if the name is unbound.
    pub fn set_variable(&mut self, name: &str, value: Value) -> bool {
        match self.index.get(name) {
            Some(&i) => {
                self.bindings[i].1 = value;
                true
            }
            None => false,
        }
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.bindings.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.bindings.iter().map(|(k, _)| k.as_str())
    }
}

impl serde::Serialize for Context {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.bindings.len()))?;
        for (name, value) in &self.bindings {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}
