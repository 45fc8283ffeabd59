use serde_json::Value;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq)]
pub enum Binding {
    Value(Value),
    /// An imported module, by dotted import path.
    Module(String),
}

/// Names visible to an evaluated expression.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Scope {
    bindings: BTreeMap<String, Binding>,
}

impl Scope {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_value(name: &str, value: impl Into<Value>) -> Self {
        let mut scope = Self::new();
        scope.bind_value(name, value);
        scope
    }

    pub fn bind_value(&mut self, name: &str, value: impl Into<Value>) {
        self.bindings
            .insert(name.to_string(), Binding::Value(value.into()));
    }

    pub fn bind_module(&mut self, name: &str, path: impl Into<String>) {
        self.bindings
            .insert(name.to_string(), Binding::Module(path.into()));
    }

    pub fn unbind(&mut self, name: &str) -> Option<Binding> {
        self.bindings.remove(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.bindings.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&Binding> {
        self.bindings.get(name)
    }

    pub fn values(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.bindings.iter().filter_map(|(name, binding)| match binding {
            Binding::Value(value) => Some((name.as_str(), value)),
            Binding::Module(_) => None,
        })
    }

    pub fn modules(&self) -> impl Iterator<Item = (&str, &str)> {
        self.bindings.iter().filter_map(|(name, binding)| match binding {
            Binding::Module(path) => Some((name.as_str(), path.as_str())),
            Binding::Value(_) => None,
        })
    }
}
