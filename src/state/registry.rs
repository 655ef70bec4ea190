//! Type-name → constructor lookup for the generic deserializer.

use std::sync::Arc;

use hashbrown::HashMap;
use parking_lot::RwLock;

use super::AttributeState;
use crate::{Error, Result};

/// Builds a default-constructed instance of one record type.
pub type StateConstructor = fn() -> Box<dyn AttributeState>;

/// Registry of record constructors keyed by `type_name()`.
///
/// Cheap to clone; clones share the same table.
#[derive(Clone, Default)]
pub struct StateRegistry {
    inner: Arc<RwLock<HashMap<String, StateConstructor>>>,
}

impl StateRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `ctor` under `type_name`, replacing any earlier entry.
    pub fn register(&self, type_name: impl Into<String>, ctor: StateConstructor) {
        let type_name = type_name.into();
        tracing::debug!(type_name = %type_name, "registering attribute state type");
        self.inner.write().insert(type_name, ctor);
    }

    pub fn contains(&self, type_name: &str) -> bool {
        self.inner.read().contains_key(type_name)
    }

    /// Build a default instance of the named type.
    pub fn create(&self, type_name: &str) -> Result<Box<dyn AttributeState>> {
        let ctor = self
            .inner
            .read()
            .get(type_name)
            .copied()
            .ok_or_else(|| Error::UnknownType(type_name.to_owned()))?;
        Ok(ctor())
    }

    /// Registered type names, sorted.
    pub fn type_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.inner.read().keys().cloned().collect();
        names.sort();
        names
    }
}

impl std::fmt::Debug for StateRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StateRegistry")
            .field("types", &self.type_names())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_type() {
        let registry = StateRegistry::new();
        let err = registry.create("PlotList").unwrap_err();
        assert!(matches!(err, Error::UnknownType(ref name) if name == "PlotList"));
    }
}
