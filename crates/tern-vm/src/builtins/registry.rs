//! Builtin library registry
//!
//! Maps library names to zero-argument factories. The compiler reserves one
//! global slot per registered name (in registration order); the VM calls each
//! factory before running a module and stores the product in that slot.

use std::collections::HashMap;
use tern_types::Value;

/// Produces the value bound to a builtin name
pub type BuiltinFactory = Box<dyn Fn() -> Value>;

struct BuiltinEntry {
    name: String,
    factory: BuiltinFactory,
}

/// Registry of builtin libraries
#[derive(Default)]
pub struct BuiltinRegistry {
    /// Name to index mapping
    name_to_id: HashMap<String, usize>,
    /// Entries in registration order
    entries: Vec<BuiltinEntry>,
}

impl BuiltinRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a factory under `name`. Registering an existing name replaces
    /// its factory and keeps its slot.
    pub fn register<F>(&mut self, name: &str, factory: F) -> usize
    where
        F: Fn() -> Value + 'static,
    {
        if let Some(&id) = self.name_to_id.get(name) {
            self.entries[id].factory = Box::new(factory);
            return id;
        }

        let id = self.entries.len();
        self.name_to_id.insert(name.to_string(), id);
        self.entries.push(BuiltinEntry {
            name: name.to_string(),
            factory: Box::new(factory),
        });
        id
    }

    /// Builtin names in slot order
    pub fn names(&self) -> Vec<String> {
        self.entries.iter().map(|e| e.name.clone()).collect()
    }

    #[inline]
    pub fn get_id(&self, name: &str) -> Option<usize> {
        self.name_to_id.get(name).copied()
    }

    /// Run the factory registered under `name`
    pub fn make(&self, name: &str) -> Option<Value> {
        self.get_id(name).map(|id| (self.entries[id].factory)())
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
