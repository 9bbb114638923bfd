//! Named condition primitives.
//!
//! A primitive is a builder: it receives the call's arguments once, at
//! compile time, and returns the thunk evaluated for every context.

use rustc_hash::FxHashMap;

use super::builtins;
use super::compile::{Arg, Thunk};
use super::vanilla;

/// Builds the evaluator for one call site.
pub type PrimitiveBuilder = fn(Vec<Arg>) -> Thunk;

/// A registered primitive.
#[derive(Clone, Debug)]
pub struct PrimitiveInfo {
    pub name: String,
    pub builder: PrimitiveBuilder,
    /// Usage line plus description, shown by the authoring UI.
    pub doc: String,
}

/// Registry of condition primitives.
#[derive(Clone, Debug, Default)]
pub struct PrimitiveRegistry {
    primitives: FxHashMap<String, PrimitiveInfo>,
    order: Vec<String>,
}

impl PrimitiveRegistry {
    /// An empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The language built-ins (`and`, `or`, `self`, `owner`, ...).
    #[must_use]
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        builtins::register(&mut registry);
        registry
    }

    /// Built-ins plus the `vanilla.*` primitives.
    #[must_use]
    pub fn with_vanilla() -> Self {
        let mut registry = Self::with_builtins();
        vanilla::register(&mut registry);
        registry
    }

    /// Register a primitive.
    ///
    /// # Panics
    ///
    /// Panics if a primitive with the same name is already registered.
    pub fn register(&mut self, name: impl Into<String>, builder: PrimitiveBuilder, doc: impl Into<String>) {
        let name = name.into();
        assert!(
            !self.primitives.contains_key(&name),
            "condition primitive `{name}` already registered"
        );
        self.order.push(name.clone());
        self.primitives.insert(
            name.clone(),
            PrimitiveInfo {
                name,
                builder,
                doc: doc.into(),
            },
        );
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&PrimitiveInfo> {
        self.primitives.get(name)
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.primitives.contains_key(name)
    }

    /// Primitives in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &PrimitiveInfo> {
        self.order.iter().filter_map(|name| self.primitives.get(name))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}
