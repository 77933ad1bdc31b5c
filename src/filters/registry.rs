//! Filter registry for looking up filter types by ID.

use crate::core::node::{Category, FilterNode, NodeMetadata};
use indexmap::IndexMap;
use std::sync::Arc;

/// Factory function for creating filter instances.
pub type FilterFactory = Arc<dyn Fn() -> Box<dyn FilterNode> + Send + Sync>;

/// Registry entry containing metadata and factory.
#[derive(Clone)]
pub struct RegistryEntry {
    /// Factory function to create instances.
    pub factory: FilterFactory,
    /// Cached metadata (avoids creating instance just to get metadata).
    pub metadata: NodeMetadata,
}

/// Registry for all available filter types.
///
/// Filters keep their registration order, which is also the order `list`
/// prints them in.
pub struct FilterRegistry {
    filters: IndexMap<String, RegistryEntry>,
}

impl FilterRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self {
            filters: IndexMap::new(),
        }
    }

    /// Create a registry pre-populated with built-in filters.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        crate::filters::builtin::register_all(&mut registry);
        registry
    }

    /// Register a filter type. A filter with the same ID is replaced.
    pub fn register<F>(&mut self, factory: F)
    where
        F: Fn() -> Box<dyn FilterNode> + Send + Sync + 'static,
    {
        let metadata = factory().metadata();
        let id = metadata.id.clone();

        self.unregister(&id);
        self.filters.insert(
            id,
            RegistryEntry {
                factory: Arc::new(factory),
                metadata,
            },
        );
    }

    /// Create a new instance of a filter by ID.
    pub fn create(&self, id: &str) -> Option<Box<dyn FilterNode>> {
        self.filters.get(id).map(|e| (e.factory)())
    }

    /// Get metadata for a filter without creating an instance.
    pub fn get_metadata(&self, id: &str) -> Option<&NodeMetadata> {
        self.filters.get(id).map(|e| &e.metadata)
    }

    /// Check if a filter is registered.
    pub fn contains(&self, id: &str) -> bool {
        self.filters.contains_key(id)
    }

    /// Unregister a filter.
    pub fn unregister(&mut self, id: &str) -> bool {
        self.filters.shift_remove(id).is_some()
    }

    /// Get the total number of registered filters.
    pub fn len(&self) -> usize {
        self.filters.len()
    }

    /// Check if registry is empty.
    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    /// Metadata grouped by category, in registration order.
    pub fn grouped_by_category(&self) -> IndexMap<Category, Vec<&NodeMetadata>> {
        let mut grouped: IndexMap<Category, Vec<&NodeMetadata>> = IndexMap::new();
        for entry in self.filters.values() {
            grouped.entry(entry.metadata.category).or_default().push(&entry.metadata);
        }
        grouped
    }

    /// Metadata of every filter as a pretty-printed JSON array, for front ends
    /// that build their own trackbars.
    pub fn to_json(&self) -> serde_json::Result<String> {
        let all: Vec<&NodeMetadata> = self.filters.values().map(|e| &e.metadata).collect();
        serde_json::to_string_pretty(&all)
    }
}

impl Default for FilterRegistry {
    fn default() -> Self {
        Self::with_builtins()
    }
}
