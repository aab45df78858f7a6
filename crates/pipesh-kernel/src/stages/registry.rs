//! Stage registry: name → factory lookup.

use std::collections::HashMap;
use std::sync::Arc;

use crate::error::{ChainError, ChainResult};
use crate::parser::StageSpec;

use super::traits::{BuildContext, StageBody, StageFactory, StageSchema};

/// Registry of stage factories by name.
#[derive(Default, Clone)]
pub struct StageRegistry {
    factories: HashMap<String, Arc<dyn StageFactory>>,
}

impl StageRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a factory under its own name, replacing any previous one.
    pub fn register(&mut self, factory: impl StageFactory + 'static) {
        self.factories
            .insert(factory.name().to_string(), Arc::new(factory));
    }

    /// Look up a factory by name.
    pub fn get(&self, name: &str) -> Option<Arc<dyn StageFactory>> {
        self.factories.get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.factories.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Schemas of every registered stage, sorted by name.
    pub fn schemas(&self) -> Vec<StageSchema> {
        let mut schemas: Vec<StageSchema> = self.factories.values().map(|f| f.schema()).collect();
        schemas.sort_by(|a, b| a.name.cmp(&b.name));
        schemas
    }

    /// Build one stage from its parsed specification.
    pub fn build(&self, spec: &StageSpec, ctx: &BuildContext) -> ChainResult<StageBody> {
        let factory = self
            .get(&spec.name)
            .ok_or_else(|| ChainError::CommandNotFound(spec.display()))?;
        factory.build(&spec.args, ctx)
    }
}

impl std::fmt::Debug for StageRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StageRegistry")
            .field("stages", &self.names())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stages::register_builtins;

    #[test]
    fn test_builtins_registered() {
        let mut registry = StageRegistry::new();
        register_builtins(&mut registry);
        for name in ["echo", "cat", "grep", "uniq", "uppercase", "wc"] {
            assert!(registry.contains(name), "missing {}", name);
        }
    }

    #[test]
    fn test_unknown_stage() {
        let registry = StageRegistry::new();
        let err = registry
            .build(&StageSpec::new("frobnicate", vec!["x".into()]), &BuildContext::new("/"))
            .unwrap_err();
        assert_eq!(err, ChainError::CommandNotFound("frobnicate x".into()));
    }

    #[test]
    fn test_names_sorted() {
        let mut registry = StageRegistry::new();
        register_builtins(&mut registry);
        let names = registry.names();
        let mut sorted = names.clone();
        sorted.sort_unstable();
        assert_eq!(names, sorted);
    }
}
