// src/resolver/graph.rs

//! Resolved module graph

use crate::graph::{Module, ModuleClass};
use std::collections::{BTreeMap, BTreeSet};

/// A dependency label that matched no module
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct MissingDependency {
    /// Output name of the module declaring the dependency
    pub module: String,
    /// Label as declared
    pub dependency: String,
}

/// Modules with their categorized dependencies filled in
#[derive(Debug, Default)]
pub struct ModuleGraph {
    pub(crate) modules: BTreeMap<String, Module>,
    pub(crate) missing: Vec<MissingDependency>,
}

impl ModuleGraph {
    pub fn get(&self, name: &str) -> Option<&Module> {
        self.modules.get(name)
    }

    /// All modules in name order
    pub fn modules(&self) -> impl Iterator<Item = &Module> {
        self.modules.values()
    }

    /// Modules that belong in the output file, in name order
    pub fn emittable(&self) -> impl Iterator<Item = &Module> {
        self.modules.values().filter(|m| m.is_emittable())
    }

    /// Dependencies that were dropped during resolution
    pub fn missing(&self) -> &[MissingDependency] {
        &self.missing
    }

    /// Include directories a module picks up from its header-library deps
    ///
    /// Nested header libraries were folded into `header_libs` during
    /// resolution, so their directories are included.
    pub fn folded_include_dirs(&self, module: &Module) -> BTreeSet<String> {
        module
            .deps()
            .header_libs
            .iter()
            .filter_map(|name| self.modules.get(name))
            .filter(|dep| dep.class() == ModuleClass::HeaderLibrary)
            .filter_map(|dep| dep.export_include_dirs())
            .flatten()
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }
}
