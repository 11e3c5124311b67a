// src/graph/registry.rs

//! Module registry
//!
//! Maps output module names to modules. Dependency labels resolve either
//! through the alias index (raw labels of every inserted rule, third-party
//! labels, proto rules pointing at their aggregate) or by normalizing the
//! label and looking it up directly.

use super::module::{Module, ModuleClass, ModuleKind};
use crate::config::ThirdPartyLib;
use crate::error::{Error, Result};
use crate::naming::Normalizer;
use std::collections::btree_map::{self, BTreeMap};
use std::collections::HashMap;
use tracing::debug;

/// Outcome of merging one proto rule into its aggregate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeOutcome {
    /// First rule for this package; the aggregate was created
    Created,
    /// Sources were appended to an existing aggregate
    Merged,
}

/// Registry of classified modules, keyed by output name
#[derive(Debug, Default)]
pub struct ModuleRegistry {
    modules: BTreeMap<String, Module>,
    aliases: HashMap<String, String>,
}

impl ModuleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the fixed third-party table as prebuilt static libraries
    pub fn with_third_party(libs: &[ThirdPartyLib]) -> Result<Self> {
        let mut registry = Self::new();
        for lib in libs {
            let module = Module::new(
                lib.label.clone(),
                lib.name.clone(),
                ModuleClass::StaticLibrary,
                ModuleKind::Prebuilt,
            );
            registry.insert(module)?;
        }
        Ok(registry)
    }

    /// Insert a newly classified module
    ///
    /// Aggregates grow through [`Self::merge_aggregate`]; any other second
    /// insertion under the same name is an error.
    pub fn insert(&mut self, module: Module) -> Result<()> {
        match self.modules.entry(module.name.clone()) {
            btree_map::Entry::Occupied(existing) => Err(Error::DuplicateModule {
                name: existing.key().clone(),
                rule: module.raw_name,
            }),
            btree_map::Entry::Vacant(slot) => {
                self.aliases
                    .insert(module.raw_name.clone(), module.name.clone());
                slot.insert(module);
                Ok(())
            }
        }
    }

    /// Merge a proto rule's schema files into the aggregate named `key`
    ///
    /// Creates the aggregate on first use. Sources are only ever appended.
    pub fn merge_aggregate(
        &mut self,
        key: &str,
        rule_name: &str,
        decl_site: &str,
        source_path: &str,
        sources: Vec<String>,
    ) -> Result<MergeOutcome> {
        let outcome = match self.modules.entry(key.to_string()) {
            btree_map::Entry::Vacant(slot) => {
                let module = Module::new(
                    rule_name,
                    key,
                    ModuleClass::SharedLibrary,
                    ModuleKind::Aggregate {
                        generated_sources: sources,
                        merged_rules: vec![rule_name.to_string()],
                    },
                )
                .with_decl_site(decl_site, Some(source_path.to_string()));
                slot.insert(module);
                MergeOutcome::Created
            }
            btree_map::Entry::Occupied(mut slot) => match &mut slot.get_mut().kind {
                ModuleKind::Aggregate {
                    generated_sources,
                    merged_rules,
                } => {
                    generated_sources.extend(sources);
                    merged_rules.push(rule_name.to_string());
                    MergeOutcome::Merged
                }
                _ => {
                    return Err(Error::DuplicateModule {
                        name: key.to_string(),
                        rule: rule_name.to_string(),
                    });
                }
            },
        };
        self.aliases.insert(rule_name.to_string(), key.to_string());
        debug!("{:?} aggregate {} with {}", outcome, key, rule_name);
        Ok(outcome)
    }

    /// Look up a module by output name
    pub fn get(&self, name: &str) -> Option<&Module> {
        self.modules.get(name)
    }

    /// Resolve a dependency label to a module
    pub fn lookup(&self, label: &str, normalizer: &Normalizer) -> Option<&Module> {
        if let Some(name) = self.aliases.get(label) {
            return self.modules.get(name);
        }
        self.modules.get(&normalizer.normalize_name(label))
    }

    pub(crate) fn modules(&self) -> &BTreeMap<String, Module> {
        &self.modules
    }

    pub(crate) fn into_modules(self) -> BTreeMap<String, Module> {
        self.modules
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }
}
