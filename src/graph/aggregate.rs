// src/graph/aggregate.rs

//! Proto aggregation
//!
//! Every `proto_library` / `cc_proto_library` rule of a package compiles into
//! one shared library named after the package directory. The rules themselves
//! never become registry entries; their labels alias the aggregate so
//! dependents link against it.

use super::registry::{MergeOutcome, ModuleRegistry};
use crate::config::ConverterConfig;
use crate::error::Result;
use crate::naming::{self, Normalizer};
use crate::query::{AttrSpec, RuleRecord};
use tracing::warn;

const SRCS: AttrSpec<Vec<String>> = AttrSpec::new("srcs", Vec::new());

/// Rule kinds merged into aggregates
pub const PROTO_RULE_KINDS: &[&str] = &["proto_library", "cc_proto_library"];

/// Merges proto rules into per-package aggregate modules
pub struct ProtoAggregator<'a> {
    config: &'a ConverterConfig,
    normalizer: &'a Normalizer,
}

impl<'a> ProtoAggregator<'a> {
    pub fn new(config: &'a ConverterConfig, normalizer: &'a Normalizer) -> Self {
        Self { config, normalizer }
    }

    /// Aggregate key for a package directory
    pub fn aggregate_key(source_path: &str) -> String {
        naming::aggregate_name(source_path)
    }

    /// Merge one proto rule into its package's aggregate
    ///
    /// Returns `None` for rules declared outside the tracked tree, which have
    /// no package directory to derive a key from.
    pub fn merge(
        &self,
        record: &RuleRecord,
        registry: &mut ModuleRegistry,
    ) -> Result<Option<(String, MergeOutcome)>> {
        let Some(source_path) = self.normalizer.normalize_location(&record.decl_site) else {
            warn!(
                "Skipping {} {}: declared outside the workspace ({})",
                record.kind, record.name, record.decl_site
            );
            return Ok(None);
        };

        let sources = self.generated_sources(&record.attr(&SRCS)?);
        let key = Self::aggregate_key(&source_path);
        let outcome =
            registry.merge_aggregate(&key, &record.name, &record.decl_site, &source_path, sources)?;
        Ok(Some((key, outcome)))
    }

    /// Keep the schema files among a rule's sources, package-relative
    fn generated_sources(&self, srcs: &[String]) -> Vec<String> {
        srcs.iter()
            .map(|label| naming::source_file(label))
            .filter(|file| {
                self.config
                    .generated_extensions
                    .iter()
                    .any(|ext| file.ends_with(ext.as_str()))
            })
            .map(str::to_string)
            .collect()
    }
}
