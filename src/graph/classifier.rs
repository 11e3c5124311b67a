// src/graph/classifier.rs

//! Rule-to-module classification
//!
//! Decides which Android.bp module type a Bazel rule becomes. The decision is
//! made once per rule from its declared attributes:
//!
//! | rule           | condition                                   | module class        |
//! |----------------|---------------------------------------------|---------------------|
//! | `cc_binary`    | `linkshared`                                | shared library      |
//! | `cc_binary`    | otherwise                                   | binary              |
//! | `cc_library`   | no compiled sources, has headers            | header library      |
//! | `cc_library`   | no compiled sources, no headers, no deps    | defaults            |
//! | `cc_library`   | `linkshared` or not `linkstatic`            | shared library      |
//! | `cc_library`   | otherwise                                   | static library      |
//! | proto rules    | always                                      | aggregate (shared)  |

use super::aggregate::{PROTO_RULE_KINDS, ProtoAggregator};
use super::module::{Module, ModuleClass, ModuleKind};
use super::registry::{MergeOutcome, ModuleRegistry};
use crate::config::ConverterConfig;
use crate::error::{Error, Result};
use crate::naming::{self, Normalizer};
use crate::query::{AttrSpec, RuleRecord};
use std::collections::BTreeSet;
use tracing::debug;

const SRCS: AttrSpec<Vec<String>> = AttrSpec::new("srcs", Vec::new());
const HDRS: AttrSpec<Vec<String>> = AttrSpec::new("hdrs", Vec::new());
const DEPS: AttrSpec<Vec<String>> = AttrSpec::new("deps", Vec::new());
const LINKSHARED: AttrSpec<bool> = AttrSpec::new("linkshared", false);
const LINKSTATIC: AttrSpec<bool> = AttrSpec::new("linkstatic", true);

/// Attributes Android.bp generation cannot carry over yet; a non-empty value
/// stops the run
const UNSUPPORTED: &[AttrSpec<Vec<String>>] = &[
    AttrSpec::new("defines", Vec::new()),
    AttrSpec::new("local_defines", Vec::new()),
];

/// C/C++ rule kinds
pub const CC_RULE_KINDS: &[&str] = &["cc_binary", "cc_library"];

/// What classification did with one rule
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
    /// A new module was inserted under this name
    Module(String),
    /// The rule was merged into the named aggregate
    Aggregate(String, MergeOutcome),
    /// The rule produces no module
    Ignored,
}

/// Turns rule records into registry modules
pub struct ModuleClassifier<'a> {
    config: &'a ConverterConfig,
    normalizer: &'a Normalizer,
}

impl<'a> ModuleClassifier<'a> {
    pub fn new(config: &'a ConverterConfig, normalizer: &'a Normalizer) -> Self {
        Self { config, normalizer }
    }

    /// Classify one record and insert the result into the registry
    pub fn classify(
        &self,
        record: &RuleRecord,
        registry: &mut ModuleRegistry,
    ) -> Result<Classification> {
        // External repositories are covered by the third-party table
        if record.name.starts_with('@') {
            debug!("Ignoring external rule {}", record.name);
            return Ok(Classification::Ignored);
        }

        let kind = record.kind.as_str();
        if PROTO_RULE_KINDS.contains(&kind) {
            let aggregator = ProtoAggregator::new(self.config, self.normalizer);
            return Ok(match aggregator.merge(record, registry)? {
                Some((key, outcome)) => Classification::Aggregate(key, outcome),
                None => Classification::Ignored,
            });
        }
        if !CC_RULE_KINDS.contains(&kind) {
            return Ok(Classification::Ignored);
        }

        let module = self.cc_module(record)?;
        let name = module.name.clone();
        debug!(
            "Classified {} ({}) as {} {}",
            record.name,
            record.kind,
            module.class(),
            name
        );
        registry.insert(module)?;
        Ok(Classification::Module(name))
    }

    /// Build the module for a `cc_binary` or `cc_library` rule
    pub fn cc_module(&self, record: &RuleRecord) -> Result<Module> {
        for spec in UNSUPPORTED {
            let values = record.attr(spec)?;
            if !values.is_empty() {
                return Err(Error::UnsupportedAttribute {
                    module: record.name.clone(),
                    attribute: spec.name.to_string(),
                    value: values.join(" "),
                });
            }
        }

        let srcs = record.attr(&SRCS)?;
        let hdrs = record.attr(&HDRS)?;
        let deps = record.attr(&DEPS)?;
        let linkshared = record.attr(&LINKSHARED)?;
        let linkstatic = record.attr(&LINKSTATIC)?;

        let sources = self.compiled_sources(&srcs);
        let class = match record.kind.as_str() {
            "cc_binary" if linkshared => ModuleClass::SharedLibrary,
            "cc_binary" => ModuleClass::Binary,
            _ if sources.is_empty() && !hdrs.is_empty() => ModuleClass::HeaderLibrary,
            _ if sources.is_empty() && deps.is_empty() => ModuleClass::Defaults,
            _ if linkshared || !linkstatic => ModuleClass::SharedLibrary,
            _ => ModuleClass::StaticLibrary,
        };

        let source_path = self.normalizer.normalize_location(&record.decl_site);
        let export_include_dirs = source_path
            .as_deref()
            .map(|path| export_dirs(path, &hdrs))
            .unwrap_or_default();

        let kind = match class {
            ModuleClass::HeaderLibrary => ModuleKind::HeaderOnly {
                export_include_dirs,
            },
            ModuleClass::Defaults => ModuleKind::Defaults,
            _ => ModuleKind::Compiled {
                sources,
                export_include_dirs,
            },
        };

        let mut dependency_names = deps;
        if class.is_compiled() {
            dependency_names.extend(self.config.baseline_deps.iter().cloned());
        }

        Ok(Module::new(
            record.name.clone(),
            self.normalizer.normalize_name(&record.name),
            class,
            kind,
        )
        .with_decl_site(record.decl_site.clone(), source_path)
        .with_dependencies(dependency_names))
    }

    /// Keep the compiled sources among a rule's `srcs`, package-relative
    fn compiled_sources(&self, srcs: &[String]) -> Vec<String> {
        srcs.iter()
            .map(|label| naming::source_file(label))
            .filter(|file| {
                self.config
                    .compiled_extensions
                    .iter()
                    .any(|ext| file.ends_with(ext.as_str()))
            })
            .map(str::to_string)
            .collect()
    }
}

/// Directories containing the declared headers, relative to the workspace
fn export_dirs(source_path: &str, hdrs: &[String]) -> BTreeSet<String> {
    hdrs.iter()
        .filter_map(|hdr| naming::workspace_path(hdr, source_path))
        .filter_map(|file| naming::parent_dir(&file).map(str::to_string))
        .collect()
}
