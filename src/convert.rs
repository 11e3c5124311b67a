// src/convert.rs

//! Conversion pipeline
//!
//! Classification of the whole batch completes before resolution starts for
//! any module; resolution then reads a registry nothing inserts into anymore.

use crate::blueprint::{self, BlueprintRenderer};
use crate::config::ConverterConfig;
use crate::error::Result;
use crate::graph::{Classification, MergeOutcome, ModuleClass, ModuleClassifier, ModuleRegistry};
use crate::naming::Normalizer;
use crate::query::RuleRecord;
use crate::resolver::{self, MissingDependency, ModuleGraph};
use std::fmt;
use tracing::info;

/// What happened during one conversion
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConversionReport {
    /// Rule records received
    pub records: usize,
    /// Records that produced no module
    pub ignored: usize,
    /// Modules created from C/C++ rules
    pub modules: usize,
    /// Proto aggregates created
    pub aggregates: usize,
    /// Proto rules merged into an existing aggregate
    pub merges: usize,
    /// Dependencies dropped because nothing defines them
    pub missing: Vec<MissingDependency>,
    /// Emitted modules per class
    pub emitted: Vec<(ModuleClass, usize)>,
}

impl ConversionReport {
    pub fn emitted_total(&self) -> usize {
        self.emitted.iter().map(|(_, count)| count).sum()
    }
}

impl fmt::Display for ConversionReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Converted {} rules ({} ignored) into {} modules and {} proto aggregates ({} merged rules)",
            self.records, self.ignored, self.modules, self.aggregates, self.merges
        )?;
        for (class, count) in &self.emitted {
            writeln!(f, "  {}: {}", class, count)?;
        }
        if !self.missing.is_empty() {
            writeln!(f, "Missing dependencies: {}", self.missing.len())?;
            for missing in &self.missing {
                writeln!(f, "  {} -> {}", missing.module, missing.dependency)?;
            }
        }
        Ok(())
    }
}

/// Result of a conversion run
#[derive(Debug)]
pub struct Conversion {
    pub graph: ModuleGraph,
    /// Rendered Android.bp contents
    pub blueprint: String,
    pub report: ConversionReport,
}

/// Runs classify, resolve and render over a batch of rule records
pub struct Converter {
    config: ConverterConfig,
    normalizer: Normalizer,
}

impl Converter {
    pub fn new(config: ConverterConfig) -> Result<Self> {
        config.validate()?;
        let normalizer = Normalizer::new(&config);
        Ok(Self { config, normalizer })
    }

    pub fn config(&self) -> &ConverterConfig {
        &self.config
    }

    /// Classification phase: build the registry from every record
    pub fn classify_all(&self, records: &[RuleRecord]) -> Result<(ModuleRegistry, ConversionReport)> {
        let classifier = ModuleClassifier::new(&self.config, &self.normalizer);
        let mut registry = ModuleRegistry::with_third_party(&self.config.third_party)?;
        let mut report = ConversionReport {
            records: records.len(),
            ..ConversionReport::default()
        };

        for record in records {
            match classifier.classify(record, &mut registry)? {
                Classification::Module(_) => report.modules += 1,
                Classification::Aggregate(_, MergeOutcome::Created) => report.aggregates += 1,
                Classification::Aggregate(_, MergeOutcome::Merged) => report.merges += 1,
                Classification::Ignored => report.ignored += 1,
            }
        }

        info!(
            "Classified {} records into {} registry entries",
            records.len(),
            registry.len()
        );
        Ok((registry, report))
    }

    /// Run the whole pipeline
    pub fn convert(&self, records: &[RuleRecord]) -> Result<Conversion> {
        let (registry, mut report) = self.classify_all(records)?;
        let graph = resolver::resolve(registry, &self.normalizer)?;
        let blueprint = BlueprintRenderer::new(&self.config).render(&graph);

        report.missing = graph.missing().to_vec();
        report.emitted = blueprint::emitted_classes(&graph);

        Ok(Conversion {
            graph,
            blueprint,
            report,
        })
    }
}
