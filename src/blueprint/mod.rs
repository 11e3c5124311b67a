// src/blueprint/mod.rs

//! Android.bp generation
//!
//! Renders the resolved module graph as Blueprint module definitions. Output
//! is deterministic: modules appear in name order and dependency lists are
//! sorted, so regenerating from the same query result yields the same file.

mod writer;

pub use writer::write_atomic;

use crate::config::ConverterConfig;
use crate::graph::{Module, ModuleClass, ModuleKind};
use crate::naming;
use crate::resolver::ModuleGraph;
use std::fmt::{self, Write};

/// First line of every generated file
pub const FILE_HEADER: &str = "/* Auto-generated from Bazel BUILD files by bazelbp. Do not edit. */\n";

/// Renders modules in Android.bp syntax
pub struct BlueprintRenderer<'a> {
    config: &'a ConverterConfig,
}

/// A whole module file, rendered through [`fmt::Display`]
pub struct Blueprint<'r, 'a> {
    renderer: &'r BlueprintRenderer<'a>,
    graph: &'r ModuleGraph,
}

impl fmt::Display for Blueprint<'_, '_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(FILE_HEADER)?;
        for module in self.graph.emittable() {
            f.write_char('\n')?;
            self.renderer.render_module(self.graph, module, f)?;
        }
        Ok(())
    }
}

impl<'a> BlueprintRenderer<'a> {
    pub fn new(config: &'a ConverterConfig) -> Self {
        Self { config }
    }

    /// The module file for `graph`, ready to format or write
    pub fn blueprint<'r>(&'r self, graph: &'r ModuleGraph) -> Blueprint<'r, 'a> {
        Blueprint {
            renderer: self,
            graph,
        }
    }

    /// Render every emittable module of the graph into one file
    pub fn render(&self, graph: &ModuleGraph) -> String {
        self.blueprint(graph).to_string()
    }

    /// Render one module block; non-emittable modules render nothing
    pub fn render_module<W: Write>(&self, graph: &ModuleGraph, module: &Module, out: &mut W) -> fmt::Result {
        let Some(path) = module.source_path.as_deref() else {
            return Ok(());
        };
        if !module.is_emittable() {
            return Ok(());
        }

        match &module.kind {
            ModuleKind::Aggregate { merged_rules, .. } => writeln!(
                out,
                "/* generated by {} from {} */",
                module.decl_site,
                merged_rules.join(", ")
            )?,
            _ => writeln!(out, "/* generated by {} */", module.decl_site)?,
        }
        writeln!(out, "{} {{", module.class())?;
        write_string(out, "name", &module.name)?;

        match &module.kind {
            ModuleKind::Aggregate { .. } => self.render_aggregate(module, path, out)?,
            ModuleKind::Defaults => {}
            _ => self.render_compiled(graph, module, path, out)?,
        }

        out.write_str("}\n")
    }

    fn render_compiled<W: Write>(&self, graph: &ModuleGraph, module: &Module, path: &str, out: &mut W) -> fmt::Result {
        write_bool(out, "vendor", true)?;
        write_bool(out, "rtti", true)?;
        write_list(out, "cppflags", &self.config.cppflags)?;
        write_list(out, "srcs", &qualified(path, module.sources()))?;

        let include_dirs = graph.folded_include_dirs(module);
        write_list(out, "local_include_dirs", &include_dirs)?;
        if module.class().is_library() {
            if let Some(dirs) = module.export_include_dirs() {
                write_list(out, "export_include_dirs", dirs)?;
            }
        }

        let deps = module.deps();
        write_list(out, "shared_libs", &deps.shared_libs)?;
        write_list(out, "whole_static_libs", &deps.static_libs)?;
        write_list(out, "defaults", &deps.defaults)
    }

    fn render_aggregate<W: Write>(&self, module: &Module, path: &str, out: &mut W) -> fmt::Result {
        write_bool(out, "vendor", true)?;
        write_list(out, "cppflags", &self.config.generated_cppflags)?;
        write_list(out, "srcs", &qualified(path, module.sources()))?;

        let deps = module.deps();
        write_list(out, "shared_libs", &deps.shared_libs)?;
        write_list(out, "whole_static_libs", &deps.static_libs)?;

        out.write_str(concat!(
            "    proto: {\n",
            "        export_proto_headers: true,\n",
            "        type: \"full\",\n",
            "        canonical_path_from_root: false,\n",
            "        local_include_dirs: [\n",
            "            \".\",\n",
            "        ],\n",
            "    },\n",
        ))
    }
}

/// Workspace-relative paths for package-relative sources
fn qualified(path: &str, sources: &[String]) -> Vec<String> {
    sources.iter().map(|s| naming::join_path(path, s)).collect()
}

fn write_string<W: Write>(out: &mut W, key: &str, value: &str) -> fmt::Result {
    writeln!(out, "    {}: \"{}\",", key, escape(value))
}

fn write_bool<W: Write>(out: &mut W, key: &str, value: bool) -> fmt::Result {
    writeln!(out, "    {}: {},", key, value)
}

/// Write a list property; empty lists are omitted
fn write_list<'s, W, I>(out: &mut W, key: &str, items: I) -> fmt::Result
where
    W: Write,
    I: IntoIterator<Item = &'s String>,
{
    let mut items = items.into_iter().peekable();
    if items.peek().is_none() {
        return Ok(());
    }
    writeln!(out, "    {}: [", key)?;
    for item in items {
        writeln!(out, "        \"{}\",", escape(item))?;
    }
    out.write_str("    ],\n")
}

fn escape(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}

/// Count emitted modules per class
pub fn emitted_classes(graph: &ModuleGraph) -> Vec<(ModuleClass, usize)> {
    let mut counts: Vec<(ModuleClass, usize)> = Vec::new();
    for module in graph.emittable() {
        match counts.iter_mut().find(|(class, _)| *class == module.class()) {
            Some((_, count)) => *count += 1,
            None => counts.push((module.class(), 1)),
        }
    }
    counts.sort();
    counts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{ModuleClassifier, ModuleRegistry};
    use crate::naming::Normalizer;
    use crate::query::{AttributeValue, RuleRecord};
    use crate::resolver;

    fn list(items: &[&str]) -> AttributeValue {
        AttributeValue::StringList(items.iter().map(|s| s.to_string()).collect())
    }

    fn build(config: &ConverterConfig, records: &[RuleRecord]) -> ModuleGraph {
        let normalizer = Normalizer::new(config);
        let classifier = ModuleClassifier::new(config, &normalizer);
        let mut registry = ModuleRegistry::with_third_party(&config.third_party).unwrap();
        for record in records {
            classifier.classify(record, &mut registry).unwrap();
        }
        resolver::resolve(registry, &normalizer).unwrap()
    }

    fn bare_config() -> ConverterConfig {
        ConverterConfig {
            baseline_deps: vec![],
            ..ConverterConfig::default()
        }
    }

    #[test]
    fn test_render_static_library() {
        let config = bare_config();
        let graph = build(
            &config,
            &[RuleRecord::new("//cyber/base:a", "cc_library", "/apollo/cyber/base/BUILD:3")
                .with_attr("srcs", list(&["//cyber/base:a.cc"]))
                .with_attr("hdrs", list(&["//cyber/base:a.h"]))
                .with_attr("deps", list(&["@uuid//:uuid"]))],
        );

        let expected = "\
/* generated by /apollo/cyber/base/BUILD:3 */
cc_library_static {
    name: \"apollo_cyber_base_a\",
    vendor: true,
    rtti: true,
    cppflags: [
        \"-fexceptions\",
        \"-Wno-non-virtual-dtor\",
    ],
    srcs: [
        \"cyber/base/a.cc\",
    ],
    export_include_dirs: [
        \"cyber/base\",
    ],
    whole_static_libs: [
        \"uuid\",
    ],
}
";
        let mut out = String::new();
        let module = graph.get("apollo_cyber_base_a").unwrap();
        BlueprintRenderer::new(&config)
            .render_module(&graph, module, &mut out)
            .unwrap();
        assert_eq!(out, expected);
    }

    #[test]
    fn test_render_aggregate() {
        let config = bare_config();
        let graph = build(
            &config,
            &[
                RuleRecord::new("//foo/bar:a_proto", "proto_library", "/apollo/foo/bar/BUILD:1")
                    .with_attr("srcs", list(&["//foo/bar:a.proto"])),
                RuleRecord::new("//foo/bar:b_proto", "proto_library", "/apollo/foo/bar/BUILD:5")
                    .with_attr("srcs", list(&["//foo/bar:b.proto"])),
            ],
        );

        let out = BlueprintRenderer::new(&config).render(&graph);
        assert!(out.starts_with(FILE_HEADER));
        assert!(out.contains(
            "/* generated by /apollo/foo/bar/BUILD:1 from //foo/bar:a_proto, //foo/bar:b_proto */\n"
        ));
        assert!(out.contains("cc_library_shared {\n    name: \"libfoo-bar\",\n"));
        assert!(out.contains("        \"foo/bar/a.proto\",\n        \"foo/bar/b.proto\",\n"));
        assert!(out.contains("        \"-DGOOGLE_PROTOBUF_NO_RTTI\",\n"));
        assert!(out.contains("    proto: {\n        export_proto_headers: true,\n"));
        assert!(!out.contains("rtti: true"));
        assert_eq!(out.matches("cc_library_shared {").count(), 1);
    }

    #[test]
    fn test_header_library_folded_not_emitted() {
        let config = bare_config();
        let graph = build(
            &config,
            &[
                RuleRecord::new("//cyber/base:macros", "cc_library", "/apollo/cyber/base/BUILD:1")
                    .with_attr("hdrs", list(&["//cyber/base:include/macros.h"])),
                RuleRecord::new("//cyber:main", "cc_binary", "/apollo/cyber/BUILD:1")
                    .with_attr("srcs", list(&["//cyber:main.cc"]))
                    .with_attr("deps", list(&["//cyber/base:macros"])),
            ],
        );

        let out = BlueprintRenderer::new(&config).render(&graph);
        assert!(!out.contains("cc_library_headers"));
        assert!(out.contains("    local_include_dirs: [\n        \"cyber/base/include\",\n    ],\n"));
        assert!(!out.contains("header_libs"));
        // Binaries do not export headers
        assert!(!out.contains("export_include_dirs"));
    }

    #[test]
    fn test_defaults_module_rendered_bare() {
        let config = bare_config();
        let graph = build(
            &config,
            &[
                RuleRecord::new("//a:phony", "cc_library", "/apollo/a/BUILD:1"),
                RuleRecord::new("//a:lib", "cc_library", "/apollo/a/BUILD:4")
                    .with_attr("srcs", list(&["//a:lib.cc"]))
                    .with_attr("deps", list(&["//a:phony"])),
            ],
        );

        let out = BlueprintRenderer::new(&config).render(&graph);
        assert!(out.contains("cc_defaults {\n    name: \"apollo_a_phony\",\n}\n"));
        assert!(out.contains("    defaults: [\n        \"apollo_a_phony\",\n    ],\n"));
    }

    #[test]
    fn test_outside_workspace_not_emitted() {
        let config = bare_config();
        let graph = build(
            &config,
            &[RuleRecord::new("//tools:gen", "cc_binary", "/tmp/tools/BUILD:1")
                .with_attr("srcs", list(&["//tools:gen.cc"]))],
        );

        assert!(graph.get("apollo_tools_gen").is_some());
        assert_eq!(BlueprintRenderer::new(&config).render(&graph), FILE_HEADER);
    }

    #[test]
    fn test_blocks_in_name_order() {
        let config = bare_config();
        let graph = build(
            &config,
            &[
                RuleRecord::new("//z:z", "cc_binary", "/apollo/z/BUILD:1")
                    .with_attr("srcs", list(&["//z:z.cc"])),
                RuleRecord::new("//a:a", "cc_binary", "/apollo/a/BUILD:1")
                    .with_attr("srcs", list(&["//a:a.cc"])),
            ],
        );

        let out = BlueprintRenderer::new(&config).render(&graph);
        let a = out.find("apollo_a_a").unwrap();
        let z = out.find("apollo_z_z").unwrap();
        assert!(a < z);
        assert_eq!(
            graph.emittable().map(|m| m.name.as_str()).collect::<Vec<_>>(),
            vec!["apollo_a_a", "apollo_z_z"]
        );
        assert_eq!(emitted_classes(&graph), vec![(ModuleClass::Binary, 2)]);

        let renderer = BlueprintRenderer::new(&config);
        assert_eq!(format!("{}", renderer.blueprint(&graph)), out);
    }

    #[test]
    fn test_escape() {
        assert_eq!(escape(r#"say "hi"\n"#), r#"say \"hi\"\\n"#);
        assert_eq!(escape("plain"), "plain");
    }
}
