// src/resolver/mod.rs

//! Dependency resolution
//!
//! Runs once the whole batch of rules has been classified, because a label
//! may point at a module (typically a proto aggregate) that a later rule
//! creates. Each module's declared labels are looked up in the registry and
//! sorted into shared, static, header and defaults dependencies.
//!
//! Resolution is per-module and reads the registry without modifying it, so
//! modules are resolved in parallel. Only direct labels are examined, except
//! through header libraries, whose labels are followed once per consumer; a
//! dependency cycle therefore never causes non-termination.

mod graph;

pub use graph::{MissingDependency, ModuleGraph};

use crate::error::{Error, Result};
use crate::graph::{Module, ModuleClass, ModuleRegistry, ResolvedDeps};
use crate::naming::Normalizer;
use rayon::prelude::*;
use std::collections::HashSet;
use tracing::{debug, info, warn};

/// Resolve every module's dependency labels
///
/// Unknown labels are logged and recorded in [`ModuleGraph::missing`]; they do
/// not stop resolution. A dependency on a module that cannot be linked is an
/// internal consistency fault and aborts the run.
pub fn resolve(registry: ModuleRegistry, normalizer: &Normalizer) -> Result<ModuleGraph> {
    let results: Vec<(String, Result<(ResolvedDeps, Vec<MissingDependency>)>)> = registry
        .modules()
        .par_iter()
        .map(|(name, module)| (name.clone(), resolve_module(module, &registry, normalizer)))
        .collect();

    let mut modules = registry.into_modules();
    let mut missing = Vec::new();

    // Results are in name order, so the first fault reported is deterministic
    for (name, result) in results {
        let (deps, module_missing) = result?;
        if let Some(module) = modules.get_mut(&name) {
            module.set_deps(deps);
        }
        missing.extend(module_missing);
    }

    info!(
        "Resolved {} modules ({} missing dependencies)",
        modules.len(),
        missing.len()
    );

    Ok(ModuleGraph { modules, missing })
}

/// Resolve one module's labels against the registry
///
/// Header libraries are never emitted on their own, so their dependencies are
/// folded into the consumer: everything a header library links is linked by
/// the module that depends on it, and nested header libraries are recorded so
/// their include directories reach the consumer too.
pub fn resolve_module(
    module: &Module,
    registry: &ModuleRegistry,
    normalizer: &Normalizer,
) -> Result<(ResolvedDeps, Vec<MissingDependency>)> {
    let mut deps = ResolvedDeps::default();
    let mut missing = Vec::new();
    let mut folded = HashSet::new();

    for label in &module.dependency_names {
        let Some(dep) = registry.lookup(label, normalizer) else {
            warn!("Cannot find dependency {} of {}", label, module.raw_name);
            missing.push(MissingDependency {
                module: module.name.clone(),
                dependency: label.clone(),
            });
            continue;
        };
        categorize(module, dep, registry, normalizer, &mut deps, &mut folded)?;
    }

    Ok((deps, missing))
}

/// Add `dep` to the matching set of `deps`, folding header libraries
fn categorize<'r>(
    module: &Module,
    dep: &'r Module,
    registry: &'r ModuleRegistry,
    normalizer: &Normalizer,
    deps: &mut ResolvedDeps,
    folded: &mut HashSet<&'r str>,
) -> Result<()> {
    let set = match dep.class() {
        ModuleClass::SharedLibrary => &mut deps.shared_libs,
        ModuleClass::StaticLibrary => &mut deps.static_libs,
        ModuleClass::HeaderLibrary => &mut deps.header_libs,
        ModuleClass::Defaults => &mut deps.defaults,
        class @ ModuleClass::Binary => {
            return Err(Error::InconsistentClass {
                module: module.raw_name.clone(),
                dependency: dep.raw_name.clone(),
                class: class.as_str(),
            });
        }
    };
    set.insert(dep.name.clone());

    if dep.class() != ModuleClass::HeaderLibrary || !folded.insert(dep.name.as_str()) {
        return Ok(());
    }
    for label in &dep.dependency_names {
        // Reported when the header library itself is resolved
        let Some(inner) = registry.lookup(label, normalizer) else {
            continue;
        };
        debug!("Folding {} into {} through {}", inner.name, module.name, dep.name);
        categorize(module, inner, registry, normalizer, deps, folded)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConverterConfig;
    use crate::graph::ModuleKind;
    use std::collections::BTreeSet;

    fn module(raw: &str, name: &str, class: ModuleClass, deps: &[&str]) -> Module {
        Module::new(raw, name, class, ModuleKind::Defaults)
            .with_decl_site("/apollo/a/BUILD:1", Some("a".to_string()))
            .with_dependencies(deps.iter().map(|d| d.to_string()).collect())
    }

    fn setup() -> (ModuleRegistry, Normalizer) {
        let config = ConverterConfig::default();
        let registry = ModuleRegistry::with_third_party(&config.third_party).unwrap();
        (registry, Normalizer::new(&config))
    }

    #[test]
    fn test_dependencies_are_categorized() {
        let (mut registry, normalizer) = setup();
        registry.insert(module("//a:shared", "apollo_a_shared", ModuleClass::SharedLibrary, &[])).unwrap();
        registry.insert(module("//a:static", "apollo_a_static", ModuleClass::StaticLibrary, &[])).unwrap();
        registry.insert(module("//a:hdrs", "apollo_a_hdrs", ModuleClass::HeaderLibrary, &[])).unwrap();
        registry.insert(module("//a:phony", "apollo_a_phony", ModuleClass::Defaults, &[])).unwrap();
        registry
            .insert(module(
                "//a:bin",
                "apollo_a_bin",
                ModuleClass::Binary,
                &["//a:shared", "//a:static", "//a:hdrs", "//a:phony", "@uuid//:uuid"],
            ))
            .unwrap();

        let graph = resolve(registry, &normalizer).unwrap();
        let deps = graph.get("apollo_a_bin").unwrap().deps();

        assert_eq!(deps.shared_libs, BTreeSet::from(["apollo_a_shared".to_string()]));
        assert_eq!(
            deps.static_libs,
            BTreeSet::from(["apollo_a_static".to_string(), "uuid".to_string()])
        );
        assert_eq!(deps.header_libs, BTreeSet::from(["apollo_a_hdrs".to_string()]));
        assert_eq!(deps.defaults, BTreeSet::from(["apollo_a_phony".to_string()]));
        assert!(graph.missing().is_empty());
    }

    #[test]
    fn test_missing_dependency_is_recorded_not_fatal() {
        let (mut registry, normalizer) = setup();
        registry.insert(module("//a:lib", "apollo_a_lib", ModuleClass::StaticLibrary, &[])).unwrap();
        registry
            .insert(module(
                "//a:bin",
                "apollo_a_bin",
                ModuleClass::Binary,
                &["//a:lib", "//nowhere:lib"],
            ))
            .unwrap();

        let graph = resolve(registry, &normalizer).unwrap();
        let deps = graph.get("apollo_a_bin").unwrap().deps();

        assert_eq!(deps.static_libs, BTreeSet::from(["apollo_a_lib".to_string()]));
        assert!(deps.shared_libs.is_empty());
        assert_eq!(
            graph.missing(),
            [MissingDependency {
                module: "apollo_a_bin".to_string(),
                dependency: "//nowhere:lib".to_string(),
            }]
        );
    }

    #[test]
    fn test_binary_dependency_is_a_fault() {
        let (mut registry, normalizer) = setup();
        registry.insert(module("//a:tool", "apollo_a_tool", ModuleClass::Binary, &[])).unwrap();
        registry
            .insert(module("//a:lib", "apollo_a_lib", ModuleClass::StaticLibrary, &["//a:tool"]))
            .unwrap();

        match resolve(registry, &normalizer) {
            Err(Error::InconsistentClass {
                module, dependency, class,
            }) => {
                assert_eq!(module, "//a:lib");
                assert_eq!(dependency, "//a:tool");
                assert_eq!(class, "cc_binary");
            }
            other => panic!("expected InconsistentClass, got {:?}", other),
        }
    }

    #[test]
    fn test_cycles_and_self_dependencies_terminate() {
        let (mut registry, normalizer) = setup();
        registry
            .insert(module("//a:x", "apollo_a_x", ModuleClass::SharedLibrary, &["//a:y", "//a:x"]))
            .unwrap();
        registry
            .insert(module("//a:y", "apollo_a_y", ModuleClass::SharedLibrary, &["//a:x"]))
            .unwrap();

        let graph = resolve(registry, &normalizer).unwrap();
        assert_eq!(
            graph.get("apollo_a_x").unwrap().deps().shared_libs,
            BTreeSet::from(["apollo_a_x".to_string(), "apollo_a_y".to_string()])
        );
        assert_eq!(
            graph.get("apollo_a_y").unwrap().deps().shared_libs,
            BTreeSet::from(["apollo_a_x".to_string()])
        );
    }

    #[test]
    fn test_duplicate_labels_deduplicate() {
        let (mut registry, normalizer) = setup();
        registry
            .insert(module(
                "//a:bin",
                "apollo_a_bin",
                ModuleClass::Binary,
                &["@com_github_google_glog//:glog", "glog", "@com_github_google_glog//:glog"],
            ))
            .unwrap();

        let graph = resolve(registry, &normalizer).unwrap();
        assert_eq!(
            graph.get("apollo_a_bin").unwrap().deps().static_libs,
            BTreeSet::from(["glog".to_string()])
        );
    }

    #[test]
    fn test_header_library_deps_fold_into_consumer() {
        let (mut registry, normalizer) = setup();
        registry
            .insert(module("//a:impl", "apollo_a_impl", ModuleClass::StaticLibrary, &[]))
            .unwrap();
        registry
            .insert(module("//a:rt", "apollo_a_rt", ModuleClass::SharedLibrary, &[]))
            .unwrap();
        registry
            .insert(module("//c:more_hdrs", "apollo_c_more_hdrs", ModuleClass::HeaderLibrary, &["//a:rt"]))
            .unwrap();
        registry
            .insert(module(
                "//b:hdrs",
                "apollo_b_hdrs",
                ModuleClass::HeaderLibrary,
                &["//a:impl", "//c:more_hdrs", "//gone:lib"],
            ))
            .unwrap();
        registry
            .insert(module("//app:main", "apollo_app_main", ModuleClass::Binary, &["//b:hdrs"]))
            .unwrap();

        let graph = resolve(registry, &normalizer).unwrap();
        let deps = graph.get("apollo_app_main").unwrap().deps();

        assert_eq!(deps.static_libs, BTreeSet::from(["apollo_a_impl".to_string()]));
        assert_eq!(deps.shared_libs, BTreeSet::from(["apollo_a_rt".to_string()]));
        assert_eq!(
            deps.header_libs,
            BTreeSet::from(["apollo_b_hdrs".to_string(), "apollo_c_more_hdrs".to_string()])
        );
        // The header library's own unknown label is reported once, against it
        assert_eq!(graph.missing().len(), 1);
        assert_eq!(graph.missing()[0].module, "apollo_b_hdrs");
    }

    #[test]
    fn test_header_library_cycle_terminates() {
        let (mut registry, normalizer) = setup();
        registry
            .insert(module("//a:x", "apollo_a_x", ModuleClass::HeaderLibrary, &["//a:y", "//a:x"]))
            .unwrap();
        registry
            .insert(module("//a:y", "apollo_a_y", ModuleClass::HeaderLibrary, &["//a:x", "@uuid//:uuid"]))
            .unwrap();
        registry
            .insert(module("//a:bin", "apollo_a_bin", ModuleClass::Binary, &["//a:x"]))
            .unwrap();

        let graph = resolve(registry, &normalizer).unwrap();
        let deps = graph.get("apollo_a_bin").unwrap().deps();
        assert_eq!(
            deps.header_libs,
            BTreeSet::from(["apollo_a_x".to_string(), "apollo_a_y".to_string()])
        );
        assert_eq!(deps.static_libs, BTreeSet::from(["uuid".to_string()]));
    }

    #[test]
    fn test_binary_behind_header_library_is_a_fault() {
        let (mut registry, normalizer) = setup();
        registry.insert(module("//a:tool", "apollo_a_tool", ModuleClass::Binary, &[])).unwrap();
        registry
            .insert(module("//a:hdrs", "apollo_a_hdrs", ModuleClass::HeaderLibrary, &["//a:tool"]))
            .unwrap();

        assert!(matches!(
            resolve(registry, &normalizer),
            Err(Error::InconsistentClass { .. })
        ));
    }

    #[test]
    fn test_folded_include_dirs() {
        let (mut registry, normalizer) = setup();
        let headers = Module::new(
            "//a:hdrs",
            "apollo_a_hdrs",
            ModuleClass::HeaderLibrary,
            ModuleKind::HeaderOnly {
                export_include_dirs: BTreeSet::from(["a/include".to_string()]),
            },
        );
        registry.insert(headers).unwrap();
        registry
            .insert(module("//a:lib", "apollo_a_lib", ModuleClass::StaticLibrary, &["//a:hdrs"]))
            .unwrap();

        let graph = resolve(registry, &normalizer).unwrap();
        let lib = graph.get("apollo_a_lib").unwrap();
        assert_eq!(
            graph.folded_include_dirs(lib),
            BTreeSet::from(["a/include".to_string()])
        );
    }
}
