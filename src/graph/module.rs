// src/graph/module.rs

//! Module data model

use std::collections::BTreeSet;
use std::fmt;

/// Output module category
///
/// The classifier picks the class once; nothing after classification
/// changes it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ModuleClass {
    /// Executable
    Binary,
    /// Shared library (`.so`)
    SharedLibrary,
    /// Static archive
    StaticLibrary,
    /// Headers only, folded into consumers' include paths
    HeaderLibrary,
    /// Phony module with nothing to build
    Defaults,
}

impl ModuleClass {
    /// Module type keyword in Android.bp
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Binary => "cc_binary",
            Self::SharedLibrary => "cc_library_shared",
            Self::StaticLibrary => "cc_library_static",
            Self::HeaderLibrary => "cc_library_headers",
            Self::Defaults => "cc_defaults",
        }
    }

    /// Does this class produce object code that links the baseline libraries?
    pub fn is_compiled(&self) -> bool {
        matches!(self, Self::Binary | Self::SharedLibrary | Self::StaticLibrary)
    }

    /// Is this a library other modules can export headers from?
    pub fn is_library(&self) -> bool {
        matches!(self, Self::SharedLibrary | Self::StaticLibrary)
    }
}

impl fmt::Display for ModuleClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Variant-specific module contents
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModuleKind {
    /// Hand-written C/C++ code
    Compiled {
        /// Package-relative compiled sources, in declaration order
        sources: Vec<String>,
        /// Workspace-relative directories holding the declared headers
        export_include_dirs: BTreeSet<String>,
    },
    /// Header-only library
    HeaderOnly {
        export_include_dirs: BTreeSet<String>,
    },
    /// Nothing to build; referenced through `defaults`
    Defaults,
    /// Generated code merged from every proto rule of one package
    Aggregate {
        /// Package-relative schema files accumulated across merges
        generated_sources: Vec<String>,
        /// Raw names of the rules merged into this module
        merged_rules: Vec<String>,
    },
    /// Library from the fixed third-party table
    Prebuilt,
}

/// Categorized dependencies, filled in by the resolver
///
/// Entries are normalized module names; the sets keep output order stable.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedDeps {
    pub shared_libs: BTreeSet<String>,
    pub static_libs: BTreeSet<String>,
    pub header_libs: BTreeSet<String>,
    pub defaults: BTreeSet<String>,
}

impl ResolvedDeps {
    pub fn is_empty(&self) -> bool {
        self.shared_libs.is_empty()
            && self.static_libs.is_empty()
            && self.header_libs.is_empty()
            && self.defaults.is_empty()
    }
}

/// One output build unit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Module {
    /// Label of the (first) rule this module came from
    pub raw_name: String,
    /// Output module name; unique within the registry
    pub name: String,
    /// Declaration site of the (first) rule, kept for provenance
    pub decl_site: String,
    /// Workspace-relative package directory, `None` outside the tracked tree
    pub source_path: Option<String>,
    /// Declared dependency labels, baseline libraries included
    pub dependency_names: Vec<String>,
    pub kind: ModuleKind,
    class: ModuleClass,
    deps: ResolvedDeps,
}

impl Module {
    pub fn new(
        raw_name: impl Into<String>,
        name: impl Into<String>,
        class: ModuleClass,
        kind: ModuleKind,
    ) -> Self {
        Self {
            raw_name: raw_name.into(),
            name: name.into(),
            decl_site: String::new(),
            source_path: None,
            dependency_names: Vec::new(),
            kind,
            class,
            deps: ResolvedDeps::default(),
        }
    }

    pub fn with_decl_site(mut self, decl_site: impl Into<String>, source_path: Option<String>) -> Self {
        self.decl_site = decl_site.into();
        self.source_path = source_path;
        self
    }

    pub fn with_dependencies(mut self, dependency_names: Vec<String>) -> Self {
        self.dependency_names = dependency_names;
        self
    }

    pub fn class(&self) -> ModuleClass {
        self.class
    }

    /// Categorized dependencies; empty until resolution has run
    pub fn deps(&self) -> &ResolvedDeps {
        &self.deps
    }

    pub(crate) fn set_deps(&mut self, deps: ResolvedDeps) {
        debug_assert!(self.deps.is_empty(), "dependencies of {} resolved twice", self.name);
        self.deps = deps;
    }

    /// Sources to compile, relative to `source_path`
    pub fn sources(&self) -> &[String] {
        match &self.kind {
            ModuleKind::Compiled { sources, .. } => sources,
            ModuleKind::Aggregate {
                generated_sources, ..
            } => generated_sources,
            _ => &[],
        }
    }

    /// Header directories this module exposes to its consumers
    pub fn export_include_dirs(&self) -> Option<&BTreeSet<String>> {
        match &self.kind {
            ModuleKind::Compiled {
                export_include_dirs,
                ..
            }
            | ModuleKind::HeaderOnly {
                export_include_dirs,
            } => Some(export_include_dirs),
            _ => None,
        }
    }

    /// Can this module be written to the output file?
    ///
    /// Modules declared outside the tracked tree are kept for resolution only,
    /// and header libraries are folded into their consumers.
    pub fn is_emittable(&self) -> bool {
        self.source_path.is_some()
            && self.class != ModuleClass::HeaderLibrary
            && !matches!(self.kind, ModuleKind::Prebuilt)
    }
}
