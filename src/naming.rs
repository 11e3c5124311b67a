// src/naming.rs

//! Name and location normalization
//!
//! Bazel identifies rules by labels (`//pkg/path:target`, `@repo//pkg:target`)
//! and declaration sites (`/workspace/pkg/path/BUILD:12:1`). The output format
//! wants flat module names and workspace-relative directories. Every function
//! here is pure and idempotent: feeding a normalized value back in returns it
//! unchanged, so callers never need to track whether a name was normalized.

use crate::config::ConverterConfig;
use regex::Regex;
use std::sync::LazyLock;

/// `//pkg/path:target` (the package part is optional for root targets)
static IN_TREE_NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^//([\w.-]+(?:/[\w.-]+)*)?:(.+)$").unwrap());

/// `@repo//pkg:target`; the target is everything after the last colon
static EXTERNAL_NAME_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^@.+:(.+)$").unwrap());

/// Maps labels and declaration sites onto output naming conventions
#[derive(Debug, Clone)]
pub struct Normalizer {
    name_prefix: String,
    location_re: Regex,
}

impl Normalizer {
    /// Build a normalizer for the configured workspace root and name prefix
    pub fn new(config: &ConverterConfig) -> Self {
        let root = config.workspace_root.trim_end_matches('/');
        let pattern = format!(r"^{}/(.+)/BUILD(?:\.bazel)?(?::\d+)*$", regex::escape(root));
        Self {
            name_prefix: config.name_prefix.clone(),
            // The pattern is built from an escaped literal, so it always compiles
            location_re: Regex::new(&pattern).unwrap(),
        }
    }

    /// Reduce a declaration site to its workspace-relative package directory
    ///
    /// Returns `None` for rules declared outside the tracked tree. A value that
    /// is already relative and carries no line locator is returned as is.
    pub fn normalize_location(&self, decl_site: &str) -> Option<String> {
        if let Some(caps) = self.location_re.captures(decl_site) {
            return Some(caps[1].to_string());
        }
        if is_relative_path(decl_site) {
            return Some(decl_site.to_string());
        }
        None
    }

    /// Flatten a label into an output module name
    ///
    /// - `//foo/bar:baz` becomes `<prefix>_foo_bar_baz`
    /// - `@repo//foo:baz` becomes `baz`
    /// - anything else passes through unchanged
    pub fn normalize_name(&self, raw_name: &str) -> String {
        if let Some(caps) = IN_TREE_NAME_RE.captures(raw_name) {
            let target = &caps[2];
            return match caps.get(1) {
                Some(package) => format!(
                    "{}_{}_{}",
                    self.name_prefix,
                    package.as_str().replace('/', "_"),
                    target
                ),
                None => format!("{}_{}", self.name_prefix, target),
            };
        }
        if let Some(caps) = EXTERNAL_NAME_RE.captures(raw_name) {
            return caps[1].to_string();
        }
        raw_name.to_string()
    }
}

fn is_relative_path(value: &str) -> bool {
    !value.is_empty() && !value.starts_with('/') && !value.contains(':')
}

/// Strip the package part of a file label, leaving the package-relative path
///
/// `//foo/bar:sub/x.cc` and `@repo//foo/bar:sub/x.cc` both become `sub/x.cc`;
/// plain relative paths are returned unchanged.
pub fn source_file(label: &str) -> &str {
    if label.starts_with("//") || label.starts_with('@') || label.starts_with(':') {
        if let Some((_, file)) = label.split_once(':') {
            return file;
        }
    }
    label
}

/// Workspace-relative path of a file label
///
/// `//pkg:sub/x.h` resolves against its own package; `:x.h` and plain paths
/// resolve against `package`, the declaring rule's directory. Files of
/// external repositories have no workspace path.
pub fn workspace_path(label: &str, package: &str) -> Option<String> {
    if label.starts_with('@') {
        return None;
    }
    if let Some(caps) = IN_TREE_NAME_RE.captures(label) {
        let dir = caps.get(1).map_or("", |m| m.as_str());
        return Some(join_path(dir, &caps[2]));
    }
    Some(join_path(package, source_file(label)))
}

/// Name of the shared library that collects the protos of one package
pub fn aggregate_name(source_path: &str) -> String {
    format!("lib{}", source_path.replace('/', "-"))
}

/// Join a workspace-relative directory and a package-relative file
pub fn join_path(dir: &str, file: &str) -> String {
    match (dir.is_empty(), file.is_empty()) {
        (true, _) => file.to_string(),
        (_, true) => dir.to_string(),
        _ => format!("{}/{}", dir.trim_end_matches('/'), file),
    }
}

/// Directory part of a relative path, or `None` for a bare file name
pub fn parent_dir(path: &str) -> Option<&str> {
    path.rsplit_once('/').map(|(dir, _)| dir)
}
