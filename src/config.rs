// src/config.rs

//! Converter configuration
//!
//! Everything project-specific about the conversion lives here: where the
//! tracked source tree is rooted, how in-tree names are prefixed, which
//! libraries every compiled module links implicitly, and how external
//! repositories map onto prebuilt modules.
//!
//! # Example bazelbp.toml
//!
//! ```toml
//! workspace_root = "/apollo"
//! name_prefix = "apollo"
//!
//! baseline_deps = [
//!     "@com_github_google_glog//:glog",
//!     "libcyber-proto",
//! ]
//!
//! [[third_party]]
//! label = "@uuid//:uuid"
//! name = "uuid"
//! ```

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default name of the generated module file
pub const DEFAULT_OUTPUT_FILE: &str = "Android.bp";

/// One entry of the fixed third-party table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThirdPartyLib {
    /// External label as it appears in `deps` (e.g. `@uuid//:uuid`)
    pub label: String,
    /// Prebuilt module name in the output
    pub name: String,
}

impl ThirdPartyLib {
    pub fn new(label: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            name: name.into(),
        }
    }
}

/// Configuration for one conversion run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConverterConfig {
    /// Absolute path of the tracked source tree as seen in declaration sites
    pub workspace_root: String,

    /// Prefix token for flattened in-tree module names
    pub name_prefix: String,

    /// Dependencies appended to every compiled module
    pub baseline_deps: Vec<String>,

    /// External labels seeded into the registry as prebuilt static libraries
    pub third_party: Vec<ThirdPartyLib>,

    /// Source suffixes that compile into object code
    pub compiled_extensions: Vec<String>,

    /// Source suffixes consumed by generated-code modules
    pub generated_extensions: Vec<String>,

    /// Compiler flags for hand-written modules
    pub cppflags: Vec<String>,

    /// Compiler flags for generated-code aggregate modules
    pub generated_cppflags: Vec<String>,

    /// File name of the generated module file
    pub output_file: String,
}

impl Default for ConverterConfig {
    fn default() -> Self {
        Self {
            workspace_root: "/apollo".to_string(),
            name_prefix: "apollo".to_string(),
            baseline_deps: strings(&[
                "@com_github_gflags_gflags//:gflags",
                "@com_github_google_glog//:glog",
                "@fastrtps//:fastrtps",
                "@fastcdr//:fastcdr",
            ]),
            third_party: vec![
                ThirdPartyLib::new("@com_google_protobuf//:protobuf", "libprotobuf-cpp-full"),
                ThirdPartyLib::new("@fastrtps//:fastrtps", "fastrtps"),
                ThirdPartyLib::new("@fastcdr//:fastcdr", "fastcdr"),
                ThirdPartyLib::new("@local_config_python//:python_headers", "python_headers"),
                ThirdPartyLib::new("@local_config_python//:python_lib", "python_lib"),
                ThirdPartyLib::new("@ncurses5//:ncurses5", "ncurses5"),
                ThirdPartyLib::new("@com_github_google_glog//:glog", "glog"),
                ThirdPartyLib::new("@com_github_gflags_gflags//:gflags", "gflags"),
                ThirdPartyLib::new("@uuid//:uuid", "uuid"),
            ],
            compiled_extensions: strings(&[".c", ".cc", ".cxx"]),
            generated_extensions: strings(&[".proto"]),
            cppflags: strings(&["-fexceptions", "-Wno-non-virtual-dtor"]),
            generated_cppflags: strings(&[
                "-DGOOGLE_PROTOBUF_NO_RTTI",
                "-fexceptions",
                "-Wno-non-virtual-dtor",
            ]),
            output_file: DEFAULT_OUTPUT_FILE.to_string(),
        }
    }
}

impl ConverterConfig {
    /// Load a configuration file, falling back to defaults for missing keys
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Parse configuration from TOML text
    pub fn parse(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Check the invariants the normalizer and classifier rely on
    pub fn validate(&self) -> Result<()> {
        if !self.workspace_root.starts_with('/') {
            return Err(Error::Config(format!(
                "workspace_root must be absolute, got '{}'",
                self.workspace_root
            )));
        }
        if self.name_prefix.is_empty() {
            return Err(Error::Config("name_prefix must not be empty".to_string()));
        }
        if self.output_file.is_empty() {
            return Err(Error::Config("output_file must not be empty".to_string()));
        }
        for lib in &self.third_party {
            if lib.name.is_empty() {
                return Err(Error::Config(format!(
                    "third-party label '{}' has an empty module name",
                    lib.label
                )));
            }
        }
        Ok(())
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}
