// src/graph/mod.rs

//! In-memory module graph
//!
//! Classification turns each Bazel rule into a [`Module`] and stores it in the
//! [`ModuleRegistry`]. C/C++ rules map one-to-one onto modules; proto rules of
//! the same package collapse into a single aggregate shared library. Nothing
//! here looks at dependencies beyond recording their labels; resolution runs
//! afterwards over the complete registry (see [`crate::resolver`]).

mod aggregate;
mod classifier;
mod module;
mod registry;

pub use aggregate::{PROTO_RULE_KINDS, ProtoAggregator};
pub use classifier::{CC_RULE_KINDS, Classification, ModuleClassifier};
pub use module::{Module, ModuleClass, ModuleKind, ResolvedDeps};
pub use registry::{MergeOutcome, ModuleRegistry};
