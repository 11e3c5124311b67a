// src/lib.rs

//! bazelbp: Bazel to Android.bp conversion
//!
//! Converts the C/C++ and proto rules of a Bazel query result into an
//! Android.bp module file, so a tree maintained with Bazel BUILD files can be
//! built by Soong without hand-written module definitions.
//!
//! # Architecture
//!
//! - Query: decoded rule records with typed attribute access
//! - Graph: rules classified into modules; proto rules merged per package
//! - Resolver: dependency labels sorted into shared/static/header/defaults
//! - Blueprint: deterministic rendering and atomic file replacement
//!
//! # Example
//!
//! ```ignore
//! use bazelbp::{Converter, ConverterConfig};
//!
//! let records = bazelbp::query::decode(&std::fs::read_to_string("cquery.json")?)?;
//! let conversion = Converter::new(ConverterConfig::default())?.convert(&records)?;
//! bazelbp::blueprint::write_atomic("Android.bp".as_ref(), &conversion.blueprint)?;
//! ```

pub mod blueprint;
pub mod config;
pub mod convert;
mod error;
pub mod graph;
pub mod naming;
pub mod query;
pub mod resolver;

pub use blueprint::{Blueprint, BlueprintRenderer};
pub use config::{ConverterConfig, ThirdPartyLib};
pub use convert::{Conversion, ConversionReport, Converter};
pub use error::{Error, Result};
pub use graph::{Module, ModuleClass, ModuleClassifier, ModuleKind, ModuleRegistry};
pub use naming::Normalizer;
pub use query::{AttributeValue, RuleRecord};
pub use resolver::{MissingDependency, ModuleGraph};
