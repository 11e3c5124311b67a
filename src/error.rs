// src/error.rs

//! Error types shared across the conversion pipeline

use thiserror::Error;

/// Errors that abort a conversion run
///
/// Recoverable conditions (unresolvable dependencies, ignored rule kinds)
/// are not errors; they are recorded in the [`crate::ConversionReport`].
#[derive(Error, Debug)]
pub enum Error {
    /// A second module was inserted under an existing normalized name
    #[error("Duplicate module '{name}' (from rule '{rule}')")]
    DuplicateModule { name: String, rule: String },

    /// A recognized attribute the output format cannot express yet
    #[error("Unsupported attribute '{attribute}' on '{module}': {value}")]
    UnsupportedAttribute {
        module: String,
        attribute: String,
        value: String,
    },

    /// An attribute was present with a different kind than its schema
    #[error("Attribute '{attribute}' on '{module}' is a {found}, expected a {expected}")]
    AttributeType {
        module: String,
        attribute: String,
        expected: &'static str,
        found: &'static str,
    },

    /// The resolver met a module class it cannot categorize
    #[error("Module '{module}' depends on '{dependency}' of class {class}, which cannot be linked")]
    InconsistentClass {
        module: String,
        dependency: String,
        class: &'static str,
    },

    /// Malformed query-result input
    #[error("Failed to decode query result: {0}")]
    Decode(String),

    /// JSON syntax error in the query result
    #[error("Invalid query result JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid converter configuration
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// TOML syntax error in the configuration file
    #[error("Failed to parse configuration: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// I/O error while reading input or writing output
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for conversion operations
pub type Result<T> = std::result::Result<T, Error>;
