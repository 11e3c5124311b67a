// src/query/record.rs

//! Decoded rule records and typed attribute access

use crate::error::{Error, Result};
use std::collections::HashMap;

/// Value of one rule attribute
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttributeValue {
    Bool(bool),
    String(String),
    StringList(Vec<String>),
}

impl AttributeValue {
    /// Kind name used in error messages
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Bool(_) => "boolean",
            Self::String(_) => "string",
            Self::StringList(_) => "string list",
        }
    }
}

/// An attribute value plus whether the BUILD file set it explicitly
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub value: AttributeValue,
    pub explicit: bool,
}

impl Attribute {
    pub fn new(value: AttributeValue, explicit: bool) -> Self {
        Self { value, explicit }
    }
}

/// A Rust type an attribute can be read as
pub trait AttrKind: Sized + Clone {
    /// Kind name used in error messages
    const KIND: &'static str;

    fn from_value(value: &AttributeValue) -> Option<Self>;
}

impl AttrKind for bool {
    const KIND: &'static str = "boolean";

    fn from_value(value: &AttributeValue) -> Option<Self> {
        match value {
            AttributeValue::Bool(b) => Some(*b),
            _ => None,
        }
    }
}

impl AttrKind for String {
    const KIND: &'static str = "string";

    fn from_value(value: &AttributeValue) -> Option<Self> {
        match value {
            AttributeValue::String(s) => Some(s.clone()),
            _ => None,
        }
    }
}

impl AttrKind for Vec<String> {
    const KIND: &'static str = "string list";

    fn from_value(value: &AttributeValue) -> Option<Self> {
        match value {
            AttributeValue::StringList(items) => Some(items.clone()),
            _ => None,
        }
    }
}

/// Schema entry: attribute name, expected kind (via `T`) and default
#[derive(Debug, Clone)]
pub struct AttrSpec<T> {
    pub name: &'static str,
    pub default: T,
}

impl<T> AttrSpec<T> {
    pub const fn new(name: &'static str, default: T) -> Self {
        Self { name, default }
    }
}

/// One decoded build declaration
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleRecord {
    /// Fully-qualified label, e.g. `//cyber/base:macros`
    pub name: String,
    /// Rule class, e.g. `cc_library`
    pub kind: String,
    /// Declaration site, e.g. `/apollo/cyber/base/BUILD:12:1`
    pub decl_site: String,
    pub attributes: HashMap<String, Attribute>,
}

impl RuleRecord {
    pub fn new(
        name: impl Into<String>,
        kind: impl Into<String>,
        decl_site: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            kind: kind.into(),
            decl_site: decl_site.into(),
            attributes: HashMap::new(),
        }
    }

    /// Builder-style attribute setter, marking the value as explicit
    pub fn with_attr(mut self, name: impl Into<String>, value: AttributeValue) -> Self {
        self.attributes.insert(name.into(), Attribute::new(value, true));
        self
    }

    /// Read an attribute through its schema entry
    ///
    /// The default only applies when the attribute is absent; a present
    /// attribute of the wrong kind is an error.
    pub fn attr<T: AttrKind>(&self, spec: &AttrSpec<T>) -> Result<T> {
        let Some(attribute) = self.attributes.get(spec.name) else {
            return Ok(spec.default.clone());
        };
        T::from_value(&attribute.value).ok_or_else(|| Error::AttributeType {
            module: self.name.clone(),
            attribute: spec.name.to_string(),
            expected: T::KIND,
            found: attribute.value.kind(),
        })
    }
}
