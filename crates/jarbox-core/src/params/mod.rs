//! Typed, lazily-evaluated, memoized parameter resolution.
//!
//! A packaging run is driven by one [`ParamSet`]: a mutable mapping from
//! string identifiers to heterogeneous values, shared by every component
//! of the run. [`Param`] descriptors layer typed access, lazy defaults,
//! and raw-text conversion over the set; see [`descriptor`] for the
//! resolution contract.

mod descriptor;
pub mod standard;

pub use descriptor::{ConvertFn, DefaultFn, Param};

use crate::fileset::RelativeFileSet;
use indexmap::IndexMap;
use std::path::PathBuf;

/// A stored parameter value.
///
/// The parameter set is heterogeneous; this closed sum covers every type
/// the standard parameter table uses. Raw textual input and typed string
/// values share [`Value::Str`]: a descriptor with a converter treats any
/// stored string as convertible input.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Str(String),
    Bool(bool),
    Int(i64),
    Path(PathBuf),
    PathList(Vec<PathBuf>),
    StrList(Vec<String>),
    StrMap(IndexMap<String, String>),
    FileSet(RelativeFileSet),
    FileSetList(Vec<RelativeFileSet>),
    /// An explicitly absent value. Distinct from an unset key: resolution
    /// returns absent without invoking the default computation.
    Null,
}

impl Value {
    /// Human-readable name of the stored type, for diagnostics.
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::Str(_) => "string",
            Self::Bool(_) => "boolean",
            Self::Int(_) => "integer",
            Self::Path(_) => "path",
            Self::PathList(_) => "path list",
            Self::StrList(_) => "string list",
            Self::StrMap(_) => "string map",
            Self::FileSet(_) => "file set",
            Self::FileSetList(_) => "file set list",
            Self::Null => "explicit null",
        }
    }
}

/// Conversion between a typed parameter value and the [`Value`] sum type.
pub trait ParamValue: Clone {
    /// Type name used in type-mismatch diagnostics.
    const TYPE_NAME: &'static str;

    fn into_value(self) -> Value;

    /// `None` when the stored value is of a different type.
    fn from_value(value: &Value) -> Option<Self>;
}

macro_rules! param_value {
    ($ty:ty, $variant:ident, $name:literal) => {
        impl ParamValue for $ty {
            const TYPE_NAME: &'static str = $name;

            fn into_value(self) -> Value {
                Value::$variant(self)
            }

            fn from_value(value: &Value) -> Option<Self> {
                match value {
                    Value::$variant(inner) => Some(inner.clone()),
                    _ => None,
                }
            }
        }
    };
}

param_value!(String, Str, "string");
param_value!(bool, Bool, "boolean");
param_value!(i64, Int, "integer");
param_value!(PathBuf, Path, "path");
param_value!(Vec<PathBuf>, PathList, "path list");
param_value!(Vec<String>, StrList, "string list");
param_value!(IndexMap<String, String>, StrMap, "string map");
param_value!(RelativeFileSet, FileSet, "file set");
param_value!(Vec<RelativeFileSet>, FileSetList, "file set list");

/// The shared key-to-value mapping threaded through one packaging run.
///
/// Owned by a single run and resolved single-threaded: the `&mut`
/// receivers make it impossible for two default computations to run
/// concurrently over the same set. Never share a set across runs.
#[derive(Debug, Default)]
pub struct ParamSet {
    values: IndexMap<String, Value>,
}

impl ParamSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a typed value under a descriptor's key.
    pub fn put<T: ParamValue>(&mut self, param: &Param<T>, value: T) {
        self.values.insert(param.id().to_owned(), value.into_value());
    }

    /// Store raw textual input, converted on resolution by the
    /// descriptor's string converter (when one is registered).
    pub fn put_text(&mut self, key: impl Into<String>, raw: impl Into<String>) {
        self.values.insert(key.into(), Value::Str(raw.into()));
    }

    /// Mark a key as explicitly absent. Resolution of an explicit null
    /// returns absent without invoking the default computation.
    pub fn put_null(&mut self, key: impl Into<String>) {
        self.values.insert(key.into(), Value::Null);
    }

    pub(crate) fn put_value(&mut self, key: &str, value: Value) {
        self.values.insert(key.to_owned(), value);
    }

    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    #[must_use]
    pub(crate) fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    /// The stored value when it is textual; `None` otherwise.
    #[must_use]
    pub fn raw_str(&self, key: &str) -> Option<&str> {
        match self.values.get(key) {
            Some(Value::Str(raw)) => Some(raw),
            _ => None,
        }
    }
}
