//! Core packaging pipeline: typed parameter resolution, jar inspection,
//! and launch-configuration inference.
//!
//! A packaging run threads one [`ParamSet`] through three stages: the
//! caller seeds it with raw strings and/or typed objects, inference
//! ([`infer_main_class_info`]) derives whatever launch settings are
//! missing, and the image writer (the `jarbox-image` crate) reads the
//! stabilized set to emit the runtime configuration artifact.
#![deny(unused_crate_dependencies)]

pub mod error;
pub mod fileset;
pub mod infer;
pub mod manifest;
pub mod module;
pub mod params;

pub use error::ConfigError;
pub use fileset::RelativeFileSet;
pub use infer::{
    infer_main_class_info, main_jar_file, module_main_class, resolved_main_class,
    validate_main_class_info,
};
pub use manifest::JarManifest;
pub use module::{ModuleKind, classify, default_module_path, find_module_path, module_name};
pub use params::{Param, ParamSet, ParamValue, Value};

// Integration tests use this; silence the unused dev-dependency warning
#[cfg(test)]
use anyhow as _;
