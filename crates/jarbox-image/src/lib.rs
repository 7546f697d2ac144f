//! Application-image assembly: runtime config-file generation, the CDS
//! cache plan, and bundler template-resource lookup.
//!
//! The caller resolves or seeds a `jarbox_core::ParamSet`, then hands it
//! to [`AppImageBuilder::write_cfg_file`] together with the image's
//! runtime location. Everything the launcher needs at startup ends up in
//! one section-delimited `key=value` file.
#![deny(unused_crate_dependencies)]

pub mod cds;
pub mod cfg;
pub mod resources;

pub use cfg::{AppImageBuilder, Section};
pub use resources::{ResourceLookup, locate_resource, preprocess_text_resource};

// Integration tests use these; silence unused dev-dependency warnings
#[cfg(test)]
use anyhow as _;
#[cfg(test)]
use zip as _;
