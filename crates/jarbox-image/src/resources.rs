//! Bundler template-resource lookup.
//!
//! Bundlers ship default templates (launcher config stubs, plists,
//! desktop entries) that users may override. Lookup order: a drop-in
//! file under the override root, then an explicitly configured file,
//! then the bundler default supplied through [`ResourceLookup`].

use indexmap::IndexMap;
use jarbox_core::ConfigError;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::info;

/// External capability supplying bundler-provided template resources,
/// addressed by name.
pub trait ResourceLookup: Send + Sync {
    /// Open the named bundler resource, if it exists.
    fn open(&self, name: &str) -> Option<Box<dyn Read + Send>>;
}

/// Locate a template resource.
///
/// `public_name` is the user-facing override name, `default_name` the
/// bundler-internal fallback. Returns `Ok(None)` when nothing provides
/// the resource; provenance is logged when `verbose` is set.
pub fn locate_resource(
    lookup: &dyn ResourceLookup,
    public_name: &str,
    category: Option<&str>,
    default_name: &str,
    custom_file: Option<&Path>,
    override_root: Option<&Path>,
    verbose: bool,
) -> Result<Option<Box<dyn Read + Send>>, ConfigError> {
    let label = category.map(|c| format!("[{c}] ")).unwrap_or_default();

    if let Some(root) = override_root {
        let candidate = root.join(public_name);
        if candidate.is_file() {
            if verbose {
                info!(
                    "using custom package resource {label}(loaded from {})",
                    candidate.display()
                );
            }
            return open_file(&candidate).map(Some);
        }
    }
    if let Some(custom) = custom_file {
        if custom.is_file() {
            if verbose {
                info!(
                    "using custom package resource {label}(loaded from file {})",
                    custom.display()
                );
            }
            return open_file(custom).map(Some);
        }
    }
    if let Some(stream) = lookup.open(default_name) {
        if verbose {
            info!("using default package resource {label}{default_name}");
        }
        return Ok(Some(stream));
    }
    if verbose {
        info!("no default package resource {label}{default_name}");
    }
    Ok(None)
}

/// Locate a text template and substitute every `pairs` occurrence.
///
/// A template no lookup location provides is fatal: the bundler module
/// itself is incomplete.
pub fn preprocess_text_resource(
    lookup: &dyn ResourceLookup,
    public_name: &str,
    category: Option<&str>,
    default_name: &str,
    pairs: &IndexMap<String, String>,
    custom_file: Option<&Path>,
    override_root: Option<&Path>,
    verbose: bool,
) -> Result<String, ConfigError> {
    let stream = locate_resource(
        lookup,
        public_name,
        category,
        default_name,
        custom_file,
        override_root,
        verbose,
    )?;
    let Some(mut stream) = stream else {
        return Err(ConfigError::MissingResource {
            name: default_name.to_owned(),
        });
    };

    let mut text = String::new();
    stream
        .read_to_string(&mut text)
        .map_err(|err| ConfigError::Resource {
            path: PathBuf::from(default_name),
            reason: err.to_string(),
        })?;

    for (key, value) in pairs {
        text = text.replace(key.as_str(), value);
    }
    Ok(text)
}

fn open_file(path: &Path) -> Result<Box<dyn Read + Send>, ConfigError> {
    File::open(path)
        .map(|file| Box::new(file) as Box<dyn Read + Send>)
        .map_err(|err| ConfigError::Resource {
            path: path.to_path_buf(),
            reason: err.to_string(),
        })
}
