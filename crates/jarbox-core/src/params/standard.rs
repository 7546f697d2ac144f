//! The standard parameter table.
//!
//! Parameter ids are the map keys external tooling populates (raw text
//! from a command line, or pre-built typed objects from programmatic
//! callers). Defaults encode the inference fallback chain: resolving a
//! launch parameter runs jar inspection as a side effect and reads the
//! derived value back out of the set.

use super::ParamSet;
use super::descriptor::Param;
use crate::error::ConfigError;
use crate::fileset::RelativeFileSet;
use crate::{infer, module};
use chrono::{Datelike, Utc};
use indexmap::IndexMap;
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

/// Platform separator between classpath / module-path entries.
pub const PATH_LIST_SEPARATOR: char = if cfg!(windows) { ';' } else { ':' };

const JAVA_BASE_JMOD: &str = "java.base.jmod";

/// Application display name. Defaults to the simple name of the main
/// class.
pub static APP_NAME: Param<String> = Param::new(
    "name",
    Some(|params| {
        let main_class = MAIN_CLASS.resolve(params).ok().flatten()?;
        Some(
            main_class
                .rsplit('.')
                .next()
                .unwrap_or(&main_class)
                .to_owned(),
        )
    }),
    Some(|raw, _| Ok(raw.to_owned())),
);

/// Application name reduced to characters safe in file names.
pub static APP_FS_NAME: Param<String> = Param::new(
    "name.fs",
    Some(|params| {
        let name = APP_NAME.resolve(params).ok().flatten()?;
        let strip = Regex::new(r"\s|[\\/?:*<>|]").ok()?;
        Some(strip.replace_all(&name, "").into_owned())
    }),
    Some(|raw, _| Ok(raw.to_owned())),
);

/// Application version string.
pub static VERSION: Param<String> = Param::new(
    "appVersion",
    Some(|_| Some("1.0".to_owned())),
    Some(|raw, _| Ok(raw.to_owned())),
);

/// Reverse-DNS style identifier. Defaults to the package prefix of the
/// main class.
pub static IDENTIFIER: Param<String> = Param::new(
    "identifier",
    Some(|params| {
        let main_class = MAIN_CLASS.resolve(params).ok().flatten()?;
        match main_class.rfind('.') {
            Some(idx) if idx >= 1 => Some(main_class[..idx].to_owned()),
            _ => Some(main_class),
        }
    }),
    Some(|raw, _| Ok(raw.to_owned())),
);

/// Preferences-tree id: the identifier with dots turned into slashes.
pub static PREFERENCES_ID: Param<String> = Param::new(
    "preferencesID",
    Some(|params| {
        let identifier = IDENTIFIER.resolve(params).ok().flatten().unwrap_or_default();
        Some(identifier.replace('.', "/"))
    }),
    Some(|raw, _| Ok(raw.to_owned())),
);

/// Window/installer title. Defaults to the application name.
pub static TITLE: Param<String> = Param::new(
    "title",
    Some(|params| APP_NAME.resolve(params).ok().flatten()),
    Some(|raw, _| Ok(raw.to_owned())),
);

pub static VENDOR: Param<String> = Param::new(
    "vendor",
    Some(|_| Some("Unknown".to_owned())),
    Some(|raw, _| Ok(raw.to_owned())),
);

pub static DESCRIPTION: Param<String> = Param::new(
    "description",
    Some(|params| {
        if params.contains(APP_NAME.id()) {
            APP_NAME.resolve(params).ok().flatten()
        } else {
            Some("none".to_owned())
        }
    }),
    Some(|raw, _| Ok(raw.to_owned())),
);

pub static COPYRIGHT: Param<String> = Param::new(
    "copyright",
    Some(|_| Some(format!("Copyright (C) {}", Utc::now().year()))),
    Some(|raw, _| Ok(raw.to_owned())),
);

/// The primary application resource bundle. Required; the tool must
/// provide the complex type, so there is no default and no converter.
pub static APP_RESOURCES: Param<RelativeFileSet> = Param::new("appResources", None, None);

/// All application resource bundles. Defaults to the primary bundle as a
/// single-item list.
pub static APP_RESOURCES_LIST: Param<Vec<RelativeFileSet>> = Param::new(
    "appResourcesList",
    Some(|params| Some(vec![APP_RESOURCES.resolve(params).ok().flatten()?])),
    Some(app_resources_list_from_text),
);

/// The jar holding the main class, as a single-file resource bundle.
/// Resolving it runs inference when the caller did not supply one.
pub static MAIN_JAR: Param<RelativeFileSet> = Param::new(
    "mainJar",
    Some(|params| {
        infer::infer_main_class_info(params).ok()?;
        MAIN_JAR.resolve_no_default(params).ok().flatten()
    }),
    Some(main_jar_from_text),
);

/// Space-separated classpath entries, relative to the app resources
/// root. Resolving it runs inference when the caller did not supply one;
/// an application without a classpath resolves to the empty string.
pub static CLASSPATH: Param<String> = Param::new(
    "classpath",
    Some(|params| {
        infer::infer_main_class_info(params).ok()?;
        Some(
            CLASSPATH
                .resolve_no_default(params)
                .ok()
                .flatten()
                .unwrap_or_default(),
        )
    }),
    Some(|raw, _| Ok(raw.replace(PATH_LIST_SEPARATOR, " "))),
);

/// Fully-qualified main class. Resolving it runs inference, then falls
/// back to the class embedded in the main-module reference.
pub static MAIN_CLASS: Param<String> = Param::new(
    "applicationClass",
    Some(|params| {
        infer::infer_main_class_info(params).ok()?;
        MAIN_CLASS
            .resolve_no_default(params)
            .ok()
            .flatten()
            .or_else(|| infer::module_main_class(params))
    }),
    Some(|raw, _| Ok(raw.to_owned())),
);

/// Whether the framework's designated entry point, not the plain
/// manifest main class, is the launch target.
pub static FRAMEWORK_PACKAGING: Param<bool> = Param::new(
    "fxPackaging",
    Some(|params| {
        infer::infer_main_class_info(params).ok()?;
        Some(
            FRAMEWORK_PACKAGING
                .resolve_no_default(params)
                .ok()
                .flatten()
                .unwrap_or(false),
        )
    }),
    Some(|raw, _| Ok(parse_bool(raw, false))),
);

/// Preloader class adopted from the main jar manifest during inference.
pub static PRELOADER: Param<String> = Param::new("preloader", None, None);

/// Positional program arguments.
pub static ARGUMENTS: Param<Vec<String>> = Param::new(
    "arguments",
    Some(|_| Some(Vec::new())),
    Some(|raw, _| Ok(split_with_escapes(raw))),
);

/// Verbatim JVM flags.
pub static JVM_OPTIONS: Param<Vec<String>> = Param::new(
    "jvmOptions",
    Some(|_| Some(Vec::new())),
    Some(|raw, _| Ok(raw.split_whitespace().map(str::to_owned).collect())),
);

/// JVM system properties, emitted as `-D<key>=<value>`.
pub static JVM_PROPERTIES: Param<IndexMap<String, String>> = Param::new(
    "jvmProperties",
    Some(|_| Some(IndexMap::new())),
    Some(|raw, _| Ok(parse_properties(raw))),
);

/// User-overridable JVM options, persisted per user by the launcher.
pub static USER_JVM_OPTIONS: Param<IndexMap<String, String>> = Param::new(
    "userJvmOptions",
    Some(|_| Some(IndexMap::new())),
    Some(|raw, _| Ok(parse_properties(raw))),
);

/// Single-instance launch flag.
pub static SINGLETON: Param<bool> = Param::new(
    "singleton",
    Some(|_| Some(false)),
    Some(|raw, _| Ok(parse_bool(raw, false))),
);

/// Verbose diagnostics flag. A bare flag with no value counts as set.
pub static VERBOSE: Param<bool> = Param::new(
    "verbose",
    Some(|_| Some(false)),
    Some(|raw, _| Ok(parse_bool(raw, true))),
);

/// Scratch directory for intermediate packaging output.
pub static BUILD_ROOT: Param<PathBuf> = Param::new(
    "buildRoot",
    Some(|_| {
        tempfile::Builder::new()
            .prefix("jarbox")
            .tempdir()
            .ok()
            .map(tempfile::TempDir::into_path)
    }),
    Some(|raw, _| Ok(PathBuf::from(raw))),
);

/// Remote-debugging port. When set, the launcher gets a jdwp agent line.
pub static DEBUG: Param<i64> = Param::new(
    "debug",
    None,
    Some(|raw, _| {
        raw.parse().map_err(|err: std::num::ParseIntError| {
            ConfigError::InvalidValue {
                key: "debug",
                value: raw.to_owned(),
                reason: err.to_string(),
            }
        })
    }),
);

/// Main module reference, `module` or `module/class`.
pub static MODULE: Param<String> = Param::new("module", None, Some(|raw, _| Ok(raw.to_owned())));

/// Module search path. Defaults to the JDK module path.
pub static MODULE_PATH: Param<Vec<PathBuf>> = Param::new(
    "module-path",
    Some(|_| Some(module::default_module_path())),
    Some(module_path_from_text),
);

/// Master switch for commercial VM features.
pub static UNLOCK_COMMERCIAL_FEATURES: Param<bool> = Param::new(
    "commercialFeatures",
    Some(|_| Some(false)),
    Some(|raw, _| Ok(parse_bool(raw, false))),
);

/// Class-data-sharing archive generation for the packaged app.
pub static ENABLE_APP_CDS: Param<bool> = Param::new(
    "commercial.AppCDS",
    Some(|_| Some(false)),
    Some(|raw, _| Ok(parse_bool(raw, false))),
);

/// CDS cache mode; only the part before a `+` reaches the launcher.
pub static APP_CDS_CACHE_MODE: Param<String> = Param::new(
    "commercial.AppCDS.cache",
    Some(|_| Some("auto".to_owned())),
    Some(|raw, _| Ok(raw.to_owned())),
);

/// Root classes seeding the CDS class list. Defaults to the main class.
pub static APP_CDS_CLASS_ROOTS: Param<Vec<String>> = Param::new(
    "commercial.AppCDS.classRoots",
    Some(|params| Some(vec![MAIN_CLASS.resolve(params).ok().flatten()?])),
    Some(|raw, _| {
        Ok(raw
            .split([' ', ',', ':'])
            .filter(|root| !root.is_empty())
            .map(str::to_owned)
            .collect())
    }),
);

fn parse_bool(raw: &str, when_bare: bool) -> bool {
    if raw.is_empty() || raw.eq_ignore_ascii_case("null") {
        when_bare
    } else {
        raw.eq_ignore_ascii_case("true")
    }
}

/// Quote-aware argument splitter: whitespace separates, double quotes
/// group, quotes themselves are dropped.
fn split_with_escapes(raw: &str) -> Vec<String> {
    let mut parts = Vec::new();
    let mut current = String::new();
    let mut quoted = false;
    for c in raw.chars() {
        if c == '"' {
            quoted = !quoted;
        } else if !quoted && c.is_whitespace() {
            parts.push(std::mem::take(&mut current));
        } else {
            current.push(c);
        }
    }
    parts.push(current);
    parts
}

/// Properties-style text: one `key=value` (or `key:value`) per line,
/// `#`/`!` comments, insertion order preserved.
fn parse_properties(raw: &str) -> IndexMap<String, String> {
    let mut map = IndexMap::new();
    for line in raw.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') || line.starts_with('!') {
            continue;
        }
        let (key, value) = match line.split_once(['=', ':']) {
            Some((key, value)) => (key.trim(), value.trim()),
            None => (line, ""),
        };
        map.insert(key.to_owned(), value.to_owned());
    }
    map
}

fn app_resources_list_from_text(
    raw: &str,
    _params: &mut ParamSet,
) -> Result<Vec<RelativeFileSet>, ConfigError> {
    let mut result = Vec::new();
    for entry in raw.split([':', ';']).filter(|entry| !entry.is_empty()) {
        let path = Path::new(entry);
        let glob_all = path.file_name().is_some_and(|name| name == "*");
        if glob_all || entry.ends_with('/') || entry.ends_with('\\') {
            let base = if glob_all {
                path.parent().unwrap_or_else(|| Path::new("")).to_path_buf()
            } else {
                path.to_path_buf()
            };
            let files = walk_files(&base);
            result.push(RelativeFileSet::new(base, files));
        } else {
            let base = path.parent().unwrap_or_else(|| Path::new("")).to_path_buf();
            let file = path.file_name().map(PathBuf::from).unwrap_or_default();
            result.push(RelativeFileSet::new(base, vec![file]));
        }
    }
    Ok(result)
}

fn walk_files(base: &Path) -> Vec<PathBuf> {
    fn visit(dir: &Path, base: &Path, out: &mut Vec<PathBuf>) {
        let entries = match fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(err) => {
                warn!(dir = %dir.display(), %err, "skipping unreadable resource directory");
                return;
            }
        };
        for entry in entries.flatten() {
            let path = entry.path();
            if path.is_dir() {
                visit(&path, base, out);
            } else if let Ok(relative) = path.strip_prefix(base) {
                out.push(relative.to_path_buf());
            }
        }
    }

    let mut files = Vec::new();
    visit(base, base, &mut files);
    files
}

/// Resolve a named main jar against each resource bundle, then against
/// the module path. Unlike inference, a name that matches nothing is
/// fatal: the caller asked for this jar specifically.
fn main_jar_from_text(raw: &str, params: &mut ParamSet) -> Result<RelativeFileSet, ConfigError> {
    let resource_sets = APP_RESOURCES_LIST.resolve(params)?.unwrap_or_default();
    for set in &resource_sets {
        if set.base_dir().join(raw).exists() {
            return Ok(RelativeFileSet::single(set.base_dir(), raw));
        }
        let module_path = MODULE_PATH.resolve(params)?.unwrap_or_default();
        if let Some(found) = module::find_module_path(&module_path, raw) {
            return Ok(RelativeFileSet::single(set.base_dir(), found));
        }
    }
    Err(ConfigError::MainJarNotFound {
        name: raw.to_owned(),
    })
}

fn module_path_from_text(raw: &str, _params: &mut ParamSet) -> Result<Vec<PathBuf>, ConfigError> {
    let mut module_path: Vec<PathBuf> = raw
        .split(PATH_LIST_SEPARATOR)
        .filter(|entry| !entry.is_empty())
        .map(PathBuf::from)
        .collect();

    let mut java_base = module::find_module_path(&module_path, JAVA_BASE_JMOD);
    if java_base.is_none() {
        // Splice in the default JDK module path when the supplied path
        // has no java.base.
        module_path.extend(module::default_module_path());
        java_base = module::find_module_path(&module_path, JAVA_BASE_JMOD);
    }
    if java_base.is_none() {
        warn!("no JDK modules were found on the module path");
    }
    Ok(module_path)
}
