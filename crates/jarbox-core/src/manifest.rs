//! Jar manifest access.
//!
//! Inference only needs the main attribute section of `MANIFEST.MF`, so
//! this reader stops at the first blank line. Continuation lines (the
//! 72-column folding the jar format mandates) are joined back together.

use crate::error::ConfigError;
use indexmap::IndexMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use zip::ZipArchive;
use zip::result::ZipError;

/// Entry point attribute of a plain executable jar.
pub const ATTR_MAIN_CLASS: &str = "Main-Class";
/// Space-separated relative classpath declared by the jar.
pub const ATTR_CLASS_PATH: &str = "Class-Path";
/// Entry point declared by framework-launched applications. Takes
/// precedence over [`ATTR_MAIN_CLASS`] during inference.
pub const ATTR_FRAMEWORK_MAIN: &str = "JavaFX-Application-Class";
/// Preloader class shown while the framework application starts.
pub const ATTR_PRELOADER: &str = "JavaFX-Preloader-Class";

const MANIFEST_ENTRY: &str = "META-INF/MANIFEST.MF";

/// Main-section attributes of a jar manifest.
#[derive(Debug, Clone, Default)]
pub struct JarManifest {
    attrs: IndexMap<String, String>,
}

impl JarManifest {
    /// Read the manifest of the jar at `path`.
    ///
    /// Returns `Ok(None)` when the archive has no manifest entry; an
    /// archive that cannot be opened or read is an error (callers
    /// scanning multiple candidates downgrade it to a logged skip).
    pub fn read_from_jar(path: &Path) -> Result<Option<Self>, ConfigError> {
        let file = File::open(path).map_err(|e| resource_err(path, &e))?;
        let mut archive = ZipArchive::new(file).map_err(|e| resource_err(path, &e))?;

        let mut entry = match archive.by_name(MANIFEST_ENTRY) {
            Ok(entry) => entry,
            Err(ZipError::FileNotFound) => return Ok(None),
            Err(err) => return Err(resource_err(path, &err)),
        };

        let mut text = String::new();
        entry
            .read_to_string(&mut text)
            .map_err(|e| resource_err(path, &e))?;
        Ok(Some(Self::parse(&text)))
    }

    /// Parse the main attribute section of manifest text.
    #[must_use]
    pub fn parse(text: &str) -> Self {
        let mut attrs: IndexMap<String, String> = IndexMap::new();
        let mut last: Option<String> = None;

        for line in text.lines() {
            let line = line.strip_suffix('\r').unwrap_or(line);
            if line.is_empty() {
                // End of the main section.
                break;
            }
            if let Some(continuation) = line.strip_prefix(' ') {
                if let Some(value) = last.as_ref().and_then(|key| attrs.get_mut(key)) {
                    value.push_str(continuation);
                }
                continue;
            }
            if let Some((key, value)) = line.split_once(':') {
                let key = key.trim();
                attrs.insert(key.to_owned(), value.trim_start().to_owned());
                last = Some(key.to_owned());
            }
        }

        Self { attrs }
    }

    /// Look up a main attribute. Attribute names are case-insensitive.
    #[must_use]
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

fn resource_err(path: &Path, err: &dyn std::fmt::Display) -> ConfigError {
    ConfigError::Resource {
        path: path.to_path_buf(),
        reason: err.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain_attributes() {
        let manifest = JarManifest::parse(
            "Manifest-Version: 1.0\r\nMain-Class: com.demo.Main\r\nClass-Path: lib/a.jar lib/b.jar\r\n",
        );
        assert_eq!(manifest.attr(ATTR_MAIN_CLASS), Some("com.demo.Main"));
        assert_eq!(manifest.attr(ATTR_CLASS_PATH), Some("lib/a.jar lib/b.jar"));
        assert_eq!(manifest.attr(ATTR_PRELOADER), None);
    }

    #[test]
    fn test_parse_joins_continuation_lines() {
        let manifest = JarManifest::parse(
            "Main-Class: com.example.applications.with.a.very.long.package.na\n me.Main\n",
        );
        assert_eq!(
            manifest.attr(ATTR_MAIN_CLASS),
            Some("com.example.applications.with.a.very.long.package.name.Main")
        );
    }

    #[test]
    fn test_parse_stops_at_main_section_end() {
        let manifest = JarManifest::parse(
            "Main-Class: com.demo.Main\n\nName: com/demo/other\nMain-Class: com.demo.Other\n",
        );
        assert_eq!(manifest.attr(ATTR_MAIN_CLASS), Some("com.demo.Main"));
    }

    #[test]
    fn test_attr_lookup_is_case_insensitive() {
        let manifest = JarManifest::parse("MAIN-CLASS: com.demo.Main\n");
        assert_eq!(manifest.attr(ATTR_MAIN_CLASS), Some("com.demo.Main"));
    }
}
