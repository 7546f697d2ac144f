//! Runtime configuration file generation.
//!
//! The launcher reads an ordered, section-delimited `key=value` file.
//! Sections are built in memory first (so the plan is inspectable and
//! testable) and rendered in one pass; line order inside a section is
//! the insertion order of the underlying collections, never sorted.

use crate::cds;
use crate::resources::ResourceLookup;
use jarbox_core::params::standard::{
    APP_CDS_CACHE_MODE, APP_NAME, ARGUMENTS, CLASSPATH, DEBUG, ENABLE_APP_CDS, IDENTIFIER,
    JVM_OPTIONS, JVM_PROPERTIES, MODULE, PATH_LIST_SEPARATOR, PREFERENCES_ID, PRELOADER,
    SINGLETON, UNLOCK_COMMERCIAL_FEATURES, USER_JVM_OPTIONS, VERSION,
};
use jarbox_core::{ConfigError, ModuleKind, ParamSet, classify, infer};
use std::fs;
use std::path::Path;
use std::sync::Arc;
use tracing::warn;

/// One named section of the runtime configuration file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub name: &'static str,
    pub lines: Vec<String>,
}

impl Section {
    #[must_use]
    pub const fn new(name: &'static str, lines: Vec<String>) -> Self {
        Self { name, lines }
    }
}

/// Assembles the application-image configuration artifacts from a
/// resolved parameter set.
pub struct AppImageBuilder {
    resources: Arc<dyn ResourceLookup>,
    cache_location: String,
}

impl AppImageBuilder {
    /// `cache_location` is the launcher-relative directory the CDS
    /// shared archive lives in; platform bundlers pass their own.
    pub fn new(resources: Arc<dyn ResourceLookup>, cache_location: impl Into<String>) -> Self {
        Self {
            resources,
            cache_location: cache_location.into(),
        }
    }

    /// The template-resource capability this builder was created with.
    #[must_use]
    pub fn resources(&self) -> &Arc<dyn ResourceLookup> {
        &self.resources
    }

    /// Write the launcher configuration for `params` to `cfg_file`.
    ///
    /// The file is created or truncated; failure to do so aborts the
    /// run. Recoverable conditions (malformed user options) are logged
    /// and dropped without affecting the outcome.
    pub fn write_cfg_file(
        &self,
        params: &mut ParamSet,
        cfg_file: &Path,
        runtime_location: &str,
    ) -> Result<(), ConfigError> {
        let sections = self.build_cfg(params, runtime_location)?;
        fs::write(cfg_file, render(&sections)).map_err(|err| ConfigError::Resource {
            path: cfg_file.to_path_buf(),
            reason: err.to_string(),
        })
    }

    /// Resolve the parameter set into the ordered config sections.
    pub fn build_cfg(
        &self,
        params: &mut ParamSet,
        runtime_location: &str,
    ) -> Result<Vec<Section>, ConfigError> {
        let cds_enabled = UNLOCK_COMMERCIAL_FEATURES.resolve(params)?.unwrap_or(false)
            && ENABLE_APP_CDS.resolve(params)?.unwrap_or(false);

        let main_jar = infer::main_jar_file(params)?;
        let main_jar_kind = main_jar
            .as_deref()
            .map_or(ModuleKind::Unknown, classify);
        let main_module = MODULE.resolve(params)?;

        let mut app = Vec::new();
        app.push(format!(
            "app.name={}",
            APP_NAME.resolve(params)?.unwrap_or_default()
        ));
        app.push(format!(
            "app.version={}",
            VERSION.resolve(params)?.unwrap_or_default()
        ));
        app.push(format!(
            "app.preferences.id={}",
            PREFERENCES_ID.resolve(params)?.unwrap_or_default()
        ));
        app.push(format!("app.runtime={runtime_location}"));
        app.push(format!(
            "app.identifier={}",
            IDENTIFIER.resolve(params)?.unwrap_or_default()
        ));
        let classpath = CLASSPATH.resolve(params)?.unwrap_or_default();
        app.push(format!("app.classpath={}", join_classpath(&classpath)));
        let instance = if SINGLETON.resolve(params)?.unwrap_or(false) {
            "single"
        } else {
            "multiple"
        };
        app.push(format!("app.application.instance={instance}"));

        // The main app must be a jar, modular or unnamed. A modular (or
        // unresolved) main jar launches by module reference; a classic
        // jar launches by class + jar.
        if matches!(main_jar_kind, ModuleKind::Unknown | ModuleKind::ModularJar) {
            if let Some(module) = main_module {
                app.push(format!("app.mainmodule={module}"));
            }
        } else if let Some(jar) = &main_jar {
            if let Some(main_class) = infer::resolved_main_class(params)? {
                // The unnamed-jar launch path wants the archive-internal
                // slash form of the class name.
                app.push(format!("app.mainclass={}", main_class.replace('.', "/")));
                app.push(format!(
                    "app.mainjar={}",
                    jar.file_name()
                        .map(|name| name.to_string_lossy().into_owned())
                        .unwrap_or_default()
                ));
            }
        }

        if let Some(port) = DEBUG.resolve(params)? {
            app.push(format!(
                "app.debug=-agentlib:jdwp=transport=dt_socket,server=y,suspend=y,address=localhost:{port}"
            ));
        }
        if cds_enabled {
            let cache_mode = APP_CDS_CACHE_MODE.resolve(params)?.unwrap_or_default();
            let mode = cache_mode.split('+').next().unwrap_or_default();
            app.push(format!("app.appcds.cache={mode}"));
        }

        let mut sections = vec![Section::new("Application", app)];

        let mut jvm = JVM_OPTIONS.resolve(params)?.unwrap_or_default();
        let properties = JVM_PROPERTIES.resolve(params)?.unwrap_or_default();
        for (key, value) in &properties {
            jvm.push(format!("-D{key}={value}"));
        }
        if let Some(preloader) = PRELOADER.resolve(params)? {
            jvm.push(format!("-Djavafx.preloader={preloader}"));
        }
        sections.push(Section::new("JVMOptions", jvm));

        let mut user = Vec::new();
        let user_options = USER_JVM_OPTIONS.resolve(params)?.unwrap_or_default();
        for (key, value) in &user_options {
            if key.is_empty() || value.is_empty() {
                warn!("dropping user JVM option with a missing key or value");
                continue;
            }
            user.push(format!("{}={value}", key.replace('=', "\\=")));
        }
        sections.push(Section::new("JVMUserOptions", user));

        if cds_enabled {
            cds::prepare_app_cds(params, &self.cache_location, &mut sections)?;
        }

        let mut args = Vec::new();
        for argument in ARGUMENTS.resolve(params)?.unwrap_or_default() {
            args.push(escape_trailing_equals(&argument));
        }
        sections.push(Section::new("ArgOptions", args));

        Ok(sections)
    }
}

/// Render sections with one blank line between them.
fn render(sections: &[Section]) -> String {
    let mut out = String::new();
    for (index, section) in sections.iter().enumerate() {
        if index > 0 {
            out.push('\n');
        }
        out.push('[');
        out.push_str(section.name);
        out.push_str("]\n");
        for line in &section.lines {
            out.push_str(line);
            out.push('\n');
        }
    }
    out
}

/// Re-join classpath entries with the platform path-list separator.
fn join_classpath(classpath: &str) -> String {
    classpath
        .split([' ', ':', ';'])
        .filter(|entry| !entry.is_empty())
        .collect::<Vec<_>>()
        .join(&PATH_LIST_SEPARATOR.to_string())
}

/// A trailing single `=` would be ambiguous with section key parsing;
/// escape it on the way out.
fn escape_trailing_equals(argument: &str) -> String {
    if argument.ends_with('=') && argument.matches('=').count() == 1 {
        format!("{}\\=", &argument[..argument.len() - 1])
    } else {
        argument.to_owned()
    }
}
