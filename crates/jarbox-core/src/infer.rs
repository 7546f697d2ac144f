//! Main-class and module inference over application resources.
//!
//! When a caller supplies resources but not the full launch
//! configuration, the candidate jars are scanned in order and the first
//! one whose manifest declares an acceptable entry point decides the
//! main class, packaging mode, preloader, main jar, and classpath.
//!
//! The scan itself is pure (filesystem reads only); all parameter-set
//! mutation happens in one place, after a candidate is accepted.

use crate::error::ConfigError;
use crate::fileset::RelativeFileSet;
use crate::manifest::{self, JarManifest};
use crate::params::ParamSet;
use crate::params::standard::{
    APP_RESOURCES, APP_RESOURCES_LIST, CLASSPATH, FRAMEWORK_PACKAGING, MAIN_CLASS, MAIN_JAR,
    MODULE, PRELOADER,
};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Launch details accepted from one candidate jar.
#[derive(Debug)]
struct LaunchInfo {
    /// Adopted main class; `None` when the caller already declared one.
    main_class: Option<String>,
    framework: bool,
    preloader: Option<String>,
    manifest_classpath: Option<String>,
    base_dir: PathBuf,
    jar: PathBuf,
}

/// Outcome of inspecting one candidate.
enum Scan {
    Accepted(Box<LaunchInfo>),
    Skipped,
    Unreadable,
}

/// Derive main class, packaging mode, preloader, main jar, and classpath
/// from the application resources, for whichever of those the caller
/// left unset.
///
/// No-op when the launch configuration is already complete or a main
/// module is declared. Candidates that cannot be read are logged and
/// skipped; exhausting all candidates leaves the parameters unresolved
/// (see [`validate_main_class_info`]).
pub fn infer_main_class_info(params: &mut ParamSet) -> Result<(), ConfigError> {
    let has_main_class = params.contains(MAIN_CLASS.id());
    let has_main_jar = params.contains(MAIN_JAR.id());
    let has_classpath = params.contains(CLASSPATH.id());
    let has_preloader = params.contains(PRELOADER.id());
    let has_module = params.contains(MODULE.id());

    if has_main_class && has_main_jar && has_classpath || has_module {
        return Ok(());
    }

    let declared = params.raw_str(MAIN_CLASS.id()).map(str::to_owned);
    let candidates = collect_candidates(params, has_main_jar, has_classpath)?;

    let mut accepted = None;
    for (base_dir, jar) in &candidates {
        match scan_candidate(base_dir, jar, declared.as_deref()) {
            Scan::Accepted(launch) => {
                accepted = Some(*launch);
                break;
            }
            Scan::Skipped | Scan::Unreadable => {}
        }
    }
    let Some(launch) = accepted else {
        return Ok(());
    };

    params.put(&FRAMEWORK_PACKAGING, launch.framework);
    if let Some(main_class) = launch.main_class {
        params.put(&MAIN_CLASS, main_class);
    }
    if !has_preloader {
        if let Some(preloader) = launch.preloader {
            params.put(&PRELOADER, preloader);
        }
    }
    if !has_main_jar {
        params.put(
            &MAIN_JAR,
            RelativeFileSet::single(launch.base_dir, launch.jar),
        );
    }
    if !has_classpath {
        params.put(&CLASSPATH, launch.manifest_classpath.unwrap_or_default());
    }
    Ok(())
}

/// Check that inference (run here if needed) produced a complete launch
/// configuration.
///
/// Fails with a distinct, advice-carrying error for each way the
/// configuration can come up short: a main jar without a discoverable
/// main class, a classpath without one, no main class at all, or a
/// declared main class no application jar provides.
pub fn validate_main_class_info(params: &mut ParamSet) -> Result<(), ConfigError> {
    let has_main_class = params.contains(MAIN_CLASS.id());
    let has_main_jar = params.contains(MAIN_JAR.id());
    let has_classpath = params.contains(CLASSPATH.id());
    let has_module = params.contains(MODULE.id());

    if has_main_class && has_main_jar && has_classpath || has_module {
        return Ok(());
    }

    infer_main_class_info(params)?;

    if !params.contains(MAIN_CLASS.id()) {
        if has_main_jar {
            let main_jar = MAIN_JAR
                .resolve(params)?
                .and_then(|set| {
                    set.included_files()
                        .first()
                        .map(|file| set.resolve(file).display().to_string())
                })
                .unwrap_or_default();
            return Err(ConfigError::NoMainClassInJar { main_jar });
        }
        if has_classpath {
            return Err(ConfigError::NoMainClassOnClasspath);
        }
        return Err(ConfigError::NoMainClass);
    }

    // A declared main class that no candidate jar matched leaves the
    // main jar unresolved; that configuration cannot launch.
    if !params.contains(MAIN_JAR.id()) {
        let main_class = MAIN_CLASS.resolve(params)?.unwrap_or_default();
        return Err(ConfigError::MainClassNotInJars { main_class });
    }

    Ok(())
}

/// Ordered candidate list as (base directory, relative jar path) pairs:
/// the declared main jar's files, else the classpath entries, else every
/// file of every resource bundle in iteration order.
///
/// Classpath entries resolve against the primary app-resources bundle
/// only; when several bundles are present the first one wins.
fn collect_candidates(
    params: &mut ParamSet,
    has_main_jar: bool,
    has_classpath: bool,
) -> Result<Vec<(PathBuf, PathBuf)>, ConfigError> {
    let mut candidates = Vec::new();

    if has_main_jar {
        if let Some(set) = MAIN_JAR.resolve(params)? {
            for file in set.included_files() {
                candidates.push((set.base_dir().to_path_buf(), file.clone()));
            }
        }
    } else if has_classpath {
        let classpath = CLASSPATH.resolve(params)?.unwrap_or_default();
        if let Some(resources) = APP_RESOURCES.resolve(params)? {
            for entry in classpath.split_whitespace() {
                candidates.push((resources.base_dir().to_path_buf(), PathBuf::from(entry)));
            }
        }
    } else if let Some(sets) = APP_RESOURCES_LIST.resolve(params)? {
        for set in &sets {
            for file in set.included_files() {
                candidates.push((set.base_dir().to_path_buf(), file.clone()));
            }
        }
    }

    Ok(candidates)
}

fn scan_candidate(base_dir: &Path, jar: &Path, declared: Option<&str>) -> Scan {
    // Only sniff jars that actually exist on disk.
    if !jar
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("jar"))
    {
        return Scan::Skipped;
    }
    let path = base_dir.join(jar);
    if !path.exists() {
        return Scan::Skipped;
    }

    let jar_manifest = match JarManifest::read_from_jar(&path) {
        Ok(Some(jar_manifest)) => jar_manifest,
        Ok(None) => return Scan::Skipped,
        Err(err) => {
            warn!(jar = %path.display(), %err, "skipping unreadable candidate jar");
            return Scan::Unreadable;
        }
    };

    let plain_main = jar_manifest.attr(manifest::ATTR_MAIN_CLASS);
    let framework_main = jar_manifest.attr(manifest::ATTR_FRAMEWORK_MAIN);

    let (main_class, framework) = if let Some(declared) = declared {
        if framework_main == Some(declared) {
            (None, true)
        } else if plain_main == Some(declared) {
            (None, false)
        } else {
            if let Some(found) = framework_main {
                info!(
                    jar = %jar.display(),
                    found,
                    declared,
                    "jar declares a different framework entry point; continuing scan"
                );
            }
            if let Some(found) = plain_main {
                info!(
                    jar = %jar.display(),
                    found,
                    declared,
                    "jar declares a different main class; continuing scan"
                );
            }
            return Scan::Skipped;
        }
    } else if let Some(found) = framework_main {
        (Some(found.to_owned()), true)
    } else if let Some(found) = plain_main {
        (Some(found.to_owned()), false)
    } else {
        return Scan::Skipped;
    };

    Scan::Accepted(Box::new(LaunchInfo {
        main_class,
        framework,
        preloader: jar_manifest.attr(manifest::ATTR_PRELOADER).map(str::to_owned),
        manifest_classpath: jar_manifest
            .attr(manifest::ATTR_CLASS_PATH)
            .map(str::to_owned),
        base_dir: base_dir.to_path_buf(),
        jar: jar.to_path_buf(),
    }))
}

/// Main class embedded in the module reference (`module/class`), when
/// one is declared.
#[must_use]
pub fn module_main_class(params: &mut ParamSet) -> Option<String> {
    let module = MODULE.resolve(params).ok().flatten()?;
    module
        .split_once('/')
        .map(|(_, main_class)| main_class.to_owned())
}

/// The effective launch class: a module-embedded class takes precedence
/// over the main-class parameter.
pub fn resolved_main_class(params: &mut ParamSet) -> Result<Option<String>, ConfigError> {
    if let Some(main_class) = module_main_class(params) {
        return Ok(Some(main_class));
    }
    MAIN_CLASS.resolve(params)
}

/// On-disk path of the resolved main jar, when one is known.
pub fn main_jar_file(params: &mut ParamSet) -> Result<Option<PathBuf>, ConfigError> {
    Ok(MAIN_JAR.resolve(params)?.and_then(|set| {
        set.included_files()
            .first()
            .map(|file| set.resolve(file))
    }))
}
