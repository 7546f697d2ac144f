//! Module classification and module-path discovery.

use serde::{Deserialize, Serialize};
use std::env;
use std::fs::File;
use std::path::{Path, PathBuf};
use tracing::debug;
use zip::ZipArchive;

const MODULE_DESCRIPTOR: &str = "module-info.class";
const JAR_EXT: &str = "jar";
const JMOD_EXT: &str = "jmod";

/// Classification of a filesystem entry as a module-bearing artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ModuleKind {
    Unknown,
    UnnamedJar,
    ModularJar,
    Jmod,
    ExplodedModule,
}

/// Classify the entry at `path`.
///
/// Pure and recomputed on demand; nothing is cached. A jar is modular
/// when it carries a module descriptor entry; a directory is an exploded
/// module when it carries a module descriptor file.
#[must_use]
pub fn classify(path: &Path) -> ModuleKind {
    if path.is_file() {
        if has_extension(path, JMOD_EXT) {
            ModuleKind::Jmod
        } else if has_extension(path, JAR_EXT) {
            classify_jar(path)
        } else {
            ModuleKind::Unknown
        }
    } else if path.is_dir() {
        if path.join(MODULE_DESCRIPTOR).exists() {
            ModuleKind::ExplodedModule
        } else {
            ModuleKind::Unknown
        }
    } else {
        ModuleKind::Unknown
    }
}

fn classify_jar(path: &Path) -> ModuleKind {
    // An archive that cannot be opened still names a jar; treat it as
    // unnamed rather than failing classification.
    let Ok(file) = File::open(path) else {
        return ModuleKind::UnnamedJar;
    };
    let Ok(mut archive) = ZipArchive::new(file) else {
        return ModuleKind::UnnamedJar;
    };
    if archive.by_name(MODULE_DESCRIPTOR).is_ok() {
        ModuleKind::ModularJar
    } else {
        ModuleKind::UnnamedJar
    }
}

fn has_extension(path: &Path, ext: &str) -> bool {
    path.extension()
        .is_some_and(|e| e.eq_ignore_ascii_case(ext))
}

/// Module name of an artifact: the file stem for archives, the directory
/// name for exploded modules.
#[must_use]
pub fn module_name(path: &Path) -> Option<String> {
    if classify(path) == ModuleKind::ExplodedModule {
        path.file_name().map(|n| n.to_string_lossy().into_owned())
    } else {
        path.file_stem().map(|n| n.to_string_lossy().into_owned())
    }
}

/// Locate `name` as an entry of one of the module search path
/// directories.
#[must_use]
pub fn find_module_path(search_path: &[PathBuf], name: &str) -> Option<PathBuf> {
    search_path
        .iter()
        .map(|dir| dir.join(name))
        .find(|candidate| candidate.exists())
}

/// Default JDK module path: `$JAVA_HOME/jmods`, falling back to the
/// developer-build layout reachable from `$JDK_HOME`.
#[must_use]
pub fn default_module_path() -> Vec<PathBuf> {
    if let Ok(home) = env::var("JAVA_HOME") {
        let jmods = Path::new(&home).join("jmods");
        if jmods.exists() {
            return vec![jmods];
        }
    }
    // Developer builds keep jmods under the images directory next to the
    // JDK home.
    if let Ok(home) = env::var("JDK_HOME") {
        let jmods = Path::new(&home).join("..").join("images").join("jmods");
        if jmods.exists() {
            return vec![jmods];
        }
    }
    debug!("no JDK module path could be discovered");
    Vec::new()
}
