//! Class-data-sharing cache plan.
//!
//! When CDS is enabled, the launcher needs two extra option sections
//! (one to run with an existing shared archive, one to generate it) plus
//! a class-list file the generate step reads. The class list is staged
//! in a transient directory and registered as an application resource so
//! the bundler copies it next to the package directory.

use crate::cfg::Section;
use jarbox_core::params::standard::{APP_CDS_CLASS_ROOTS, APP_FS_NAME, APP_RESOURCES_LIST, VERBOSE};
use jarbox_core::{ConfigError, ParamSet, RelativeFileSet};
use std::fs;

const UNLOCK_FLAG: &str = "-XX:+UnlockCommercialFeatures";
const USE_CDS_FLAG: &str = "-XX:+UseAppCDS";

pub(crate) fn prepare_app_cds(
    params: &mut ParamSet,
    cache_location: &str,
    sections: &mut Vec<Section>,
) -> Result<(), ConfigError> {
    let fs_name = APP_FS_NAME.resolve(params)?.unwrap_or_default();
    let class_roots = APP_CDS_CLASS_ROOTS.resolve(params)?.unwrap_or_default();
    let verbose = VERBOSE.resolve(params)?.unwrap_or(false);

    // Transient staging area; cleanup after the run is the caller's
    // responsibility, like any partial output.
    let staging_dir = tempfile::Builder::new()
        .prefix("jarbox")
        .tempdir()
        .map_err(|err| ConfigError::Resource {
            path: std::env::temp_dir(),
            reason: err.to_string(),
        })?
        .into_path();

    let list_name = format!("{fs_name}.classlist");
    let list_file = staging_dir.join(&list_name);

    let mut class_list = String::new();
    for class in &class_roots {
        class_list.push_str(&class.replace('.', "/"));
        class_list.push('\n');
    }
    fs::write(&list_file, class_list).map_err(|err| ConfigError::Resource {
        path: list_file.clone(),
        reason: err.to_string(),
    })?;

    // The class list rides along as an extra application resource so the
    // generate step can find it relative to its own package directory.
    let mut resource_sets = APP_RESOURCES_LIST.resolve(params)?.unwrap_or_default();
    resource_sets.push(RelativeFileSet::single(&staging_dir, &list_name));
    params.put(&APP_RESOURCES_LIST, resource_sets);

    let archive_flag = format!("-XX:SharedArchiveFile={cache_location}{fs_name}.jpa");

    let mut use_lines = vec![
        UNLOCK_FLAG.to_owned(),
        archive_flag.clone(),
        "-Xshare:auto".to_owned(),
        USE_CDS_FLAG.to_owned(),
    ];
    if verbose {
        use_lines.push("-verbose:class".to_owned());
        use_lines.push("-XX:+TraceClassPaths".to_owned());
        use_lines.push("-XX:+UnlockDiagnosticVMOptions".to_owned());
    }
    sections.push(Section::new("AppCDSJVMOptions", use_lines));

    let mut generate_lines = vec![
        UNLOCK_FLAG.to_owned(),
        "-Xshare:dump".to_owned(),
        USE_CDS_FLAG.to_owned(),
        archive_flag,
        format!("-XX:SharedClassListFile=$PACKAGEDIR/{list_name}"),
    ];
    if verbose {
        generate_lines.push("-XX:+UnlockDiagnosticVMOptions".to_owned());
    }
    sections.push(Section::new("AppCDSGenerateCacheJVMOptions", generate_lines));

    Ok(())
}
