//! Integration tests for the generated launcher configuration file.

use anyhow::Result;
use indexmap::IndexMap;
use jarbox_core::params::standard::{
    APP_NAME, APP_RESOURCES, ARGUMENTS, CLASSPATH, DEBUG, ENABLE_APP_CDS, JVM_OPTIONS,
    JVM_PROPERTIES, MAIN_CLASS, MAIN_JAR, MODULE, PATH_LIST_SEPARATOR, PRELOADER, SINGLETON,
    UNLOCK_COMMERCIAL_FEATURES, USER_JVM_OPTIONS, VERSION,
};
use jarbox_core::{ParamSet, RelativeFileSet};
use jarbox_image::{AppImageBuilder, ResourceLookup};
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;
use std::sync::Arc;
use tempfile::tempdir;
use zip::write::{SimpleFileOptions, ZipWriter};

struct NoResources;

impl ResourceLookup for NoResources {
    fn open(&self, _name: &str) -> Option<Box<dyn Read + Send>> {
        None
    }
}

fn builder() -> AppImageBuilder {
    AppImageBuilder::new(Arc::new(NoResources), "$APPDIR/")
}

fn write_jar(path: &Path, entries: &[&str], manifest: Option<&str>) -> Result<()> {
    let file = File::create(path)?;
    let mut zip = ZipWriter::new(file);
    if let Some(manifest) = manifest {
        zip.start_file("META-INF/MANIFEST.MF", SimpleFileOptions::default())?;
        zip.write_all(manifest.as_bytes())?;
    }
    for entry in entries {
        zip.start_file(*entry, SimpleFileOptions::default())?;
        zip.write_all(b"\xca\xfe\xba\xbe")?;
    }
    zip.finish()?;
    Ok(())
}

#[test]
fn test_application_section_round_trip() -> Result<()> {
    let dir = tempdir()?;
    write_jar(&dir.path().join("app.jar"), &["com/demo/Main.class"], None)?;

    let mut params = ParamSet::new();
    params.put(&APP_NAME, "Demo".to_owned());
    params.put(&VERSION, "1.0".to_owned());
    params.put(&MAIN_CLASS, "com.demo.Main".to_owned());
    params.put(&MAIN_JAR, RelativeFileSet::single(dir.path(), "app.jar"));
    params.put_text(
        CLASSPATH.id(),
        format!("a.jar{PATH_LIST_SEPARATOR}b.jar"),
    );

    let cfg_file = dir.path().join("Demo.cfg");
    builder().write_cfg_file(&mut params, &cfg_file, "$APPDIR/runtime")?;

    let text = std::fs::read_to_string(&cfg_file)?;
    assert!(text.starts_with("[Application]\n"));
    assert!(text.contains("app.name=Demo\n"));
    assert!(text.contains("app.version=1.0\n"));
    assert!(text.contains("app.runtime=$APPDIR/runtime\n"));
    assert!(text.contains("app.identifier=com.demo\n"));
    assert!(text.contains("app.preferences.id=com/demo\n"));
    assert!(text.contains(&format!(
        "app.classpath=a.jar{PATH_LIST_SEPARATOR}b.jar\n"
    )));
    assert!(text.contains("app.application.instance=multiple\n"));

    // A classic unnamed jar launches by class + jar, slash form.
    assert!(text.contains("app.mainclass=com/demo/Main\n"));
    assert!(text.contains("app.mainjar=app.jar\n"));
    assert!(!text.contains("app.mainmodule="));
    Ok(())
}

#[test]
fn test_section_order_is_fixed() -> Result<()> {
    let mut params = ParamSet::new();
    params.put(&APP_NAME, "Demo".to_owned());
    params.put(&MAIN_CLASS, "com.demo.Main".to_owned());

    let sections = builder().build_cfg(&mut params, "runtime")?;
    let names: Vec<_> = sections.iter().map(|section| section.name).collect();
    assert_eq!(names, vec!["Application", "JVMOptions", "JVMUserOptions", "ArgOptions"]);
    Ok(())
}

#[test]
fn test_modular_main_jar_emits_module_reference() -> Result<()> {
    let dir = tempdir()?;
    write_jar(
        &dir.path().join("app.jar"),
        &["module-info.class", "com/demo/Main.class"],
        None,
    )?;

    let mut params = ParamSet::new();
    params.put(&APP_NAME, "Demo".to_owned());
    params.put(&MODULE, "com.demo/com.demo.Main".to_owned());
    params.put(&MAIN_JAR, RelativeFileSet::single(dir.path(), "app.jar"));

    let sections = builder().build_cfg(&mut params, "runtime")?;
    let app = &sections[0];
    assert!(
        app.lines
            .contains(&"app.mainmodule=com.demo/com.demo.Main".to_owned())
    );
    assert!(!app.lines.iter().any(|line| line.starts_with("app.mainclass=")));
    assert!(!app.lines.iter().any(|line| line.starts_with("app.mainjar=")));
    Ok(())
}

#[test]
fn test_jvm_options_properties_and_preloader() -> Result<()> {
    let mut params = ParamSet::new();
    params.put(&APP_NAME, "Demo".to_owned());
    params.put(&MAIN_CLASS, "com.demo.Main".to_owned());
    params.put(&JVM_OPTIONS, vec!["-Xmx512m".to_owned(), "-ea".to_owned()]);
    let mut properties = IndexMap::new();
    properties.insert("file.encoding".to_owned(), "UTF-8".to_owned());
    properties.insert("demo.mode".to_owned(), "full".to_owned());
    params.put(&JVM_PROPERTIES, properties);
    params.put(&PRELOADER, "com.demo.Splash".to_owned());

    let sections = builder().build_cfg(&mut params, "runtime")?;
    let jvm = &sections[1];
    assert_eq!(
        jvm.lines,
        vec![
            "-Xmx512m",
            "-ea",
            "-Dfile.encoding=UTF-8",
            "-Ddemo.mode=full",
            "-Djavafx.preloader=com.demo.Splash",
        ]
    );
    Ok(())
}

#[test]
fn test_user_jvm_options_escape_keys_and_drop_malformed() -> Result<()> {
    let mut params = ParamSet::new();
    params.put(&APP_NAME, "Demo".to_owned());
    params.put(&MAIN_CLASS, "com.demo.Main".to_owned());
    let mut user = IndexMap::new();
    user.insert("-Xmx".to_owned(), "768m".to_owned());
    user.insert("opt=extra".to_owned(), "on".to_owned());
    user.insert(String::new(), "orphan value".to_owned());
    user.insert("orphan.key".to_owned(), String::new());
    params.put(&USER_JVM_OPTIONS, user);

    let sections = builder().build_cfg(&mut params, "runtime")?;
    let user_section = &sections[2];
    assert_eq!(user_section.lines, vec!["-Xmx=768m", "opt\\=extra=on"]);
    Ok(())
}

#[test]
fn test_argument_escaping() -> Result<()> {
    let mut params = ParamSet::new();
    params.put(&APP_NAME, "Demo".to_owned());
    params.put(&MAIN_CLASS, "com.demo.Main".to_owned());
    params.put(
        &ARGUMENTS,
        vec!["key=".to_owned(), "key=value".to_owned(), "plain".to_owned()],
    );

    let sections = builder().build_cfg(&mut params, "runtime")?;
    let args = sections.last().expect("arg section present");
    assert_eq!(args.name, "ArgOptions");
    assert_eq!(args.lines, vec!["key\\=", "key=value", "plain"]);
    Ok(())
}

#[test]
fn test_debug_port_appends_agent_line() -> Result<()> {
    let mut params = ParamSet::new();
    params.put(&APP_NAME, "Demo".to_owned());
    params.put(&MAIN_CLASS, "com.demo.Main".to_owned());
    params.put(&DEBUG, 5005);

    let sections = builder().build_cfg(&mut params, "runtime")?;
    assert!(sections[0].lines.contains(
        &"app.debug=-agentlib:jdwp=transport=dt_socket,server=y,suspend=y,address=localhost:5005"
            .to_owned()
    ));
    Ok(())
}

#[test]
fn test_singleton_flag_switches_instance_mode() -> Result<()> {
    let mut params = ParamSet::new();
    params.put(&APP_NAME, "Demo".to_owned());
    params.put(&MAIN_CLASS, "com.demo.Main".to_owned());
    params.put(&SINGLETON, true);

    let sections = builder().build_cfg(&mut params, "runtime")?;
    assert!(
        sections[0]
            .lines
            .contains(&"app.application.instance=single".to_owned())
    );
    Ok(())
}

#[test]
fn test_cds_sections_between_user_options_and_args() -> Result<()> {
    let dir = tempdir()?;

    let mut params = ParamSet::new();
    params.put(&APP_NAME, "Demo".to_owned());
    params.put(&MAIN_CLASS, "com.demo.Main".to_owned());
    params.put(&APP_RESOURCES, RelativeFileSet::new(dir.path(), Vec::new()));
    params.put(&UNLOCK_COMMERCIAL_FEATURES, true);
    params.put(&ENABLE_APP_CDS, true);
    params.put_text("commercial.AppCDS.cache", "auto+install");

    let sections = builder().build_cfg(&mut params, "runtime")?;
    let names: Vec<_> = sections.iter().map(|section| section.name).collect();
    assert_eq!(
        names,
        vec![
            "Application",
            "JVMOptions",
            "JVMUserOptions",
            "AppCDSJVMOptions",
            "AppCDSGenerateCacheJVMOptions",
            "ArgOptions",
        ]
    );

    // Only the cache mode before `+` reaches the launcher.
    assert!(sections[0].lines.contains(&"app.appcds.cache=auto".to_owned()));

    // The class list was staged and registered as an app resource.
    let resource_sets = jarbox_core::params::standard::APP_RESOURCES_LIST
        .resolve(&mut params)?
        .expect("resource list present");
    assert_eq!(resource_sets.len(), 2);
    let staged = resource_sets.last().expect("staged class list");
    assert!(staged.resolve(&staged.included_files()[0]).exists());
    std::fs::remove_dir_all(staged.base_dir()).ok();
    Ok(())
}

#[test]
fn test_cds_disabled_without_commercial_features() -> Result<()> {
    let mut params = ParamSet::new();
    params.put(&APP_NAME, "Demo".to_owned());
    params.put(&MAIN_CLASS, "com.demo.Main".to_owned());
    params.put(&ENABLE_APP_CDS, true);

    let sections = builder().build_cfg(&mut params, "runtime")?;
    assert!(!sections.iter().any(|section| section.name.starts_with("AppCDS")));
    Ok(())
}
