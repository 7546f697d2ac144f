//! Packaging error types.
//!
//! Provides semantic errors for parameter resolution, launch-config
//! inference, and artifact generation without exposing implementation
//! details of the underlying storage or archive layers.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while resolving parameters, inferring launch
/// configuration, or writing application-image artifacts.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A parameter key already holds a value incompatible with its
    /// descriptor's declared type. Signals a caller error.
    #[error("parameter `{key}` should hold a {expected} but holds a {actual}")]
    TypeMismatch {
        key: &'static str,
        expected: &'static str,
        actual: &'static str,
    },

    /// A parameter's textual value could not be converted.
    #[error("parameter `{key}` value `{value}` is not valid: {reason}")]
    InvalidValue {
        key: &'static str,
        value: String,
        reason: String,
    },

    /// A main jar was configured but no main class could be determined.
    #[error("no main class was specified, and none was found in the main jar {main_jar}")]
    NoMainClassInJar { main_jar: String },

    /// A classpath was configured but no main class could be determined.
    #[error("no main class was specified, and none was found in the classpath jars")]
    NoMainClassOnClasspath,

    /// No main class could be determined at all.
    #[error("no main class was specified, and none could be inferred")]
    NoMainClass,

    /// A main class was declared but no application jar provides it.
    #[error("the declared main class {main_class} was not found in any application jar")]
    MainClassNotInJars { main_class: String },

    /// The configured main jar exists neither in the resource
    /// directories nor on the module path.
    #[error("the configured main jar {name} does not exist")]
    MainJarNotFound { name: String },

    /// A file or directory needed for the artifact could not be opened
    /// or created.
    #[error("failed to access {path}: {reason}")]
    Resource { path: PathBuf, reason: String },

    /// A bundler template resource is missing from every lookup location.
    #[error("no {name} template resource is available")]
    MissingResource { name: String },
}

impl ConfigError {
    /// A remedy hint for configuration-incompleteness errors.
    #[must_use]
    pub fn advice(&self) -> Option<&'static str> {
        match self {
            Self::NoMainClassInJar { .. } => Some(
                "verify the main jar manifest declares an application entry point, \
                 or specify the main class explicitly",
            ),
            Self::NoMainClassOnClasspath => Some(
                "verify a classpath jar manifest declares an application entry point, \
                 or specify the main class explicitly",
            ),
            Self::NoMainClass => Some(
                "specify the main class explicitly, or provide a jar whose manifest declares one",
            ),
            Self::MainClassNotInJars { .. } => Some(
                "verify the declared main class matches the Main-Class or \
                 JavaFX-Application-Class attribute of an application jar",
            ),
            Self::MainJarNotFound { .. } => {
                Some("the main jar must be specified relative to the app resources root")
            }
            _ => None,
        }
    }
}
