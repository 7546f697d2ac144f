//! Parameter descriptors and the resolution contract.

use super::{ParamSet, ParamValue, Value};
use crate::error::ConfigError;

/// Default computation for an unset key.
///
/// Not a pure function: a default may resolve other descriptors and store
/// newly derived keys into the set as a side effect; this is how
/// inference propagates results. A default is invoked at most once per
/// set for a given key; its non-null result is written back (memoized).
pub type DefaultFn<T> = fn(&mut ParamSet) -> Option<T>;

/// Converter from raw textual input (command-line style) to a typed value.
pub type ConvertFn<T> = fn(&str, &mut ParamSet) -> Result<T, ConfigError>;

/// Describes one configuration key: identifier, declared value type, an
/// optional default computation, and an optional string converter.
///
/// Descriptors are `static` items; nothing can be registered once a run
/// has started, which keeps the default dependency graph inspectable.
/// Callers are responsible for layering defaults so resolution
/// terminates: a default must not resolve its own key with defaults
/// enabled.
pub struct Param<T: ParamValue> {
    id: &'static str,
    default: Option<DefaultFn<T>>,
    convert: Option<ConvertFn<T>>,
}

impl<T: ParamValue> Param<T> {
    #[must_use]
    pub const fn new(
        id: &'static str,
        default: Option<DefaultFn<T>>,
        convert: Option<ConvertFn<T>>,
    ) -> Self {
        Self {
            id,
            default,
            convert,
        }
    }

    /// The map key this descriptor resolves.
    #[must_use]
    pub const fn id(&self) -> &'static str {
        self.id
    }

    /// Resolve this parameter, invoking the default computation when the
    /// key is unset.
    ///
    /// Resolution is idempotent: once the set holds a value (including an
    /// explicit null), repeated calls return it without re-running the
    /// default.
    pub fn resolve(&self, params: &mut ParamSet) -> Result<Option<T>, ConfigError> {
        self.resolve_inner(params, true)
    }

    /// Resolve without invoking the default computation.
    pub fn resolve_no_default(&self, params: &mut ParamSet) -> Result<Option<T>, ConfigError> {
        self.resolve_inner(params, false)
    }

    fn resolve_inner(
        &self,
        params: &mut ParamSet,
        invoke_default: bool,
    ) -> Result<Option<T>, ConfigError> {
        // Stored textual values go through the converter; the converted
        // value is not written back.
        if let Some(convert) = self.convert {
            if let Some(raw) = params.raw_str(self.id).map(str::to_owned) {
                return convert(&raw, params).map(Some);
            }
        }

        match params.get(self.id) {
            Some(Value::Null) => return Ok(None),
            Some(value) => {
                return match T::from_value(value) {
                    Some(typed) => Ok(Some(typed)),
                    None => Err(ConfigError::TypeMismatch {
                        key: self.id,
                        expected: T::TYPE_NAME,
                        actual: value.type_name(),
                    }),
                };
            }
            None => {}
        }

        if invoke_default {
            if let Some(default) = self.default {
                if let Some(derived) = default(params) {
                    params.put_value(self.id, derived.clone().into_value());
                    return Ok(Some(derived));
                }
            }
        }

        Ok(None)
    }
}
