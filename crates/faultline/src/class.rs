//! Error class descriptors
//!
//! An [`ErrorClass`] is an immutable description of one error shape:
//! its name, taxonomy kind, and default status/code fields. Classes do
//! not form a type hierarchy; every instance is an
//! [`HttpError`](crate::HttpError) carrying an `Arc` to its class, and
//! "is this a NotFoundError" becomes a name or kind check on the value.

use std::sync::Arc;

use http::StatusCode;
use serde_json::{Map, Value};

use crate::args::ErrorArgs;
use crate::error::HttpError;
use crate::registry::RegistryError;

/// Which taxonomy a class belongs to
///
/// The kind decides which code field an instance renders into its wire
/// body: `code` for [`Http`](Self::Http), `rest_code` for
/// [`Rest`](Self::Rest).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Status-code taxonomy (`BadRequestError`, `NotFoundError`, ...)
    Http,
    /// REST-code taxonomy (`InvalidArgumentError`, ...) and every
    /// dynamically defined class
    Rest,
}

/// Immutable descriptor for one error class
#[derive(Debug)]
pub struct ErrorClass {
    name: String,
    kind: ErrorKind,
    status_code: Option<StatusCode>,
    code: Option<String>,
    rest_code: Option<String>,
    defaults: Map<String, Value>,
}

impl ErrorClass {
    pub(crate) fn builtin(
        name: impl Into<String>,
        kind: ErrorKind,
        status_code: Option<StatusCode>,
    ) -> Arc<Self> {
        let name = name.into();
        let code = strip_error_suffix(&name);
        let (code, rest_code) = match kind {
            ErrorKind::Http => (code, None),
            ErrorKind::Rest => (None, code),
        };
        Arc::new(Self {
            name,
            kind,
            status_code,
            code,
            rest_code,
            defaults: Map::new(),
        })
    }

    pub(crate) fn base(name: &str, kind: ErrorKind) -> Arc<Self> {
        Arc::new(Self {
            name: name.to_owned(),
            kind,
            status_code: None,
            code: None,
            rest_code: None,
            defaults: Map::new(),
        })
    }

    /// Build a caller-held class without registering it anywhere
    ///
    /// The class behaves exactly like one produced by
    /// [`Registry::make_constructor`](crate::Registry::make_constructor),
    /// but it is invisible to name lookup and free of the unique-name
    /// requirement.
    ///
    /// # Errors
    ///
    /// Fails with [`RegistryError::EmptyName`] when `name` is empty.
    pub fn custom(
        name: impl Into<String>,
        defaults: ClassDefaults,
    ) -> Result<Arc<Self>, RegistryError> {
        Self::from_defaults(name.into(), defaults)
    }

    pub(crate) fn from_defaults(
        name: String,
        defaults: ClassDefaults,
    ) -> Result<Arc<Self>, RegistryError> {
        if name.is_empty() {
            return Err(RegistryError::EmptyName);
        }
        let derived = strip_error_suffix(&name);
        Ok(Arc::new(Self {
            code: defaults.code.or_else(|| derived.clone()),
            rest_code: defaults.rest_code.or(derived),
            name,
            kind: ErrorKind::Rest,
            status_code: defaults.status_code,
            defaults: defaults.extra,
        }))
    }

    /// Construct an instance of this class
    ///
    /// Accepts any of the supported call shapes through
    /// [`ErrorArgs`] conversions; construction never fails.
    pub fn new_error(self: &Arc<Self>, args: impl Into<ErrorArgs>) -> HttpError {
        HttpError::build(Arc::clone(self), args.into().parse())
    }

    /// The unique class name, e.g. `"NotFoundError"`
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Default status code, if the class carries one
    pub fn status_code(&self) -> Option<StatusCode> {
        self.status_code
    }

    /// Class-level default for the machine-readable code
    pub fn code(&self) -> Option<&str> {
        self.code.as_deref()
    }

    /// Class-level default for the REST code
    pub fn rest_code(&self) -> Option<&str> {
        self.rest_code.as_deref()
    }

    /// Extra class-wide default fields, readable from instances
    pub fn defaults(&self) -> &Map<String, Value> {
        &self.defaults
    }

    pub(crate) fn default_field(&self, key: &str) -> Option<&Value> {
        self.defaults.get(key)
    }
}

/// Defaults applied to every instance of a dynamically defined class
#[derive(Debug, Default)]
pub struct ClassDefaults {
    pub(crate) status_code: Option<StatusCode>,
    pub(crate) code: Option<String>,
    pub(crate) rest_code: Option<String>,
    pub(crate) extra: Map<String, Value>,
}

impl ClassDefaults {
    pub fn new() -> Self {
        Self::default()
    }

    /// Default status code for instances of the class
    pub fn status_code(mut self, status_code: StatusCode) -> Self {
        self.status_code = Some(status_code);
        self
    }

    /// Override the code derived from the class name
    pub fn code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    /// Override the REST code derived from the class name
    pub fn rest_code(mut self, rest_code: impl Into<String>) -> Self {
        self.rest_code = Some(rest_code.into());
        self
    }

    /// Attach an arbitrary class-wide field, readable via
    /// [`HttpError::get`](crate::HttpError::get)
    pub fn field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }
}

/// Derive a default code from a class name by dropping one trailing
/// `Error`/`error`. Yields `None` when nothing is left.
fn strip_error_suffix(name: &str) -> Option<String> {
    let stripped = name
        .strip_suffix("Error")
        .or_else(|| name.strip_suffix("error"))
        .unwrap_or(name);
    if stripped.is_empty() {
        None
    } else {
        Some(stripped.to_owned())
    }
}
