//! Class registry
//!
//! Holds the two built-in taxonomies plus dynamically defined classes,
//! keyed by name. A process-wide instance seeds lazily behind
//! [`Registry::global`]; tests that must not share state build their
//! own with [`Registry::builtin`].

use std::sync::{Arc, LazyLock};

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use http::StatusCode;
use tracing::debug;

use crate::args::ErrorArgs;
use crate::class::{ClassDefaults, ErrorClass, ErrorKind};
use crate::error::HttpError;
use crate::taxonomy;

static GLOBAL: LazyLock<Registry> = LazyLock::new(Registry::builtin);

/// Failures from class registration and status-code lookup
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("error class name must not be empty")]
    EmptyName,
    #[error("error class `{0}` is already defined")]
    DuplicateName(String),
    #[error("status code {0} does not identify an error response")]
    UnsupportedStatus(u16),
    #[error("no error class is registered for status code {0}")]
    UnknownClass(u16),
}

/// Name-keyed table of error classes
///
/// Lookup resolves dynamically registered classes first, then the REST
/// taxonomy, then the HTTP taxonomy; that order is what lets the REST
/// `PreconditionFailedError` shadow its HTTP namesake while
/// [`make_err_from_code`](Self::make_err_from_code) still reaches the
/// HTTP one by status.
#[derive(Debug)]
pub struct Registry {
    http: DashMap<String, Arc<ErrorClass>>,
    http_by_status: DashMap<u16, Arc<ErrorClass>>,
    rest: DashMap<String, Arc<ErrorClass>>,
    custom: DashMap<String, Arc<ErrorClass>>,
    http_base: Arc<ErrorClass>,
    rest_base: Arc<ErrorClass>,
}

impl Registry {
    /// The process-wide registry, seeded on first use
    pub fn global() -> &'static Self {
        &GLOBAL
    }

    /// A fresh, isolated registry holding only the built-in taxonomies
    pub fn builtin() -> Self {
        let http = DashMap::new();
        let http_by_status = DashMap::new();
        for class in taxonomy::http_classes() {
            if let Some(status) = class.status_code() {
                http_by_status.insert(status.as_u16(), Arc::clone(&class));
            }
            http.insert(class.name().to_owned(), class);
        }

        let rest = DashMap::new();
        for class in taxonomy::rest_classes() {
            rest.insert(class.name().to_owned(), class);
        }

        debug!(
            http = http.len(),
            rest = rest.len(),
            "seeded error taxonomies"
        );
        Self {
            http,
            http_by_status,
            rest,
            custom: DashMap::new(),
            http_base: ErrorClass::base("HttpError", ErrorKind::Http),
            rest_base: ErrorClass::base("RestError", ErrorKind::Rest),
        }
    }

    /// The base class behind [`HttpError::new`]
    pub fn http_base(&self) -> &Arc<ErrorClass> {
        &self.http_base
    }

    /// The base class behind [`RestError::new`](crate::RestError::new)
    pub fn rest_base(&self) -> &Arc<ErrorClass> {
        &self.rest_base
    }

    /// Look up a class by name
    pub fn get(&self, name: &str) -> Option<Arc<ErrorClass>> {
        if name == self.http_base.name() {
            return Some(Arc::clone(&self.http_base));
        }
        if name == self.rest_base.name() {
            return Some(Arc::clone(&self.rest_base));
        }
        self.custom
            .get(name)
            .or_else(|| self.rest.get(name))
            .or_else(|| self.http.get(name))
            .map(|entry| Arc::clone(entry.value()))
    }

    /// The HTTP taxonomy class for a status code
    pub fn for_status(&self, status: StatusCode) -> Option<Arc<ErrorClass>> {
        self.http_by_status
            .get(&status.as_u16())
            .map(|entry| Arc::clone(entry.value()))
    }

    /// Define and register a new `Rest`-kind class
    ///
    /// The class's `code` and `rest_code` default to the name with one
    /// trailing `Error`/`error` dropped, unless `defaults` overrides
    /// them. Registration is atomic: under concurrent calls with the
    /// same name, exactly one wins.
    ///
    /// # Errors
    ///
    /// [`RegistryError::EmptyName`] for an empty name and
    /// [`RegistryError::DuplicateName`] when any table (either
    /// taxonomy, earlier dynamic registrations, or the base classes)
    /// already holds the name.
    pub fn make_constructor(
        &self,
        name: &str,
        defaults: ClassDefaults,
    ) -> Result<Arc<ErrorClass>, RegistryError> {
        if self.taken_by_builtin(name) {
            return Err(RegistryError::DuplicateName(name.to_owned()));
        }
        let class = ErrorClass::from_defaults(name.to_owned(), defaults)?;
        match self.custom.entry(name.to_owned()) {
            Entry::Occupied(_) => Err(RegistryError::DuplicateName(name.to_owned())),
            Entry::Vacant(slot) => {
                debug!(class = name, "registered error class");
                slot.insert(Arc::clone(&class));
                Ok(class)
            }
        }
    }

    /// Build an instance for an error status code
    ///
    /// Codes without a class of their own fall back to the 500 class,
    /// status and all.
    ///
    /// # Errors
    ///
    /// [`RegistryError::UnsupportedStatus`] when `status` is below 400
    /// or not a representable status code.
    pub fn make_err_from_code(
        &self,
        status: u16,
        args: impl Into<ErrorArgs>,
    ) -> Result<HttpError, RegistryError> {
        if status < 400 {
            return Err(RegistryError::UnsupportedStatus(status));
        }
        let requested =
            StatusCode::from_u16(status).map_err(|_| RegistryError::UnsupportedStatus(status))?;
        let class = match self.for_status(requested) {
            Some(class) => class,
            None => {
                debug!(status, "no class for status code, using the 500 class");
                self.for_status(StatusCode::INTERNAL_SERVER_ERROR)
                    .ok_or_else(|| RegistryError::UnknownClass(status))?
            }
        };
        Ok(class.new_error(args))
    }

    /// Every class in the HTTP taxonomy
    pub fn http_classes(&self) -> Vec<Arc<ErrorClass>> {
        self.http
            .iter()
            .map(|entry| Arc::clone(entry.value()))
            .collect()
    }

    /// Every class in the REST taxonomy
    pub fn rest_classes(&self) -> Vec<Arc<ErrorClass>> {
        self.rest
            .iter()
            .map(|entry| Arc::clone(entry.value()))
            .collect()
    }

    /// Every dynamically registered class
    pub fn custom_classes(&self) -> Vec<Arc<ErrorClass>> {
        self.custom
            .iter()
            .map(|entry| Arc::clone(entry.value()))
            .collect()
    }

    fn taken_by_builtin(&self, name: &str) -> bool {
        name == self.http_base.name()
            || name == self.rest_base.name()
            || self.rest.contains_key(name)
            || self.http.contains_key(name)
    }
}
