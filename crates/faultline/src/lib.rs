//! Error classes for web services
//!
//! One class per HTTP error status (`NotFoundError`, `BadGatewayError`,
//! ...), a fixed REST-code family (`InvalidArgumentError`, ...), and
//! room for dynamically defined classes, all constructing the same
//! [`HttpError`] value: a status code, a stable machine-readable code,
//! a message, structured context, a cause chain, and a backtrace. The
//! value renders a `{code, message}` body for the response layer and a
//! flat [`LogRecord`] for structured logs.
//!
//! ```
//! use faultline::make_err_from_code;
//!
//! let err = make_err_from_code(404, format_args!("no such user: {}", "alice"))?;
//! assert_eq!(err.name(), "NotFoundError");
//! assert_eq!(err.body().code, "NotFound");
//! assert_eq!(err.message(), "no such user: alice");
//! # Ok::<(), faultline::RegistryError>(())
//! ```
//!
//! Classes are descriptors, not types: look one up by name in the
//! [`Registry`], or define your own with [`make_constructor`] /
//! [`ErrorClass::custom`], and build instances with
//! [`ErrorClass::new_error`].

#![allow(
    clippy::missing_errors_doc,
    clippy::must_use_candidate,
    clippy::return_self_not_must_use
)]

use std::sync::Arc;

mod args;
mod class;
mod error;
mod registry;
mod serializer;
mod taxonomy;

pub use args::{ErrorArgs, ErrorOptions};
pub use class::{ClassDefaults, ErrorClass, ErrorKind};
pub use error::{Body, HttpError, MultiError, RestError};
pub use registry::{Registry, RegistryError};
pub use serializer::{LogRecord, serialize};

/// Define and register a class in the process-wide registry
///
/// See [`Registry::make_constructor`].
pub fn make_constructor(
    name: &str,
    defaults: ClassDefaults,
) -> Result<Arc<ErrorClass>, RegistryError> {
    Registry::global().make_constructor(name, defaults)
}

/// Build an instance for an error status code from the process-wide
/// registry
///
/// See [`Registry::make_err_from_code`].
pub fn make_err_from_code(
    status: u16,
    args: impl Into<ErrorArgs>,
) -> Result<HttpError, RegistryError> {
    Registry::global().make_err_from_code(status, args)
}

/// Former name of [`make_err_from_code`]
#[deprecated(note = "renamed to `make_err_from_code`")]
pub fn code_to_http_error(
    status: u16,
    args: impl Into<ErrorArgs>,
) -> Result<HttpError, RegistryError> {
    make_err_from_code(status, args)
}
