//! Error values
//!
//! Every class constructs the same concrete value, [`HttpError`]; which
//! class built it travels along as an `Arc` to the descriptor, and the
//! resolution chain (instance override, then class default, then the
//! library fallback) runs at read time. [`RestError`] wraps the same
//! value for REST-taxonomy call sites, and [`MultiError`] aggregates
//! several underlying errors for the serializer.

use std::backtrace::{Backtrace, BacktraceStatus};
use std::error::Error as StdError;
use std::fmt;
use std::ops::Deref;
use std::sync::Arc;

use http::StatusCode;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value, json};

use crate::args::{ErrorArgs, ParsedArgs};
use crate::class::{ErrorClass, ErrorKind};
use crate::registry::Registry;

/// The error value produced by every class in the library
///
/// Carries the class it was built from, the instance message and field
/// overrides, optional structured context, a prior cause, and a
/// backtrace captured at construction.
#[derive(Debug)]
pub struct HttpError {
    class: Arc<ErrorClass>,
    message: String,
    status_code: Option<StatusCode>,
    code: Option<String>,
    rest_code: Option<String>,
    info: Map<String, Value>,
    cause: Option<anyhow::Error>,
    backtrace: Backtrace,
}

impl HttpError {
    /// Construct from the generic HTTP base class
    pub fn new(args: impl Into<ErrorArgs>) -> Self {
        Registry::global().http_base().new_error(args)
    }

    /// The single assembly path shared by every constructor.
    pub(crate) fn build(class: Arc<ErrorClass>, parsed: ParsedArgs) -> Self {
        let ParsedArgs {
            cause,
            message,
            options,
        } = parsed;
        Self {
            class,
            message: message.unwrap_or_default(),
            status_code: options.status_code,
            code: options.code,
            rest_code: options.rest_code,
            info: options.info,
            cause,
            backtrace: Backtrace::capture(),
        }
    }

    /// The class name, e.g. `"NotFoundError"`
    pub fn name(&self) -> &str {
        self.class.name()
    }

    /// The class this instance was built from
    pub fn class(&self) -> &ErrorClass {
        &self.class
    }

    pub fn kind(&self) -> ErrorKind {
        self.class.kind()
    }

    /// The instance message, without any cause suffix
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Instance status code, falling back to the class default
    ///
    /// An options mapping that carries no status code never clobbers
    /// the class default.
    pub fn status_code(&self) -> Option<StatusCode> {
        self.status_code.or_else(|| self.class.status_code())
    }

    /// Machine-readable code: instance, else class, else `"Error"`
    pub fn code(&self) -> &str {
        self.code
            .as_deref()
            .or_else(|| self.class.code())
            .unwrap_or("Error")
    }

    /// REST code: instance, else class, else `"Error"`
    pub fn rest_code(&self) -> &str {
        self.rest_code
            .as_deref()
            .or_else(|| self.class.rest_code())
            .unwrap_or("Error")
    }

    /// Structured context attached at construction
    pub fn info(&self) -> &Map<String, Value> {
        &self.info
    }

    /// Legacy name for [`info`](Self::info); reads the same map
    pub fn context(&self) -> &Map<String, Value> {
        &self.info
    }

    /// Instance context entry, falling back to the class defaults
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.info.get(key).or_else(|| self.class.default_field(key))
    }

    /// The underlying cause, if one was attached
    pub fn cause(&self) -> Option<&anyhow::Error> {
        self.cause.as_ref()
    }

    /// The client-facing `{code, message}` body; the message here is
    /// the bare instance message, without any cause suffix
    pub fn body(&self) -> Body {
        Body {
            code: self.body_code().to_owned(),
            message: self.message.clone(),
        }
    }

    /// The body with the cause chain folded into the message; this is
    /// the shape `Serialize` emits
    pub fn to_json(&self) -> Value {
        json!({ "code": self.body_code(), "message": self.full_message() })
    }

    /// The header line `"{name}: {message}"` followed by the captured
    /// backtrace, with leading library-internal frames trimmed so the
    /// first frame is the construction call site
    ///
    /// When backtrace capture is disabled (no `RUST_BACKTRACE` /
    /// `RUST_LIB_BACKTRACE`), only the header line is returned.
    pub fn stack(&self) -> String {
        let mut stack = String::new();
        stack.push_str(self.class.name());
        if !self.message.is_empty() {
            stack.push_str(": ");
            stack.push_str(&self.message);
        }
        if matches!(self.backtrace.status(), BacktraceStatus::Captured) {
            stack.push_str(&trim_internal_frames(&self.backtrace.to_string()));
        }
        stack
    }

    fn body_code(&self) -> &str {
        match self.class.kind() {
            ErrorKind::Http => self.code(),
            ErrorKind::Rest => self.rest_code(),
        }
    }

    /// Message plus the `"; caused by ..."` suffix when a cause exists.
    pub(crate) fn full_message(&self) -> String {
        self.cause.as_ref().map_or_else(
            || self.message.clone(),
            |cause| format!("{}; caused by {cause}", self.message),
        )
    }
}

impl Default for HttpError {
    fn default() -> Self {
        Self::new(())
    }
}

impl fmt::Display for HttpError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.class.name())?;
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        if let Some(cause) = &self.cause {
            write!(f, "; caused by {cause}")?;
        }
        Ok(())
    }
}

impl StdError for HttpError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.cause
            .as_ref()
            .map(|cause| -> &(dyn StdError + 'static) { &**cause })
    }
}

impl Serialize for HttpError {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        Body {
            code: self.body_code().to_owned(),
            message: self.full_message(),
        }
        .serialize(serializer)
    }
}

/// The `{code, message}` response body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Body {
    pub code: String,
    pub message: String,
}

/// An error value from the REST-code taxonomy
///
/// A newtype over [`HttpError`]; everything resolves through the
/// wrapped value via `Deref`, and `body().code` renders the REST code.
#[derive(Debug)]
pub struct RestError(HttpError);

impl RestError {
    /// Construct from the generic REST base class
    pub fn new(args: impl Into<ErrorArgs>) -> Self {
        Self(Registry::global().rest_base().new_error(args))
    }

    pub fn as_http_error(&self) -> &HttpError {
        &self.0
    }

    pub fn into_http_error(self) -> HttpError {
        self.0
    }
}

impl Default for RestError {
    fn default() -> Self {
        Self::new(())
    }
}

impl Deref for RestError {
    type Target = HttpError;

    fn deref(&self) -> &HttpError {
        &self.0
    }
}

impl TryFrom<HttpError> for RestError {
    type Error = HttpError;

    /// Succeeds only for values built from a `Rest`-kind class; the
    /// original value comes back otherwise.
    fn try_from(err: HttpError) -> Result<Self, HttpError> {
        if err.kind() == ErrorKind::Rest {
            Ok(Self(err))
        } else {
            Err(err)
        }
    }
}

impl fmt::Display for RestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl StdError for RestError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.0.source()
    }
}

impl Serialize for RestError {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.0.serialize(serializer)
    }
}

/// Aggregate of several underlying errors
///
/// Displays as `"first of N errors: <first>"` and exposes the full
/// list; the serializer renders every member with an indexed prefix.
#[derive(Debug, Default)]
pub struct MultiError {
    errors: Vec<anyhow::Error>,
}

impl MultiError {
    /// The name the serializer reports for aggregates
    pub const NAME: &'static str = "MultiError";

    pub fn new(errors: Vec<anyhow::Error>) -> Self {
        Self { errors }
    }

    pub fn errors(&self) -> &[anyhow::Error] {
        &self.errors
    }
}

impl fmt::Display for MultiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let count = self.errors.len();
        let noun = if count == 1 { "error" } else { "errors" };
        write!(f, "first of {count} {noun}")?;
        if let Some(first) = self.errors.first() {
            write!(f, ": {first}")?;
        }
        Ok(())
    }
}

impl StdError for MultiError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.errors
            .first()
            .map(|cause| -> &(dyn StdError + 'static) { &**cause })
    }
}

/// Drop every leading frame that belongs to this library or to the
/// capture machinery itself, keeping everything from the first foreign
/// frame on. Returns the kept lines, each preceded by a newline.
fn trim_internal_frames(rendered: &str) -> String {
    let mut kept = String::new();
    let mut keeping = false;
    for line in rendered.lines() {
        if !keeping && starts_frame(line) && !is_internal_frame(line) {
            keeping = true;
        }
        if keeping {
            kept.push('\n');
            kept.push_str(line);
        }
    }
    kept
}

/// Frame lines render as `"{index}: {symbol}"`; location lines attach
/// to the frame above them.
fn starts_frame(line: &str) -> bool {
    let trimmed = line.trim_start();
    let rest = trimmed.trim_start_matches(|c: char| c.is_ascii_digit());
    rest.len() < trimmed.len() && rest.starts_with(": ")
}

fn is_internal_frame(line: &str) -> bool {
    line.contains("faultline::") || line.contains("std::backtrace")
}
