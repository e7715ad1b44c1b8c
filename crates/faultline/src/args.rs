//! Constructor argument normalization
//!
//! Every error class accepts the same handful of call shapes: a bare
//! message, an options mapping, a prior cause, or a cause paired with
//! either of the first two. Callers hand any of those to a constructor
//! via [`ErrorArgs`] conversions; [`ErrorArgs::parse`] reduces the shape
//! to one canonical `{cause, message, options}` split that the uniform
//! construction path consumes.

use std::error::Error as StdError;
use std::fmt;

use http::StatusCode;
use serde_json::{Map, Value};

/// A construction request, one variant per supported call shape
///
/// Values are normally produced through `From` conversions rather than
/// written out: `"boom".into()`, `format_args!("no row {id}").into()`,
/// `(io_err, "read failed").into()`, `ErrorOptions::new().into()`, and
/// so on.
#[derive(Debug, Default)]
pub enum ErrorArgs {
    /// Empty message, every field at its class default
    #[default]
    None,
    /// A plain message
    Message(String),
    /// An options mapping
    Options(ErrorOptions),
    /// An options mapping plus a positional message; the positional
    /// message wins over `options.message`
    OptionsMessage(ErrorOptions, String),
    /// A prior cause with no message of its own
    Cause(anyhow::Error),
    /// A prior cause plus a message
    CauseMessage(anyhow::Error, String),
    /// A prior cause plus an options mapping; the positional cause wins
    /// over `options.cause`
    CauseOptions(anyhow::Error, ErrorOptions),
}

impl ErrorArgs {
    /// Reduce to the canonical split consumed by the constructor path.
    pub(crate) fn parse(self) -> ParsedArgs {
        match self {
            Self::None => ParsedArgs::default(),
            Self::Message(message) => ParsedArgs {
                message: Some(message),
                ..ParsedArgs::default()
            },
            Self::Options(mut options) => ParsedArgs {
                cause: options.cause.take(),
                message: options.message.take(),
                options,
            },
            Self::OptionsMessage(mut options, message) => {
                // Positional (printf-style) message beats options.message.
                options.message = None;
                ParsedArgs {
                    cause: options.cause.take(),
                    message: Some(message),
                    options,
                }
            }
            Self::Cause(cause) => ParsedArgs {
                cause: Some(cause),
                ..ParsedArgs::default()
            },
            Self::CauseMessage(cause, message) => ParsedArgs {
                cause: Some(cause),
                message: Some(message),
                ..ParsedArgs::default()
            },
            Self::CauseOptions(cause, mut options) => {
                // Positional cause beats options.cause.
                options.cause = None;
                ParsedArgs {
                    cause: Some(cause),
                    message: options.message.take(),
                    options,
                }
            }
        }
    }
}

impl From<()> for ErrorArgs {
    fn from((): ()) -> Self {
        Self::None
    }
}

impl From<&str> for ErrorArgs {
    fn from(message: &str) -> Self {
        Self::Message(message.to_owned())
    }
}

impl From<String> for ErrorArgs {
    fn from(message: String) -> Self {
        Self::Message(message)
    }
}

impl From<fmt::Arguments<'_>> for ErrorArgs {
    fn from(message: fmt::Arguments<'_>) -> Self {
        Self::Message(message.to_string())
    }
}

impl From<ErrorOptions> for ErrorArgs {
    fn from(options: ErrorOptions) -> Self {
        Self::Options(options)
    }
}

impl From<(ErrorOptions, &str)> for ErrorArgs {
    fn from((options, message): (ErrorOptions, &str)) -> Self {
        Self::OptionsMessage(options, message.to_owned())
    }
}

impl From<(ErrorOptions, String)> for ErrorArgs {
    fn from((options, message): (ErrorOptions, String)) -> Self {
        Self::OptionsMessage(options, message)
    }
}

impl From<(ErrorOptions, fmt::Arguments<'_>)> for ErrorArgs {
    fn from((options, message): (ErrorOptions, fmt::Arguments<'_>)) -> Self {
        Self::OptionsMessage(options, message.to_string())
    }
}

// Bare `StdError` values convert through `anyhow::Error` first; a
// direct blanket impl here would conflict with `From<()>` under
// coherence.
impl From<anyhow::Error> for ErrorArgs {
    fn from(cause: anyhow::Error) -> Self {
        Self::Cause(cause)
    }
}

impl<E: StdError + Send + Sync + 'static> From<(E, &str)> for ErrorArgs {
    fn from((cause, message): (E, &str)) -> Self {
        Self::CauseMessage(anyhow::Error::new(cause), message.to_owned())
    }
}

impl<E: StdError + Send + Sync + 'static> From<(E, String)> for ErrorArgs {
    fn from((cause, message): (E, String)) -> Self {
        Self::CauseMessage(anyhow::Error::new(cause), message)
    }
}

impl<E: StdError + Send + Sync + 'static> From<(E, fmt::Arguments<'_>)> for ErrorArgs {
    fn from((cause, message): (E, fmt::Arguments<'_>)) -> Self {
        Self::CauseMessage(anyhow::Error::new(cause), message.to_string())
    }
}

impl<E: StdError + Send + Sync + 'static> From<(E, ErrorOptions)> for ErrorArgs {
    fn from((cause, options): (E, ErrorOptions)) -> Self {
        Self::CauseOptions(anyhow::Error::new(cause), options)
    }
}

/// The options mapping accepted by every constructor
///
/// Library-reserved fields (`status_code`, `code`, `rest_code`) stay on
/// this struct and never reach the cause/message side of the split, so
/// they cannot corrupt cause handling the way stray keys could in a
/// dynamically typed options bag.
#[derive(Debug, Default)]
pub struct ErrorOptions {
    pub(crate) message: Option<String>,
    pub(crate) status_code: Option<StatusCode>,
    pub(crate) code: Option<String>,
    pub(crate) rest_code: Option<String>,
    pub(crate) cause: Option<anyhow::Error>,
    pub(crate) info: Map<String, Value>,
}

impl ErrorOptions {
    /// An empty options mapping
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the message; a positional message in the same call wins
    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Override the status code for this instance only
    pub fn status_code(mut self, status_code: StatusCode) -> Self {
        self.status_code = Some(status_code);
        self
    }

    /// Override the machine-readable code for this instance only
    pub fn code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    /// Override the REST code for this instance only
    pub fn rest_code(mut self, rest_code: impl Into<String>) -> Self {
        self.rest_code = Some(rest_code.into());
        self
    }

    /// Attach a prior cause; a positional cause in the same call wins
    pub fn cause(mut self, cause: impl Into<anyhow::Error>) -> Self {
        self.cause = Some(cause.into());
        self
    }

    /// Attach one structured diagnostic entry
    pub fn info(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.info.insert(key.into(), value.into());
        self
    }

    /// Legacy name for [`info`](Self::info); writes the same map
    pub fn context(self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.info(key, value)
    }
}

/// Canonical split of one construction request
///
/// Exists only while a constructor runs.
#[derive(Debug, Default)]
pub(crate) struct ParsedArgs {
    pub(crate) cause: Option<anyhow::Error>,
    pub(crate) message: Option<String>,
    pub(crate) options: ErrorOptions,
}
