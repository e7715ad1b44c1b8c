//! Log serialization
//!
//! Renders any error into a flat [`LogRecord`] for structured log
//! pipelines: name, message, resolved code, and a stack rendering that
//! walks the whole cause chain. Total by construction; a pathological
//! input degrades to a marker string instead of a panic.

use std::error::Error as StdError;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::{HttpError, MultiError, RestError};

/// Chain elements rendered before giving up on a cyclic `source()`.
const MAX_CHAIN: usize = 100;
/// Container nesting beyond which context values render as a marker.
const MAX_VALUE_DEPTH: usize = 64;

/// Flat rendering of one error for log output
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogRecord {
    pub message: String,
    pub name: String,
    pub stack: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signal: Option<String>,
}

/// Render an error into a [`LogRecord`]
///
/// Works on any error: library values contribute their class name,
/// resolved code, captured stack, and structured context; foreign
/// errors fall back to their `Display` rendering under the name
/// `"Error"`. Never fails.
pub fn serialize(err: &(dyn StdError + 'static)) -> LogRecord {
    if let Some(multi) = err.downcast_ref::<MultiError>() {
        return serialize_multi(multi);
    }
    LogRecord {
        message: message_of(err),
        name: name_of(err),
        stack: chain_stack(err),
        code: as_library_error(err).map(|library| library.code().to_owned()),
        // The signal field carries the raw string, not its JSON text.
        signal: as_library_error(err)
            .and_then(|library| library.get("signal"))
            .and_then(Value::as_str)
            .map(str::to_owned),
    }
}

fn serialize_multi(multi: &MultiError) -> LogRecord {
    let total = multi.errors().len();
    let stack = multi
        .errors()
        .iter()
        .enumerate()
        .map(|(index, err)| {
            format!("MultiError {} of {total}: {}", index + 1, chain_stack(&**err))
        })
        .collect::<Vec<_>>()
        .join("\n");
    LogRecord {
        message: multi.to_string(),
        name: MultiError::NAME.to_owned(),
        stack,
        code: None,
        signal: None,
    }
}

/// Library errors surface through one of two concrete types.
fn as_library_error<'a>(err: &'a (dyn StdError + 'static)) -> Option<&'a HttpError> {
    err.downcast_ref::<HttpError>()
        .or_else(|| err.downcast_ref::<RestError>().map(RestError::as_http_error))
}

fn message_of(err: &(dyn StdError + 'static)) -> String {
    as_library_error(err).map_or_else(|| err.to_string(), |library| library.message().to_owned())
}

fn name_of(err: &(dyn StdError + 'static)) -> String {
    as_library_error(err).map_or_else(|| "Error".to_owned(), |library| library.name().to_owned())
}

/// Stack renderings of the error and every `source()` behind it,
/// joined by `"\nCaused by: "`, outermost first.
fn chain_stack(err: &(dyn StdError + 'static)) -> String {
    let mut out = String::new();
    let mut current = Some(err);
    let mut rendered = 0;
    while let Some(element) = current {
        if rendered > 0 {
            out.push_str("\nCaused by: ");
        }
        out.push_str(&element_stack(element));
        rendered += 1;
        if rendered >= MAX_CHAIN {
            break;
        }
        current = element.source();
    }
    out
}

/// One chain element: its stack with the context pairs spliced into the
/// header line, or the bare `Display` rendering for foreign errors.
fn element_stack(err: &(dyn StdError + 'static)) -> String {
    let Some(library) = as_library_error(err) else {
        return err.to_string();
    };
    let stack = library.stack();
    let context = merged_context(library);
    if context.is_empty() {
        return stack;
    }
    let pairs = context
        .iter()
        .map(|(key, value)| format!("{key}={}", render_value(value)))
        .collect::<Vec<_>>()
        .join(", ");
    match stack.split_once('\n') {
        Some((header, frames)) => format!("{header} ({pairs})\n{frames}"),
        None => format!("{stack} ({pairs})"),
    }
}

/// Class-wide default fields overlaid with the instance context.
fn merged_context(err: &HttpError) -> Map<String, Value> {
    let mut context = err.class().defaults().clone();
    for (key, value) in err.info() {
        context.insert(key.clone(), value.clone());
    }
    context
}

/// JSON text of the value; strings render quoted.
fn render_value(value: &Value) -> String {
    if exceeds_depth(value, MAX_VALUE_DEPTH) {
        return "[Circular]".to_owned();
    }
    serde_json::to_string(value).unwrap_or_else(|_| "[Unserializable]".to_owned())
}

fn exceeds_depth(value: &Value, budget: usize) -> bool {
    match value {
        Value::Array(items) => {
            budget == 0 || items.iter().any(|item| exceeds_depth(item, budget - 1))
        }
        Value::Object(map) => {
            budget == 0 || map.values().any(|item| exceeds_depth(item, budget - 1))
        }
        _ => false,
    }
}
