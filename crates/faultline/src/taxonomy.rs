//! Built-in taxonomy tables
//!
//! One class per HTTP error status with a known reason phrase, plus the
//! fixed REST-code family. Class names derive mechanically from reason
//! phrases, so the table tracks whatever the `http` crate knows about.

use std::collections::HashSet;
use std::sync::Arc;

use http::StatusCode;

use crate::class::{ErrorClass, ErrorKind};

/// Reason phrases for error statuses the `http` crate does not carry.
const SUPPLEMENTAL_REASONS: &[(u16, &str)] = &[(509, "Bandwidth Limit Exceeded")];

/// The fixed REST-code family: `(class name, status code)`.
const REST_CLASSES: &[(&str, u16)] = &[
    ("BadDigestError", 400),
    ("BadMethodError", 405),
    ("InternalError", 500),
    ("InvalidArgumentError", 409),
    ("InvalidContentError", 400),
    ("InvalidCredentialsError", 401),
    ("InvalidHeaderError", 400),
    ("InvalidVersionError", 400),
    ("MissingParameterError", 409),
    ("NotAuthorizedError", 403),
    ("PreconditionFailedError", 412),
    ("RequestExpiredError", 400),
    ("RequestThrottledError", 429),
    ("ResourceNotFoundError", 404),
    ("WrongAcceptError", 406),
];

/// Generate the HTTP status-code taxonomy
///
/// Walks 400..=599 and emits a `Http`-kind class for every status with
/// a reason phrase. If two phrases ever derive the same name, the first
/// status keeps it.
pub(crate) fn http_classes() -> Vec<Arc<ErrorClass>> {
    let mut seen = HashSet::new();
    let mut classes = Vec::new();
    for status in 400..=599u16 {
        let Some(reason) = reason_phrase(status) else {
            continue;
        };
        let Ok(status_code) = StatusCode::from_u16(status) else {
            continue;
        };
        let name = class_name_for_reason(reason);
        if seen.insert(name.clone()) {
            classes.push(ErrorClass::builtin(name, ErrorKind::Http, Some(status_code)));
        }
    }
    classes
}

/// Generate the fixed REST-code taxonomy
pub(crate) fn rest_classes() -> Vec<Arc<ErrorClass>> {
    REST_CLASSES
        .iter()
        .map(|&(name, status)| {
            let status_code =
                StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
            ErrorClass::builtin(name, ErrorKind::Rest, Some(status_code))
        })
        .collect()
}

fn reason_phrase(status: u16) -> Option<&'static str> {
    StatusCode::from_u16(status)
        .ok()
        .and_then(|code| code.canonical_reason())
        .or_else(|| {
            SUPPLEMENTAL_REASONS
                .iter()
                .find(|&&(code, _)| code == status)
                .map(|&(_, reason)| reason)
        })
}

/// Derive a class name from a reason phrase: capitalize each
/// lowercased word, concatenate, strip non-word characters, and append
/// `Error` unless the phrase already ends with it.
pub(crate) fn class_name_for_reason(reason: &str) -> String {
    let mut name: String = reason.split_whitespace().map(capitalize).collect();
    name.retain(|c| c.is_ascii_alphanumeric() || c == '_');
    if !name.ends_with("Error") {
        name.push_str("Error");
    }
    name
}

fn capitalize(word: &str) -> String {
    let lower = word.to_ascii_lowercase();
    let mut chars = lower.chars();
    chars.next().map_or_else(String::new, |first| {
        let mut out = first.to_ascii_uppercase().to_string();
        out.push_str(chars.as_str());
        out
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derives_names_from_reason_phrases() {
        assert_eq!(class_name_for_reason("Not Found"), "NotFoundError");
        assert_eq!(class_name_for_reason("I'm a teapot"), "ImATeapotError");
        assert_eq!(
            class_name_for_reason("Internal Server Error"),
            "InternalServerError"
        );
        assert_eq!(class_name_for_reason("URI Too Long"), "UriTooLongError");
        assert_eq!(
            class_name_for_reason("HTTP Version Not Supported"),
            "HttpVersionNotSupportedError"
        );
        assert_eq!(
            class_name_for_reason("Bandwidth Limit Exceeded"),
            "BandwidthLimitExceededError"
        );
    }

    #[test]
    fn http_taxonomy_derives_status_and_code_from_the_name() {
        let classes = http_classes();
        assert!(classes.len() >= 40);

        for class in &classes {
            assert_eq!(class.kind(), ErrorKind::Http);
            assert!(class.name().ends_with("Error"), "name {}", class.name());
            let status = class.status_code().expect("taxonomy classes carry a status");
            assert!((400..=599).contains(&status.as_u16()));
            let code = class.code().expect("taxonomy classes carry a code");
            assert_eq!(format!("{code}Error"), class.name());
        }

        let names: Vec<&str> = classes.iter().map(|class| class.name()).collect();
        assert!(names.contains(&"BadRequestError"));
        assert!(names.contains(&"NotFoundError"));
        assert!(names.contains(&"ImATeapotError"));
        assert!(names.contains(&"BandwidthLimitExceededError"));
        assert!(names.contains(&"NetworkAuthenticationRequiredError"));
    }

    #[test]
    fn rest_taxonomy_matches_the_fixed_table() {
        let classes = rest_classes();
        assert_eq!(classes.len(), 15);

        for class in &classes {
            assert_eq!(class.kind(), ErrorKind::Rest);
            assert!(class.code().is_none());
            let rest_code = class.rest_code().expect("rest classes carry a rest code");
            assert!(class.name().starts_with(rest_code));
        }

        let internal = classes
            .iter()
            .find(|class| class.name() == "InternalError")
            .expect("InternalError is in the table");
        assert_eq!(internal.status_code(), Some(StatusCode::INTERNAL_SERVER_ERROR));
        assert_eq!(internal.rest_code(), Some("Internal"));
    }

    #[test]
    fn names_are_unique_within_each_family() {
        let http = http_classes();
        let unique: HashSet<&str> = http.iter().map(|class| class.name()).collect();
        assert_eq!(unique.len(), http.len());

        let rest = rest_classes();
        let unique: HashSet<&str> = rest.iter().map(|class| class.name()).collect();
        assert_eq!(unique.len(), rest.len());
        // PreconditionFailedError deliberately appears in both families.
        assert!(unique.contains("PreconditionFailedError"));
    }
}
