//! Wire bodies and log records, end to end.

use faultline::{
    ClassDefaults, ErrorOptions, HttpError, MultiError, Registry, make_constructor,
    make_err_from_code, serialize,
};
use serde_json::json;

#[test]
fn the_wire_body_round_trips() {
    let err = make_err_from_code(404, "no such route").unwrap();

    let value = serde_json::to_value(&err).unwrap();
    assert_eq!(value, json!({ "code": "NotFound", "message": "no such route" }));
    assert_eq!(value, err.to_json());

    let body: faultline::Body = serde_json::from_value(value).unwrap();
    assert_eq!(body, err.body());
}

#[test]
fn bodies_fold_the_cause_into_the_message() {
    let cause = std::io::Error::other("socket closed");
    let err = HttpError::new((cause, "proxy request failed"));

    assert_eq!(
        err.to_json(),
        json!({
            "code": "Error",
            "message": "proxy request failed; caused by socket closed",
        })
    );
}

#[test]
fn log_records_cover_the_whole_chain() {
    let class = make_constructor(
        "UpstreamError",
        ClassDefaults::new().field("tier", "edge"),
    )
    .unwrap();

    let root = std::io::Error::other("connection refused");
    let middle = class.new_error((root, ErrorOptions::new().message("fetch failed")));
    let outer = HttpError::new((middle, "request aborted"));

    let record = serialize(&outer);
    assert_eq!(record.name, "HttpError");
    assert_eq!(record.message, "request aborted");
    assert_eq!(record.code.as_deref(), Some("Error"));
    assert_eq!(record.stack.matches("\nCaused by: ").count(), 2);

    let mut sections = record.stack.split("\nCaused by: ");
    assert!(sections.next().unwrap().starts_with("HttpError: request aborted"));
    let middle_section = sections.next().unwrap();
    assert!(middle_section.starts_with("UpstreamError: fetch failed (tier=\"edge\")"));
    assert!(sections.next().unwrap().starts_with("connection refused"));
}

#[test]
fn log_records_serialize_without_empty_fields() {
    let record = serialize(&std::io::Error::other("plain"));
    let value = serde_json::to_value(&record).unwrap();

    assert_eq!(
        value,
        json!({ "message": "plain", "name": "Error", "stack": "plain" })
    );
}

#[test]
fn signals_surface_from_context() {
    let err = HttpError::new(
        ErrorOptions::new()
            .message("child died")
            .info("signal", "SIGTERM"),
    );
    let record = serialize(&err);

    assert_eq!(record.signal.as_deref(), Some("SIGTERM"));
    let value = serde_json::to_value(&record).unwrap();
    assert_eq!(value["signal"], json!("SIGTERM"));
}

#[test]
fn aggregates_render_each_member_chain() {
    let not_found = make_err_from_code(404, "missing index").unwrap();
    let multi = MultiError::new(vec![
        anyhow::Error::new(not_found),
        anyhow::anyhow!("secondary failure"),
    ]);

    let record = serialize(&multi);
    assert_eq!(record.name, "MultiError");
    assert_eq!(record.message, "first of 2 errors: NotFoundError: missing index");
    assert!(
        record
            .stack
            .contains("MultiError 1 of 2: NotFoundError: missing index")
    );
    assert!(record.stack.contains("MultiError 2 of 2: secondary failure"));
}

#[test]
fn pathological_context_degrades_to_markers() {
    let mut nested = json!("leaf");
    for _ in 0..70 {
        nested = json!([nested]);
    }
    let err = Registry::global()
        .get("InvalidArgumentError")
        .unwrap()
        .new_error(ErrorOptions::new().message("bad payload").info("arg", nested));

    let record = serialize(&err);
    let header = record.stack.lines().next().unwrap();
    assert_eq!(header, "InvalidArgumentError: bad payload (arg=[Circular])");
}
