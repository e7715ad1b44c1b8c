//! Generated taxonomy families, end to end.

use faultline::{ErrorKind, Registry, RegistryError, make_err_from_code};
use http::StatusCode;

#[test]
fn every_http_class_constructs_and_resolves() {
    for class in Registry::global().http_classes() {
        let err = class.new_error(());

        assert_eq!(err.kind(), ErrorKind::Http);
        assert_eq!(err.name(), class.name());
        assert!(err.name().ends_with("Error"), "name {}", err.name());
        assert_eq!(err.status_code(), class.status_code());
        assert_eq!(format!("{}Error", err.code()), err.name());
        assert_eq!(err.body().code, err.code());
        assert_eq!(err.message(), "");
    }
}

#[test]
fn every_rest_class_constructs_and_resolves() {
    let classes = Registry::global().rest_classes();
    assert_eq!(classes.len(), 15);

    for class in classes {
        let err = class.new_error(());

        assert_eq!(err.kind(), ErrorKind::Rest);
        assert_eq!(format!("{}Error", err.rest_code()), err.name());
        assert_eq!(err.body().code, err.rest_code());
        // Machine code is unset for the REST family.
        assert_eq!(err.code(), "Error");
    }
}

#[test]
fn well_known_statuses_map_to_their_classes() {
    let cases = [
        (400, "BadRequestError"),
        (404, "NotFoundError"),
        (409, "ConflictError"),
        (410, "GoneError"),
        (418, "ImATeapotError"),
        (429, "TooManyRequestsError"),
        (500, "InternalServerError"),
        (502, "BadGatewayError"),
        (505, "HttpVersionNotSupportedError"),
        (509, "BandwidthLimitExceededError"),
    ];

    for (status, name) in cases {
        let class = Registry::global()
            .for_status(StatusCode::from_u16(status).unwrap())
            .unwrap_or_else(|| panic!("no class for {status}"));
        assert_eq!(class.name(), name);
        assert_eq!(class.status_code().map(|code| code.as_u16()), Some(status));
    }
}

#[test]
fn rest_name_shadows_http_name_but_status_lookup_does_not() {
    let by_name = Registry::global().get("PreconditionFailedError").unwrap();
    assert_eq!(by_name.kind(), ErrorKind::Rest);
    assert_eq!(by_name.status_code(), Some(StatusCode::PRECONDITION_FAILED));

    let by_status = Registry::global()
        .for_status(StatusCode::PRECONDITION_FAILED)
        .unwrap();
    assert_eq!(by_status.kind(), ErrorKind::Http);
}

#[test]
fn lookup_by_code_builds_the_right_class() {
    let err = make_err_from_code(406, "the horror").unwrap();

    assert_eq!(err.name(), "NotAcceptableError");
    assert_eq!(err.message(), "the horror");
    assert_eq!(err.status_code(), Some(StatusCode::NOT_ACCEPTABLE));
    assert_eq!(err.body().code, "NotAcceptable");
    assert_eq!(err.body().message, "the horror");
}

#[test]
fn unknown_error_codes_degrade_to_the_500_class() {
    let err = make_err_from_code(480, "no reason phrase here").unwrap();

    assert_eq!(err.name(), "InternalServerError");
    assert_eq!(err.status_code(), Some(StatusCode::INTERNAL_SERVER_ERROR));
    assert_eq!(err.message(), "no reason phrase here");
}

#[test]
fn non_error_codes_are_refused() {
    for status in [99, 200, 302, 399] {
        assert!(matches!(
            make_err_from_code(status, ()),
            Err(RegistryError::UnsupportedStatus(code)) if code == status
        ));
    }
}

#[test]
fn custom_registrations_extend_the_merged_lookup() {
    faultline::make_constructor("TaxonomySideError", faultline::ClassDefaults::new()).unwrap();

    let class = Registry::global().get("TaxonomySideError").unwrap();
    assert_eq!(class.kind(), ErrorKind::Rest);
    assert_eq!(class.rest_code(), Some("TaxonomySide"));
}
