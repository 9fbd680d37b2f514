//! Tests for domain error construction and trace capture.

use super::*;
use rstest::{fixture, rstest};
use serde_json::json;

const TRACE_ID: &str = "00000000-0000-0000-0000-000000000000";

#[fixture]
fn scoped_trace_id() -> TraceId {
    TRACE_ID.parse().expect("valid UUID")
}

#[rstest]
#[case(Error::invalid_request("bad"), ErrorCode::InvalidRequest)]
#[case(Error::unauthorized("no token"), ErrorCode::Unauthorized)]
#[case(Error::forbidden("nope"), ErrorCode::Forbidden)]
#[case(Error::not_found("missing"), ErrorCode::NotFound)]
#[case(Error::method_not_allowed("wrong verb"), ErrorCode::MethodNotAllowed)]
#[case(Error::unprocessable("no category"), ErrorCode::Unprocessable)]
#[case(Error::service_unavailable("db down"), ErrorCode::ServiceUnavailable)]
#[case(Error::internal("boom"), ErrorCode::InternalError)]
fn constructors_set_code(#[case] error: Error, #[case] expected: ErrorCode) {
    assert_eq!(error.code(), expected);
}

#[rstest]
fn new_returns_none_when_trace_id_out_of_scope() {
    let error = Error::internal("boom");
    assert!(error.trace_id().is_none());
}

#[rstest]
#[tokio::test]
async fn new_captures_trace_id_in_scope(scoped_trace_id: TraceId) {
    let error = TraceId::scope(scoped_trace_id, async { Error::not_found("gone") }).await;
    assert_eq!(error.trace_id(), Some(TRACE_ID));
}

#[rstest]
fn details_and_trace_id_are_attached() {
    let error = Error::invalid_request("bad")
        .with_trace_id("abc")
        .with_details(json!({ "field": "name" }));
    assert_eq!(error.trace_id(), Some("abc"));
    assert_eq!(error.details(), Some(&json!({ "field": "name" })));
}

#[rstest]
fn serialises_in_camel_case_without_empty_fields() {
    let value = serde_json::to_value(Error::forbidden("nope").with_trace_id("abc"))
        .expect("serialise error");
    assert_eq!(
        value,
        json!({ "code": "forbidden", "message": "nope", "traceId": "abc" })
    );
}

#[rstest]
fn display_uses_message() {
    assert_eq!(Error::unprocessable("request unprocessable").to_string(), "request unprocessable");
}
