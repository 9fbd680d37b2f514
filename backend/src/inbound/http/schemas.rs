//! OpenAPI schema definitions for the failure envelope.
//!
//! [`crate::domain::Error`] stays free of transport concerns; this module
//! describes how the HTTP adapter renders it, flattened beneath the
//! `success`/`error` pair.

use utoipa::ToSchema;

use crate::domain::ErrorCode;

/// OpenAPI schema for the failure envelope.
#[derive(ToSchema)]
#[schema(as = Failure)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct FailureSchema {
    /// Always `false`.
    #[schema(example = false)]
    success: bool,
    /// HTTP status code repeated in the body.
    #[schema(example = 404)]
    error: u16,
    /// Stable machine-readable error code.
    #[schema(example = "not_found")]
    code: ErrorCode,
    /// Human-readable message returned to clients.
    #[schema(example = "resource not found")]
    message: String,
    /// Correlation identifier for tracing this error across systems.
    #[schema(rename = "traceId", example = "01HZY8B2W6X5Y7Z9ABCD1234")]
    trace_id: Option<String>,
    /// Supplementary error details for clients.
    details: Option<serde_json::Value>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use utoipa::PartialSchema;

    fn schema_to_json<T: PartialSchema>() -> String {
        serde_json::to_string(&T::schema()).expect("schema serialises to JSON")
    }

    #[test]
    fn failure_schema_has_expected_name() {
        assert_eq!(FailureSchema::name(), "Failure");
    }

    #[test]
    fn failure_schema_uses_wire_field_names() {
        let schema_json = schema_to_json::<FailureSchema>();
        for field in ["success", "error", "code", "message", "traceId", "details"] {
            assert!(schema_json.contains(field), "schema should contain {field}");
        }
        assert!(!schema_json.contains("trace_id"));
    }
}
