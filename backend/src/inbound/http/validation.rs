//! Shared validation helpers for inbound HTTP adapters.
//!
//! Request DTOs stay close to the wire; these helpers turn loosely typed
//! fields into domain values and produce `400` errors with
//! `{"field", "code"}` details when they cannot.

use chrono::{DateTime, Utc};
use pagination::{PageNumber, PageRequest};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;

use crate::domain::{Error, SeekingFlag};

/// Validation error codes for HTTP request failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ErrorCode {
    InvalidFlag,
    InvalidInteger,
    InvalidTimestamp,
    InvalidPage,
}

impl ErrorCode {
    const fn as_str(self) -> &'static str {
        match self {
            Self::InvalidFlag => "invalid_flag",
            Self::InvalidInteger => "invalid_integer",
            Self::InvalidTimestamp => "invalid_timestamp",
            Self::InvalidPage => "invalid_page",
        }
    }
}

/// Newtype wrapper for HTTP field names to provide type safety.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    #[must_use]
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    const fn as_str(self) -> &'static str {
        self.0
    }
}

fn invalid_value(field: FieldName, code: ErrorCode, message: String, value: &str) -> Error {
    Error::invalid_request(message).with_details(json!({
        "field": field.as_str(),
        "value": value,
        "code": code.as_str(),
    }))
}

/// A boolean-ish form flag: JSON `true`/`false` or one of the accepted
/// spellings (`y`, `yes`, `on`, `1`, `n`, `no`, `off`, `0`, ...).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, ToSchema)]
#[serde(untagged)]
pub enum FlagInput {
    Bool(bool),
    Text(String),
}

/// Parse a seeking flag; absent means "not seeking".
pub(crate) fn parse_seeking_flag(
    value: Option<FlagInput>,
    field: FieldName,
) -> Result<SeekingFlag, Error> {
    match value {
        None => Ok(SeekingFlag::NotSeeking),
        Some(FlagInput::Bool(flag)) => Ok(SeekingFlag::from(flag)),
        Some(FlagInput::Text(raw)) => raw
            .parse()
            .map_err(|err: crate::domain::SeekingFlagError| {
                invalid_value(field, ErrorCode::InvalidFlag, err.to_string(), &raw)
            }),
    }
}

/// An integer sent either as a JSON number or as a numeric string, as
/// browser forms tend to do.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, ToSchema)]
#[serde(untagged)]
pub enum IntegerInput {
    Number(i64),
    Text(String),
}

impl IntegerInput {
    /// Read the value as an `i64`.
    pub(crate) fn to_i64(&self, field: FieldName) -> Result<i64, Error> {
        match self {
            Self::Number(value) => Ok(*value),
            Self::Text(raw) => raw.trim().parse().map_err(|_| {
                invalid_value(
                    field,
                    ErrorCode::InvalidInteger,
                    format!("{} must be an integer", field.as_str()),
                    raw,
                )
            }),
        }
    }

    /// Read the value as an `i32` identifier.
    pub(crate) fn to_id(&self, field: FieldName) -> Result<i32, Error> {
        let value = self.to_i64(field)?;
        i32::try_from(value).map_err(|_| {
            invalid_value(
                field,
                ErrorCode::InvalidInteger,
                format!("{} is out of range", field.as_str()),
                &value.to_string(),
            )
        })
    }
}

/// Parse a show start time.
pub(crate) fn parse_start_time(value: &str, field: FieldName) -> Result<DateTime<Utc>, Error> {
    crate::domain::parse_start_time(value).map_err(|err| {
        invalid_value(field, ErrorCode::InvalidTimestamp, err.to_string(), value)
    })
}

/// Query string carrying an optional 1-based `page`.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct PageQuery {
    pub page: Option<String>,
}

impl PageQuery {
    /// Resolve the requested page; non-positive pages clamp to the first.
    pub(crate) fn to_request(&self) -> Result<PageRequest, Error> {
        let Some(raw) = self.page.as_deref() else {
            return Ok(PageRequest::default());
        };
        PageNumber::parse(raw).map(PageRequest::new).map_err(|err| {
            invalid_value(
                FieldName::new("page"),
                ErrorCode::InvalidPage,
                err.to_string(),
                raw,
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode as DomainCode;
    use rstest::rstest;

    const FIELD: FieldName = FieldName::new("seeking_talent");

    #[rstest]
    #[case(None, SeekingFlag::NotSeeking)]
    #[case(Some(FlagInput::Bool(true)), SeekingFlag::Seeking)]
    #[case(Some(FlagInput::Text("y".to_owned())), SeekingFlag::Seeking)]
    #[case(Some(FlagInput::Text("Yes".to_owned())), SeekingFlag::Seeking)]
    #[case(Some(FlagInput::Text("off".to_owned())), SeekingFlag::NotSeeking)]
    fn seeking_flags_follow_the_table(
        #[case] input: Option<FlagInput>,
        #[case] expected: SeekingFlag,
    ) {
        assert_eq!(parse_seeking_flag(input, FIELD).expect("valid flag"), expected);
    }

    #[rstest]
    fn unknown_flag_spelling_is_a_bad_request() {
        let err = parse_seeking_flag(Some(FlagInput::Text("maybe".to_owned())), FIELD)
            .expect_err("unknown spelling");
        assert_eq!(err.code(), DomainCode::InvalidRequest);
        assert_eq!(
            err.details().and_then(|d| d.get("field")),
            Some(&json!("seeking_talent"))
        );
    }

    #[rstest]
    #[case(IntegerInput::Number(3), Some(3))]
    #[case(IntegerInput::Text(" 4 ".to_owned()), Some(4))]
    #[case(IntegerInput::Text("four".to_owned()), None)]
    #[case(IntegerInput::Number(i64::from(i32::MAX) + 1), None)]
    fn integer_inputs(#[case] input: IntegerInput, #[case] expected: Option<i32>) {
        assert_eq!(input.to_id(FieldName::new("category")).ok(), expected);
    }

    #[rstest]
    #[case(None, 1)]
    #[case(Some("2"), 2)]
    #[case(Some("0"), 1)]
    #[case(Some("-3"), 1)]
    fn page_query_resolves_numbers(#[case] raw: Option<&str>, #[case] expected: u32) {
        let query = PageQuery {
            page: raw.map(str::to_owned),
        };
        let request = query.to_request().expect("valid page");
        assert_eq!(request.number().get(), expected);
    }

    #[rstest]
    fn non_integer_page_is_a_bad_request() {
        let query = PageQuery {
            page: Some("two".to_owned()),
        };
        let err = query.to_request().expect_err("not an integer");
        assert_eq!(err.code(), DomainCode::InvalidRequest);
    }

    #[rstest]
    fn bad_start_time_names_the_field() {
        let err = parse_start_time("next tuesday", FieldName::new("start_time"))
            .expect_err("unparseable");
        assert_eq!(
            err.details().and_then(|d| d.get("code")),
            Some(&json!("invalid_timestamp"))
        );
    }
}
