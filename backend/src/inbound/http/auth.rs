//! Bearer credential extraction for the coffee-shop handlers.
//!
//! The extractor only parses the `Authorization` header; signature and
//! permission checks happen in the [`AccessControl`] port so handlers read
//!
//! ```ignore
//! state.access.authorize(credentials.token(), Permission::PostDrinks).await?;
//! ```
//!
//! [`AccessControl`]: crate::domain::ports::AccessControl

use actix_web::dev::Payload;
use actix_web::http::header::{AUTHORIZATION, HeaderMap};
use actix_web::{FromRequest, HttpRequest};
use futures_util::future::{Ready, ready};

use crate::domain::{BearerToken, CredentialsError, Error};

/// Bearer token taken from the request's `Authorization` header.
#[derive(Debug, Clone)]
pub struct BearerCredentials(BearerToken);

impl BearerCredentials {
    /// Parse credentials from request headers.
    ///
    /// # Errors
    /// Returns a 401 error when the header is absent, not valid text, or not
    /// of the form `Bearer <token>`.
    pub fn from_headers(headers: &HeaderMap) -> Result<Self, Error> {
        let header = match headers.get(AUTHORIZATION) {
            None => None,
            Some(value) => Some(value.to_str().map_err(|_| CredentialsError::Malformed)?),
        };
        Ok(Self(BearerToken::from_header(header)?))
    }

    /// The raw token.
    #[must_use]
    pub fn token(&self) -> &BearerToken {
        &self.0
    }
}

impl FromRequest for BearerCredentials {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(Self::from_headers(req.headers()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use actix_web::http::header::HeaderValue;
    use rstest::rstest;
    use rstest_bdd_macros::{given, then, when};

    fn headers_with(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(value).expect("valid header value"),
        );
        headers
    }

    #[given("a request with a bearer token")]
    fn a_request_with_a_bearer_token() -> HeaderMap {
        headers_with("Bearer eyJhbGciOiJSUzI1NiJ9.e30.c2ln")
    }

    #[given("a request without an authorization header")]
    fn a_request_without_an_authorization_header() -> HeaderMap {
        HeaderMap::new()
    }

    #[given("a request using basic authentication")]
    fn a_request_using_basic_authentication() -> HeaderMap {
        headers_with("Basic YWRtaW46cGFzc3dvcmQ=")
    }

    #[when("credentials are extracted")]
    fn credentials_are_extracted(headers: HeaderMap) -> Result<BearerCredentials, Error> {
        BearerCredentials::from_headers(&headers)
    }

    #[then("the token is available to the handler")]
    fn the_token_is_available(result: Result<BearerCredentials, Error>) {
        let credentials = result.expect("credentials parse");
        assert_eq!(credentials.token().as_str(), "eyJhbGciOiJSUzI1NiJ9.e30.c2ln");
    }

    #[then("the request is rejected as unauthorised")]
    fn the_request_is_rejected(result: Result<BearerCredentials, Error>) {
        let error = result.expect_err("credentials rejected");
        assert_eq!(error.code(), ErrorCode::Unauthorized);
    }

    #[rstest]
    fn bearer_token_is_extracted() {
        let headers = a_request_with_a_bearer_token();
        let result = credentials_are_extracted(headers);
        the_token_is_available(result);
    }

    #[rstest]
    fn missing_header_is_unauthorised() {
        let headers = a_request_without_an_authorization_header();
        let result = credentials_are_extracted(headers);
        the_request_is_rejected(result);
    }

    #[rstest]
    fn basic_scheme_is_unauthorised() {
        let headers = a_request_using_basic_authentication();
        let result = credentials_are_extracted(headers);
        the_request_is_rejected(result);
    }

    #[rstest]
    #[case("Bearer")]
    #[case("Bearer a b")]
    fn malformed_bearer_headers_are_unauthorised(#[case] value: &str) {
        the_request_is_rejected(credentials_are_extracted(headers_with(value)));
    }
}
