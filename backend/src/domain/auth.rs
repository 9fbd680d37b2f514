//! Bearer credentials and permission checks for the coffee-shop API.
//!
//! Token verification itself is delegated to a [`TokenVerifier`] port
//! (JWKS-backed in production). This module owns header parsing and the
//! permission decision.
//!
//! [`TokenVerifier`]: super::ports::TokenVerifier

use serde_json::json;
use thiserror::Error;

use super::Error;

/// Permissions understood by the coffee-shop endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Permission {
    /// Read drinks with full recipes.
    GetDrinksDetail,
    /// Create drinks.
    PostDrinks,
    /// Modify drinks.
    PatchDrinks,
    /// Remove drinks.
    DeleteDrinks,
}

impl Permission {
    /// Claim value granting this permission.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::GetDrinksDetail => "get:drinks-detail",
            Self::PostDrinks => "post:drinks",
            Self::PatchDrinks => "patch:drinks",
            Self::DeleteDrinks => "delete:drinks",
        }
    }
}

impl std::fmt::Display for Permission {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reasons an `Authorization` header is unusable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CredentialsError {
    /// No `Authorization` header was sent.
    #[error("authorization header is expected")]
    MissingHeader,
    /// The scheme was not `Bearer`.
    #[error("authorization header must start with \"Bearer\"")]
    WrongScheme,
    /// The header did not have exactly a scheme and a token.
    #[error("authorization header must be \"Bearer <token>\"")]
    Malformed,
}

impl CredentialsError {
    /// Machine-readable reason.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::MissingHeader => "authorization_header_missing",
            Self::WrongScheme | Self::Malformed => "invalid_header",
        }
    }
}

impl From<CredentialsError> for Error {
    fn from(value: CredentialsError) -> Self {
        Self::unauthorized(value.to_string()).with_details(json!({ "code": value.code() }))
    }
}

/// A raw bearer token taken from the `Authorization` header.
#[derive(Clone, PartialEq, Eq)]
pub struct BearerToken(String);

impl BearerToken {
    /// Parse an `Authorization` header value.
    ///
    /// # Errors
    /// Returns [`CredentialsError`] when the header is absent, uses another
    /// scheme, or does not consist of exactly two parts.
    ///
    /// # Examples
    /// ```
    /// use trio::domain::{BearerToken, CredentialsError};
    ///
    /// let token = BearerToken::from_header(Some("Bearer abc.def.ghi")).unwrap();
    /// assert_eq!(token.as_str(), "abc.def.ghi");
    /// assert_eq!(
    ///     BearerToken::from_header(Some("Basic Zm9vOmJhcg==")),
    ///     Err(CredentialsError::WrongScheme)
    /// );
    /// ```
    pub fn from_header(header: Option<&str>) -> Result<Self, CredentialsError> {
        let value = header.ok_or(CredentialsError::MissingHeader)?;
        let mut parts = value.split_whitespace();
        let scheme = parts.next().ok_or(CredentialsError::Malformed)?;
        if !scheme.eq_ignore_ascii_case("bearer") {
            return Err(CredentialsError::WrongScheme);
        }
        match (parts.next(), parts.next()) {
            (Some(token), None) => Ok(Self(token.to_owned())),
            _ => Err(CredentialsError::Malformed),
        }
    }

    /// Construct from a raw token string.
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Raw token text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for BearerToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("BearerToken(<redacted>)")
    }
}

/// Claims extracted from a verified token.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VerifiedClaims {
    pub subject: Option<String>,
    /// `None` when the token carries no `permissions` claim at all.
    pub permissions: Option<Vec<String>>,
}

impl VerifiedClaims {
    /// Check that the claims grant `permission`.
    ///
    /// # Errors
    /// - [`crate::domain::ErrorCode::InvalidRequest`] when the token has no
    ///   `permissions` claim.
    /// - [`crate::domain::ErrorCode::Forbidden`] when the permission is absent.
    pub fn require(&self, permission: Permission) -> Result<(), Error> {
        let permissions = self.permissions.as_ref().ok_or_else(|| {
            Error::invalid_request("permissions not included in token")
                .with_details(json!({ "code": "invalid_claims" }))
        })?;
        if permissions.iter().any(|granted| granted == permission.as_str()) {
            Ok(())
        } else {
            Err(Error::forbidden("request is forbidden").with_details(json!({
                "code": "permission_missing",
                "permission": permission.as_str(),
            })))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use rstest::rstest;

    #[rstest]
    #[case(None, CredentialsError::MissingHeader)]
    #[case(Some(""), CredentialsError::Malformed)]
    #[case(Some("Bearer"), CredentialsError::Malformed)]
    #[case(Some("Bearer a b"), CredentialsError::Malformed)]
    #[case(Some("Basic abc"), CredentialsError::WrongScheme)]
    #[case(Some("Token abc"), CredentialsError::WrongScheme)]
    fn malformed_headers_are_rejected(
        #[case] header: Option<&str>,
        #[case] expected: CredentialsError,
    ) {
        assert_eq!(BearerToken::from_header(header), Err(expected));
    }

    #[rstest]
    fn scheme_is_case_insensitive() {
        let token = BearerToken::from_header(Some("bearer xyz")).expect("bearer token");
        assert_eq!(token.as_str(), "xyz");
    }

    #[rstest]
    fn debug_redacts_token() {
        let token = BearerToken::new("secret");
        assert!(!format!("{token:?}").contains("secret"));
    }

    #[rstest]
    fn credentials_errors_map_to_unauthorized() {
        let err = Error::from(CredentialsError::MissingHeader);
        assert_eq!(err.code(), ErrorCode::Unauthorized);
    }

    #[rstest]
    #[case(None, Some(ErrorCode::InvalidRequest))]
    #[case(Some(vec![]), Some(ErrorCode::Forbidden))]
    #[case(Some(vec!["get:drinks-detail"]), Some(ErrorCode::Forbidden))]
    #[case(Some(vec!["get:drinks-detail", "post:drinks"]), None)]
    fn require_checks_permissions(
        #[case] permissions: Option<Vec<&str>>,
        #[case] expected: Option<ErrorCode>,
    ) {
        let claims = VerifiedClaims {
            subject: Some("auth0|barista".to_owned()),
            permissions: permissions.map(|list| list.into_iter().map(str::to_owned).collect()),
        };
        let outcome = claims.require(Permission::PostDrinks).err().map(|err| err.code());
        assert_eq!(outcome, expected);
    }
}
