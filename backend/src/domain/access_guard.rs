//! Access guard for the coffee-shop endpoints.
//!
//! Combines token verification through a [`TokenVerifier`] with the
//! permission check on the resulting claims.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use tracing::debug;

use crate::domain::ports::{AccessControl, TokenVerificationError, TokenVerifier};
use crate::domain::{BearerToken, Error, Permission, VerifiedClaims};

/// Guard implementing [`AccessControl`].
#[derive(Clone)]
pub struct AccessGuard<T> {
    verifier: Arc<T>,
}

impl<T> AccessGuard<T> {
    /// Create a guard over the given verifier.
    #[must_use]
    pub fn new(verifier: Arc<T>) -> Self {
        Self { verifier }
    }
}

fn map_verification_error(error: TokenVerificationError) -> Error {
    match error {
        TokenVerificationError::Expired => {
            Error::unauthorized("token expired").with_details(json!({ "code": "token_expired" }))
        }
        TokenVerificationError::Invalid { message } => {
            Error::unauthorized(format!("unable to verify token: {message}"))
                .with_details(json!({ "code": "invalid_token" }))
        }
        TokenVerificationError::UnknownKey { .. } => {
            Error::unauthorized("unable to find the appropriate key")
                .with_details(json!({ "code": "invalid_header" }))
        }
        TokenVerificationError::KeySource { message } => {
            Error::service_unavailable(format!("signing keys unavailable: {message}"))
        }
    }
}

#[async_trait]
impl<T: TokenVerifier> AccessControl for AccessGuard<T> {
    async fn authorize(
        &self,
        token: &BearerToken,
        permission: Permission,
    ) -> Result<VerifiedClaims, Error> {
        let claims = self.verifier.verify(token).await.map_err(|err| {
            debug!(error = %err, %permission, "bearer token rejected");
            map_verification_error(err)
        })?;
        claims.require(permission)?;
        Ok(claims)
    }
}
