//! Driven port for bearer token verification.

use async_trait::async_trait;

use crate::domain::{BearerToken, VerifiedClaims};

use super::define_port_error;

define_port_error! {
    /// Errors raised while verifying a bearer token.
    pub enum TokenVerificationError {
        /// The token's `exp` claim has passed.
        Expired => "token expired",
        /// Signature, audience, issuer or structure did not check out.
        Invalid { message: String } => "token rejected: {message}",
        /// No published key matches the token's key id.
        UnknownKey { kid: String } => "no signing key matches kid {kid:?}",
        /// The issuer's key set could not be fetched.
        KeySource { message: String } => "signing keys unavailable: {message}",
    }
}

/// Port that checks a bearer token and returns its claims.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TokenVerifier: Send + Sync {
    /// Verify signature and registered claims, then extract permissions.
    async fn verify(&self, token: &BearerToken) -> Result<VerifiedClaims, TokenVerificationError>;
}
