//! Bearer token verification against an identity provider's JWKS.
//!
//! [`HttpJwksSource`] fetches `https://<domain>/.well-known/jwks.json`;
//! [`JwksTokenVerifier`] caches the RS256 keys by `kid` and refetches the
//! set when a token names a key it has not seen, at most once per
//! [`DEFAULT_REFRESH_INTERVAL`].

mod source;
mod verifier;

pub use source::{HttpJwksSource, JwksSource, JwksSourceError};
pub use verifier::{DEFAULT_REFRESH_INTERVAL, JwksTokenVerifier, TokenIssuer};
