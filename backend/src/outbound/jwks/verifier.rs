//! RS256 token verification with a `kid`-indexed key cache.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::jwk::JwkSet;
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode, decode_header};
use serde::Deserialize;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info, warn};

use crate::domain::ports::{TokenVerificationError, TokenVerifier};
use crate::domain::{BearerToken, VerifiedClaims};

use super::source::JwksSource;

/// Minimum gap between two successful key fetches.
pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_secs(30);

/// Expected `iss` and `aud` claims.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenIssuer {
    issuer: String,
    audience: String,
}

impl TokenIssuer {
    /// Issuer `https://<domain>/` with the given audience.
    ///
    /// # Examples
    /// ```
    /// use trio::outbound::jwks::TokenIssuer;
    ///
    /// let issuer = TokenIssuer::for_domain("coffee.eu.auth0.com", "drinks");
    /// assert_eq!(issuer.issuer(), "https://coffee.eu.auth0.com/");
    /// assert_eq!(issuer.audience(), "drinks");
    /// ```
    #[must_use]
    pub fn for_domain(domain: &str, audience: impl Into<String>) -> Self {
        Self {
            issuer: format!("https://{domain}/"),
            audience: audience.into(),
        }
    }

    /// Expected `iss` claim.
    #[must_use]
    pub fn issuer(&self) -> &str {
        &self.issuer
    }

    /// Expected `aud` claim.
    #[must_use]
    pub fn audience(&self) -> &str {
        &self.audience
    }
}

#[derive(Debug, Deserialize)]
struct TokenClaims {
    #[serde(default)]
    sub: Option<String>,
    #[serde(default)]
    permissions: Option<Vec<String>>,
}

/// Verifies bearer tokens against keys fetched from a [`JwksSource`].
///
/// A token with an unseen `kid` triggers a refetch of the key set. Refetches
/// are serialised, so concurrent misses share one fetch, and at most one
/// successful fetch happens per refresh interval.
pub struct JwksTokenVerifier<S> {
    source: S,
    issuer: TokenIssuer,
    keys: RwLock<HashMap<String, DecodingKey>>,
    last_refresh: Mutex<Option<Instant>>,
    refresh_interval: Duration,
}

impl<S: JwksSource> JwksTokenVerifier<S> {
    /// Build a verifier with an empty key cache; keys load on first use.
    #[must_use]
    pub fn new(source: S, issuer: TokenIssuer) -> Self {
        Self {
            source,
            issuer,
            keys: RwLock::new(HashMap::new()),
            last_refresh: Mutex::new(None),
            refresh_interval: DEFAULT_REFRESH_INTERVAL,
        }
    }

    /// Override [`DEFAULT_REFRESH_INTERVAL`].
    #[must_use]
    pub const fn with_refresh_interval(mut self, interval: Duration) -> Self {
        self.refresh_interval = interval;
        self
    }

    async fn cached(&self, kid: &str) -> Option<DecodingKey> {
        self.keys.read().await.get(kid).cloned()
    }

    async fn key_for(&self, kid: &str) -> Result<DecodingKey, TokenVerificationError> {
        if let Some(key) = self.cached(kid).await {
            return Ok(key);
        }

        let mut last_refresh = self.last_refresh.lock().await;
        // A refresh that finished while this caller waited may hold the key.
        if let Some(key) = self.cached(kid).await {
            return Ok(key);
        }
        let due = last_refresh.is_none_or(|at| at.elapsed() >= self.refresh_interval);
        if due {
            self.refresh().await?;
            *last_refresh = Some(Instant::now());
        } else {
            debug!(%kid, "unknown signing key; refreshed too recently to refetch");
        }
        drop(last_refresh);

        self.cached(kid)
            .await
            .ok_or_else(|| TokenVerificationError::unknown_key(kid))
    }

    async fn refresh(&self) -> Result<(), TokenVerificationError> {
        let set = self.source.fetch().await.map_err(|err| {
            warn!(error = %err, "signing key refresh failed");
            TokenVerificationError::key_source(err.to_string())
        })?;
        let keys = index_keys(&set);
        info!(keys = keys.len(), "signing keys refreshed");
        *self.keys.write().await = keys;
        Ok(())
    }

    fn validation(&self) -> Validation {
        let mut validation = Validation::new(Algorithm::RS256);
        validation.set_audience(&[self.issuer.audience()]);
        validation.set_issuer(&[self.issuer.issuer()]);
        validation
    }
}

/// RSA keys with a `kid`; anything else is skipped.
fn index_keys(set: &JwkSet) -> HashMap<String, DecodingKey> {
    set.keys
        .iter()
        .filter_map(|jwk| {
            let kid = jwk.common.key_id.clone()?;
            match DecodingKey::from_jwk(jwk) {
                Ok(key) => Some((kid, key)),
                Err(err) => {
                    warn!(%kid, error = %err, "skipping unusable signing key");
                    None
                }
            }
        })
        .collect()
}

fn map_decode_error(error: &jsonwebtoken::errors::Error) -> TokenVerificationError {
    match error.kind() {
        ErrorKind::ExpiredSignature => TokenVerificationError::expired(),
        ErrorKind::InvalidAudience | ErrorKind::InvalidIssuer => {
            TokenVerificationError::invalid("incorrect claims; check the audience and issuer")
        }
        _ => TokenVerificationError::invalid(format!("unable to verify token: {error}")),
    }
}

#[async_trait]
impl<S: JwksSource> TokenVerifier for JwksTokenVerifier<S> {
    async fn verify(&self, token: &BearerToken) -> Result<VerifiedClaims, TokenVerificationError> {
        let header = decode_header(token.as_str()).map_err(|err| {
            TokenVerificationError::invalid(format!("unable to parse token header: {err}"))
        })?;
        if header.alg != Algorithm::RS256 {
            return Err(TokenVerificationError::invalid(format!(
                "unsupported signing algorithm {:?}",
                header.alg
            )));
        }
        let kid = header
            .kid
            .ok_or_else(|| TokenVerificationError::invalid("token header has no kid"))?;
        let key = self.key_for(&kid).await?;
        let data = decode::<TokenClaims>(token.as_str(), &key, &self.validation())
            .map_err(|err| map_decode_error(&err))?;
        Ok(VerifiedClaims {
            subject: data.claims.sub,
            permissions: data.claims.permissions,
        })
    }
}

#[cfg(test)]
#[path = "verifier_tests.rs"]
mod tests;
