//! Key set sources.

use std::time::Duration;

use async_trait::async_trait;
use jsonwebtoken::jwk::JwkSet;
use reqwest::{Client, Url};

/// Failures while fetching a key set.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum JwksSourceError {
    /// The request could not be sent or timed out.
    #[error("jwks transport failed: {message}")]
    Transport { message: String },
    /// The provider answered with a non-success status.
    #[error("jwks endpoint returned status {status}")]
    Status { status: u16 },
    /// The configured domain does not form a URL.
    #[error("invalid jwks url: {message}")]
    InvalidUrl { message: String },
    /// The body was not a JSON key set.
    #[error("jwks body could not be decoded: {message}")]
    Decode { message: String },
}

/// Where signing keys come from.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait JwksSource: Send + Sync {
    /// Fetch the current key set.
    async fn fetch(&self) -> Result<JwkSet, JwksSourceError>;
}

/// Reqwest-backed source reading a provider's published key set.
pub struct HttpJwksSource {
    client: Client,
    url: Url,
}

impl HttpJwksSource {
    /// Build a source for an explicit key set URL.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(url: Url, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client, url })
    }

    /// Key set URL for an identity provider domain.
    ///
    /// # Errors
    ///
    /// Returns [`JwksSourceError::InvalidUrl`] when the domain does not form
    /// a valid URL.
    ///
    /// # Examples
    /// ```
    /// use trio::outbound::jwks::HttpJwksSource;
    ///
    /// let url = HttpJwksSource::url_for_domain("example.eu.auth0.com").unwrap();
    /// assert_eq!(url.as_str(), "https://example.eu.auth0.com/.well-known/jwks.json");
    /// ```
    pub fn url_for_domain(domain: &str) -> Result<Url, JwksSourceError> {
        Url::parse(&format!("https://{domain}/.well-known/jwks.json")).map_err(|err| {
            JwksSourceError::InvalidUrl {
                message: err.to_string(),
            }
        })
    }
}

#[async_trait]
impl JwksSource for HttpJwksSource {
    async fn fetch(&self) -> Result<JwkSet, JwksSourceError> {
        let response = self
            .client
            .get(self.url.clone())
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(|err| JwksSourceError::Transport {
                message: err.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(JwksSourceError::Status {
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await.map_err(|err| JwksSourceError::Transport {
            message: err.to_string(),
        })?;
        serde_json::from_slice(body.as_ref()).map_err(|err| JwksSourceError::Decode {
            message: err.to_string(),
        })
    }
}
