//! Application settings loaded via OrthoConfig.
//!
//! Values layer from CLI flags, `TRIO_*` environment variables and an
//! optional config file. Accessors apply defaults and cross-field checks so
//! `main` only ever sees validated values.

use std::net::SocketAddr;
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;
use thiserror::Error;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_POOL_MAX_SIZE: u32 = 10;
const DEFAULT_POOL_CHECKOUT_SECS: u64 = 30;

/// Startup configuration failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// No database URL was supplied.
    #[error("database_url is required")]
    MissingDatabaseUrl,
    /// The listen address did not parse.
    #[error("bind_addr {value:?} is not a socket address: {message}")]
    InvalidBindAddr {
        /// Supplied value.
        value: String,
        /// Parser message.
        message: String,
    },
    /// The coffee shop was enabled without its identity provider settings.
    #[error("{key} is required when the coffee shop is enabled")]
    MissingAuthSetting {
        /// Missing setting name.
        key: &'static str,
    },
}

/// Raw layered settings.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "TRIO")]
pub struct AppSettings {
    /// PostgreSQL connection URL.
    pub database_url: Option<String>,
    /// Listen address, `0.0.0.0:8080` when unset.
    pub bind_addr: Option<String>,
    /// Maximum pooled connections, 10 when unset.
    pub pool_max_size: Option<u32>,
    /// Seconds to wait for a pooled connection, 30 when unset.
    pub pool_checkout_secs: Option<u64>,
    /// Apply embedded migrations before serving.
    #[ortho_config(default = true)]
    pub run_migrations: bool,
    /// Mount the booking routes.
    #[ortho_config(default = true)]
    pub enable_booking: bool,
    /// Mount the trivia routes.
    #[ortho_config(default = true)]
    pub enable_trivia: bool,
    /// Mount the coffee-shop routes.
    #[ortho_config(default = true)]
    pub enable_coffee: bool,
    /// Identity provider domain, e.g. `coffee.eu.auth0.com`.
    pub auth_domain: Option<String>,
    /// Expected `aud` claim.
    pub auth_audience: Option<String>,
}

/// Which route sets to mount.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Applications {
    pub booking: bool,
    pub trivia: bool,
    pub coffee: bool,
}

impl Default for Applications {
    fn default() -> Self {
        Self {
            booking: true,
            trivia: true,
            coffee: true,
        }
    }
}

/// Identity provider settings for the coffee shop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthSettings {
    pub domain: String,
    pub audience: String,
}

impl AppSettings {
    /// Database URL.
    ///
    /// # Errors
    /// [`ConfigError::MissingDatabaseUrl`] when unset or blank.
    pub fn database_url(&self) -> Result<&str, ConfigError> {
        self.database_url
            .as_deref()
            .filter(|url| !url.trim().is_empty())
            .ok_or(ConfigError::MissingDatabaseUrl)
    }

    /// Listen address.
    ///
    /// # Errors
    /// [`ConfigError::InvalidBindAddr`] when the value does not parse.
    pub fn bind_addr(&self) -> Result<SocketAddr, ConfigError> {
        let raw = self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR);
        raw.parse().map_err(|err: std::net::AddrParseError| {
            ConfigError::InvalidBindAddr {
                value: raw.to_owned(),
                message: err.to_string(),
            }
        })
    }

    /// Pool size.
    #[must_use]
    pub fn pool_max_size(&self) -> u32 {
        self.pool_max_size.unwrap_or(DEFAULT_POOL_MAX_SIZE)
    }

    /// Pool checkout timeout.
    #[must_use]
    pub fn pool_checkout_timeout(&self) -> Duration {
        Duration::from_secs(self.pool_checkout_secs.unwrap_or(DEFAULT_POOL_CHECKOUT_SECS))
    }

    /// Mounted route sets.
    #[must_use]
    pub fn applications(&self) -> Applications {
        Applications {
            booking: self.enable_booking,
            trivia: self.enable_trivia,
            coffee: self.enable_coffee,
        }
    }

    /// Identity provider settings; `None` when the coffee shop is disabled.
    ///
    /// # Errors
    /// [`ConfigError::MissingAuthSetting`] when the coffee shop is enabled
    /// and either setting is absent.
    pub fn auth(&self) -> Result<Option<AuthSettings>, ConfigError> {
        if !self.enable_coffee {
            return Ok(None);
        }
        let domain = required(self.auth_domain.as_deref(), "auth_domain")?;
        let audience = required(self.auth_audience.as_deref(), "auth_audience")?;
        Ok(Some(AuthSettings {
            domain: domain.to_owned(),
            audience: audience.to_owned(),
        }))
    }
}

fn required<'a>(value: Option<&'a str>, key: &'static str) -> Result<&'a str, ConfigError> {
    value
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .ok_or(ConfigError::MissingAuthSetting { key })
}

#[cfg(test)]
mod tests {
    //! Environment-driven settings tests.

    use super::*;
    use std::ffi::OsString;

    use env_lock::lock_env;
    use rstest::rstest;

    const KEYS: [&str; 10] = [
        "TRIO_DATABASE_URL",
        "TRIO_BIND_ADDR",
        "TRIO_POOL_MAX_SIZE",
        "TRIO_POOL_CHECKOUT_SECS",
        "TRIO_RUN_MIGRATIONS",
        "TRIO_ENABLE_BOOKING",
        "TRIO_ENABLE_TRIVIA",
        "TRIO_ENABLE_COFFEE",
        "TRIO_AUTH_DOMAIN",
        "TRIO_AUTH_AUDIENCE",
    ];

    fn env_with(overrides: &[(&str, &str)]) -> Vec<(&'static str, Option<String>)> {
        KEYS.iter()
            .map(|key| {
                let value = overrides
                    .iter()
                    .find(|(name, _)| name == key)
                    .map(|(_, value)| (*value).to_owned());
                (*key, value)
            })
            .collect()
    }

    fn load() -> AppSettings {
        AppSettings::load_from_iter([OsString::from("trio")]).expect("config should load")
    }

    #[rstest]
    fn defaults_apply_when_unset() {
        let _guard = lock_env(env_with(&[]));
        let settings = load();
        assert_eq!(settings.database_url(), Err(ConfigError::MissingDatabaseUrl));
        assert_eq!(
            settings.bind_addr().expect("default address"),
            "0.0.0.0:8080".parse::<SocketAddr>().expect("literal address")
        );
        assert_eq!(settings.pool_max_size(), 10);
        assert_eq!(settings.pool_checkout_timeout(), Duration::from_secs(30));
        assert!(settings.run_migrations);
        assert_eq!(settings.applications(), Applications::default());
    }

    #[rstest]
    fn environment_overrides_are_respected() {
        let _guard = lock_env(env_with(&[
            ("TRIO_DATABASE_URL", "postgres://trio@localhost/trio"),
            ("TRIO_BIND_ADDR", "127.0.0.1:9000"),
            ("TRIO_POOL_MAX_SIZE", "4"),
            ("TRIO_POOL_CHECKOUT_SECS", "5"),
            ("TRIO_RUN_MIGRATIONS", "false"),
            ("TRIO_ENABLE_COFFEE", "false"),
        ]));
        let settings = load();
        assert_eq!(
            settings.database_url().expect("database url"),
            "postgres://trio@localhost/trio"
        );
        assert_eq!(settings.bind_addr().expect("address").port(), 9000);
        assert_eq!(settings.pool_max_size(), 4);
        assert_eq!(settings.pool_checkout_timeout(), Duration::from_secs(5));
        assert!(!settings.run_migrations);
        assert!(!settings.applications().coffee);
        assert_eq!(settings.auth(), Ok(None));
    }

    #[rstest]
    #[case(&[], "auth_domain")]
    #[case(&[("TRIO_AUTH_DOMAIN", "coffee.eu.auth0.com")], "auth_audience")]
    #[case(&[("TRIO_AUTH_DOMAIN", " "), ("TRIO_AUTH_AUDIENCE", "drinks")], "auth_domain")]
    fn coffee_requires_identity_provider(
        #[case] overrides: &[(&str, &str)],
        #[case] missing: &'static str,
    ) {
        let _guard = lock_env(env_with(overrides));
        assert_eq!(
            load().auth(),
            Err(ConfigError::MissingAuthSetting { key: missing })
        );
    }

    #[rstest]
    fn coffee_auth_settings_are_returned() {
        let _guard = lock_env(env_with(&[
            ("TRIO_AUTH_DOMAIN", "coffee.eu.auth0.com"),
            ("TRIO_AUTH_AUDIENCE", "drinks"),
        ]));
        assert_eq!(
            load().auth(),
            Ok(Some(AuthSettings {
                domain: "coffee.eu.auth0.com".to_owned(),
                audience: "drinks".to_owned(),
            }))
        );
    }

    #[rstest]
    fn malformed_bind_addr_is_reported() {
        let _guard = lock_env(env_with(&[("TRIO_BIND_ADDR", "everywhere")]));
        let err = load().bind_addr().expect_err("bad address");
        assert!(matches!(err, ConfigError::InvalidBindAddr { value, .. } if value == "everywhere"));
    }
}
