//! Admin account and token settings.

use serde::Deserialize;

use crate::error::{AppError, AppResult};

/// Development secret. Deployments must set `ADMIN_TOKEN_SECRET`.
pub const DEFAULT_TOKEN_SECRET: &str = "change-this-secret-in-production";

/// Admin configuration loaded from environment variables.
///
/// Environment variables are prefixed with `ADMIN_`:
/// - `ADMIN_USERNAME`: Seeded admin account (default: "admin")
/// - `ADMIN_PASSWORD`: Seeded admin password (default: "admin123")
/// - `ADMIN_TOKEN_SECRET`: HMAC key for bearer tokens
/// - `ADMIN_TOKEN_TTL_SECONDS`: Token lifetime (default: 12 hours)
#[derive(Debug, Clone, Deserialize)]
pub struct AdminConfig {
    #[serde(default = "default_username")]
    pub username: String,

    #[serde(default = "default_password")]
    pub password: String,

    #[serde(default = "default_token_secret")]
    pub token_secret: String,

    #[serde(default = "default_token_ttl")]
    pub token_ttl_seconds: i64,
}

fn default_username() -> String {
    "admin".to_string()
}

fn default_password() -> String {
    "admin123".to_string()
}

fn default_token_secret() -> String {
    DEFAULT_TOKEN_SECRET.to_string()
}

fn default_token_ttl() -> i64 {
    60 * 60 * 12
}

impl AdminConfig {
    /// Load configuration from environment variables.
    ///
    /// Environment variables are prefixed with `ADMIN_`. A value that
    /// fails to parse, or a token lifetime that is not positive, is an error.
    pub fn from_env() -> AppResult<Self> {
        envy::prefixed("ADMIN_").from_env::<AdminConfig>()?.validated()
    }

    /// Load configuration from `ADMIN_`-prefixed pairs.
    pub fn from_vars<I>(vars: I) -> AppResult<Self>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        envy::prefixed("ADMIN_")
            .from_iter::<_, AdminConfig>(vars)?
            .validated()
    }

    fn validated(self) -> AppResult<Self> {
        if self.token_ttl_seconds <= 0 {
            return Err(AppError::Config(
                "ADMIN_TOKEN_TTL_SECONDS must be positive".to_string(),
            ));
        }
        Ok(self)
    }

    /// Whether the token secret is still the development default.
    pub fn uses_default_secret(&self) -> bool {
        self.token_secret == DEFAULT_TOKEN_SECRET
    }
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            username: default_username(),
            password: default_password(),
            token_secret: default_token_secret(),
            token_ttl_seconds: default_token_ttl(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AdminConfig::default();
        assert_eq!(config.username, "admin");
        assert_eq!(config.token_ttl_seconds, 43_200);
        assert!(config.uses_default_secret());
    }

    #[test]
    fn test_custom_secret() {
        let vars = vec![("TOKEN_SECRET".to_string(), "s3cr3t".to_string())];
        let config: AdminConfig = envy::from_iter(vars).unwrap();
        assert!(!config.uses_default_secret());
        assert_eq!(config.password, "admin123");
    }

    #[test]
    fn test_token_ttl_must_be_positive() {
        for ttl in ["0", "-5"] {
            let vars = vec![("ADMIN_TOKEN_TTL_SECONDS".to_string(), ttl.to_string())];
            match AdminConfig::from_vars(vars) {
                Err(AppError::Config(msg)) => assert!(msg.contains("TOKEN_TTL_SECONDS")),
                other => panic!("expected config error for ttl {}, got {:?}", ttl, other),
            }
        }

        let vars = vec![("ADMIN_TOKEN_TTL_SECONDS".to_string(), "900".to_string())];
        assert_eq!(AdminConfig::from_vars(vars).unwrap().token_ttl_seconds, 900);
    }

    #[test]
    fn test_unparseable_ttl_is_config_error() {
        let vars = vec![("ADMIN_TOKEN_TTL_SECONDS".to_string(), "soon".to_string())];
        assert!(matches!(
            AdminConfig::from_vars(vars),
            Err(AppError::Config(_))
        ));
    }
}
