//! Database configuration for PostgreSQL connection.

use percent_encoding::percent_decode_str;
use serde::Deserialize;
use sqlx::postgres::{PgConnectOptions, PgSslMode};
use url::Url;

use crate::error::AppResult;

/// Database configuration loaded from the libpq-style environment.
///
/// Environment variables are prefixed with `PG`:
/// - `PGHOST`: Database host (default: "localhost")
/// - `PGPORT`: Database port (default: 5432)
/// - `PGUSER`: Database user (default: "postgres")
/// - `PGPASSWORD`: Database password
/// - `PGDATABASE`: Database name (default: "TeamDesk-db")
/// - `PGSSL` / `PGSSLMODE`: `false` / `disable` turn TLS off
///
/// Additional configuration:
/// - `DATABASE_URL`: Full connection URL (overrides individual settings)
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Database host
    #[serde(default = "default_host")]
    pub host: String,

    /// Database port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Database user
    #[serde(default = "default_user")]
    pub user: String,

    /// Database password
    #[serde(default)]
    pub password: Option<String>,

    /// Database name
    #[serde(default = "default_database")]
    pub database: String,

    /// `PGSSL`
    #[serde(default)]
    pub ssl: Option<String>,

    /// `PGSSLMODE`
    #[serde(default)]
    pub sslmode: Option<String>,

    /// Maximum connections in the pool
    #[serde(default = "default_max_connections")]
    pub pool_max_connections: u32,

    /// Connection acquire timeout in seconds
    #[serde(default = "default_acquire_timeout")]
    pub pool_acquire_timeout: u64,

    /// Full connection URL, read from `DATABASE_URL`
    #[serde(skip)]
    pub url: Option<String>,
}

fn default_host() -> String {
    "localhost".to_string()
}

fn default_port() -> u16 {
    5432
}

fn default_user() -> String {
    "postgres".to_string()
}

fn default_database() -> String {
    "TeamDesk-db".to_string()
}

fn default_max_connections() -> u32 {
    10
}

fn default_acquire_timeout() -> u64 {
    30
}

/// Connection target after `DATABASE_URL` has been folded in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionTarget {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: Option<String>,
    pub database: String,
    pub ssl_disabled: bool,
    pub from_url: bool,
}

impl DatabaseConfig {
    /// Load configuration from environment variables.
    ///
    /// Environment variables are prefixed with `PG`; `DATABASE_URL` is read as-is.
    pub fn from_env() -> AppResult<Self> {
        let mut config = envy::prefixed("PG").from_env::<DatabaseConfig>()?;
        config.url = std::env::var("DATABASE_URL").ok().filter(|u| !u.is_empty());
        Ok(config)
    }

    fn ssl_disabled(&self) -> bool {
        let off = |v: &Option<String>, word: &str| {
            v.as_deref()
                .map(|s| s.eq_ignore_ascii_case(word))
                .unwrap_or(false)
        };
        off(&self.ssl, "false") || off(&self.sslmode, "disable")
    }

    /// Resolve the connection target.
    ///
    /// A `DATABASE_URL` that fails to parse is ignored with a warning and the
    /// `PG*` settings are used instead.
    pub fn target(&self) -> ConnectionTarget {
        let ssl_disabled = self.ssl_disabled();

        if let Some(raw) = &self.url {
            match Url::parse(raw) {
                Ok(parsed) if parsed.host_str().is_some() => {
                    let decode = |s: &str| percent_decode_str(s).decode_utf8_lossy().into_owned();
                    let user = if parsed.username().is_empty() {
                        self.user.clone()
                    } else {
                        decode(parsed.username())
                    };
                    let password = parsed
                        .password()
                        .map(decode)
                        .or_else(|| self.password.clone());
                    let path = parsed.path().trim_start_matches('/');
                    let database = if path.is_empty() {
                        self.database.clone()
                    } else {
                        decode(path)
                    };

                    return ConnectionTarget {
                        host: parsed.host_str().unwrap_or_default().to_string(),
                        port: parsed.port().unwrap_or(5432),
                        user,
                        password,
                        database,
                        ssl_disabled,
                        from_url: true,
                    };
                }
                Ok(_) => {
                    tracing::warn!("DATABASE_URL has no host, falling back to PG* settings");
                }
                Err(e) => {
                    tracing::warn!(error = %e, "Invalid DATABASE_URL, falling back to PG* settings");
                }
            }
        }

        ConnectionTarget {
            host: self.host.clone(),
            port: self.port,
            user: self.user.clone(),
            password: self.password.clone(),
            database: self.database.clone(),
            ssl_disabled,
            from_url: false,
        }
    }

    /// Get PostgreSQL connection options.
    pub fn connect_options(&self) -> PgConnectOptions {
        let target = self.target();

        let ssl_mode = match (target.ssl_disabled, target.from_url) {
            (true, _) => PgSslMode::Disable,
            (false, true) => PgSslMode::Require,
            (false, false) => PgSslMode::Prefer,
        };

        let options = PgConnectOptions::new()
            .host(&target.host)
            .port(target.port)
            .username(&target.user)
            .database(&target.database)
            .ssl_mode(ssl_mode);

        match &target.password {
            Some(password) => options.password(password),
            None => options,
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            user: default_user(),
            password: None,
            database: default_database(),
            ssl: None,
            sslmode: None,
            pool_max_connections: default_max_connections(),
            pool_acquire_timeout: default_acquire_timeout(),
            url: None,
        }
    }
}
