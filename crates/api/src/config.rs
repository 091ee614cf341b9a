//! Configuration loaded from environment variables.

use std::env;
use std::net::IpAddr;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result};
use jsonwebtoken::Algorithm;

/// Value of `DATABASE_URL` selecting the in-process store.
pub const MEMORY_DATABASE_URL: &str = "memory";

/// Application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port (default: 5000).
    pub port: u16,

    /// Address to bind (default: 127.0.0.1).
    pub bind_addr: IpAddr,

    /// PostgreSQL connection URL, or `memory` for the in-process store.
    pub database_url: String,

    /// Maximum database connections in pool (default: 10).
    pub database_max_connections: u32,

    /// Drop, recreate and seed the drinks table at startup (default: false).
    pub reset_db_on_start: bool,

    /// CORS allowed origins (comma-separated, default: "*").
    pub cors_allowed_origins: Vec<String>,

    /// Bearer token verification settings.
    pub auth: AuthConfig,
}

/// Settings for verifying identity-provider tokens.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Expected `aud` claim.
    pub audience: String,

    /// Expected `iss` claim.
    pub issuer: String,

    /// URL of the published JSON Web Key Set.
    pub jwks_url: String,

    /// Accepted signing algorithms (default: RS256).
    pub algorithms: Vec<Algorithm>,

    /// Timeout for fetching the key set (default: 5s).
    pub jwks_timeout: Duration,

    /// Fetch the key set once at startup and fail if unreachable (default: true).
    pub check_on_start: bool,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        let port = env::var("PORT")
            .unwrap_or_else(|_| "5000".to_string())
            .parse()
            .context("PORT must be a valid u16")?;

        let bind_addr = env::var("BIND_ADDR")
            .unwrap_or_else(|_| "127.0.0.1".to_string())
            .parse()
            .context("BIND_ADDR must be a valid IP address")?;

        let database_url =
            env::var("DATABASE_URL").context("DATABASE_URL environment variable is required")?;

        let database_max_connections = env::var("DATABASE_MAX_CONNECTIONS")
            .unwrap_or_else(|_| "10".to_string())
            .parse()
            .context("DATABASE_MAX_CONNECTIONS must be a valid u32")?;

        let reset_db_on_start = parse_flag("RESET_DB_ON_START", false)?;

        let cors_allowed_origins = env::var("CORS_ALLOWED_ORIGINS")
            .map(|v| split_list(&v))
            .unwrap_or_else(|_| vec!["*".to_string()]);

        let domain =
            env::var("AUTH0_DOMAIN").context("AUTH0_DOMAIN environment variable is required")?;

        let audience =
            env::var("API_AUDIENCE").context("API_AUDIENCE environment variable is required")?;

        let issuer = env::var("AUTH_ISSUER").unwrap_or_else(|_| format!("https://{domain}/"));

        let jwks_url = env::var("JWKS_URL")
            .unwrap_or_else(|_| format!("https://{domain}/.well-known/jwks.json"));

        let algorithms = parse_algorithms(
            &env::var("AUTH_ALGORITHMS").unwrap_or_else(|_| "RS256".to_string()),
        )?;

        let jwks_timeout = env::var("JWKS_TIMEOUT_SECS")
            .unwrap_or_else(|_| "5".to_string())
            .parse()
            .map(Duration::from_secs)
            .context("JWKS_TIMEOUT_SECS must be a valid u64")?;

        let check_on_start = parse_flag("JWKS_CHECK_ON_START", true)?;

        Ok(Self {
            port,
            bind_addr,
            database_url,
            database_max_connections,
            reset_db_on_start,
            cors_allowed_origins,
            auth: AuthConfig {
                audience,
                issuer,
                jwks_url,
                algorithms,
                jwks_timeout,
                check_on_start,
            },
        })
    }

    /// Whether the in-process store was requested.
    pub fn uses_memory_store(&self) -> bool {
        self.database_url == MEMORY_DATABASE_URL
    }
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

fn parse_flag(name: &str, default: bool) -> Result<bool> {
    match env::var(name) {
        Ok(v) => match v.trim().to_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" | "" => Ok(false),
            other => anyhow::bail!("{name} must be a boolean, got {other:?}"),
        },
        Err(_) => Ok(default),
    }
}

/// Parse a comma-separated algorithm list such as `RS256,RS384`.
pub fn parse_algorithms(value: &str) -> Result<Vec<Algorithm>> {
    let algorithms = split_list(value)
        .iter()
        .map(|name| {
            Algorithm::from_str(name).with_context(|| format!("unknown signing algorithm {name}"))
        })
        .collect::<Result<Vec<_>>>()?;

    if algorithms.is_empty() {
        anyhow::bail!("AUTH_ALGORITHMS must name at least one algorithm");
    }

    Ok(algorithms)
}
