//! Database configuration loaded from the environment or a TOML document.
//!
//! ```toml
//! [database]
//! url = "postgres://${JOBLY_DB_USER}@localhost/jobly"
//! max_pool_size = 8
//! ```

use crate::error::{JoblyError, JoblyResult};
use serde::Deserialize;
use std::path::Path;

/// Connection settings for the jobly store.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    #[serde(default = "default_pool_size")]
    pub max_pool_size: usize,
}

#[derive(Debug, Deserialize)]
struct ConfigFile {
    database: DatabaseConfig,
}

fn default_pool_size() -> usize {
    DatabaseConfig::DEFAULT_POOL_MAX_SIZE
}

impl DatabaseConfig {
    pub const DEFAULT_POOL_MAX_SIZE: usize = 16;

    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            max_pool_size: Self::DEFAULT_POOL_MAX_SIZE,
        }
    }

    /// Load from `DATABASE_URL` and `JOBLY_POOL_MAX_SIZE`, reading `.env` first if present.
    pub fn from_env() -> JoblyResult<Self> {
        dotenvy::dotenv().ok();

        let url = std::env::var("DATABASE_URL")
            .map_err(|_| JoblyError::Config("DATABASE_URL is not set".into()))?;
        let max_pool_size = match std::env::var("JOBLY_POOL_MAX_SIZE") {
            Ok(raw) => parse_pool_size(&raw)?,
            Err(_) => Self::DEFAULT_POOL_MAX_SIZE,
        };
        Ok(Self { url, max_pool_size })
    }

    /// Parse a `[database]` table. `${VAR}` references in `url` are expanded.
    pub fn from_toml_str(raw: &str) -> JoblyResult<Self> {
        let file: ConfigFile = toml::from_str(raw)
            .map_err(|e| JoblyError::Config(format!("failed to parse config: {e}")))?;
        let mut config = file.database;
        config.url = expand_env_vars(&config.url)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_toml_file(path: impl AsRef<Path>) -> JoblyResult<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| {
            JoblyError::Config(format!("failed to read config file {}: {e}", path.display()))
        })?;
        Self::from_toml_str(&raw)
    }

    fn validate(&self) -> JoblyResult<()> {
        if self.url.trim().is_empty() {
            return Err(JoblyError::Config("database.url must not be empty".into()));
        }
        if self.max_pool_size == 0 {
            return Err(JoblyError::Config(
                "database.max_pool_size must be at least 1".into(),
            ));
        }
        Ok(())
    }

    #[cfg(feature = "pool")]
    pub fn create_pool(&self) -> JoblyResult<deadpool_postgres::Pool> {
        crate::pool::create_pool_from(self)
    }
}

fn parse_pool_size(raw: &str) -> JoblyResult<usize> {
    match raw.trim().parse::<usize>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(JoblyError::Config(format!(
            "JOBLY_POOL_MAX_SIZE must be a positive integer, got {raw:?}"
        ))),
    }
}

fn expand_env_vars(input: &str) -> JoblyResult<String> {
    let mut out = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();

    while let Some(c) = chars.next() {
        if c == '$' && chars.peek() == Some(&'{') {
            chars.next();

            let mut key = String::new();
            let mut closed = false;
            for ch in chars.by_ref() {
                if ch == '}' {
                    closed = true;
                    break;
                }
                key.push(ch);
            }

            if !closed {
                return Err(JoblyError::Config(format!(
                    "unterminated env var reference: ${{{key}"
                )));
            }
            if key.is_empty() {
                return Err(JoblyError::Config("invalid env var reference: ${}".into()));
            }

            let v = std::env::var(&key).map_err(|_| {
                JoblyError::Config(format!("missing env var for config expansion: {key}"))
            })?;
            out.push_str(&v);
            continue;
        }

        out.push(c);
    }

    Ok(out)
}
