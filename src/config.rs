use std::env;
use std::fmt::Display;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use dotenvy::dotenv;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub db_max_connections: u32,

    // Logging
    pub log_dir: PathBuf,
    pub log_level: String,

    // Policy snippet cache
    pub policy_cache_capacity: u64,
    pub policy_cache_ttl: Duration,
    pub policy_top_k: usize,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a config from any key/value source; `from_env` passes the process env.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let database_url =
            lookup("DATABASE_URL").ok_or_else(|| anyhow!("DATABASE_URL must be set"))?;

        Ok(Self {
            database_url,
            db_max_connections: parse_or(&lookup, "DB_MAX_CONNECTIONS", 5)?,
            log_dir: lookup("LOG_DIR").map(PathBuf::from).unwrap_or_else(|| PathBuf::from("logs")),
            log_level: lookup("LOG_LEVEL").unwrap_or_else(|| "info".to_string()),
            policy_cache_capacity: parse_or(&lookup, "POLICY_CACHE_CAPACITY", 1_000)?,
            policy_cache_ttl: Duration::from_secs(parse_or(
                &lookup,
                "POLICY_CACHE_TTL_SECS",
                3_600,
            )?),
            policy_top_k: parse_or(&lookup, "POLICY_TOP_K", 3)?,
        })
    }

    pub fn with_database_url(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            db_max_connections: 5,
            log_dir: PathBuf::from("logs"),
            log_level: "info".to_string(),
            policy_cache_capacity: 1_000,
            policy_cache_ttl: Duration::from_secs(3_600),
            policy_top_k: 3,
        }
    }
}

fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: Display,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e| anyhow!("{e}"))
            .with_context(|| format!("{key} has an invalid value '{raw}'")),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_apply_when_only_database_url_is_set() {
        let config =
            Config::from_lookup(lookup_from(&[("DATABASE_URL", "mysql://localhost/hr")])).unwrap();
        assert_eq!(config.db_max_connections, 5);
        assert_eq!(config.log_dir, PathBuf::from("logs"));
        assert_eq!(config.policy_cache_ttl, Duration::from_secs(3_600));
        assert_eq!(config.policy_top_k, 3);
    }

    #[test]
    fn missing_database_url_is_an_error() {
        let err = Config::from_lookup(lookup_from(&[])).unwrap_err();
        assert!(err.to_string().contains("DATABASE_URL"));
    }

    #[test]
    fn malformed_number_names_the_variable() {
        let err = Config::from_lookup(lookup_from(&[
            ("DATABASE_URL", "mysql://localhost/hr"),
            ("POLICY_TOP_K", "three"),
        ]))
        .unwrap_err();
        assert!(err.to_string().contains("POLICY_TOP_K"));
    }

    #[test]
    fn overrides_are_read() {
        let config = Config::from_lookup(lookup_from(&[
            ("DATABASE_URL", "mysql://localhost/hr"),
            ("DB_MAX_CONNECTIONS", "12"),
            ("POLICY_CACHE_TTL_SECS", "60"),
            ("LOG_LEVEL", "debug"),
        ]))
        .unwrap();
        assert_eq!(config.db_max_connections, 12);
        assert_eq!(config.policy_cache_ttl, Duration::from_secs(60));
        assert_eq!(config.log_level, "debug");
    }
}
