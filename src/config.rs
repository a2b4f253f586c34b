use std::env;
use std::str::FromStr;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} tidak ditemukan di .env")]
    Missing(&'static str),

    #[error("nilai {key} tidak valid: {value}")]
    Invalid { key: &'static str, value: String },
}

// Sepuluh tahun.
const MAX_TOKEN_TTL_DAYS: i64 = 3650;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub jwt_secret: String,
    pub host: String,
    pub port: u16,
    pub db_max_connections: u32,
    pub cors_allowed_origin: Option<String>,
    pub token_ttl_days: i64,
    pub bcrypt_cost: u32,
    pub default_member_password: String,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Sama dengan `from_env`, tetapi sumber variabelnya bisa diganti (untuk test).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let database_url = non_empty("DATABASE_URL")
            .or_else(|| non_empty("NEON_DATABASE_URL"))
            .ok_or(ConfigError::Missing("DATABASE_URL"))?;
        let jwt_secret = non_empty("JWT_SECRET").ok_or(ConfigError::Missing("JWT_SECRET"))?;

        Ok(AppConfig {
            database_url,
            jwt_secret,
            host: non_empty("HOST").unwrap_or_else(|| "127.0.0.1".to_string()),
            port: parse_or(&non_empty, "PORT", 8000)?,
            db_max_connections: parse_or(&non_empty, "DB_MAX_CONNECTIONS", 5)?,
            cors_allowed_origin: non_empty("CORS_ALLOWED_ORIGIN"),
            token_ttl_days: parse_in_range(&non_empty, "TOKEN_TTL_DAYS", 7, MAX_TOKEN_TTL_DAYS)?,
            bcrypt_cost: parse_or(&non_empty, "BCRYPT_COST", 10)?,
            default_member_password: non_empty("DEFAULT_MEMBER_PASSWORD")
                .unwrap_or_else(|| "password123".to_string()),
        })
    }
}

fn parse_in_range<F>(lookup: &F, key: &'static str, default: i64, max: i64) -> Result<i64, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let value = parse_or(lookup, key, default)?;
    if (1..=max).contains(&value) {
        Ok(value)
    } else {
        Err(ConfigError::Invalid {
            key,
            value: value.to_string(),
        })
    }
}

fn parse_or<T, F>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { key, value: raw }),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_apply_when_optional_keys_absent() {
        let cfg = AppConfig::from_lookup(lookup(&[
            ("DATABASE_URL", "postgres://localhost/kkg"),
            ("JWT_SECRET", "rahasia"),
        ]))
        .unwrap();

        assert_eq!(cfg.port, 8000);
        assert_eq!(cfg.token_ttl_days, 7);
        assert_eq!(cfg.db_max_connections, 5);
        assert_eq!(cfg.default_member_password, "password123");
        assert!(cfg.cors_allowed_origin.is_none());
    }

    #[test]
    fn neon_url_is_accepted_as_fallback() {
        let cfg = AppConfig::from_lookup(lookup(&[
            ("NEON_DATABASE_URL", "postgres://neon/kkg"),
            ("JWT_SECRET", "rahasia"),
        ]))
        .unwrap();
        assert_eq!(cfg.database_url, "postgres://neon/kkg");
    }

    #[test]
    fn missing_secret_is_an_error() {
        let err = AppConfig::from_lookup(lookup(&[("DATABASE_URL", "postgres://x")])).unwrap_err();
        assert!(matches!(err, ConfigError::Missing("JWT_SECRET")));
    }

    #[test]
    fn malformed_port_is_reported() {
        let err = AppConfig::from_lookup(lookup(&[
            ("DATABASE_URL", "postgres://x"),
            ("JWT_SECRET", "s"),
            ("PORT", "delapan"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: "PORT", .. }));
    }

    #[test]
    fn token_ttl_must_stay_within_bounds() {
        for ttl in ["0", "-3", "99999999999999"] {
            let err = AppConfig::from_lookup(lookup(&[
                ("DATABASE_URL", "postgres://x"),
                ("JWT_SECRET", "s"),
                ("TOKEN_TTL_DAYS", ttl),
            ]))
            .unwrap_err();
            assert!(matches!(err, ConfigError::Invalid { key: "TOKEN_TTL_DAYS", .. }), "{}", ttl);
        }

        let cfg = AppConfig::from_lookup(lookup(&[
            ("DATABASE_URL", "postgres://x"),
            ("JWT_SECRET", "s"),
            ("TOKEN_TTL_DAYS", "30"),
        ]))
        .unwrap();
        assert_eq!(cfg.token_ttl_days, 30);
    }
}
