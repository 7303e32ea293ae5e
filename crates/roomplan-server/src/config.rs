use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};

/// Placeholder secrets that must never sign real sessions.
const PLACEHOLDER_SECRETS: &[&str] = &[
    "your_secret_key",
    "change-me-to-a-random-string",
    "dev-secret-change-me",
];

pub struct Config {
    pub jwt_secret: String,
    pub db_path: PathBuf,
    pub addr: SocketAddr,
    pub cors_origin: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let jwt_secret = get("ROOMPLAN_JWT_SECRET").unwrap_or_default();
        if jwt_secret.is_empty() || PLACEHOLDER_SECRETS.contains(&jwt_secret.as_str()) {
            bail!("ROOMPLAN_JWT_SECRET is unset or still a placeholder");
        }

        let db_path = get("ROOMPLAN_DB_PATH").unwrap_or_else(|| "roomplan.db".into());
        let host = get("ROOMPLAN_HOST").unwrap_or_else(|| "0.0.0.0".into());
        let port: u16 = get("ROOMPLAN_PORT")
            .unwrap_or_else(|| "8080".into())
            .parse()
            .context("ROOMPLAN_PORT is not a valid port")?;
        let addr = format!("{}:{}", host, port)
            .parse()
            .with_context(|| format!("invalid bind address {}:{}", host, port))?;
        let cors_origin =
            get("ROOMPLAN_CORS_ORIGIN").unwrap_or_else(|| "http://localhost:3000".into());

        Ok(Self {
            jwt_secret,
            db_path: db_path.into(),
            addr,
            cors_origin,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn defaults_apply_when_only_secret_is_set() {
        let cfg = Config::from_lookup(lookup(&[("ROOMPLAN_JWT_SECRET", "s3cr3t")])).unwrap();
        assert_eq!(cfg.addr.port(), 8080);
        assert_eq!(cfg.db_path, PathBuf::from("roomplan.db"));
        assert_eq!(cfg.cors_origin, "http://localhost:3000");
    }

    #[test]
    fn placeholder_or_missing_secret_is_fatal() {
        assert!(Config::from_lookup(lookup(&[])).is_err());
        assert!(Config::from_lookup(lookup(&[("ROOMPLAN_JWT_SECRET", "your_secret_key")])).is_err());
    }

    #[test]
    fn bad_port_is_rejected() {
        let res = Config::from_lookup(lookup(&[
            ("ROOMPLAN_JWT_SECRET", "s3cr3t"),
            ("ROOMPLAN_PORT", "eighty"),
        ]));
        assert!(res.is_err());
    }
}
