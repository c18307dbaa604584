use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, Result};

pub struct Config {
    pub db_path: PathBuf,
    pub host: String,
    pub port: u16,
}

impl Config {
    /// Read settings from the environment, falling back to defaults.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let db_path = lookup("CHIRP_DB_PATH")
            .unwrap_or_else(|| "chirp.db".into())
            .into();
        let host = lookup("CHIRP_HOST").unwrap_or_else(|| "0.0.0.0".into());
        let port = match lookup("CHIRP_PORT") {
            Some(raw) => raw
                .parse()
                .with_context(|| format!("CHIRP_PORT is not a valid port: {raw}"))?,
            None => 8080,
        };

        Ok(Self { db_path, host, port })
    }

    pub fn addr(&self) -> Result<SocketAddr> {
        let addr = format!("{}:{}", self.host, self.port);
        addr.parse()
            .with_context(|| format!("invalid listen address {addr}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> Result<Config> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults() {
        let cfg = config(&[]).unwrap();
        assert_eq!(cfg.db_path, PathBuf::from("chirp.db"));
        assert_eq!(cfg.addr().unwrap(), "0.0.0.0:8080".parse().unwrap());
    }

    #[test]
    fn overrides() {
        let cfg = config(&[
            ("CHIRP_DB_PATH", "/tmp/social.db"),
            ("CHIRP_HOST", "127.0.0.1"),
            ("CHIRP_PORT", "9000"),
        ])
        .unwrap();
        assert_eq!(cfg.db_path, PathBuf::from("/tmp/social.db"));
        assert_eq!(cfg.addr().unwrap(), "127.0.0.1:9000".parse().unwrap());
    }

    #[test]
    fn bad_port_is_an_error() {
        assert!(config(&[("CHIRP_PORT", "eighty")]).is_err());
    }
}
