//! Service configuration from environment variables

use anyhow::{bail, Context, Result};
use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::cache::SnapshotSources;

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub catalog_path: PathBuf,
    pub seasonal_config_path: PathBuf,
    pub catalog_refresh: Duration,
    pub diagnostics_capacity: usize,
}

impl Config {
    /// Read configuration from the process environment.
    ///
    /// Call `dotenvy::dotenv()` first to pick up a `.env` file.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let string = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let refresh_secs: u64 = parse(&lookup, "CATALOG_REFRESH_SECS", 600)?;
        if refresh_secs == 0 {
            bail!("CATALOG_REFRESH_SECS must be greater than zero");
        }

        Ok(Self {
            host: string("HOST", "0.0.0.0"),
            port: parse(&lookup, "PORT", 8080)?,
            catalog_path: string("CATALOG_PATH", "data/catalog.json").into(),
            seasonal_config_path: string("SEASONAL_CONFIG_PATH", "data/seasonal.json").into(),
            catalog_refresh: Duration::from_secs(refresh_secs),
            diagnostics_capacity: parse(&lookup, "DIAGNOSTICS_CAPACITY", 100)?,
        })
    }

    pub fn socket_addr(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .with_context(|| format!("invalid listen address {}:{}", self.host, self.port))
    }

    pub fn snapshot_sources(&self) -> SnapshotSources {
        SnapshotSources {
            catalog_path: self.catalog_path.clone(),
            seasonal_path: self.seasonal_config_path.clone(),
        }
    }
}

fn parse<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{} must be a number, got {:?}", key, raw)),
        None => Ok(default),
    }
}
