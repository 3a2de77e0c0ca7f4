//! Server configuration from the environment

use crate::db::DEFAULT_MAP_SIZE;
use crate::error::{Error, Result};

pub const DEFAULT_DB_PATH: &str = "./data/foldercaps.mdb";
pub const DEFAULT_BIND: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 3000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub db_path: String,
    pub map_size: usize,
    pub bind: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            db_path: DEFAULT_DB_PATH.into(),
            map_size: DEFAULT_MAP_SIZE,
            bind: DEFAULT_BIND.into(),
            port: DEFAULT_PORT,
        }
    }
}

impl ServerConfig {
    /// Read `FOLDERCAPS_DB`, `FOLDERCAPS_MAP_SIZE`, `FOLDERCAPS_BIND` and `PORT`
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|k| std::env::var(k).ok())
    }

    /// Same as [`from_env`](Self::from_env) with an explicit variable source
    pub fn from_lookup<F: Fn(&str) -> Option<String>>(var: F) -> Result<Self> {
        let d = ServerConfig::default();
        Ok(ServerConfig {
            db_path: var("FOLDERCAPS_DB").unwrap_or(d.db_path),
            map_size: parse(&var, "FOLDERCAPS_MAP_SIZE")?.unwrap_or(d.map_size),
            bind: var("FOLDERCAPS_BIND").unwrap_or(d.bind),
            port: parse(&var, "PORT")?.unwrap_or(d.port),
        })
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.bind, self.port)
    }
}

fn parse<T: std::str::FromStr, F: Fn(&str) -> Option<String>>(var: &F, key: &str) -> Result<Option<T>> {
    match var(key) {
        Some(v) => v
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| Error::Usage(format!("{key} is not a valid number: {v}"))),
        None => Ok(None),
    }
}
