use crate::models::RunType;
use std::{env, fmt::Display, net::SocketAddr, path::PathBuf, str::FromStr};
use tracing::warn;

pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_DATA_PATH: &str = "data/snapshot.json";
pub const DEFAULT_TOP_N: usize = 10;

/// Runtime settings, resolved once at startup and handed to the router.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub port: u16,
    pub data_path: PathBuf,
    pub default_run_type: RunType,
    pub top_n: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            data_path: PathBuf::from(DEFAULT_DATA_PATH),
            default_run_type: RunType::Pro,
            top_n: DEFAULT_TOP_N,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            port: parse_or(&lookup, "PORT", defaults.port),
            data_path: lookup("KZ_STATS_DATA_PATH")
                .filter(|value| !value.trim().is_empty())
                .map(PathBuf::from)
                .unwrap_or(defaults.data_path),
            default_run_type: parse_or(&lookup, "KZ_STATS_RUN_TYPE", defaults.default_run_type),
            top_n: parse_or(&lookup, "KZ_STATS_TOP_N", defaults.top_n),
        }
    }

    pub fn addr(&self) -> SocketAddr {
        SocketAddr::from(([0, 0, 0, 0], self.port))
    }
}

fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> T
where
    T: FromStr,
    T::Err: Display,
{
    match lookup(key) {
        Some(raw) => match raw.trim().parse() {
            Ok(value) => value,
            Err(err) => {
                warn!("ignoring {key}={raw:?}: {err}");
                default
            }
        },
        None => default,
    }
}
