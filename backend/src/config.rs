use std::env;
use std::path::PathBuf;

use log::warn;

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 5000;
pub const MODEL_DIR_NAME: &str = "model";
pub const STATIC_DIR_NAME: &str = "static";

/// Server settings read from the environment at startup.
#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub workers: usize,
    pub model_dir: PathBuf,
    pub static_dir: PathBuf,
}

impl ServerConfig {
    /// `HOST`, `PORT`, `WORKERS`, `MODEL_DIR` and `STATIC_DIR`.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = lookup("HOST").unwrap_or_else(|| DEFAULT_HOST.to_string());
        let port = parse_or("PORT", lookup("PORT"), DEFAULT_PORT);
        let workers = parse_or("WORKERS", lookup("WORKERS"), num_cpus::get()).max(1);
        let model_dir = lookup("MODEL_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| beside_executable(MODEL_DIR_NAME));
        let static_dir = lookup("STATIC_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| beside_executable(STATIC_DIR_NAME));

        ServerConfig {
            host,
            port,
            workers,
            model_dir,
            static_dir,
        }
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_or<T: std::str::FromStr + std::fmt::Display>(key: &str, raw: Option<String>, default: T) -> T {
    match raw {
        Some(value) => value.trim().parse().unwrap_or_else(|_| {
            warn!("ignoring invalid {}={:?}, using {}", key, value, default);
            default
        }),
        None => default,
    }
}

/// `name` next to the running executable, or under the working directory
/// when the executable path cannot be resolved.
pub fn beside_executable(name: &str) -> PathBuf {
    env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|dir| dir.join(name)))
        .unwrap_or_else(|| PathBuf::from(name))
}
