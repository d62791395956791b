use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// `host:port`; a bare `:port` listens on all interfaces.
    pub listen_addr: String,
    /// Directory files are served from.
    pub root: PathBuf,
    /// Append-only access log.
    pub log_file: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen_addr: ":8080".to_string(),
            root: PathBuf::from("./public"),
            log_file: PathBuf::from("logs/server.log"),
        }
    }
}

impl Config {
    /// Reads the YAML file named by `LANTERN_CONFIG` if set, then applies the
    /// `LISTEN`, `ROOT` and `LOG_FILE` overrides.
    pub fn load() -> anyhow::Result<Self> {
        let mut cfg = match std::env::var("LANTERN_CONFIG") {
            Ok(path) => Self::from_file(Path::new(&path))?,
            Err(_) => Self::default(),
        };

        if let Ok(listen_addr) = std::env::var("LISTEN") {
            cfg.listen_addr = listen_addr;
        }
        if let Ok(root) = std::env::var("ROOT") {
            cfg.root = PathBuf::from(root);
        }
        if let Ok(log_file) = std::env::var("LOG_FILE") {
            cfg.log_file = PathBuf::from(log_file);
        }

        Ok(cfg)
    }

    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Could not read config {}", path.display()))?;
        Self::from_yaml(&raw).with_context(|| format!("Invalid config {}", path.display()))
    }

    pub fn from_yaml(raw: &str) -> anyhow::Result<Self> {
        Ok(serde_yaml::from_str(raw)?)
    }

    /// The address handed to the socket: `:8080` becomes `0.0.0.0:8080`.
    pub fn bind_addr(&self) -> String {
        if self.listen_addr.starts_with(':') {
            format!("0.0.0.0{}", self.listen_addr)
        } else {
            self.listen_addr.clone()
        }
    }
}
