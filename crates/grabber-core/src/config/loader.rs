use super::schema::GrabberConfig;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

pub const LOCAL_CONFIG: &str = "grabber.yaml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
}

pub struct ConfigLoader;

impl ConfigLoader {
    /// Candidate config files, highest priority first: `./grabber.yaml`,
    /// then `~/.grabber/config.yaml`.
    pub fn search_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from(".").join(LOCAL_CONFIG)];
        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(".grabber").join("config.yaml"));
        }
        paths
    }

    /// The first existing file from [`search_paths`](Self::search_paths),
    /// or defaults when there is none.
    pub async fn load_default() -> Result<GrabberConfig, ConfigError> {
        Self::load_first(&Self::search_paths()).await
    }

    pub async fn load_first(paths: &[PathBuf]) -> Result<GrabberConfig, ConfigError> {
        match paths.iter().find(|p| p.is_file()) {
            Some(path) => Self::load_from(path).await,
            None => {
                debug!("No config file found, using defaults");
                Ok(GrabberConfig::default())
            }
        }
    }

    /// An empty file yields the defaults.
    pub async fn load_from(path: &Path) -> Result<GrabberConfig, ConfigError> {
        debug!("Loading config from {}", path.display());
        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| ConfigError::Io {
                path: path.to_path_buf(),
                source,
            })?;
        if content.trim().is_empty() {
            return Ok(GrabberConfig::default());
        }
        serde_yaml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}
