//! Configuration management with layered hierarchy

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::engine::score::RiskCatalog;

/// Toolkit configuration with layered hierarchy
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Default author for new assessments
    pub author: Option<String>,

    /// Directory where assessment records are written
    pub assessments_dir: Option<PathBuf>,

    /// Path to a risk-catalog YAML overriding the built-in tables
    pub catalog: Option<PathBuf>,
}

impl Config {
    /// Load configuration from all sources, merging in priority order
    pub fn load() -> Self {
        let mut config = Config::default();

        // 1. Built-in defaults (already in Default impl)

        // 2. Global user config (~/.config/cot/config.yaml)
        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                if let Ok(contents) = std::fs::read_to_string(&global_path) {
                    if let Ok(global) = serde_yml::from_str::<Config>(&contents) {
                        config.merge(global);
                    }
                }
            }
        }

        // 3. Environment variables
        if let Ok(author) = std::env::var("COT_AUTHOR") {
            config.author = Some(author);
        }
        if let Ok(dir) = std::env::var("COT_ASSESSMENTS_DIR") {
            config.assessments_dir = Some(PathBuf::from(dir));
        }
        if let Ok(catalog) = std::env::var("COT_CATALOG") {
            config.catalog = Some(PathBuf::from(catalog));
        }

        config
    }

    /// Get the path to the global config file
    fn global_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "cot")
            .map(|dirs| dirs.config_dir().join("config.yaml"))
    }

    /// Merge another config into this one (other takes precedence)
    fn merge(&mut self, other: Config) {
        if other.author.is_some() {
            self.author = other.author;
        }
        if other.assessments_dir.is_some() {
            self.assessments_dir = other.assessments_dir;
        }
        if other.catalog.is_some() {
            self.catalog = other.catalog;
        }
    }

    /// Get the author name, falling back to git config or username
    pub fn author(&self) -> String {
        if let Some(ref author) = self.author {
            return author.clone();
        }

        // Try git config
        if let Ok(output) = std::process::Command::new("git")
            .args(["config", "user.name"])
            .output()
        {
            if output.status.success() {
                let name = String::from_utf8_lossy(&output.stdout).trim().to_string();
                if !name.is_empty() {
                    return name;
                }
            }
        }

        // Fall back to username
        std::env::var("USER")
            .or_else(|_| std::env::var("USERNAME"))
            .unwrap_or_else(|_| "unknown".to_string())
    }

    /// Directory for assessment records (default: ./assessments)
    pub fn assessments_dir(&self) -> PathBuf {
        self.assessments_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from("assessments"))
    }

    /// Load the risk catalog: an explicit path wins, then the configured
    /// override, then the built-in defaults
    pub fn load_catalog(&self, explicit: Option<&Path>) -> Result<RiskCatalog, CatalogError> {
        let path = explicit.map(Path::to_path_buf).or_else(|| self.catalog.clone());
        match path {
            Some(path) => {
                let contents = std::fs::read_to_string(&path)
                    .map_err(|e| CatalogError::Read(path.clone(), e))?;
                serde_yml::from_str(&contents).map_err(|e| CatalogError::Parse(path, e))
            }
            None => Ok(RiskCatalog::default()),
        }
    }
}

/// Errors loading a risk-catalog override file
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("failed to read catalog file {0}: {1}")]
    Read(PathBuf, #[source] std::io::Error),

    #[error("failed to parse catalog file {0}: {1}")]
    Parse(PathBuf, #[source] serde_yml::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_catalog_when_no_override() {
        let config = Config::default();
        let catalog = config.load_catalog(None).unwrap();
        assert_eq!(catalog, RiskCatalog::default());
    }

    #[test]
    fn test_explicit_catalog_replaces_builtin() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        let mut catalog = RiskCatalog::default();
        catalog.geographic_risk.insert("CN".to_string(), 42);
        write!(file, "{}", serde_yml::to_string(&catalog).unwrap()).unwrap();

        let loaded = Config::default().load_catalog(Some(file.path())).unwrap();
        assert_eq!(loaded.geographic_risk.get("CN"), Some(&42));
    }

    #[test]
    fn test_missing_catalog_file_is_an_error() {
        let config = Config::default();
        let err = config.load_catalog(Some(Path::new("/nonexistent/catalog.yaml")));
        assert!(matches!(err, Err(CatalogError::Read(_, _))));
    }

    #[test]
    fn test_assessments_dir_default() {
        assert_eq!(
            Config::default().assessments_dir(),
            PathBuf::from("assessments")
        );
    }
}
