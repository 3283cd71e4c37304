use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use anyhow::{Result, anyhow};

pub const DEFAULT_BACKEND_URL: &str = "http://localhost:8080";
pub const DEFAULT_UPLOADED_BY: &str = "web";
pub const DEFAULT_TOP_K: u32 = 3;

/// Environment variable that overrides the configured backend base URL.
pub const BACKEND_URL_ENV: &str = "DOCCHAT_BACKEND_URL";

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Config {
    pub backend_url: Option<String>,
    pub uploaded_by: Option<String>,
    pub top_k: Option<u32>,
}

impl Config {
    pub fn new() -> Self {
        Self {
            backend_url: None,
            uploaded_by: None,
            top_k: None,
        }
    }

    pub fn load() -> Result<Self> {
        let config_path = Self::get_config_path()?;
        Self::load_from(&config_path)
    }

    fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::new());
        }

        let config_content = fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&config_content)?;
        Ok(config)
    }

    /// Resolved backend base URL: environment variable wins, then the config
    /// file, then the default.
    pub fn backend_url(&self) -> String {
        std::env::var(BACKEND_URL_ENV)
            .ok()
            .or_else(|| self.backend_url.clone())
            .unwrap_or_else(|| DEFAULT_BACKEND_URL.to_string())
    }

    pub fn uploaded_by(&self) -> String {
        self.uploaded_by
            .clone()
            .unwrap_or_else(|| DEFAULT_UPLOADED_BY.to_string())
    }

    pub fn top_k(&self) -> u32 {
        self.top_k.unwrap_or(DEFAULT_TOP_K)
    }

    fn get_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow!("Could not determine config directory"))?;

        Ok(config_dir.join("docchat").join("config.json"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("config.json")).unwrap();
        assert!(config.backend_url.is_none());
        assert_eq!(config.uploaded_by(), DEFAULT_UPLOADED_BY);
        assert_eq!(config.top_k(), DEFAULT_TOP_K);
    }

    #[test]
    fn loads_values_from_the_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(
            &path,
            r#"{"backend_url":"http://qa.internal:9000","uploaded_by":null,"top_k":5}"#,
        )
        .unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.backend_url.as_deref(), Some("http://qa.internal:9000"));
        assert_eq!(loaded.top_k(), 5);
        assert_eq!(loaded.uploaded_by(), DEFAULT_UPLOADED_BY);
    }

    #[test]
    fn rejects_a_malformed_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "not json").unwrap();

        assert!(Config::load_from(&path).is_err());
    }
}
