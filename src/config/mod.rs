use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Base URL of the planner backend, e.g. "http://localhost:3000".
    pub server_url: String,
    #[serde(default = "default_font_scale")]
    pub font_scale: f32,
    /// Minutes between background autosaves. 0 disables autosave.
    #[serde(default = "default_autosave_minutes")]
    pub autosave_minutes: u64,
}

fn default_font_scale() -> f32 {
    1.0
}

fn default_autosave_minutes() -> u64 {
    5
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_url: String::new(),
            font_scale: 1.0,
            autosave_minutes: 5,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            let contents = fs::read_to_string(&config_path)
                .context("Failed to read config file")?;
            serde_json::from_str(&contents)
                .context("Failed to parse config file")
        } else {
            Ok(Config::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;

        // Ensure directory exists
        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents = serde_json::to_string_pretty(self)?;
        fs::write(&config_path, contents)?;

        Ok(())
    }

    pub fn is_configured(&self) -> bool {
        !self.server_url.trim().is_empty()
    }

    fn config_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("com", "eveplan", "eveplan")
            .context("Could not determine config directory")?;
        Ok(proj_dirs.config_dir().join("config.json"))
    }

    /// API root derived from the stored server URL. Tolerates missing scheme,
    /// trailing slashes and a pasted "/api" suffix.
    pub fn base_url(&self) -> String {
        let trimmed = self.server_url.trim().trim_end_matches('/');
        let trimmed = trimmed.trim_end_matches("/api").trim_end_matches('/');

        if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
            format!("{}/api", trimmed)
        } else {
            format!("http://{}/api", trimmed)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn base_url_normalizes_common_inputs() {
        let mut config = Config::default();

        config.server_url = "http://localhost:3000".to_string();
        assert_eq!(config.base_url(), "http://localhost:3000/api");

        config.server_url = "localhost:3000/".to_string();
        assert_eq!(config.base_url(), "http://localhost:3000/api");

        config.server_url = "https://planner.example.com/api/".to_string();
        assert_eq!(config.base_url(), "https://planner.example.com/api");
    }

    #[test]
    fn blank_server_url_is_unconfigured() {
        let mut config = Config::default();
        assert!(!config.is_configured());
        config.server_url = "   ".to_string();
        assert!(!config.is_configured());
        config.server_url = "localhost:3000".to_string();
        assert!(config.is_configured());
    }

    #[test]
    fn config_parses_with_missing_optional_fields() {
        let config: Config =
            serde_json::from_str(r#"{"server_url": "http://localhost:3000"}"#).unwrap();
        assert_eq!(config.font_scale, 1.0);
        assert_eq!(config.autosave_minutes, 5);
    }
}
