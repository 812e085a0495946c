use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_NAME: &str = "verdant.config.json";

/// Verdant configuration file format
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// JSON file holding the content tables
    #[serde(default = "default_store_path")]
    pub store_path: String,

    /// Directory served as the media library
    #[serde(default = "default_media_root")]
    pub media_root: String,

    /// Public URL prefix of media files
    #[serde(default = "default_media_base_url")]
    pub media_base_url: String,

    /// Log filter used when RUST_LOG is not set
    #[serde(default = "default_log_filter")]
    pub log_filter: String,
}

fn default_store_path() -> String {
    "data/content.json".to_string()
}

fn default_media_root() -> String {
    "media".to_string()
}

fn default_media_base_url() -> String {
    "/media".to_string()
}

fn default_log_filter() -> String {
    "warn".to_string()
}

impl Config {
    /// Load config from a directory
    pub fn load(cwd: &Path) -> anyhow::Result<Self> {
        let config_path = cwd.join(DEFAULT_CONFIG_NAME);

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            // Return default config if none exists
            Ok(Config::default())
        }
    }

    /// Get absolute path to the store file
    pub fn get_store_path(&self, cwd: &Path) -> PathBuf {
        cwd.join(&self.store_path)
    }

    /// Get absolute path to the media root
    pub fn get_media_root(&self, cwd: &Path) -> PathBuf {
        cwd.join(&self.media_root)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            store_path: default_store_path(),
            media_root: default_media_root(),
            media_base_url: default_media_base_url(),
            log_filter: default_log_filter(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_parse_config() {
        let json = r#"{
            "storePath": "content/site.json",
            "mediaRoot": "public/uploads",
            "mediaBaseUrl": "https://cdn.example.org/uploads",
            "logFilter": "verdant_store=info"
        }"#;

        let config: Config = serde_json::from_str(json).unwrap();
        assert_eq!(config.store_path, "content/site.json");
        assert_eq!(config.media_root, "public/uploads");
        assert_eq!(config.media_base_url, "https://cdn.example.org/uploads");
        assert_eq!(config.log_filter, "verdant_store=info");
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: Config = serde_json::from_str(r#"{ "mediaRoot": "uploads" }"#).unwrap();
        assert_eq!(config.media_root, "uploads");
        assert_eq!(config.store_path, "data/content.json");
        assert_eq!(config.log_filter, "warn");
    }

    #[test]
    fn test_missing_file_is_default() {
        let dir = TempDir::new().unwrap();
        let config = Config::load(dir.path()).unwrap();

        assert_eq!(config, Config::default());
        assert_eq!(
            config.get_store_path(dir.path()),
            dir.path().join("data/content.json")
        );
    }
}
