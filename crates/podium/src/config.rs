use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const FILENAME: &str = "config.yaml";
const APP_DIR: &str = "podium";

pub const VALID_KEYS: &str = "defaults.duration, defaults.theme, defaults.feed, \
     defaults.check_updates, defaults.pdfium_path";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub defaults: Option<DefaultsConfig>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DefaultsConfig {
    /// Planned talk length in minutes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feed: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub check_updates: Option<bool>,

    /// Directory holding the PDFium shared library.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pdfium_path: Option<PathBuf>,
}

impl Config {
    pub fn path() -> Result<PathBuf> {
        Self::dir().map(|d| d.join(FILENAME))
    }

    pub fn dir() -> Result<PathBuf> {
        dirs::config_dir()
            .map(|d| d.join(APP_DIR))
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))
    }

    pub fn load() -> Result<Self> {
        let path = Self::path()?;
        Self::load_from(&path)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                anyhow::anyhow!("No config found. Run `podium config show` to see defaults.")
            } else {
                anyhow::anyhow!("Failed to read config: {e}")
            }
        })?;
        let config: Config = serde_yaml::from_str(&contents)?;
        Ok(config)
    }

    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_default()
    }

    pub fn save(&self) -> Result<PathBuf> {
        let path = Self::path()?;
        self.save_to(&path)?;
        Ok(path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let yaml = serde_yaml::to_string(self)?;
        let contents = format!("# Podium configuration - https://github.com/mklab-se/podium\n{yaml}");
        std::fs::write(path, contents)?;
        Ok(())
    }

    pub fn duration_minutes(&self) -> u64 {
        self.defaults.as_ref().and_then(|d| d.duration).unwrap_or(0)
    }

    pub fn theme_name(&self) -> &str {
        self.defaults
            .as_ref()
            .and_then(|d| d.theme.as_deref())
            .unwrap_or("dark")
    }

    pub fn feed(&self) -> bool {
        self.defaults.as_ref().and_then(|d| d.feed).unwrap_or(false)
    }

    pub fn check_updates(&self) -> bool {
        self.defaults
            .as_ref()
            .and_then(|d| d.check_updates)
            .unwrap_or(true)
    }

    pub fn pdfium_path(&self) -> Option<&Path> {
        self.defaults.as_ref().and_then(|d| d.pdfium_path.as_deref())
    }

    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let defaults = self.defaults.get_or_insert_with(DefaultsConfig::default);
        match key {
            "defaults.duration" => {
                let minutes = value.parse::<u64>().map_err(|_| {
                    anyhow::anyhow!("Invalid duration: {value}. Must be a whole number of minutes.")
                })?;
                defaults.duration = Some(minutes);
            }
            "defaults.theme" => {
                match value {
                    "light" | "dark" => {}
                    _ => anyhow::bail!("Invalid theme: {value}. Must be 'light' or 'dark'."),
                }
                defaults.theme = Some(value.to_string());
            }
            "defaults.feed" => defaults.feed = Some(parse_bool(key, value)?),
            "defaults.check_updates" => defaults.check_updates = Some(parse_bool(key, value)?),
            "defaults.pdfium_path" => {
                let dir = PathBuf::from(value);
                if !dir.is_dir() {
                    anyhow::bail!("Invalid pdfium_path: {value} is not a directory.");
                }
                defaults.pdfium_path = Some(dir);
            }
            _ => anyhow::bail!("Unknown config key: {key}. Valid keys: {VALID_KEYS}"),
        }
        Ok(())
    }
}

fn parse_bool(key: &str, value: &str) -> Result<bool> {
    match value {
        "true" | "yes" | "on" => Ok(true),
        "false" | "no" | "off" => Ok(false),
        _ => anyhow::bail!("Invalid value for {key}: {value}. Must be 'true' or 'false'."),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_when_unset() {
        let config = Config::default();
        assert_eq!(config.duration_minutes(), 0);
        assert_eq!(config.theme_name(), "dark");
        assert!(!config.feed());
        assert!(config.check_updates());
        assert!(config.pdfium_path().is_none());
    }

    #[test]
    fn test_set_validates_values() {
        let mut config = Config::default();
        config.set("defaults.duration", "25").unwrap();
        config.set("defaults.theme", "light").unwrap();
        config.set("defaults.feed", "yes").unwrap();
        config.set("defaults.check_updates", "false").unwrap();
        assert_eq!(config.duration_minutes(), 25);
        assert_eq!(config.theme_name(), "light");
        assert!(config.feed());
        assert!(!config.check_updates());

        assert!(config.set("defaults.duration", "-5").is_err());
        assert!(config.set("defaults.theme", "blue").is_err());
        assert!(config.set("defaults.feed", "maybe").is_err());
        assert!(config.set("defaults.pdfium_path", "/definitely/not/here").is_err());
        let err = config.set("defaults.transition", "fade").unwrap_err();
        assert!(err.to_string().contains("Unknown config key"));
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join(FILENAME);
        let mut config = Config::default();
        config.set("defaults.duration", "40").unwrap();
        config
            .set("defaults.pdfium_path", dir.path().to_str().unwrap())
            .unwrap();
        config.save_to(&path).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.starts_with("# Podium configuration"));
        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.duration_minutes(), 40);
        assert_eq!(loaded.pdfium_path(), Some(dir.path()));
    }

    #[test]
    fn test_load_missing_file_mentions_config_show() {
        let dir = tempfile::tempdir().unwrap();
        let err = Config::load_from(&dir.path().join(FILENAME)).unwrap_err();
        assert!(err.to_string().contains("podium config show"));
    }
}
