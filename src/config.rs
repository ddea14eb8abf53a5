use crate::core::LarderError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct LarderConfig {
    pub db_path: PathBuf,
}

impl LarderConfig {
    // Default configuration if file is missing
    fn default_for(root: &Path) -> Self {
        Self {
            db_path: root.join("recipes.db"),
        }
    }
}

pub struct ConfigManager {
    root: PathBuf,
    path: PathBuf,
}

impl ConfigManager {
    pub fn new(root: &Path) -> Self {
        Self {
            root: root.to_path_buf(),
            path: root.join("config.toml"),
        }
    }

    // Load config or create default if missing
    pub async fn load(&self) -> Result<LarderConfig, LarderError> {
        if !self.path.exists() {
            let default_config = LarderConfig::default_for(&self.root);
            self.save(&default_config).await?;
            return Ok(default_config);
        }

        let content = fs::read_to_string(&self.path).await?;
        toml::from_str(&content).map_err(LarderError::ParseError)
    }

    pub async fn save(&self, config: &LarderConfig) -> Result<(), LarderError> {
        let content = toml::to_string_pretty(config)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e.to_string()))?;

        fs::write(&self.path, content).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_config_is_created_with_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let manager = ConfigManager::new(dir.path());

        let config = manager.load().await.unwrap();
        assert_eq!(config.db_path, dir.path().join("recipes.db"));
        assert!(dir.path().join("config.toml").exists());
    }

    #[tokio::test]
    async fn saved_changes_survive_a_reload() {
        let dir = tempfile::tempdir().unwrap();
        let manager = ConfigManager::new(dir.path());

        let mut config = manager.load().await.unwrap();
        config.db_path = PathBuf::from("/srv/shared/recipes.db");
        manager.save(&config).await.unwrap();

        let reloaded = manager.load().await.unwrap();
        assert_eq!(reloaded.db_path, PathBuf::from("/srv/shared/recipes.db"));
    }
}
