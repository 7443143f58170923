use crate::navigation::Platform;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SavespotConfig {
    pub database: Option<String>,
    pub platform: Option<Platform>,
}

impl SavespotConfig {
    /// Database path from the config, falling back to the default under `base`
    pub fn database_path_in(&self, base: &Path) -> PathBuf {
        self.database
            .as_deref()
            .map(PathBuf::from)
            .unwrap_or_else(|| default_database_path_in(base))
    }

    pub fn platform(&self) -> Platform {
        self.platform.unwrap_or_else(Platform::current)
    }
}

pub fn default_config_path() -> PathBuf {
    PathBuf::from("savespot.toml")
}

pub fn default_database_path_in(base: &Path) -> PathBuf {
    base.join(".savespot").join("savespot.db")
}

pub fn load_config(path: Option<&Path>) -> anyhow::Result<Option<SavespotConfig>> {
    let path = path.map(Path::to_path_buf).unwrap_or_else(default_config_path);
    if !path.exists() {
        return Ok(None);
    }

    let contents = std::fs::read_to_string(&path)?;
    let config: SavespotConfig = toml::from_str(&contents)?;
    tracing::debug!(path = %path.display(), "loaded config");
    Ok(Some(config))
}

pub fn write_config(path: &Path, config: &SavespotConfig, force: bool) -> anyhow::Result<()> {
    if path.exists() && !force {
        anyhow::bail!("config already exists at {} (use --force to overwrite)", path.display());
    }

    let contents = toml::to_string_pretty(config)?;
    std::fs::write(path, contents)?;
    Ok(())
}

pub fn ensure_db_dir(db_path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = db_path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_config_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let loaded = load_config(Some(&dir.path().join("savespot.toml"))).unwrap();
        assert!(loaded.is_none());
    }

    #[test]
    fn test_write_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("savespot.toml");
        let config = SavespotConfig {
            database: Some("places.db".into()),
            platform: Some(Platform::Android),
        };

        write_config(&path, &config, false).unwrap();
        let loaded = load_config(Some(&path)).unwrap().unwrap();

        assert_eq!(loaded.database.as_deref(), Some("places.db"));
        assert_eq!(loaded.platform(), Platform::Android);
        assert_eq!(loaded.database_path_in(dir.path()), PathBuf::from("places.db"));
    }

    #[test]
    fn test_write_refuses_overwrite_without_force() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("savespot.toml");
        write_config(&path, &SavespotConfig::default(), false).unwrap();

        assert!(write_config(&path, &SavespotConfig::default(), false).is_err());
        write_config(&path, &SavespotConfig::default(), true).unwrap();
    }

    #[test]
    fn test_default_database_path() {
        let config = SavespotConfig::default();
        assert_eq!(
            config.database_path_in(Path::new("/tmp/project")),
            PathBuf::from("/tmp/project/.savespot/savespot.db")
        );
    }
}
