use super::{get_config_dir, Config};
use crate::error::{Error, Result};
use std::path::{Path, PathBuf};
use tokio::fs;

/// Resolves and reads the configuration file.
///
/// Lookup order: explicit path, `$PROCESS_TEXT_CONFIG`, then
/// `<config dir>/config.toml`. Only an explicitly requested file must exist.
pub struct ConfigLoader {
    explicit: Option<PathBuf>,
    default_dir: Option<PathBuf>,
}

impl ConfigLoader {
    pub fn new(explicit: Option<PathBuf>) -> Self {
        let explicit =
            explicit.or_else(|| std::env::var_os("PROCESS_TEXT_CONFIG").map(PathBuf::from));
        Self {
            explicit,
            default_dir: get_config_dir(),
        }
    }

    pub async fn load(&self) -> Result<Config> {
        let mut config = match self.config_path() {
            Some(path) => {
                tracing::debug!("Loading configuration from {}", path.display());
                Self::read(&path).await?
            }
            None => {
                tracing::debug!("No configuration file found, using defaults");
                Config::new()
            }
        };

        config.merge_env_vars();
        Ok(config)
    }

    fn config_path(&self) -> Option<PathBuf> {
        if let Some(path) = &self.explicit {
            return Some(path.clone());
        }

        self.default_dir
            .as_ref()
            .map(|dir| dir.join("config.toml"))
            .filter(|path| path.exists())
    }

    async fn read(path: &Path) -> Result<Config> {
        let content = fs::read_to_string(path)
            .await
            .map_err(|e| Error::io(path, e))?;
        Config::from_toml_str(&content).map_err(|e| match e {
            Error::Toml(err) => Error::Config(format!("{}: {}", path.display(), err)),
            other => other,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_explicit_path_is_read() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("custom.toml");
        std::fs::write(&path, "[jq]\nargs = [\"-S\"]\n").unwrap();

        let loader = ConfigLoader {
            explicit: Some(path),
            default_dir: None,
        };
        let config = loader.load().await.unwrap();
        assert_eq!(config.jq.args, vec!["-S".to_string()]);
    }

    #[tokio::test]
    async fn test_missing_explicit_path_fails() {
        let dir = TempDir::new().unwrap();
        let loader = ConfigLoader {
            explicit: Some(dir.path().join("missing.toml")),
            default_dir: None,
        };

        assert!(matches!(loader.load().await, Err(Error::Io { .. })));
    }

    #[tokio::test]
    async fn test_default_dir_without_file_uses_defaults() {
        let dir = TempDir::new().unwrap();
        let loader = ConfigLoader {
            explicit: None,
            default_dir: Some(dir.path().to_path_buf()),
        };

        assert_eq!(loader.config_path(), None);
    }

    #[tokio::test]
    async fn test_default_dir_file_is_found() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join("config.toml"),
            "[shell]\nprogram = \"bash\"\n",
        )
        .unwrap();

        let loader = ConfigLoader {
            explicit: None,
            default_dir: Some(dir.path().to_path_buf()),
        };
        assert_eq!(loader.config_path(), Some(dir.path().join("config.toml")));
    }

    #[tokio::test]
    async fn test_invalid_toml_names_the_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[display\n").unwrap();

        let loader = ConfigLoader {
            explicit: Some(path),
            default_dir: None,
        };
        match loader.load().await {
            Err(Error::Config(message)) => assert!(message.contains("config.toml")),
            other => panic!("Expected Config error, got {other:?}"),
        }
    }
}
