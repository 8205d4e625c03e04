//! Packrat YAML configuration.
//!
//! # Storage layout
//!
//! ```text
//! ~/.packrat/
//!   config.yaml   (mode 0600 — holds the API token)
//! ```
//!
//! # API pattern
//!
//! Every function that touches the filesystem has two forms:
//! - `fn_at(home: &Path, …)` — explicit home; used in tests with `TempDir`
//! - `fn(…)` — derives home from `dirs::home_dir()`, delegates to `_at`
//!
//! Tests must NEVER call the no-arg wrappers; always use `_at`.
//!
//! The orchestrator receives an already-validated [`Config`]; no field is
//! read from ambient global state after load.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::types::{FolderName, RetentionCount};

/// Validated run configuration, passed into the orchestrator at construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Local directory to back up / sync.
    pub source_dir: PathBuf,
    /// Display name of the remote target folder.
    pub folder: FolderName,
    /// How many archives to retain remotely.
    #[serde(default)]
    pub retention: RetentionCount,
    /// API token for the object store. May instead come from $PACKRAT_TOKEN.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

impl Config {
    /// Resolve the API token from the config file or the environment.
    pub fn resolve_token(&self) -> Result<String, ConfigError> {
        if let Some(token) = &self.token {
            if !token.is_empty() {
                return Ok(token.clone());
            }
        }
        match std::env::var("PACKRAT_TOKEN") {
            Ok(token) if !token.is_empty() => Ok(token),
            _ => Err(ConfigError::MissingToken),
        }
    }

    fn validate(self) -> Result<Self, ConfigError> {
        if self.source_dir.as_os_str().is_empty() {
            return Err(ConfigError::Invalid {
                field: "source_dir",
                reason: "must not be empty".to_owned(),
            });
        }
        if self.folder.0.is_empty() {
            return Err(ConfigError::Invalid {
                field: "folder",
                reason: "must not be empty".to_owned(),
            });
        }
        Ok(self)
    }
}

// ---------------------------------------------------------------------------
// Path helpers
// ---------------------------------------------------------------------------

/// `<home>/.packrat/config.yaml` — pure, no I/O.
pub fn config_path_at(home: &Path) -> PathBuf {
    home.join(".packrat").join("config.yaml")
}

/// `config_path_at` convenience wrapper.
pub fn config_path() -> Result<PathBuf, ConfigError> {
    Ok(config_path_at(&home()?))
}

fn home() -> Result<PathBuf, ConfigError> {
    dirs::home_dir().ok_or(ConfigError::HomeNotFound)
}

// ---------------------------------------------------------------------------
// Load / save
// ---------------------------------------------------------------------------

/// Load and validate the config from `<home>/.packrat/config.yaml`.
///
/// Returns `ConfigError::ConfigNotFound` if absent,
/// `ConfigError::Parse` (with path + line context) if malformed YAML.
pub fn load_at(home: &Path) -> Result<Config, ConfigError> {
    let path = config_path_at(home);
    if !path.exists() {
        return Err(ConfigError::ConfigNotFound { path });
    }
    let contents = std::fs::read_to_string(&path)?;
    let config: Config =
        serde_yaml::from_str(&contents).map_err(|e| ConfigError::Parse { path, source: e })?;
    config.validate()
}

/// `load_at` convenience wrapper.
pub fn load() -> Result<Config, ConfigError> {
    load_at(&home()?)
}

/// Save the config to `<home>/.packrat/config.yaml` (mode 0600 — it may
/// hold the API token).
pub fn save_at(home: &Path, config: &Config) -> Result<(), ConfigError> {
    let path = config_path_at(home);
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)?;
    }
    let yaml = serde_yaml::to_string(config)?;
    std::fs::write(&path, yaml)?;
    set_file_permissions(&path)?;
    Ok(())
}

/// `save_at` convenience wrapper.
pub fn save(config: &Config) -> Result<(), ConfigError> {
    save_at(&home()?, config)
}

#[cfg(unix)]
fn set_file_permissions(path: &Path) -> Result<(), ConfigError> {
    use std::os::unix::fs::PermissionsExt;
    let perms = std::fs::Permissions::from_mode(0o600);
    std::fs::set_permissions(path, perms)?;
    Ok(())
}

#[cfg(not(unix))]
fn set_file_permissions(_path: &Path) -> Result<(), ConfigError> {
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn sample() -> Config {
        Config {
            source_dir: PathBuf::from("/data/photos"),
            folder: FolderName::from("PhotoBackups"),
            retention: RetentionCount::new(2).unwrap(),
            token: Some("tok-123".to_owned()),
        }
    }

    #[test]
    fn roundtrip_save_load() {
        let home = TempDir::new().unwrap();
        save_at(home.path(), &sample()).unwrap();
        let loaded = load_at(home.path()).unwrap();
        assert_eq!(loaded, sample());
    }

    #[test]
    fn load_missing_is_config_not_found() {
        let home = TempDir::new().unwrap();
        match load_at(home.path()) {
            Err(ConfigError::ConfigNotFound { path }) => {
                assert!(path.ends_with(".packrat/config.yaml"));
            }
            other => panic!("expected ConfigNotFound, got {other:?}"),
        }
    }

    #[test]
    fn load_malformed_is_parse_error_with_path() {
        let home = TempDir::new().unwrap();
        let path = config_path_at(home.path());
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, "source_dir: [not, a, path").unwrap();
        match load_at(home.path()) {
            Err(ConfigError::Parse { path: p, .. }) => assert_eq!(p, path),
            other => panic!("expected Parse, got {other:?}"),
        }
    }

    #[test]
    fn load_rejects_empty_folder() {
        let home = TempDir::new().unwrap();
        let path = config_path_at(home.path());
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, "source_dir: /data\nfolder: ''\n").unwrap();
        match load_at(home.path()) {
            Err(ConfigError::Invalid { field, .. }) => assert_eq!(field, "folder"),
            other => panic!("expected Invalid, got {other:?}"),
        }
    }

    #[test]
    fn retention_defaults_when_omitted() {
        let home = TempDir::new().unwrap();
        let path = config_path_at(home.path());
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, "source_dir: /data\nfolder: Backups\n").unwrap();
        let loaded = load_at(home.path()).unwrap();
        assert_eq!(loaded.retention, RetentionCount::default());
    }

    #[test]
    fn token_from_config_wins() {
        let config = sample();
        assert_eq!(config.resolve_token().unwrap(), "tok-123");
    }

    #[test]
    fn missing_token_is_error() {
        let mut config = sample();
        config.token = None;
        // Only meaningful when the variable is not set in the test env.
        if std::env::var("PACKRAT_TOKEN").is_err() {
            assert!(matches!(
                config.resolve_token(),
                Err(ConfigError::MissingToken)
            ));
        }
    }

    #[cfg(unix)]
    #[test]
    fn saved_config_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;
        let home = TempDir::new().unwrap();
        save_at(home.path(), &sample()).unwrap();
        let meta = std::fs::metadata(config_path_at(home.path())).unwrap();
        assert_eq!(meta.permissions().mode() & 0o777, 0o600);
    }
}
