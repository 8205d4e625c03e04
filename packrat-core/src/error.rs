//! Error types for packrat-core.

use std::path::PathBuf;

use thiserror::Error;

/// All errors that can arise from configuration loading and validation.
///
/// Configuration failures are fatal and abort before any remote call.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Underlying I/O failure (file not found, permission denied, etc.).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML serialization error (write/save path).
    #[error("YAML serialization error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// YAML parse error on load — includes file path and line context from serde_yaml.
    #[error("failed to parse config at {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// `dirs::home_dir()` returned `None` — cannot locate `~/.packrat/`.
    #[error("cannot determine home directory; set $HOME or equivalent")]
    HomeNotFound,

    /// The config YAML file did not exist at the expected path.
    #[error("config not found at {path}; run `packrat config init` first")]
    ConfigNotFound { path: PathBuf },

    /// A configuration field failed validation.
    #[error("invalid config field '{field}': {reason}")]
    Invalid { field: &'static str, reason: String },

    /// No API token in the config file or `PACKRAT_TOKEN`.
    #[error("missing API token; set `token` in the config file or $PACKRAT_TOKEN")]
    MissingToken,
}
