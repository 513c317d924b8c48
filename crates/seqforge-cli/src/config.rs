use std::path::{Path, PathBuf};

use thiserror::Error;

use seqforge_core::RecordConfig;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed configuration: {0}")]
    Toml(#[from] toml::de::Error),
    #[error(transparent)]
    Invalid(#[from] seqforge_core::Error),
}

/// Reads and validates a TOML record configuration.
pub fn load_config(path: &Path) -> Result<RecordConfig, ConfigError> {
    let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_config(&text)
}

pub fn parse_config(text: &str) -> Result<RecordConfig, ConfigError> {
    let config: RecordConfig = toml::from_str(text)?;
    config.validate()?;
    Ok(config)
}
