//! Configuration file lookup

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use super::Config;

/// Environment variable naming a config file
pub const CONFIG_ENV_VAR: &str = "MEDSYNC_CONFIG";

/// Where the effective configuration came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// `--config` on the command line
    Flag(PathBuf),
    /// `MEDSYNC_CONFIG`
    Env(PathBuf),
    /// The per-user config file
    UserFile(PathBuf),
    /// No file found
    Defaults,
}

impl ConfigSource {
    pub fn path(&self) -> Option<&Path> {
        match self {
            ConfigSource::Flag(path) | ConfigSource::Env(path) | ConfigSource::UserFile(path) => {
                Some(path)
            }
            ConfigSource::Defaults => None,
        }
    }
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigSource::Flag(path) => write!(f, "{} (--config)", path.display()),
            ConfigSource::Env(path) => write!(f, "{} (${})", path.display(), CONFIG_ENV_VAR),
            ConfigSource::UserFile(path) => write!(f, "{}", path.display()),
            ConfigSource::Defaults => write!(f, "built-in defaults"),
        }
    }
}

/// A validated configuration and its origin
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub config: Config,
    pub source: ConfigSource,
}

/// Per-user config file location (`<config dir>/medsync/config.toml`)
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("medsync").join("config.toml"))
}

/// Resolve and load the configuration.
///
/// Lookup order: `explicit` path, then `MEDSYNC_CONFIG`, then the per-user file,
/// then defaults. An explicitly named file must exist; the per-user file is optional.
pub fn load_config(explicit: Option<&Path>) -> Result<LoadedConfig> {
    let env_path = std::env::var_os(CONFIG_ENV_VAR)
        .filter(|value| !value.is_empty())
        .map(PathBuf::from);
    resolve(explicit, env_path, default_config_path())
}

fn resolve(
    explicit: Option<&Path>,
    env_path: Option<PathBuf>,
    user_path: Option<PathBuf>,
) -> Result<LoadedConfig> {
    let source = match (explicit, env_path, user_path) {
        (Some(path), _, _) => ConfigSource::Flag(path.to_path_buf()),
        (None, Some(path), _) => ConfigSource::Env(path),
        (None, None, Some(path)) if path.is_file() => ConfigSource::UserFile(path),
        _ => ConfigSource::Defaults,
    };

    let Some(path) = source.path() else {
        log::debug!("No config file found, using defaults");
        return Ok(LoadedConfig {
            config: Config::default(),
            source,
        });
    };

    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    let config = Config::from_toml(&content)
        .with_context(|| format!("Invalid config file: {}", path.display()))?;

    log::info!("Loaded config from {}", source);
    Ok(LoadedConfig { config, source })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::coerce::NumericFallback;

    fn write_temp(name: &str, content: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("medsync-config-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join(name);
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_defaults_when_nothing_found() {
        let missing = std::env::temp_dir().join("medsync-definitely-missing/config.toml");
        let loaded = resolve(None, None, Some(missing)).unwrap();
        assert_eq!(loaded.source, ConfigSource::Defaults);
        assert_eq!(loaded.config, Config::default());
    }

    #[test]
    fn test_explicit_path_wins() {
        let flag = write_temp("flag.toml", "[values]\nnumeric_fallback = \"zero\"\n");
        let env = write_temp("env.toml", "[identifier]\nmax_length = 10\n");

        let loaded = resolve(Some(&flag), Some(env.clone()), None).unwrap();
        assert_eq!(loaded.source, ConfigSource::Flag(flag));
        assert_eq!(loaded.config.values.numeric_fallback, NumericFallback::Zero);

        let loaded = resolve(None, Some(env.clone()), None).unwrap();
        assert_eq!(loaded.source, ConfigSource::Env(env));
        assert_eq!(loaded.config.identifier.max_length, 10);
    }

    #[test]
    fn test_user_file() {
        let user = write_temp("user.toml", "[header]\nscan_rows = 5\n");
        let loaded = resolve(None, None, Some(user.clone())).unwrap();
        assert_eq!(loaded.source, ConfigSource::UserFile(user));
        assert_eq!(loaded.config.header.scan_rows, 5);
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let missing = std::env::temp_dir().join("medsync-definitely-missing.toml");
        let err = resolve(Some(&missing), None, None).unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }

    #[test]
    fn test_invalid_file_is_an_error() {
        let bad = write_temp("bad.toml", "[identifier]\nmax_length = 500\n");
        let err = resolve(Some(&bad), None, None).unwrap_err();
        assert!(err.to_string().contains("Invalid config file"));
    }
}
