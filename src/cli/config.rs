//! Configuration discovery and loading
//!
//! This module handles the configuration discovery hierarchy:
//! 1. Current directory: ./nullbots.toml or ./.nullbots/config.toml
//! 2. User config: ~/.nullbots/config.toml
//! 3. System config: /etc/nullbots/config.toml
//! 4. Built-in defaults
//!
//! Windows looks in `%PROGRAMDATA%\nullbots\config.toml` instead of `/etc`.
//!
//! The `NULLBOTS_API_URL` environment variable and the `--api-url` flag are
//! applied on top of whichever file was loaded, in that order.

use crate::{ClientConfig, env};
use std::env as std_env;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid config {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Load a client config from a TOML file
pub fn from_toml_file<P: AsRef<Path>>(path: P) -> Result<ClientConfig, ConfigError> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Save a client config to a TOML file
pub fn to_toml_file<P: AsRef<Path>>(config: &ClientConfig, path: P) -> Result<(), ConfigError> {
    let path = path.as_ref();
    let content = toml::to_string_pretty(config)?;
    fs::write(path, content).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Where a candidate config file sits in the lookup order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigScope {
    /// `./nullbots.toml`
    Project,
    /// `./.nullbots/config.toml`
    ProjectDir,
    /// `~/.nullbots/config.toml`
    User,
    /// `/etc/nullbots/config.toml` or `%PROGRAMDATA%\nullbots\config.toml`
    System,
}

impl std::fmt::Display for ConfigScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            ConfigScope::Project => "project",
            ConfigScope::ProjectDir => "project dir",
            ConfigScope::User => "user",
            ConfigScope::System => "system",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigCandidate {
    pub scope: ConfigScope,
    pub path: PathBuf,
}

/// Resolves the client config from files, the environment and CLI flags
pub struct ConfigDiscovery;

impl ConfigDiscovery {
    /// Resolve the effective config: explicit file or discovered file, then
    /// the environment override, then the `--api-url` flag
    pub fn resolve(
        config_override: Option<&Path>,
        api_url_flag: Option<&str>,
    ) -> Result<ClientConfig, ConfigError> {
        let config = match config_override {
            Some(path) => {
                info!("Loading configuration override from: {:?}", path);
                from_toml_file(path)?
            }
            None => Self::discover_config()?,
        };

        let config = config.with_env_overrides();
        Ok(match api_url_flag {
            Some(url) if !url.trim().is_empty() => config.with_base_url(url),
            _ => config,
        })
    }

    /// Load the first existing candidate, or the built-in defaults
    pub fn discover_config() -> Result<ClientConfig, ConfigError> {
        match Self::active_candidate() {
            Some(candidate) => {
                info!(
                    "Loading {} configuration from: {:?}",
                    candidate.scope, candidate.path
                );
                from_toml_file(&candidate.path)
            }
            None => {
                debug!("No configuration file found, using defaults");
                Ok(ClientConfig::default())
            }
        }
    }

    /// Candidates for this process: working directory, home, system
    pub fn candidates() -> Vec<ConfigCandidate> {
        let current_dir = std_env::current_dir().ok();
        Self::candidates_for(current_dir.as_deref(), env::home_dir().as_deref())
    }

    /// Candidates in lookup order for the given directories
    pub fn candidates_for(
        current_dir: Option<&Path>,
        home_dir: Option<&Path>,
    ) -> Vec<ConfigCandidate> {
        let project = current_dir.into_iter().flat_map(|dir| {
            [
                (ConfigScope::Project, dir.join(env::LOCAL_CONFIG_FILE_NAME)),
                (ConfigScope::ProjectDir, env::local_config_file_path(dir)),
            ]
        });
        let user = home_dir.map(|dir| (ConfigScope::User, env::user_config_file_path(dir)));
        let system = env::system_config_file_path().map(|path| (ConfigScope::System, path));

        project
            .chain(user)
            .chain(system)
            .map(|(scope, path)| ConfigCandidate { scope, path })
            .collect()
    }

    /// First candidate that is an existing file
    pub fn active_candidate() -> Option<ConfigCandidate> {
        Self::candidates().into_iter().find(|candidate| {
            debug!("Checking for config file: {:?}", candidate.path);
            candidate.path.is_file()
        })
    }

    /// Print the lookup order and what each candidate resolved to
    pub fn show_discovery_info() {
        println!("Configuration Discovery Hierarchy:");
        println!();

        for (i, candidate) in Self::candidates().iter().enumerate() {
            let status = match fs::metadata(&candidate.path) {
                Ok(meta) if meta.is_file() => "✓ EXISTS",
                Ok(_) => "✗ NOT A FILE",
                Err(_) => "✗ NOT FOUND",
            };
            println!(
                "  {}. [{}] {:?} - {}",
                i + 1,
                candidate.scope,
                candidate.path,
                status
            );
        }

        println!();
        match Self::active_candidate() {
            Some(active) => println!("Active configuration: {:?}", active.path),
            None => println!("Active configuration: Built-in defaults"),
        }

        match std_env::var(env::api::API_URL_ENV_VAR) {
            Ok(url) => println!("{} = {}", env::api::API_URL_ENV_VAR, url),
            Err(_) => println!("{} is not set", env::api::API_URL_ENV_VAR),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use tempfile::TempDir;

    #[test]
    fn test_config_file_operations() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("nullbots.toml");

        let original = ClientConfig::default()
            .with_base_url("https://api.nullbots.dev/api")
            .with_referrer("https://dribbble.com/");
        to_toml_file(&original, &config_path).unwrap();
        assert!(config_path.exists());

        let loaded = from_toml_file(&config_path).unwrap();
        assert_eq!(loaded, original);
    }

    #[test]
    fn test_invalid_config_file() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("broken.toml");
        fs::write(&config_path, "base_url = [").unwrap();

        assert!(matches!(
            from_toml_file(&config_path),
            Err(ConfigError::Parse { .. })
        ));
        assert!(matches!(
            from_toml_file(temp_dir.path().join("missing.toml")),
            Err(ConfigError::Io { .. })
        ));
    }

    #[test]
    #[serial]
    fn test_resolution_order() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("nullbots.toml");
        fs::write(&config_path, "base_url = \"http://file.test/api\"\n").unwrap();

        unsafe {
            std_env::remove_var(env::api::API_URL_ENV_VAR);
        }
        let config = ConfigDiscovery::resolve(Some(&config_path), None).unwrap();
        assert_eq!(config.base_url, "http://file.test/api");

        unsafe {
            std_env::set_var(env::api::API_URL_ENV_VAR, "http://env.test/api");
        }
        let from_env = ConfigDiscovery::resolve(Some(&config_path), None).unwrap();
        let from_flag =
            ConfigDiscovery::resolve(Some(&config_path), Some("http://flag.test/api")).unwrap();
        unsafe {
            std_env::remove_var(env::api::API_URL_ENV_VAR);
        }

        assert_eq!(from_env.base_url, "http://env.test/api");
        assert_eq!(from_flag.base_url, "http://flag.test/api");
    }

    #[test]
    fn test_candidates_lookup_order() {
        let candidates = ConfigDiscovery::candidates_for(
            Some(Path::new("/work/site")),
            Some(Path::new("/home/ada")),
        );

        let scopes: Vec<_> = candidates.iter().map(|c| c.scope).collect();
        assert_eq!(
            &scopes[..3],
            &[ConfigScope::Project, ConfigScope::ProjectDir, ConfigScope::User]
        );
        assert_eq!(candidates[0].path, Path::new("/work/site/nullbots.toml"));
        assert_eq!(
            candidates[1].path,
            Path::new("/work/site/.nullbots/config.toml")
        );
        assert_eq!(candidates[2].path, Path::new("/home/ada/.nullbots/config.toml"));
        #[cfg(unix)]
        assert_eq!(candidates[3].scope, ConfigScope::System);
    }

    #[test]
    fn test_candidates_without_directories() {
        let candidates = ConfigDiscovery::candidates_for(None, None);

        assert!(candidates
            .iter()
            .all(|candidate| candidate.scope == ConfigScope::System));
    }
}
