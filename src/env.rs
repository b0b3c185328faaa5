//! Environment constants and path utilities for the NULLBOTS site client.
//!
//! This module centralizes the hardcoded addresses, variable names and file
//! names used throughout the crate, making them easier to maintain and modify.

/// Main application directory name (hidden directory like .git, .vscode)
pub const NULLBOTS_DIR_NAME: &str = ".nullbots";

/// Configuration file name inside the application directory
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Configuration file name looked up directly in the current directory
pub const LOCAL_CONFIG_FILE_NAME: &str = "nullbots.toml";

/// Backend API related constants
pub mod api {
    /// Environment variable overriding the API base URL
    pub const API_URL_ENV_VAR: &str = "NULLBOTS_API_URL";

    /// Base URL used when nothing overrides it
    pub const DEFAULT_API_BASE_URL: &str = "http://localhost:5000/api";
}

/// Session-related names
pub mod session {
    /// Key the session identifier is stored under
    pub const SESSION_ID_KEY: &str = "sessionId";

    /// File name of the persisted CLI session store
    pub const SESSION_FILE_NAME: &str = "session.json";
}

/// Studio contact details used by the mail compose fallback
pub mod studio {
    pub const CONTACT_EMAIL: &str = "nullbots.tech@gmail.com";

    pub const MAIL_COMPOSE_URL: &str = "https://mail.google.com/mail/";
}

/// Test-related constants
pub mod test {
    /// Base URL used by tests that never leave the process
    pub const TEST_API_BASE_URL: &str = "http://backend.test/api";

    /// Test session identifier
    pub const TEST_SESSION_ID: &str = "test-session";
}

/// Common path utilities
use std::path::{Path, PathBuf};

/// Build the main .nullbots directory path from a root directory
pub fn nullbots_dir_path(root: &Path) -> PathBuf {
    root.join(NULLBOTS_DIR_NAME)
}

/// Build the persisted session store path in a root directory
pub fn session_file_path(root: &Path) -> PathBuf {
    nullbots_dir_path(root).join(session::SESSION_FILE_NAME)
}

/// Build config file path in user's home directory
pub fn user_config_file_path(home_dir: &Path) -> PathBuf {
    nullbots_dir_path(home_dir).join(CONFIG_FILE_NAME)
}

/// Build local config file path in current directory
pub fn local_config_file_path(current_dir: &Path) -> PathBuf {
    nullbots_dir_path(current_dir).join(CONFIG_FILE_NAME)
}

/// Machine-wide config file, if the platform has a place for one
pub fn system_config_file_path() -> Option<PathBuf> {
    if cfg!(windows) {
        std::env::var_os("PROGRAMDATA")
            .map(|dir| PathBuf::from(dir).join("nullbots").join(CONFIG_FILE_NAME))
    } else {
        Some(Path::new("/etc/nullbots").join(CONFIG_FILE_NAME))
    }
}

/// Home directory from `HOME`, or `USERPROFILE` on Windows. Blank values
/// count as unset.
pub fn home_dir() -> Option<PathBuf> {
    ["HOME", "USERPROFILE"]
        .into_iter()
        .filter_map(std::env::var_os)
        .find(|dir| !dir.is_empty())
        .map(PathBuf::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_construction() {
        let root = Path::new("/home/user");

        assert_eq!(nullbots_dir_path(root), Path::new("/home/user/.nullbots"));
        assert_eq!(
            session_file_path(root),
            Path::new("/home/user/.nullbots/session.json")
        );
    }

    #[test]
    fn test_config_paths() {
        let home_dir = Path::new("/home/user");
        let current_dir = Path::new("/current/project");

        assert_eq!(
            user_config_file_path(home_dir),
            Path::new("/home/user/.nullbots/config.toml")
        );

        assert_eq!(
            local_config_file_path(current_dir),
            Path::new("/current/project/.nullbots/config.toml")
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_system_config_path() {
        assert_eq!(
            system_config_file_path(),
            Some(PathBuf::from("/etc/nullbots/config.toml"))
        );
    }
}
