use anyhow::{Context, Result};
use std::path::PathBuf;
use std::sync::RwLock;

// Global config directory override (for --config flag and tests)
static CONFIG_DIR_OVERRIDE: RwLock<Option<PathBuf>> = RwLock::new(None);

/// Set config directory override (used by --config flag and tests)
pub fn set_config_dir_override(path: Option<PathBuf>) {
    let mut override_path = CONFIG_DIR_OVERRIDE
        .write()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    *override_path = path;
}

/// Get current config directory override
pub fn get_config_dir_override() -> Option<PathBuf> {
    CONFIG_DIR_OVERRIDE
        .read()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
        .clone()
}

/// Find config directory by searching in priority order:
/// 1. Override from --config flag or set_config_dir_override() (highest priority)
/// 2. Environment variable MDPAD_CONFIG_DIR
/// 3. User config directory (`~/.config/mdpad/` on Unix, `%APPDATA%\mdpad\` on Windows)
/// 4. Current working directory (`./config/`)
/// 5. Executable directory (`<exe_dir>/config/`)
///
/// If no config directory is found, creates one in the user config directory.
pub fn find_config_directory() -> Result<PathBuf> {
    if let Some(override_path) = get_config_dir_override() {
        if override_path.exists() || std::env::var("MDPAD_TEST_MODE").is_ok() {
            tracing::debug!("Using config directory override: {:?}", override_path);
            return Ok(override_path);
        }
        tracing::warn!("Config directory override does not exist: {:?}", override_path);
    }

    if let Ok(env_path) = std::env::var("MDPAD_CONFIG_DIR") {
        let env_config = PathBuf::from(env_path);
        if env_config.exists() {
            tracing::debug!("Found config directory from MDPAD_CONFIG_DIR: {:?}", env_config);
            return Ok(env_config);
        }
    }

    if let Ok(user_config) = get_user_config_dir() {
        if user_config.exists() {
            tracing::debug!("Found config directory at: {:?}", user_config);
            return Ok(user_config);
        }
    }

    if let Ok(cwd) = std::env::current_dir() {
        let cwd_config = cwd.join("config");
        if cwd_config.exists() {
            tracing::debug!("Found config directory at: {:?}", cwd_config);
            return Ok(cwd_config);
        }
    }

    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            let exe_config = exe_dir.join("config");
            if exe_config.exists() {
                tracing::debug!("Found config directory at: {:?}", exe_config);
                return Ok(exe_config);
            }
        }
    }

    // Fallback: Create in user config directory
    let user_config = get_user_config_dir()?;
    std::fs::create_dir_all(&user_config).context("Failed to create user config directory")?;
    tracing::info!("Created config directory at: {:?}", user_config);
    Ok(user_config)
}

/// Get platform-specific user config directory
/// - Windows: `%APPDATA%\mdpad`
/// - Unix: `~/.config/mdpad`
fn get_user_config_dir() -> Result<PathBuf> {
    let base_dir = dirs::config_dir()
        .ok_or_else(|| anyhow::anyhow!("Could not determine user config directory"))?;
    Ok(base_dir.join("mdpad"))
}

/// Get absolute path to settings.toml
pub fn get_app_config_path() -> Result<PathBuf> {
    let config_dir = find_config_directory()?;
    Ok(config_dir.join("settings.toml"))
}

/// Get absolute path to application-wide logs directory
pub fn get_logs_dir() -> Result<PathBuf> {
    let config_dir = find_config_directory()?;
    Ok(config_dir.join(".logs"))
}

/// Resolve the directory save dialogs start in when the document has no path yet.
///
/// Resolution order:
/// 1. The user's documents directory
/// 2. Current working directory
/// 3. Fallback: relative "."
pub fn resolve_default_document_directory() -> PathBuf {
    if let Some(documents) = dirs::document_dir() {
        return documents;
    }
    if let Ok(cwd) = std::env::current_dir() {
        return cwd;
    }
    PathBuf::from(".")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::fs;
    use tempfile::TempDir;

    fn reset_test_state() {
        set_config_dir_override(None);
        unsafe { std::env::remove_var("MDPAD_TEST_MODE") };
        unsafe { std::env::remove_var("MDPAD_CONFIG_DIR") };
    }

    #[test]
    #[serial]
    fn test_get_app_config_path() {
        reset_test_state();
        let temp_dir = TempDir::new().unwrap();
        let config_dir = temp_dir.path().to_path_buf();

        set_config_dir_override(Some(config_dir.clone()));

        let path = get_app_config_path().unwrap();
        assert_eq!(path, config_dir.join("settings.toml"));

        reset_test_state();
    }

    #[test]
    #[serial]
    fn test_get_logs_dir_under_config() {
        reset_test_state();
        let temp_dir = TempDir::new().unwrap();
        let config_dir = temp_dir.path().to_path_buf();

        set_config_dir_override(Some(config_dir.clone()));

        let logs = get_logs_dir().unwrap();
        assert_eq!(logs, config_dir.join(".logs"));

        reset_test_state();
    }

    #[test]
    #[serial]
    fn test_override_missing_dir_only_used_in_test_mode() {
        reset_test_state();
        let temp_dir = TempDir::new().unwrap();
        let missing = temp_dir.path().join("not-created");

        set_config_dir_override(Some(missing.clone()));
        unsafe { std::env::set_var("MDPAD_TEST_MODE", "1") };

        let found_dir = find_config_directory().unwrap();
        assert_eq!(found_dir, missing);

        reset_test_state();
    }

    #[test]
    #[serial]
    fn test_config_dir_from_env_variable() {
        reset_test_state();

        let temp_dir = TempDir::new().unwrap();
        let config_dir = temp_dir.path().to_path_buf();
        fs::create_dir_all(&config_dir).unwrap();

        unsafe { std::env::set_var("MDPAD_CONFIG_DIR", config_dir.to_str().unwrap()) };

        let found_dir = find_config_directory().unwrap();
        assert_eq!(found_dir, config_dir);

        reset_test_state();
    }

    #[test]
    fn test_get_user_config_dir_returns_valid_path() {
        let user_dir = get_user_config_dir().unwrap();
        assert!(user_dir.ends_with("mdpad"));
    }

    #[test]
    fn test_default_document_directory_is_not_empty() {
        let dir = resolve_default_document_directory();
        assert!(!dir.as_os_str().is_empty());
    }
}
