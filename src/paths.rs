//! Where trellis keeps its files
//!
//! # Environment Variables
//!
//! - `TRELLIS_CONFIG_DIR` - Override config directory (holds `config.toml`)
//! - `TRELLIS_STATE_DIR` - Override state directory (holds `state.toml`)
//!
//! Without overrides the XDG variables are honoured, then the platform
//! default (`~/.config/trellis` and `~/.local/state/trellis` on Unix).

use anyhow::{Context, Result};
use std::path::PathBuf;

/// Environment variable for config directory override
pub const ENV_CONFIG_DIR: &str = "TRELLIS_CONFIG_DIR";

/// Environment variable for state directory override
pub const ENV_STATE_DIR: &str = "TRELLIS_STATE_DIR";

const APP_DIR: &str = "trellis";

/// Get the trellis config directory path
pub fn config_dir() -> Result<PathBuf> {
    if let Ok(dir) = std::env::var(ENV_CONFIG_DIR) {
        let path = expand(&dir);
        log::debug!("Using config dir from {}: {}", ENV_CONFIG_DIR, path.display());
        return Ok(path);
    }

    if let Ok(xdg_config) = std::env::var("XDG_CONFIG_HOME") {
        let path = PathBuf::from(xdg_config).join(APP_DIR);
        log::debug!("Using XDG_CONFIG_HOME: {}", path.display());
        return Ok(path);
    }

    #[cfg(windows)]
    {
        if let Some(app_data) = dirs::config_dir() {
            return Ok(app_data.join(APP_DIR));
        }
    }

    let home = dirs::home_dir().context("Could not determine home directory")?;
    let path = home.join(".config").join(APP_DIR);
    log::debug!("Using default config dir: {}", path.display());
    Ok(path)
}

/// Get the trellis state directory path
pub fn state_dir() -> Result<PathBuf> {
    if let Ok(dir) = std::env::var(ENV_STATE_DIR) {
        let path = expand(&dir);
        log::debug!("Using state dir from {}: {}", ENV_STATE_DIR, path.display());
        return Ok(path);
    }

    if let Ok(xdg_state) = std::env::var("XDG_STATE_HOME") {
        let path = PathBuf::from(xdg_state).join(APP_DIR);
        log::debug!("Using XDG_STATE_HOME: {}", path.display());
        return Ok(path);
    }

    #[cfg(windows)]
    {
        if let Some(local_app_data) = dirs::data_local_dir() {
            return Ok(local_app_data.join(APP_DIR));
        }
    }

    let home = dirs::home_dir().context("Could not determine home directory")?;
    let path = home.join(".local").join("state").join(APP_DIR);
    log::debug!("Using default state dir: {}", path.display());
    Ok(path)
}

/// `config.toml` inside [`config_dir`]
pub fn config_file() -> Result<PathBuf> {
    Ok(config_dir()?.join("config.toml"))
}

/// `state.toml` inside [`state_dir`]
pub fn state_file() -> Result<PathBuf> {
    Ok(state_dir()?.join("state.toml"))
}

/// Expand `~` and environment variables in a path string.
///
/// Unknown variables are left as written.
pub fn expand(path: &str) -> PathBuf {
    let expanded = shellexpand::full(path).unwrap_or(std::borrow::Cow::Borrowed(path));
    PathBuf::from(expanded.as_ref())
}

#[cfg(test)]
pub(crate) mod test_env {
    use std::env;
    use std::sync::{Mutex, MutexGuard};

    static ENV_LOCK: Mutex<()> = Mutex::new(());

    fn lock() -> MutexGuard<'static, ()> {
        ENV_LOCK.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    /// Run `f` with each var set (or removed when `None`), restoring them after
    pub fn with_vars<F, R>(vars: &[(&str, Option<&str>)], f: F) -> R
    where
        F: FnOnce() -> R,
    {
        let _guard = lock();
        let originals: Vec<(&str, Option<String>)> =
            vars.iter().map(|(key, _)| (*key, env::var(key).ok())).collect();
        for (key, value) in vars {
            set(key, *value);
        }
        let result = f();
        for (key, value) in &originals {
            set(key, value.as_deref());
        }
        result
    }

    /// Single-variable shorthand for [`with_vars`]
    pub fn with_var<F, R>(key: &str, value: Option<&str>, f: F) -> R
    where
        F: FnOnce() -> R,
    {
        with_vars(&[(key, value)], f)
    }

    fn set(key: &str, value: Option<&str>) {
        // SAFETY: env access in tests is serialized by ENV_LOCK
        unsafe {
            match value {
                Some(v) => env::set_var(key, v),
                None => env::remove_var(key),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::test_env::{with_var, with_vars};
    use super::*;

    #[test]
    fn test_config_dir_env_override() {
        with_var(ENV_CONFIG_DIR, Some("/custom/config/path"), || {
            assert_eq!(config_dir().unwrap(), PathBuf::from("/custom/config/path"));
            assert_eq!(
                config_file().unwrap(),
                PathBuf::from("/custom/config/path/config.toml")
            );
        });
    }

    #[test]
    fn test_config_dir_env_override_with_tilde() {
        let home = dirs::home_dir().unwrap();
        with_var(ENV_CONFIG_DIR, Some("~/dotfiles/trellis"), || {
            assert_eq!(config_dir().unwrap(), home.join("dotfiles").join("trellis"));
        });
    }

    #[test]
    fn test_state_dir_env_override() {
        with_var(ENV_STATE_DIR, Some("/custom/state"), || {
            assert_eq!(state_file().unwrap(), PathBuf::from("/custom/state/state.toml"));
        });
    }

    #[test]
    fn test_xdg_state_home() {
        with_vars(
            &[(ENV_STATE_DIR, None), ("XDG_STATE_HOME", Some("/tmp/xdg-state-test"))],
            || {
                assert_eq!(
                    state_dir().unwrap(),
                    PathBuf::from("/tmp/xdg-state-test/trellis")
                );
            },
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_default_config_dir_unix() {
        with_vars(&[(ENV_CONFIG_DIR, None), ("XDG_CONFIG_HOME", None)], || {
            let home = dirs::home_dir().unwrap();
            assert_eq!(config_dir().unwrap(), home.join(".config").join("trellis"));
        });
    }

    #[test]
    fn test_expand_absolute() {
        assert_eq!(expand("/absolute/path"), PathBuf::from("/absolute/path"));
    }

    #[test]
    fn test_expand_unknown_env_var_unchanged() {
        let result = expand("/path/$NONEXISTENT_VAR_12345/file");
        assert_eq!(result, PathBuf::from("/path/$NONEXISTENT_VAR_12345/file"));
    }
}
