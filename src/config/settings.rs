//! Application settings and paths.
//!
//! Manages XDG-compliant paths and the settings file holding sweep defaults
//! and device administrator credentials. Credentials can be overridden per
//! invocation through `PRINTFLEET_ADMIN_USER` / `PRINTFLEET_ADMIN_PASSWORD`
//! so they never have to live on disk.

use crate::error::{ConfigError, ConfigResult};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::sync::OnceLock;

/// Environment override for the device administrator username.
pub const ADMIN_USER_ENV: &str = "PRINTFLEET_ADMIN_USER";
/// Environment override for the device administrator password.
pub const ADMIN_PASSWORD_ENV: &str = "PRINTFLEET_ADMIN_PASSWORD";

/// Global paths singleton.
static PATHS: OnceLock<Paths> = OnceLock::new();

/// Application directory paths following the XDG Base Directory Specification.
#[derive(Debug, Clone)]
pub struct Paths {
    /// Configuration directory (~/.config/printfleet)
    pub config_dir: PathBuf,
    /// Data directory (~/.local/share/printfleet)
    pub data_dir: PathBuf,
}

impl Paths {
    /// Get the global paths instance.
    pub fn get() -> &'static Paths {
        PATHS.get_or_init(|| Self::new().expect("Failed to initialize paths"))
    }

    fn new() -> ConfigResult<Self> {
        let project = ProjectDirs::from("com", "printfleet", "printfleet")
            .ok_or(ConfigError::DirectoryNotFound)?;

        let paths = Self {
            config_dir: project.config_dir().to_path_buf(),
            data_dir: project.data_dir().to_path_buf(),
        };

        fs::create_dir_all(&paths.config_dir)?;
        fs::create_dir_all(&paths.data_dir)?;

        Ok(paths)
    }

    /// Get the path to the settings file.
    pub fn settings_file(&self) -> PathBuf {
        self.config_dir.join("settings.json")
    }
}

/// Application-wide settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    /// Administrator username for device web UIs.
    pub admin_user: String,
    /// Administrator password for device web UIs.
    pub admin_password: String,
    /// Default bound on in-flight address surveys.
    pub default_concurrency: usize,
    /// Default per-probe timeout in milliseconds.
    pub default_probe_timeout_ms: u64,
    /// Default survey rate limit (0 = unlimited).
    pub default_rate_limit: u32,
    /// Per-request timeout against device web UIs, in milliseconds.
    pub http_timeout_ms: u64,
    /// Default output format.
    pub default_output_format: String,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            admin_user: "admin".to_string(),
            admin_password: String::new(),
            default_concurrency: 50,
            default_probe_timeout_ms: 1000,
            default_rate_limit: 0,
            http_timeout_ms: 30_000,
            default_output_format: "plain".to_string(),
        }
    }
}

impl AppSettings {
    /// Load settings from the default location, applying env overrides.
    pub fn load() -> ConfigResult<Self> {
        let file = Paths::get().settings_file();

        let mut settings = if file.exists() {
            let content = fs::read_to_string(&file).map_err(|e| ConfigError::ReadFailed {
                path: file.clone(),
                reason: e.to_string(),
            })?;
            serde_json::from_str(&content)
                .map_err(|e| ConfigError::InvalidFormat(e.to_string()))?
        } else {
            Self::default()
        };

        settings.overlay_env();
        Ok(settings)
    }

    /// Load settings from a specific file, applying env overrides.
    pub fn load_from(path: &PathBuf) -> ConfigResult<Self> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::ReadFailed {
            path: path.clone(),
            reason: e.to_string(),
        })?;

        let mut settings: Self =
            serde_json::from_str(&content).map_err(|e| ConfigError::InvalidFormat(e.to_string()))?;
        settings.overlay_env();
        Ok(settings)
    }

    /// Save settings to the default location.
    pub fn save(&self) -> ConfigResult<()> {
        let file = Paths::get().settings_file();

        let content = serde_json::to_string_pretty(self)?;
        fs::write(&file, content).map_err(|e| ConfigError::WriteFailed {
            path: file,
            reason: e.to_string(),
        })
    }

    /// Apply environment overrides for the admin credentials.
    fn overlay_env(&mut self) {
        if let Ok(user) = std::env::var(ADMIN_USER_ENV) {
            self.admin_user = user;
        }
        if let Ok(password) = std::env::var(ADMIN_PASSWORD_ENV) {
            self.admin_password = password;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_settings() {
        let settings = AppSettings::default();
        assert_eq!(settings.admin_user, "admin");
        assert_eq!(settings.default_concurrency, 50);
        assert_eq!(settings.default_probe_timeout_ms, 1000);
    }

    #[test]
    fn test_settings_serialization() {
        let settings = AppSettings::default();
        let json = serde_json::to_string(&settings).unwrap();
        let parsed: AppSettings = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.default_concurrency, settings.default_concurrency);
    }

    #[test]
    fn test_load_from_partial_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "admin_user": "fleet-admin" }}"#).unwrap();

        let settings = AppSettings::load_from(&file.path().to_path_buf()).unwrap();
        assert_eq!(settings.admin_user, "fleet-admin");
        // Unspecified fields fall back to defaults
        assert_eq!(settings.http_timeout_ms, 30_000);
    }
}
