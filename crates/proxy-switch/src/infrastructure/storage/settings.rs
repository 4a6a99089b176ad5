//! TOML-based settings of the switch itself.
//!
//! These settings are separate from the `.npmrc` file the switch edits.  They
//! are read from the platform-appropriate settings file:
//! - Windows:  `%APPDATA%\NodeProxySwitch\settings.toml`
//! - Linux:    `~/.config/node-proxy-switch/settings.toml`
//! - macOS:    `~/Library/Application Support/NodeProxySwitch/settings.toml`
//!
//! ```toml
//! [general]
//! log_level = "debug"
//!
//! [npmrc]
//! path = "/home/dev/work/.npmrc"
//! io_timeout_ms = 2000
//! ```
//!
//! Every field has a serde default, so a missing file or a file holding only
//! some keys both work.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::npmrc::default_npmrc_path;

/// Error type for settings file operations.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// The platform config directory could not be determined.
    #[error("could not determine platform config directory")]
    NoPlatformConfigDir,

    /// No `.npmrc` path was configured and no home directory is known.
    #[error("could not determine home directory for the default .npmrc")]
    NoHomeDir,

    /// A file system I/O error occurred.
    #[error("I/O error accessing settings at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The TOML content could not be parsed.
    #[error("failed to parse settings TOML: {0}")]
    Parse(#[from] toml::de::Error),
}

// ── Settings schema types ─────────────────────────────────────────────────────

/// Top-level settings stored on disk.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AppSettings {
    #[serde(default)]
    pub general: GeneralSettings,
    #[serde(default)]
    pub npmrc: NpmrcSettings,
}

/// General behaviour settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GeneralSettings {
    /// Schema version string – bump when breaking changes are introduced.
    #[serde(default = "default_version")]
    pub version: String,
    /// `tracing` log level: `"error"`, `"warn"`, `"info"`, `"debug"`, `"trace"`.
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

/// Where the edited `.npmrc` lives and how long file I/O may take.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NpmrcSettings {
    /// Explicit `.npmrc` path; `~/.npmrc` when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
    /// Timeout for a single read or write, in milliseconds.
    #[serde(default = "default_io_timeout_ms")]
    pub io_timeout_ms: u64,
}

impl NpmrcSettings {
    pub fn io_timeout(&self) -> Duration {
        Duration::from_millis(self.io_timeout_ms)
    }
}

// ── Default helpers ───────────────────────────────────────────────────────────

fn default_version() -> String {
    "1.0".to_string()
}
fn default_log_level() -> String {
    "info".to_string()
}
fn default_io_timeout_ms() -> u64 {
    5000
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            version: default_version(),
            log_level: default_log_level(),
        }
    }
}

impl Default for NpmrcSettings {
    fn default() -> Self {
        Self {
            path: None,
            io_timeout_ms: default_io_timeout_ms(),
        }
    }
}

// ── Settings repository ───────────────────────────────────────────────────────

/// Resolves the full path to the settings file.
///
/// # Errors
///
/// Returns [`SettingsError::NoPlatformConfigDir`] if the base directory cannot
/// be determined.
pub fn settings_file_path() -> Result<PathBuf, SettingsError> {
    let dir = platform_config_dir().ok_or(SettingsError::NoPlatformConfigDir)?;
    Ok(dir.join("settings.toml"))
}

/// Loads settings from the platform settings file.
///
/// # Errors
///
/// See [`load_settings_from`].
pub fn load_settings() -> Result<AppSettings, SettingsError> {
    load_settings_from(&settings_file_path()?)
}

/// Loads settings from `path`, returning `AppSettings::default()` if the file
/// does not exist yet.
///
/// # Errors
///
/// Returns [`SettingsError::Io`] for file-system errors other than "not
/// found", and [`SettingsError::Parse`] if the TOML is malformed.
pub fn load_settings_from(path: &Path) -> Result<AppSettings, SettingsError> {
    match std::fs::read_to_string(path) {
        Ok(content) => Ok(toml::from_str(&content)?),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(AppSettings::default()),
        Err(source) => Err(SettingsError::Io {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Picks the `.npmrc` to edit.
///
/// Precedence: `override_path` (CLI flag or environment), then
/// `[npmrc] path`, then `~/.npmrc`.
///
/// # Errors
///
/// Returns [`SettingsError::NoHomeDir`] when nothing is configured and the
/// home directory is unknown.
pub fn resolve_npmrc_path(
    override_path: Option<PathBuf>,
    settings: &AppSettings,
) -> Result<PathBuf, SettingsError> {
    override_path
        .or_else(|| settings.npmrc.path.clone())
        .or_else(|| default_npmrc_path().map(Path::to_path_buf))
        .ok_or(SettingsError::NoHomeDir)
}

/// Resolves the platform base directory including the `NodeProxySwitch` subdirectory.
fn platform_config_dir() -> Option<PathBuf> {
    #[cfg(target_os = "windows")]
    {
        std::env::var_os("APPDATA").map(|p| PathBuf::from(p).join("NodeProxySwitch"))
    }

    #[cfg(target_os = "linux")]
    {
        let base = std::env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|| std::env::var_os("HOME").map(|h| PathBuf::from(h).join(".config")))?;
        Some(base.join("node-proxy-switch"))
    }

    #[cfg(target_os = "macos")]
    {
        std::env::var_os("HOME").map(|h| {
            PathBuf::from(h)
                .join("Library")
                .join("Application Support")
                .join("NodeProxySwitch")
        })
    }

    #[cfg(not(any(target_os = "windows", target_os = "linux", target_os = "macos")))]
    {
        None
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_default_settings() {
        let settings = AppSettings::default();
        assert_eq!(settings.general.log_level, "info");
        assert_eq!(settings.npmrc.path, None);
        assert_eq!(settings.npmrc.io_timeout(), Duration::from_millis(5000));
    }

    #[test]
    fn test_deserialize_empty_toml_uses_defaults() {
        let settings: AppSettings = toml::from_str("").expect("deserialize empty");
        assert_eq!(settings, AppSettings::default());
    }

    #[test]
    fn test_deserialize_partial_npmrc_section() {
        // Arrange
        let toml_str = r#"
[npmrc]
path = "/srv/ci/.npmrc"
"#;

        // Act
        let settings: AppSettings = toml::from_str(toml_str).expect("deserialize partial");

        // Assert
        assert_eq!(settings.npmrc.path, Some(PathBuf::from("/srv/ci/.npmrc")));
        // Unspecified fields keep their defaults
        assert_eq!(settings.npmrc.io_timeout_ms, 5000);
        assert_eq!(settings.general.log_level, "info");
    }

    #[test]
    fn test_unset_path_is_omitted_from_toml() {
        let toml_str = toml::to_string_pretty(&AppSettings::default()).expect("serialize");
        assert!(!toml_str.contains("path"), "None path must be omitted");
    }

    #[test]
    fn test_invalid_toml_returns_parse_error() {
        let dir = std::env::temp_dir().join(format!("proxy_switch_test_{}", Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("settings.toml");
        std::fs::write(&path, "[[[ not valid toml").unwrap();

        let result = load_settings_from(&path);

        assert!(matches!(result, Err(SettingsError::Parse(_))));
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_load_settings_from_missing_file_returns_default() {
        let path = PathBuf::from("/nonexistent/path/that/cannot/exist/settings.toml");
        assert_eq!(load_settings_from(&path).unwrap(), AppSettings::default());
    }

    #[test]
    fn test_resolve_npmrc_path_prefers_override() {
        let mut settings = AppSettings::default();
        settings.npmrc.path = Some(PathBuf::from("/from/settings/.npmrc"));

        let path = resolve_npmrc_path(Some(PathBuf::from("/from/cli/.npmrc")), &settings);

        assert_eq!(path.unwrap(), PathBuf::from("/from/cli/.npmrc"));
    }

    #[test]
    fn test_resolve_npmrc_path_falls_back_to_settings() {
        let mut settings = AppSettings::default();
        settings.npmrc.path = Some(PathBuf::from("/from/settings/.npmrc"));

        let path = resolve_npmrc_path(None, &settings);

        assert_eq!(path.unwrap(), PathBuf::from("/from/settings/.npmrc"));
    }

    #[test]
    fn test_resolve_npmrc_path_defaults_to_home() {
        let result = resolve_npmrc_path(None, &AppSettings::default());
        match default_npmrc_path() {
            Some(home_npmrc) => assert_eq!(result.unwrap(), home_npmrc),
            None => assert!(matches!(result, Err(SettingsError::NoHomeDir))),
        }
    }

    #[test]
    fn test_settings_file_path_ends_with_settings_toml() {
        if let Ok(path) = settings_file_path() {
            assert!(path.ends_with("settings.toml"), "got {path:?}");
        }
        // NoPlatformConfigDir in a stripped CI env is also acceptable.
    }
}
