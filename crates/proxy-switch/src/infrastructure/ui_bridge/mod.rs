//! Command bridge: exposes the proxy store to a window, a tray, or the CLI.
//!
//! All command functions live here and delegate to the shared [`AppState`].
//! The presentation layer (a settings window, a tray menu, the `proxy-switch`
//! binary) is the only consumer of this module; it must NOT be imported by
//! the application or domain layers.
//!
//! # Commands and events
//!
//! | UI action                 | Command                   | Result                 |
//! |---------------------------|---------------------------|------------------------|
//! | open settings window      | [`get_proxy_settings`]    | [`ProxySettingsDto`]   |
//! | tray "Enable Proxy"       | [`enable_proxy`]          | [`ProxySettingsDto`]   |
//! | tray "Disable Proxy"      | [`disable_proxy`]         | [`ProxySettingsDto`]   |
//! | settings form submit      | [`apply_proxy_settings`]  | [`ProxySettingsDto`]   |
//!
//! After every successful command the new [`ProxySettingsDto`] is published on
//! a `tokio::sync::watch` channel.  A window reacts by refilling its form
//! fields; a tray reacts by swapping its icon on `is_proxy_active`.  Neither
//! has to be called from inside the store, which keeps file I/O free of UI
//! side effects.
//!
//! # `CommandResult<T>` wrapper
//!
//! All commands return `CommandResult<T>` rather than `Result<T, E>`, so every
//! response has the same shape: `{ success: bool, data: T | null, error:
//! string | null }`.  The frontend can always safely read `result.success`.

use std::path::PathBuf;
use std::sync::Arc;

use proxy_switch_core::{DirectiveKind, ProxyStatus};
use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tracing::{error, info};

use crate::application::switch_proxy::{ConfigStore, StoreError, ToggleOutcome};
use crate::infrastructure::storage::{
    npmrc::NpmrcFile,
    settings::{resolve_npmrc_path, AppSettings, SettingsError},
};

// ── Shared application state ──────────────────────────────────────────────────

/// Application state shared between command handlers.
///
/// Wrapped in `Arc<>` so that every UI callback (menu click, form submit) can
/// hold a handle.  The store already serializes its own operations, so it is
/// not behind an extra lock.
pub struct AppState {
    /// Read-modify-write access to the edited `.npmrc`.
    pub store: ConfigStore,
    updates: watch::Sender<ProxySettingsDto>,
}

impl AppState {
    /// Wraps an existing store.
    pub fn new(store: ConfigStore) -> Arc<Self> {
        let (updates, _rx) = watch::channel(ProxySettingsDto::default());
        Arc::new(Self { store, updates })
    }

    /// Builds the state for the real `.npmrc`.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::NoHomeDir`] when neither `npmrc_override` nor
    /// the settings name a file and no home directory is known.
    pub fn from_settings(
        settings: AppSettings,
        npmrc_override: Option<PathBuf>,
    ) -> Result<Arc<Self>, SettingsError> {
        let path = resolve_npmrc_path(npmrc_override, &settings)?;
        info!("using npm config at {}", path.display());
        let store = ConfigStore::with_timeout(NpmrcFile::new(path), settings.npmrc.io_timeout());
        Ok(Self::new(store))
    }

    /// Subscribes to the settings published after each successful command.
    pub fn subscribe(&self) -> watch::Receiver<ProxySettingsDto> {
        self.updates.subscribe()
    }

    fn publish(&self, dto: &ProxySettingsDto) {
        self.updates.send_replace(dto.clone());
    }
}

// ── Data Transfer Objects (Presentation layer) ────────────────────────────────

/// Proxy settings as shown in the settings window and the tray.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProxySettingsDto {
    /// HTTP proxy URL; empty when not configured.
    pub http: String,
    /// HTTPS proxy URL; empty when not configured.
    pub https: String,
    pub http_enabled: bool,
    pub https_enabled: bool,
    /// Drives the tray icon and the enable/disable buttons.  Follows the HTTP
    /// directive.
    pub is_proxy_active: bool,
    /// Directives an enable/disable could not toggle because the file has no
    /// line for them.  Omitted from JSON when empty.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub missing: Vec<DirectiveKind>,
}

impl From<&ProxyStatus> for ProxySettingsDto {
    fn from(status: &ProxyStatus) -> Self {
        Self {
            http: status.http.url.clone().unwrap_or_default(),
            https: status.https.url.clone().unwrap_or_default(),
            http_enabled: status.http.enabled,
            https_enabled: status.https.enabled,
            is_proxy_active: status.http.enabled,
            missing: Vec::new(),
        }
    }
}

impl From<&ToggleOutcome> for ProxySettingsDto {
    fn from(outcome: &ToggleOutcome) -> Self {
        Self {
            missing: outcome.missing.clone(),
            ..Self::from(&outcome.status)
        }
    }
}

/// Form payload of the settings window.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplyProxyDto {
    pub http: String,
    pub https: String,
}

/// Unified response wrapper used by commands.
#[derive(Debug, Serialize, Deserialize)]
pub struct CommandResult<T: Serialize> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
}

impl<T: Serialize> CommandResult<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }
    pub fn err(msg: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(msg.into()),
        }
    }
}

// ── Commands ──────────────────────────────────────────────────────────────────

/// Returns the settings currently in the `.npmrc`.
pub async fn get_proxy_settings(state: Arc<AppState>) -> CommandResult<ProxySettingsDto> {
    let result = state.store.load().await;
    respond(&state, "load proxy settings", result.map(|s| ProxySettingsDto::from(&s)))
}

/// Uncomments the proxy directives.
pub async fn enable_proxy(state: Arc<AppState>) -> CommandResult<ProxySettingsDto> {
    let result = state.store.enable().await;
    respond(&state, "enable proxy", result.map(|o| ProxySettingsDto::from(&o)))
}

/// Comments out the proxy directives.
pub async fn disable_proxy(state: Arc<AppState>) -> CommandResult<ProxySettingsDto> {
    let result = state.store.disable().await;
    respond(&state, "disable proxy", result.map(|o| ProxySettingsDto::from(&o)))
}

/// Writes new proxy URLs from the settings form.
pub async fn apply_proxy_settings(
    state: Arc<AppState>,
    settings: ApplyProxyDto,
) -> CommandResult<ProxySettingsDto> {
    let result = state.store.apply(&settings.http, &settings.https).await;
    respond(&state, "apply proxy settings", result.map(|s| ProxySettingsDto::from(&s)))
}

/// Converts a store result into a `CommandResult`, publishing on success.
fn respond(
    state: &AppState,
    action: &str,
    result: Result<ProxySettingsDto, StoreError>,
) -> CommandResult<ProxySettingsDto> {
    match result {
        Ok(dto) => {
            state.publish(&dto);
            CommandResult::ok(dto)
        }
        Err(e) => {
            error!("failed to {action}: {e}");
            CommandResult::err(format!("failed to {action}: {e}"))
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
