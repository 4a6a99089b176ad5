//! SwitchProxyUseCase: the read-modify-write cycle behind every proxy toggle.
//!
//! The [`ConfigStore`] owns the backing `.npmrc` location (through a
//! [`ConfigFile`] port) and exposes the four operations the UI needs:
//!
//! | Operation  | Reads | Writes | Result                                  |
//! |------------|-------|--------|-----------------------------------------|
//! | `load`     | yes   | no     | current [`ProxyStatus`]                 |
//! | `enable`   | yes   | yes    | [`ToggleOutcome`] after uncommenting    |
//! | `disable`  | yes   | yes    | [`ToggleOutcome`] after commenting      |
//! | `apply`    | yes*  | yes    | status after rewriting both URLs        |
//!
//! \* `apply` tolerates a missing or unreadable file and writes a fresh one.
//!
//! # State machine
//!
//! ```text
//! UNLOADED ──load──► LOADED ──enable | disable | apply──► LOADED
//!                      ▲                                   │
//!                      └──────────── re-read from disk ────┘
//! ```
//!
//! Nothing is cached between calls: every operation starts by reading the
//! file, so edits made in a text editor between two clicks are picked up.
//!
//! # Serialization
//!
//! All operations on one store run one at a time behind an async mutex, so
//! two clicks issued back-to-back are applied in order instead of racing on
//! the same file.  Writers in *other* processes are not coordinated with;
//! the last one to write wins.

use std::future::Future;
use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use proxy_switch_core::{ConfigDocument, DirectiveKind, ProxyStatus};
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

/// Upper bound for a single file-system call.
pub const DEFAULT_IO_TIMEOUT: Duration = Duration::from_millis(5000);

/// Error type for the switch-proxy use case.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The config file does not exist.
    #[error("config file not found at {path}")]
    NotFound { path: PathBuf },

    /// The config file exists but could not be read.
    #[error("cannot read config file at {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Writing the new content failed; the file on disk is unchanged.
    #[error("cannot write config file at {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Reserved for stricter parsing.  Unmatched lines are passed through, so
    /// this is not produced today.
    #[error("malformed config file: {0}")]
    Malformed(String),

    /// `enable`/`disable` found no `proxy` or `https-proxy` line to toggle.
    #[error("no proxy directives to toggle in {path}")]
    NothingToToggle { path: PathBuf },

    /// A file-system call did not complete within the configured timeout.
    ///
    /// The timed-out call is abandoned, not cancelled: a write already handed
    /// to the OS may still land after this error is returned.  Reload before
    /// trusting the file's state.
    #[error("{operation} of {path} timed out")]
    Timeout {
        path: PathBuf,
        operation: &'static str,
    },
}

/// Port to the backing config file.
///
/// The production implementation is
/// [`crate::infrastructure::storage::npmrc::NpmrcFile`]; tests use
/// [`crate::infrastructure::storage::memory::MemoryConfigFile`].
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ConfigFile: Send + Sync {
    /// Path reported in errors and logs.
    fn location(&self) -> PathBuf;

    /// Reads the whole file.
    ///
    /// Must return [`StoreError::NotFound`] when the file is absent and
    /// [`StoreError::Read`] for any other read failure.
    async fn read(&self) -> Result<String, StoreError>;

    /// Replaces the whole file with `contents`.
    async fn write(&self, contents: &str) -> Result<(), StoreError>;
}

/// Target state of a toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Toggle {
    Enable,
    Disable,
}

/// Result of [`ConfigStore::enable`] and [`ConfigStore::disable`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToggleOutcome {
    /// Status derived from the document that was written.
    pub status: ProxyStatus,
    /// Directive kinds the file has no line for.  They are not synthesized
    /// (there is no URL to give them), so they stay unconfigured and report
    /// `enabled: false` in `status`.
    pub missing: Vec<DirectiveKind>,
}

impl ToggleOutcome {
    /// `true` when only some of the directives were toggled.
    pub fn is_partial(&self) -> bool {
        !self.missing.is_empty()
    }
}

/// Read-modify-write access to one `.npmrc` file.
pub struct ConfigStore {
    file: Arc<dyn ConfigFile>,
    io_timeout: Duration,
    /// Serializes operations; held for the whole read-modify-write cycle.
    gate: Mutex<()>,
}

impl ConfigStore {
    /// Creates a store using [`DEFAULT_IO_TIMEOUT`].
    pub fn new(file: impl ConfigFile + 'static) -> Self {
        Self::with_timeout(file, DEFAULT_IO_TIMEOUT)
    }

    /// Creates a store whose file-system calls fail after `io_timeout`.
    pub fn with_timeout(file: impl ConfigFile + 'static, io_timeout: Duration) -> Self {
        Self {
            file: Arc::new(file),
            io_timeout,
            gate: Mutex::new(()),
        }
    }

    /// Returns the path of the backing file.
    pub fn path(&self) -> PathBuf {
        self.file.location()
    }

    /// Reads the file and derives the current proxy status.
    ///
    /// # Errors
    ///
    /// [`StoreError::NotFound`], [`StoreError::Read`] or
    /// [`StoreError::Timeout`].
    pub async fn load(&self) -> Result<ProxyStatus, StoreError> {
        let _guard = self.gate.lock().await;
        let status = self.read_document().await?.status();
        debug!(?status, "loaded proxy status");
        Ok(status)
    }

    /// Uncomments every proxy directive line.
    ///
    /// A file with only one of the two directives is still toggled; the
    /// absent kind is listed in [`ToggleOutcome::missing`].
    ///
    /// # Errors
    ///
    /// Read failures from [`Self::load`], [`StoreError::NothingToToggle`] when
    /// the file has no directive lines, and [`StoreError::Write`].
    pub async fn enable(&self) -> Result<ToggleOutcome, StoreError> {
        self.toggle(Toggle::Enable).await
    }

    /// Comments out every proxy directive line.
    ///
    /// # Errors
    ///
    /// Same as [`Self::enable`].
    pub async fn disable(&self) -> Result<ToggleOutcome, StoreError> {
        self.toggle(Toggle::Disable).await
    }

    /// Points both directives at new URLs, keeping their enabled state.
    ///
    /// Directives missing from the file are appended enabled.  When the file
    /// is missing, unreadable or empty, the new content is exactly one
    /// `proxy` and one `https-proxy` line.
    ///
    /// # Errors
    ///
    /// [`StoreError::Write`] when persisting fails, [`StoreError::Timeout`]
    /// when a file-system call hangs.
    pub async fn apply(&self, http_url: &str, https_url: &str) -> Result<ProxyStatus, StoreError> {
        let _guard = self.gate.lock().await;

        let next = match self.read_document().await {
            Ok(doc) if doc.is_empty() => {
                info!("config file is empty, writing fresh proxy settings");
                ConfigDocument::synthesized(http_url, https_url)
            }
            Ok(doc) => doc.applied(http_url, https_url),
            Err(e @ (StoreError::NotFound { .. } | StoreError::Read { .. })) => {
                warn!("{e}; writing fresh proxy settings");
                ConfigDocument::synthesized(http_url, https_url)
            }
            Err(e) => return Err(e),
        };

        self.write_document(&next).await?;
        let status = next.status();
        info!(http = http_url, https = https_url, "applied proxy settings");
        Ok(status)
    }

    async fn toggle(&self, target: Toggle) -> Result<ToggleOutcome, StoreError> {
        let _guard = self.gate.lock().await;

        let doc = self.read_document().await?;
        if !doc.has_directives() {
            return Err(StoreError::NothingToToggle { path: self.path() });
        }
        let missing: Vec<DirectiveKind> = [DirectiveKind::Http, DirectiveKind::Https]
            .into_iter()
            .filter(|kind| !doc.has_directive(*kind))
            .collect();

        let next = match target {
            Toggle::Enable => doc.enabled_all(),
            Toggle::Disable => doc.disabled_all(),
        };
        self.write_document(&next).await?;

        match target {
            Toggle::Enable => info!("enabled proxy"),
            Toggle::Disable => info!("disabled proxy"),
        }
        if !missing.is_empty() {
            warn!(?missing, "config file lacks some proxy directives; left unconfigured");
        }
        Ok(ToggleOutcome {
            status: next.status(),
            missing,
        })
    }

    async fn read_document(&self) -> Result<ConfigDocument, StoreError> {
        debug!(path = %self.path().display(), "reading config file");
        let text = self.bounded("read", self.file.read()).await?;
        Ok(ConfigDocument::parse(&text))
    }

    /// Replaces the file with `doc`, trimming one trailing newline.
    ///
    /// # Errors
    ///
    /// [`StoreError::Write`] or [`StoreError::Timeout`]; the file keeps its
    /// previous content on failure.
    pub async fn persist(&self, doc: &ConfigDocument) -> Result<(), StoreError> {
        let _guard = self.gate.lock().await;
        self.write_document(doc).await
    }

    async fn write_document(&self, doc: &ConfigDocument) -> Result<(), StoreError> {
        let text = doc.to_text();
        debug!(path = %self.path().display(), bytes = text.len(), "writing config file");
        self.bounded("write", self.file.write(&text)).await
    }

    async fn bounded<T, Fut>(&self, operation: &'static str, fut: Fut) -> Result<T, StoreError>
    where
        Fut: Future<Output = Result<T, StoreError>>,
    {
        match tokio::time::timeout(self.io_timeout, fut).await {
            Ok(result) => result,
            Err(_) => Err(StoreError::Timeout {
                path: self.path(),
                operation,
            }),
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
