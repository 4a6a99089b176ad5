//! The real `.npmrc` file.
//!
//! Reads go straight to `tokio::fs::read_to_string`.  Writes go to a sibling
//! temporary file (`.npmrc.proxy-switch.tmp`) which is then renamed over the
//! target, so npm never sees a half-written file.
//!
//! `.npmrc` often holds registry tokens and is often a symlink into a
//! dotfiles checkout.  A write therefore follows symlinks to the real file,
//! and the temporary file takes the original's permissions before any content
//! is written to it.
//!
//! # Default location
//!
//! npm's per-user config lives at `~/.npmrc`.  The home directory is read from
//! `HOME`, falling back to `USERPROFILE` on Windows.  It is resolved once per
//! process and cached.

use std::ffi::OsString;
use std::fs::Permissions;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};

use crate::application::switch_proxy::{ConfigFile, StoreError};

/// File name of npm's per-user config.
pub const NPMRC_FILE_NAME: &str = ".npmrc";

/// Suffix appended to the file name for the temporary write target.
const TEMP_SUFFIX: &str = ".proxy-switch.tmp";

static DEFAULT_NPMRC_PATH: OnceLock<Option<PathBuf>> = OnceLock::new();

/// Returns `<home>/.npmrc`, or `None` when no home directory is known.
///
/// Resolved on first call and cached for the life of the process.
pub fn default_npmrc_path() -> Option<&'static Path> {
    DEFAULT_NPMRC_PATH
        .get_or_init(|| home_dir().map(|home| home.join(NPMRC_FILE_NAME)))
        .as_deref()
}

fn home_dir() -> Option<PathBuf> {
    non_empty_var("HOME")
        .or_else(|| non_empty_var("USERPROFILE"))
        .map(PathBuf::from)
}

fn non_empty_var(key: &str) -> Option<OsString> {
    std::env::var_os(key).filter(|value| !value.is_empty())
}

/// [`ConfigFile`] backed by a file on disk.
#[derive(Debug, Clone)]
pub struct NpmrcFile {
    path: PathBuf,
}

impl NpmrcFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the temporary file used while writing `target`.
    fn temp_path_for(target: &Path) -> PathBuf {
        let mut name = target
            .file_name()
            .map(OsString::from)
            .unwrap_or_else(|| OsString::from(NPMRC_FILE_NAME));
        name.push(TEMP_SUFFIX);
        target.with_file_name(name)
    }

    /// The file a write lands in: the symlink target when the path is a
    /// symlink, the path itself when nothing exists there yet.
    async fn write_target(&self) -> Result<PathBuf, StoreError> {
        match tokio::fs::canonicalize(&self.path).await {
            Ok(real) => Ok(real),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(self.path.clone()),
            Err(source) => Err(self.write_error(source)),
        }
    }

    fn write_error(&self, source: io::Error) -> StoreError {
        StoreError::Write {
            path: self.path.clone(),
            source,
        }
    }
}

#[async_trait]
impl ConfigFile for NpmrcFile {
    fn location(&self) -> PathBuf {
        self.path.clone()
    }

    async fn read(&self) -> Result<String, StoreError> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(text) => Ok(text),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Err(StoreError::NotFound {
                path: self.path.clone(),
            }),
            Err(source) => Err(StoreError::Read {
                path: self.path.clone(),
                source,
            }),
        }
    }

    async fn write(&self, contents: &str) -> Result<(), StoreError> {
        let target = self.write_target().await?;

        // Ensure directory exists before writing.
        if let Some(dir) = target.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(dir)
                .await
                .map_err(|source| self.write_error(source))?;
        }

        let permissions = tokio::fs::metadata(&target)
            .await
            .ok()
            .map(|meta| meta.permissions());

        let temp = Self::temp_path_for(&target);
        if let Err(source) = write_temp(&temp, contents, permissions).await {
            discard_temp(&temp).await;
            return Err(self.write_error(source));
        }

        if let Err(source) = tokio::fs::rename(&temp, &target).await {
            discard_temp(&temp).await;
            return Err(self.write_error(source));
        }

        debug!(path = %target.display(), "config file replaced");
        Ok(())
    }
}

/// Creates `temp` with `permissions` (when known) and fills it with
/// `contents`.  Permissions are set before the first byte is written.
async fn write_temp(
    temp: &Path,
    contents: &str,
    permissions: Option<Permissions>,
) -> io::Result<()> {
    let mut file = tokio::fs::File::create(temp).await?;
    if let Some(permissions) = permissions {
        file.set_permissions(permissions).await?;
    }
    file.write_all(contents.as_bytes()).await?;
    file.flush().await?;
    file.sync_all().await
}

async fn discard_temp(temp: &Path) {
    match tokio::fs::remove_file(temp).await {
        Ok(()) => {}
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => warn!("could not remove {}: {e}", temp.display()),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
