//! In-memory config file for unit testing.
//!
//! Allows tests to exercise the store without touching the disk, and to
//! inject read failures, write failures, and slow reads and writes.

use std::io;
use std::path::PathBuf;
use std::sync::{
    atomic::{AtomicBool, AtomicU32, Ordering},
    Arc, Mutex,
};
use std::time::Duration;

use async_trait::async_trait;

use crate::application::switch_proxy::{ConfigFile, StoreError};

#[derive(Default)]
struct Inner {
    /// `None` means the file does not exist.
    contents: Mutex<Option<String>>,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
    read_delay: Mutex<Option<Duration>>,
    write_delay: Mutex<Option<Duration>>,
    writes: AtomicU32,
}

/// A [`ConfigFile`] that keeps its content in memory.
///
/// Clones share the same content, so a test can hand one clone to a
/// [`crate::application::switch_proxy::ConfigStore`] and inspect the other.
#[derive(Clone, Default)]
pub struct MemoryConfigFile {
    inner: Arc<Inner>,
}

impl MemoryConfigFile {
    /// A file that does not exist yet.
    pub fn missing() -> Self {
        Self::default()
    }

    /// A file holding `contents`.
    pub fn with_contents(contents: &str) -> Self {
        let file = Self::default();
        file.set_contents(contents);
        file
    }

    /// Returns the current content, or `None` if the file does not exist.
    pub fn contents(&self) -> Option<String> {
        self.inner.contents.lock().expect("lock poisoned").clone()
    }

    /// Replaces the content, as if edited outside the application.
    pub fn set_contents(&self, contents: &str) {
        *self.inner.contents.lock().expect("lock poisoned") = Some(contents.to_string());
    }

    /// Makes every subsequent read fail with [`StoreError::Read`].
    pub fn fail_reads(&self, fail: bool) {
        self.inner.fail_reads.store(fail, Ordering::SeqCst);
    }

    /// Makes every subsequent write fail with [`StoreError::Write`].
    pub fn fail_writes(&self, fail: bool) {
        self.inner.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Makes every subsequent read sleep for `delay` first.
    pub fn delay_reads(&self, delay: Duration) {
        *self.inner.read_delay.lock().expect("lock poisoned") = Some(delay);
    }

    /// Makes every subsequent write sleep for `delay` first.
    pub fn delay_writes(&self, delay: Duration) {
        *self.inner.write_delay.lock().expect("lock poisoned") = Some(delay);
    }

    /// Number of successful writes so far.
    pub fn write_count(&self) -> u32 {
        self.inner.writes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ConfigFile for MemoryConfigFile {
    fn location(&self) -> PathBuf {
        PathBuf::from("memory:.npmrc")
    }

    async fn read(&self) -> Result<String, StoreError> {
        let delay = *self.inner.read_delay.lock().expect("lock poisoned");
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        if self.inner.fail_reads.load(Ordering::SeqCst) {
            return Err(StoreError::Read {
                path: self.location(),
                source: io::Error::new(io::ErrorKind::PermissionDenied, "injected read failure"),
            });
        }

        self.contents().ok_or_else(|| StoreError::NotFound {
            path: self.location(),
        })
    }

    async fn write(&self, contents: &str) -> Result<(), StoreError> {
        let delay = *self.inner.write_delay.lock().expect("lock poisoned");
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        if self.inner.fail_writes.load(Ordering::SeqCst) {
            return Err(StoreError::Write {
                path: self.location(),
                source: io::Error::new(io::ErrorKind::PermissionDenied, "injected write failure"),
            });
        }
        self.set_contents(contents);
        self.inner.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_file_missing_reads_not_found() {
        let file = MemoryConfigFile::missing();
        assert!(matches!(file.read().await, Err(StoreError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_memory_file_clones_share_content() {
        // Arrange
        let file = MemoryConfigFile::missing();
        let other = file.clone();

        // Act
        file.write("proxy = \"a\"").await.expect("write");

        // Assert
        assert_eq!(other.contents().as_deref(), Some("proxy = \"a\""));
        assert_eq!(other.write_count(), 1);
    }

    #[tokio::test]
    async fn test_memory_file_injected_write_failure_keeps_content() {
        let file = MemoryConfigFile::with_contents("old");
        file.fail_writes(true);

        assert!(matches!(file.write("new").await, Err(StoreError::Write { .. })));
        assert_eq!(file.contents().as_deref(), Some("old"));
        assert_eq!(file.write_count(), 0);
    }
}
