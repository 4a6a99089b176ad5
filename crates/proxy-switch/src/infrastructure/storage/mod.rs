//! Storage infrastructure: the `.npmrc` file and the application settings.
//!
//! - **`npmrc`** – [`npmrc::NpmrcFile`], the production
//!   [`crate::application::switch_proxy::ConfigFile`] backed by `tokio::fs`,
//!   plus resolution of the default `~/.npmrc` location.
//! - **`memory`** – [`memory::MemoryConfigFile`], an in-memory
//!   `ConfigFile` for tests that need to inject read/write failures.
//! - **`settings`** – The TOML settings file of the switch itself (log level,
//!   `.npmrc` override, I/O timeout).

pub mod memory;
pub mod npmrc;
pub mod settings;
