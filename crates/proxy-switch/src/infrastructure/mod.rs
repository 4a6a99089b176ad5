//! Infrastructure layer for Node Proxy Switch.
//!
//! Contains OS-facing adapters: the `.npmrc` file adapter, the TOML settings
//! file, and the UI command bridge.
//!
//! **Dependency rule**: this layer may depend on `application` and
//! `proxy_switch_core`, but MUST NOT be imported by the `application` or
//! domain layers (tests aside).

pub mod storage;
pub mod ui_bridge;
