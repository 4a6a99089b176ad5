//! Application layer use cases for Node Proxy Switch.
//!
//! # What is the "application" layer? (for beginners)
//!
//! In Clean Architecture the *application* layer sits between the domain
//! (pure rules in `proxy-switch-core`) and the infrastructure (disk, UI).
//!
//! Use cases in this layer:
//!
//! - **Orchestrate** domain objects to fulfil a user goal (e.g., "turn the
//!   npm proxy off").
//! - **Depend on abstractions** (the [`switch_proxy::ConfigFile`] trait)
//!   rather than concrete implementations, so tests can swap the real file
//!   for an in-memory one.
//!
//! # Sub-modules
//!
//! - **`switch_proxy`** – The `ConfigStore`: every operation reads the
//!   current file, rewrites it through the core document model, writes it
//!   back, and reports the resulting proxy status.

pub mod switch_proxy;
