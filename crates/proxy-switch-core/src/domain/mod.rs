//! Domain model for Node Proxy Switch.
//!
//! This module contains pure logic with no infrastructure dependencies.
//!
//! # What is "domain" in Clean Architecture? (for beginners)
//!
//! The innermost layer of the application is the **domain**.  Domain code
//! holds the rules that make the tool what it is (here: how a proxy line is
//! toggled and how the current proxy state is read from a file) and never
//! touches the disk, the network, or a UI toolkit.  That makes it trivial to
//! test: every rule below can be checked with plain strings.
//!
//! Code in outer layers (the store use case, the file adapter, the command
//! bridge) depends on the domain, but the domain never depends on them.

/// The `.npmrc` document and its derived proxy status.
///
/// See [`document::ConfigDocument`] for the main type.
pub mod document;
