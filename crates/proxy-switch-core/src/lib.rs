//! # proxy-switch-core
//!
//! Shared library for Node Proxy Switch containing the proxy line codec and
//! the in-memory model of an `.npmrc` file.
//!
//! It has zero dependencies on the file system, UI frameworks, or async
//! runtimes.  Every function here takes text in and hands text (or a derived
//! status) back out; reading and writing the actual file is the job of the
//! `proxy-switch` application crate.
//!
//! # Architecture overview (for beginners)
//!
//! npm reads its proxy settings from two lines in `~/.npmrc`:
//!
//! ```text
//! proxy = "http://10.0.0.1:3128"
//! https-proxy = "http://10.0.0.1:3128"
//! ```
//!
//! npm treats a line starting with `;` as a comment.  Node Proxy Switch turns
//! the proxy off by prefixing both lines with `"; "` and back on by removing
//! that prefix, leaving every other line of the file exactly as it was.
//!
//! - **`codec`** – Classifies a single line (is it `proxy`, `https-proxy`, or
//!   something else; is it commented) and renders directive lines back to
//!   text.
//!
//! - **`domain`** – The `ConfigDocument`: an ordered list of lines plus the
//!   rewrite operations (enable all, disable all, apply new URLs) and the
//!   derived `ProxyStatus`.

pub mod codec;
pub mod domain;

// Re-export the most-used types at the crate root so callers can write
// `proxy_switch_core::ConfigDocument` instead of the full module path.
pub use codec::line::{
    classify, disable_line, enable_line, extract_url, render, DirectiveKind, LineClass, LineKind,
    COMMENT_PREFIX,
};
pub use domain::document::{ConfigDocument, ProxyDirective, ProxyStatus};
