//! Line codec for `.npmrc` proxy directives.

pub mod line;

pub use line::{classify, extract_url, render, DirectiveKind, LineClass, LineKind};
