//! The `.npmrc` document model and its proxy rewrites.
//!
//! A [`ConfigDocument`] is the file split on `\n`, kept verbatim.  Rewrites
//! never mutate a document: each one returns a new document built line by line
//! through the [`crate::codec::line`] functions, so a line that is not a proxy
//! directive always comes out byte-for-byte identical.
//!
//! # Trailing newline handling
//!
//! `"a\nb\n".split('\n')` yields `["a", "b", ""]`.  The empty last element is
//! kept so that [`ConfigDocument::to_text`] joins back to `"a\nb\n"`; the one
//! trailing newline is then trimmed, which keeps repeated writes from growing
//! the file by a blank line each time.
//!
//! # Duplicate directives
//!
//! When a file contains the same directive more than once, the **last** line
//! determines the reported [`ProxyDirective`].  Rewrites still touch every
//! matching line.

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::codec::line::{
    classify, disable_line, enable_line, extract_url, render, DirectiveKind,
};

/// Derived state of one proxy directive.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProxyDirective {
    /// Text between the quotes of the matching line; `None` when the directive
    /// is absent or unquoted.
    pub url: Option<String>,
    /// `true` iff the matching line is not commented.  `false` when absent.
    pub enabled: bool,
}

/// Derived proxy state of a whole document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProxyStatus {
    pub http: ProxyDirective,
    pub https: ProxyDirective,
}

impl ProxyStatus {
    /// Returns the directive state for `kind`.
    pub fn directive(&self, kind: DirectiveKind) -> &ProxyDirective {
        match kind {
            DirectiveKind::Http => &self.http,
            DirectiveKind::Https => &self.https,
        }
    }

    fn directive_mut(&mut self, kind: DirectiveKind) -> &mut ProxyDirective {
        match kind {
            DirectiveKind::Http => &mut self.http,
            DirectiveKind::Https => &mut self.https,
        }
    }
}

/// Ordered lines of an `.npmrc` file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigDocument {
    lines: Vec<String>,
}

impl ConfigDocument {
    /// Splits `text` on `\n`.
    ///
    /// An empty string yields an empty document (no lines at all), not a
    /// document holding a single empty line.
    pub fn parse(text: &str) -> Self {
        if text.is_empty() {
            return Self::default();
        }
        Self {
            lines: text.split('\n').map(str::to_string).collect(),
        }
    }

    /// Builds a document containing exactly one enabled line per directive.
    ///
    /// Used when there is no existing file content to rewrite.
    pub fn synthesized(http_url: &str, https_url: &str) -> Self {
        Self {
            lines: vec![
                render(DirectiveKind::Http, http_url, true),
                render(DirectiveKind::Https, https_url, true),
            ],
        }
    }

    /// Returns the lines in file order.
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Returns `true` when the document holds no lines.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Returns `true` when at least one line is a proxy directive.
    pub fn has_directives(&self) -> bool {
        self.lines
            .iter()
            .any(|line| classify(line).directive().is_some())
    }

    /// Returns `true` when at least one line is a `kind` directive.
    pub fn has_directive(&self, kind: DirectiveKind) -> bool {
        self.lines
            .iter()
            .any(|line| classify(line).directive() == Some(kind))
    }

    /// Derives the proxy status with a single linear scan.
    pub fn status(&self) -> ProxyStatus {
        let mut status = ProxyStatus::default();
        for line in &self.lines {
            let class = classify(line);
            if let Some(kind) = class.directive() {
                let directive = status.directive_mut(kind);
                directive.url = extract_url(line).map(str::to_string);
                directive.enabled = !class.commented;
            }
        }
        status
    }

    /// Uncomments every commented directive line.
    pub fn enabled_all(&self) -> Self {
        self.map_directives(|line, commented, _| {
            if commented {
                enable_line(line)
            } else {
                line.to_string()
            }
        })
    }

    /// Comments out every enabled directive line.
    pub fn disabled_all(&self) -> Self {
        self.map_directives(|line, commented, _| {
            if commented {
                line.to_string()
            } else {
                disable_line(line)
            }
        })
    }

    /// Replaces the URL of every directive line, keeping its commented state.
    ///
    /// A directive kind with no line at all is appended as an enabled line,
    /// `proxy` first, so the result always configures both directives.
    pub fn applied(&self, http_url: &str, https_url: &str) -> Self {
        let url_for = |kind: DirectiveKind| match kind {
            DirectiveKind::Http => http_url,
            DirectiveKind::Https => https_url,
        };

        let mut doc =
            self.map_directives(|_, commented, kind| render(kind, url_for(kind), !commented));

        let missing: Vec<DirectiveKind> = [DirectiveKind::Http, DirectiveKind::Https]
            .into_iter()
            .filter(|kind| !doc.has_directive(*kind))
            .collect();

        if !missing.is_empty() {
            // Insert before the empty element left by a trailing newline.
            let trailing_newline = doc.lines.last().is_some_and(String::is_empty);
            if trailing_newline {
                doc.lines.pop();
            }
            for kind in missing {
                let line = render(kind, url_for(kind), true);
                trace!("appended line {line}");
                doc.lines.push(line);
            }
            if trailing_newline {
                doc.lines.push(String::new());
            }
        }

        doc
    }

    /// Joins the lines with `\n` and trims one trailing newline.
    pub fn to_text(&self) -> String {
        let mut text = self.lines.join("\n");
        if text.ends_with('\n') {
            text.pop();
        }
        text
    }

    /// Rebuilds the document, passing every directive line through `f`.
    ///
    /// `f` receives the line, its commented flag, and its directive kind.
    fn map_directives<F>(&self, mut f: F) -> Self
    where
        F: FnMut(&str, bool, DirectiveKind) -> String,
    {
        let lines = self
            .lines
            .iter()
            .map(|line| {
                let class = classify(line);
                match class.directive() {
                    Some(kind) => {
                        let rewritten = f(line, class.commented, kind);
                        if rewritten != *line {
                            trace!("replaced line {line:?} with {rewritten:?}");
                        }
                        rewritten
                    }
                    None => line.clone(),
                }
            })
            .collect();
        Self { lines }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
