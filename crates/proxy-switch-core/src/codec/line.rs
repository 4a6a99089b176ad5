//! Classification and rendering of single `.npmrc` lines.
//!
//! Line shapes recognised as proxy directives:
//! ```text
//! [; ]proxy = "<url>"
//! [; ]https-proxy = "<url>"
//! ```
//! A leading `"; "` (semicolon, single space) marks the directive as disabled.
//! Every other line is opaque and is never rewritten.

use serde::{Deserialize, Serialize};

/// Prefix that marks a directive line as commented out (disabled).
pub const COMMENT_PREFIX: &str = "; ";

/// Key of the plain HTTP proxy directive.
const HTTP_KEY: &str = "proxy";

/// Key of the HTTPS proxy directive.
const HTTPS_KEY: &str = "https-proxy";

/// The two proxy directives npm understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DirectiveKind {
    /// `proxy = "..."`
    Http,
    /// `https-proxy = "..."`
    Https,
}

impl DirectiveKind {
    /// Returns the key as it appears at the start of the line.
    pub fn key(self) -> &'static str {
        match self {
            DirectiveKind::Http => HTTP_KEY,
            DirectiveKind::Https => HTTPS_KEY,
        }
    }
}

/// What a line is, ignoring its comment marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    /// A `proxy` or `https-proxy` directive.
    Directive(DirectiveKind),
    /// Anything else; passed through unchanged.
    Other,
}

/// Result of [`classify`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineClass {
    pub kind: LineKind,
    /// `true` iff the line starts with [`COMMENT_PREFIX`].
    pub commented: bool,
}

impl LineClass {
    /// Returns the directive kind, or `None` for non-directive lines.
    pub fn directive(self) -> Option<DirectiveKind> {
        match self.kind {
            LineKind::Directive(kind) => Some(kind),
            LineKind::Other => None,
        }
    }
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Classifies a single line.
///
/// `https-proxy` is checked before `proxy`: the check is a prefix match on the
/// line with its optional comment marker removed, and `https-proxy` must never
/// be mistaken for the HTTP directive.
///
/// # Examples
///
/// ```rust
/// use proxy_switch_core::{classify, DirectiveKind, LineKind};
///
/// let class = classify("; https-proxy = \"http://10.0.0.1:3128\"");
/// assert_eq!(class.kind, LineKind::Directive(DirectiveKind::Https));
/// assert!(class.commented);
///
/// assert_eq!(classify("registry=https://registry.npmjs.org/").kind, LineKind::Other);
/// ```
pub fn classify(line: &str) -> LineClass {
    let commented = line.starts_with(COMMENT_PREFIX);
    let body = line.strip_prefix(COMMENT_PREFIX).unwrap_or(line);

    let kind = if body.starts_with(HTTPS_KEY) {
        LineKind::Directive(DirectiveKind::Https)
    } else if body.starts_with(HTTP_KEY) {
        LineKind::Directive(DirectiveKind::Http)
    } else {
        LineKind::Other
    };

    LineClass { kind, commented }
}

/// Returns the text between the first and second `"` on the line.
///
/// Returns `None` when the line holds fewer than two double quotes.
///
/// ```rust
/// use proxy_switch_core::extract_url;
///
/// assert_eq!(extract_url("proxy = \"1.1.1.1:80\""), Some("1.1.1.1:80"));
/// assert_eq!(extract_url("proxy = 1.1.1.1:80"), None);
/// ```
pub fn extract_url(line: &str) -> Option<&str> {
    let mut parts = line.split('"');
    parts.next()?;
    let url = parts.next()?;
    // The second quote must actually exist: `split` yields a trailing segment
    // only when the separator was found.
    parts.next()?;
    Some(url)
}

/// Renders a directive line: `<prefix><key> = "<url>"`.
///
/// The prefix is [`COMMENT_PREFIX`] when `enabled` is `false`.
pub fn render(kind: DirectiveKind, url: &str, enabled: bool) -> String {
    let prefix = if enabled { "" } else { COMMENT_PREFIX };
    format!("{prefix}{} = \"{url}\"", kind.key())
}

/// Removes exactly one leading [`COMMENT_PREFIX`]; other lines are returned as is.
pub fn enable_line(line: &str) -> String {
    line.strip_prefix(COMMENT_PREFIX).unwrap_or(line).to_string()
}

/// Prepends [`COMMENT_PREFIX`] unless the line already starts with it.
pub fn disable_line(line: &str) -> String {
    if line.starts_with(COMMENT_PREFIX) {
        line.to_string()
    } else {
        format!("{COMMENT_PREFIX}{line}")
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    // ── classify ──────────────────────────────────────────────────────────────

    #[test]
    fn test_classify_enabled_http_line() {
        let class = classify("proxy = \"1.1.1.1:80\"");
        assert_eq!(class.kind, LineKind::Directive(DirectiveKind::Http));
        assert!(!class.commented);
    }

    #[test]
    fn test_classify_commented_http_line() {
        let class = classify("; proxy = \"1.1.1.1:80\"");
        assert_eq!(class.kind, LineKind::Directive(DirectiveKind::Http));
        assert!(class.commented);
    }

    #[test]
    fn test_classify_https_line_is_not_mistaken_for_http() {
        // Arrange: `https-proxy` contains the substring `proxy`
        let line = "https-proxy = \"1.1.1.1:443\"";

        // Act
        let class = classify(line);

        // Assert
        assert_eq!(class.kind, LineKind::Directive(DirectiveKind::Https));
        assert_eq!(class.directive(), Some(DirectiveKind::Https));
    }

    #[test]
    fn test_classify_commented_https_line() {
        let class = classify("; https-proxy = \"1.1.1.1:443\"");
        assert_eq!(class.kind, LineKind::Directive(DirectiveKind::Https));
        assert!(class.commented);
    }

    #[test]
    fn test_classify_unrelated_line_is_other() {
        let class = classify("registry=https://registry.npmjs.org/");
        assert_eq!(class.kind, LineKind::Other);
        assert_eq!(class.directive(), None);
    }

    #[test]
    fn test_classify_blank_line_is_other() {
        assert_eq!(classify("").kind, LineKind::Other);
    }

    #[test]
    fn test_classify_key_not_at_line_start_is_other() {
        // Keys that merely contain `proxy` somewhere are not directives
        assert_eq!(classify("noproxy = \"localhost\"").kind, LineKind::Other);
        assert_eq!(classify("  proxy = \"x\"").kind, LineKind::Other);
    }

    #[test]
    fn test_classify_semicolon_without_space_is_other() {
        // Only the exact `"; "` marker counts as the directive comment form
        let class = classify(";proxy = \"x\"");
        assert_eq!(class.kind, LineKind::Other);
        assert!(!class.commented);
    }

    #[test]
    fn test_classify_other_line_can_still_be_commented() {
        let class = classify("; just a note");
        assert_eq!(class.kind, LineKind::Other);
        assert!(class.commented);
    }

    // ── extract_url ───────────────────────────────────────────────────────────

    #[test]
    fn test_extract_url_returns_quoted_text() {
        assert_eq!(
            extract_url("; https-proxy = \"http://user@10.0.0.1:3128\""),
            Some("http://user@10.0.0.1:3128")
        );
    }

    #[test]
    fn test_extract_url_uses_first_two_quotes_only() {
        assert_eq!(extract_url("proxy = \"a\" \"b\""), Some("a"));
    }

    #[test]
    fn test_extract_url_empty_quotes_yield_empty_string() {
        assert_eq!(extract_url("proxy = \"\""), Some(""));
    }

    #[test]
    fn test_extract_url_single_quote_yields_none() {
        assert_eq!(extract_url("proxy = \"unterminated"), None);
    }

    #[test]
    fn test_extract_url_no_quotes_yields_none() {
        assert_eq!(extract_url("proxy=http://x"), None);
    }

    // ── render ────────────────────────────────────────────────────────────────

    #[test]
    fn test_render_enabled_http() {
        assert_eq!(
            render(DirectiveKind::Http, "1.2.3.4:8080", true),
            "proxy = \"1.2.3.4:8080\""
        );
    }

    #[test]
    fn test_render_disabled_https() {
        assert_eq!(
            render(DirectiveKind::Https, "1.2.3.4:8443", false),
            "; https-proxy = \"1.2.3.4:8443\""
        );
    }

    #[test]
    fn test_render_then_classify_reproduces_kind_and_state() {
        for kind in [DirectiveKind::Http, DirectiveKind::Https] {
            for enabled in [true, false] {
                // Act
                let line = render(kind, "host:1", enabled);
                let class = classify(&line);

                // Assert
                assert_eq!(class.kind, LineKind::Directive(kind), "line {line:?}");
                assert_eq!(class.commented, !enabled, "line {line:?}");
                assert_eq!(extract_url(&line), Some("host:1"));
            }
        }
    }

    // ── enable_line / disable_line ────────────────────────────────────────────

    #[test]
    fn test_enable_line_strips_exactly_one_prefix() {
        assert_eq!(enable_line("; ; proxy = \"x\""), "; proxy = \"x\"");
    }

    #[test]
    fn test_enable_line_leaves_uncommented_line_alone() {
        assert_eq!(enable_line("proxy = \"x\""), "proxy = \"x\"");
    }

    #[test]
    fn test_disable_line_prepends_prefix() {
        assert_eq!(disable_line("proxy = \"x\""), "; proxy = \"x\"");
    }

    #[test]
    fn test_disable_line_does_not_double_comment() {
        assert_eq!(disable_line("; proxy = \"x\""), "; proxy = \"x\"");
    }

    #[test]
    fn test_directive_kind_keys() {
        assert_eq!(DirectiveKind::Http.key(), "proxy");
        assert_eq!(DirectiveKind::Https.key(), "https-proxy");
    }
}
