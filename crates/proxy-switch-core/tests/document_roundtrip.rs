//! Integration tests for the proxy-switch-core document model.
//!
//! These tests drive the public API the same way the `proxy-switch` store
//! does: parse file text, rewrite it, render it back to text, and parse the
//! result again, checking the properties a user relies on when toggling the
//! proxy from the tray.

use proxy_switch_core::{
    classify, extract_url, render, ConfigDocument, DirectiveKind, LineKind,
};

/// Parses `text`, applies `op`, and returns the text that would be written.
fn rewrite(text: &str, op: impl Fn(&ConfigDocument) -> ConfigDocument) -> String {
    op(&ConfigDocument::parse(text)).to_text()
}

#[test]
fn test_roundtrip_canonical_directive_lines() {
    let lines = [
        "proxy = \"http://10.0.0.1:3128\"",
        "; proxy = \"http://10.0.0.1:3128\"",
        "https-proxy = \"http://user:pw@10.0.0.1:3128\"",
        "; https-proxy = \"\"",
    ];

    for line in lines {
        // Arrange
        let class = classify(line);
        let LineKind::Directive(kind) = class.kind else {
            panic!("{line:?} must classify as a directive");
        };
        let url = extract_url(line).expect("canonical line has a quoted url");

        // Act
        let rendered = render(kind, url, !class.commented);

        // Assert
        assert_eq!(rendered, line);
    }
}

#[test]
fn test_scenario_disable_enabled_file() {
    // Arrange
    let input = "proxy = \"1.1.1.1:80\"\nhttps-proxy = \"1.1.1.1:443\"\nregistry=foo\n";

    // Act
    let output = rewrite(input, ConfigDocument::disabled_all);

    // Assert
    assert_eq!(
        output,
        "; proxy = \"1.1.1.1:80\"\n; https-proxy = \"1.1.1.1:443\"\nregistry=foo"
    );
    let status = ConfigDocument::parse(&output).status();
    assert!(!status.http.enabled);
    assert!(!status.https.enabled);
}

#[test]
fn test_enable_twice_matches_enable_once() {
    let input = "; proxy = \"a\"\n# keep\n; https-proxy = \"b\"\n";
    let once = rewrite(input, ConfigDocument::enabled_all);
    let twice = rewrite(&once, ConfigDocument::enabled_all);
    assert_eq!(once, twice);
}

#[test]
fn test_disable_then_enable_restores_proxy_lines() {
    // Arrange
    let input = "registry=foo\nproxy = \"a\"\n\nhttps-proxy = \"b\"\nstrict-ssl=false";

    // Act
    let disabled = rewrite(input, ConfigDocument::disabled_all);
    let restored = rewrite(&disabled, ConfigDocument::enabled_all);

    // Assert
    assert_ne!(disabled, input);
    assert_eq!(restored, input);
}

#[test]
fn test_apply_does_not_touch_other_lines() {
    let output = rewrite("foo=bar\nproxy = \"x\"\n", |doc| doc.applied("a", "b"));
    let lines: Vec<&str> = output.split('\n').collect();

    assert_eq!(lines[0], "foo=bar");
    assert_eq!(lines[1], "proxy = \"a\"");
    assert!(!output.contains("\"x\""));
}

#[test]
fn test_apply_on_disabled_http_keeps_it_disabled() {
    let output = rewrite("; proxy = \"old\"\nhttps-proxy = \"old2\"", |doc| {
        doc.applied("new", "new2")
    });
    assert_eq!(output, "; proxy = \"new\"\nhttps-proxy = \"new2\"");
}

#[test]
fn test_duplicate_directives_report_last_line() {
    // Arrange
    let input = "; https-proxy = \"early\"\nhttps-proxy = \"late\"";

    // Act
    let status = ConfigDocument::parse(input).status();

    // Assert
    let https = status.directive(DirectiveKind::Https);
    assert_eq!(https.url.as_deref(), Some("late"));
    assert!(https.enabled);
}

#[test]
fn test_repeated_writes_do_not_grow_the_file() {
    let mut text = String::from("registry=foo\nproxy = \"a\"\nhttps-proxy = \"b\"\n");
    for _ in 0..5 {
        text = rewrite(&text, ConfigDocument::disabled_all);
        text = rewrite(&text, ConfigDocument::enabled_all);
    }
    assert_eq!(text, "registry=foo\nproxy = \"a\"\nhttps-proxy = \"b\"");
}
