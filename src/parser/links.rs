use std::borrow::Cow;
use std::sync::LazyLock;

use regex::Regex;

// href="/path" title="text", at most one whitespace char between the attributes.
// Only \" and \\ are escapes inside the title; a lone backslash is literal.
// The title never crosses a tag boundary or a line break.
static LINK_PAIR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"href="(/[^"]+)"\s?title="((?:[^"\\<>\n]|\\["\\]|\\)+)""#).unwrap()
});

const HTML_QUOTES: &[(&str, &str)] = &[
    ("&quot;", "\""),
    ("&#34;", "\""),
    ("&#39;", "'"),
    ("&#039;", "'"),
    ("&amp;", "&"),
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkPair {
    /// Raw path fragment as written in the markup, still percent-encoded.
    pub href: String,
    /// Decoded display text.
    pub title: String,
}

/// Every href/title pair in `doc`, in document order.
pub fn extract(doc: &str) -> Vec<LinkPair> {
    LINK_PAIR_RE
        .captures_iter(doc)
        .map(|caps| LinkPair {
            href: caps[1].to_string(),
            title: decode_title(&caps[2]),
        })
        .collect()
}

fn decode_title(raw: &str) -> String {
    let unescaped = unescape(raw);
    let mut text = unescaped.into_owned();
    for &(entity, literal) in HTML_QUOTES {
        if text.contains(entity) {
            text = text.replace(entity, literal);
        }
    }
    let decoded = urlencoding::decode(&text).map(Cow::into_owned);
    decoded.unwrap_or(text)
}

/// Restore `\"` and `\\`; any other backslash is kept as written.
fn unescape(raw: &str) -> Cow<'_, str> {
    if !raw.contains('\\') {
        return Cow::Borrowed(raw);
    }
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(&next) = chars.peek() {
                if next == '"' || next == '\\' {
                    chars.next();
                    out.push(next);
                    continue;
                }
            }
        }
        out.push(c);
    }
    Cow::Owned(out)
}
