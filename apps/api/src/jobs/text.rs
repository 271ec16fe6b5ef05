//! Text normalization for WordPress rendered fields: entity decoding and tag stripping.
//!
//! Regex based, not an HTML parser. Stray `<`/`>` in malformed markup can survive.

use std::sync::LazyLock;

use regex::{Captures, Regex};

static ENTITY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"&(#[0-9]+|[A-Za-z][A-Za-z0-9]*);").unwrap());

static TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").unwrap());

static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// Named entities WordPress emits in titles and content.
fn named_entity(name: &str) -> Option<char> {
    let c = match name {
        "amp" => '&',
        "lt" => '<',
        "gt" => '>',
        "quot" => '"',
        "apos" => '\'',
        "nbsp" => '\u{00A0}',
        "ndash" => '\u{2013}',
        "mdash" => '\u{2014}',
        "lsquo" => '\u{2018}',
        "rsquo" => '\u{2019}',
        "sbquo" => '\u{201A}',
        "ldquo" => '\u{201C}',
        "rdquo" => '\u{201D}',
        "bdquo" => '\u{201E}',
        "hellip" => '\u{2026}',
        "bull" => '\u{2022}',
        "middot" => '\u{00B7}',
        "copy" => '\u{00A9}',
        "reg" => '\u{00AE}',
        "trade" => '\u{2122}',
        "deg" => '\u{00B0}',
        "rupee" => '\u{20B9}',
        _ => return None,
    };
    Some(c)
}

/// Replaces named and decimal numeric entities with the characters they stand for.
///
/// One left-to-right pass: `&amp;lt;` decodes to `&lt;`, not `<`. Unknown names and
/// code points that are not valid `char`s are kept verbatim.
pub fn decode_entities(text: &str) -> String {
    if text.is_empty() || !text.contains('&') {
        return text.to_string();
    }

    ENTITY
        .replace_all(text, |caps: &Captures| {
            let body = &caps[1];
            let decoded = match body.strip_prefix('#') {
                Some(digits) => digits.parse::<u32>().ok().and_then(char::from_u32),
                None => named_entity(body),
            };
            match decoded {
                Some(c) => c.to_string(),
                None => caps[0].to_string(),
            }
        })
        .into_owned()
}

/// Turns rendered HTML into a single line of plain text.
///
/// Tags become spaces, whitespace runs collapse, the ends are trimmed, then
/// entities are decoded.
pub fn strip_tags(html: &str) -> String {
    if html.is_empty() {
        return String::new();
    }
    let without_tags = TAG.replace_all(html, " ");
    let collapsed = WHITESPACE.replace_all(&without_tags, " ");
    decode_entities(collapsed.trim())
}
