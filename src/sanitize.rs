//! Plain-text cleanup for feed summaries.
//!
//! Search feeds ship summaries as escaped HTML fragments, e.g.
//! `<a href="...">Title</a>&nbsp;&nbsp;<font color="#6f6f6f">Source</font>`.
//! These are turned into a single line of readable text so they stay legible
//! in the CSV, the JSON snapshot and the console report.

use once_cell::sync::Lazy;
use quick_xml::escape::{resolve_html5_entity, unescape_with};
use regex::Regex;

/// Placeholder used when a summary is missing or empty after cleanup.
pub const NO_SUMMARY: &str = "No summary";

static TAG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]+>").unwrap());

static ENTITY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"&(#[0-9]+|#[xX][0-9a-fA-F]+|[A-Za-z][A-Za-z0-9]*);?").unwrap());

/// Named references that HTML5 resolves even without the trailing `;`.
const LEGACY_ENTITIES: &[&str] = &[
    "AElig", "AMP", "Aacute", "Acirc", "Agrave", "Aring", "Atilde", "Auml", "COPY", "Ccedil",
    "ETH", "Eacute", "Ecirc", "Egrave", "Euml", "GT", "Iacute", "Icirc", "Igrave", "Iuml", "LT",
    "Ntilde", "Oacute", "Ocirc", "Ograve", "Oslash", "Otilde", "Ouml", "QUOT", "REG", "THORN",
    "Uacute", "Ucirc", "Ugrave", "Uuml", "Yacute", "aacute", "acirc", "acute", "aelig", "agrave",
    "amp", "aring", "atilde", "auml", "brvbar", "ccedil", "cedil", "cent", "copy", "curren", "deg",
    "divide", "eacute", "ecirc", "egrave", "eth", "euml", "frac12", "frac14", "frac34", "gt",
    "iacute", "icirc", "iexcl", "igrave", "iquest", "iuml", "laquo", "lt", "macr", "micro",
    "middot", "nbsp", "not", "ntilde", "oacute", "ocirc", "ograve", "ordf", "ordm", "oslash",
    "otilde", "ouml", "para", "plusmn", "pound", "quot", "raquo", "reg", "sect", "shy", "sup1",
    "sup2", "sup3", "szlig", "thorn", "times", "uacute", "ucirc", "ugrave", "uml", "uuml",
    "yacute", "yen", "yuml",
];

/// Convert an HTML-bearing summary into normalized plain text.
///
/// Entities are decoded first, then tags are stripped and whitespace runs are
/// collapsed to single spaces. Never fails: missing input, or input that
/// cleans down to nothing, yields [`NO_SUMMARY`].
pub fn sanitize(raw: Option<&str>) -> String {
    let Some(raw) = raw else {
        return NO_SUMMARY.to_string();
    };

    let decoded = decode_entities(raw);
    let stripped = TAG_RE.replace_all(&decoded, "");
    let text = stripped.split_whitespace().collect::<Vec<_>>().join(" ");

    if text.is_empty() {
        NO_SUMMARY.to_string()
    } else {
        text
    }
}

/// Decode HTML5 named and numeric character references.
///
/// Each reference is resolved on its own so one unknown entity does not stop
/// the rest of the text from being decoded; unknown ones are left as written.
/// Numeric and legacy named references decode without a trailing `;`, and a
/// name that is not an entity falls back to its longest legacy prefix
/// (`&ampx` becomes `&x`).
pub fn decode_entities(raw: &str) -> String {
    ENTITY_RE
        .replace_all(raw, |caps: &regex::Captures<'_>| decode_reference(&caps[0], &caps[1]))
        .into_owned()
}

fn decode_reference(whole: &str, body: &str) -> String {
    let terminated = whole.ends_with(';');
    let numeric = body.starts_with('#');
    if terminated || numeric || LEGACY_ENTITIES.contains(&body) {
        if let Ok(s) = unescape_with(&format!("&{body};"), resolve_html5_entity) {
            return s.into_owned();
        }
    }
    if numeric {
        return whole.to_string();
    }

    let prefix = (2..=body.len())
        .rev()
        .find(|&n| LEGACY_ENTITIES.contains(&&body[..n]));
    match prefix {
        Some(n) => match unescape_with(&format!("&{};", &body[..n]), resolve_html5_entity) {
            Ok(s) => format!("{s}{}", &whole[n + 1..]),
            Err(_) => whole.to_string(),
        },
        None => whole.to_string(),
    }
}
