//! Input sanitizers applied before settings are persisted.

use regex::Regex;
use serde_json::Value;
use std::sync::LazyLock;

static SCRIPT_OR_STYLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<(script|style)[^>]*?>.*?</(script|style)>").expect("valid regex"));
static TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").expect("valid regex"));
static OCTET: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"%[a-fA-F0-9]{2}").expect("valid regex"));
static INLINE_WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[\r\n\t ]+").expect("valid regex"));

/// Remove markup, including the bodies of `<script>` and `<style>` elements.
fn strip_tags(input: &str) -> String {
    let without_blocks = SCRIPT_OR_STYLE.replace_all(input, "");
    TAG.replace_all(&without_blocks, "").into_owned()
}

/// Single-line text: tags and percent-encoded octets removed, every run of
/// whitespace (line breaks included) collapsed to one space, ends trimmed.
pub fn text_field(input: &str) -> String {
    let stripped = strip_tags(input);
    let stripped = OCTET.replace_all(&stripped, "");
    INLINE_WHITESPACE.replace_all(&stripped, " ").trim().to_string()
}

/// Multi-line text: like [`text_field`] but line breaks survive (CRLF becomes LF).
pub fn textarea_field(input: &str) -> String {
    let stripped = strip_tags(&input.replace("\r\n", "\n"));
    OCTET.replace_all(&stripped, "").trim().to_string()
}

/// Lenient integer cast.
///
/// Numbers are truncated toward zero, strings contribute their leading
/// integer (`"12abc"` is 12, `"abc"` is 0), booleans are 0/1, arrays and
/// objects are 1 when non-empty, `null` is 0.
pub fn coerce_int(value: &Value) -> i64 {
    match value {
        Value::Null => 0,
        Value::Bool(b) => i64::from(*b),
        Value::Number(n) => n.as_i64().unwrap_or_else(|| n.as_f64().map(|f| f.trunc() as i64).unwrap_or(0)),
        Value::String(s) => leading_int(s),
        Value::Array(items) => i64::from(!items.is_empty()),
        Value::Object(map) => i64::from(!map.is_empty()),
    }
}

fn leading_int(s: &str) -> i64 {
    let s = s.trim_start();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let end = digits.find(|c: char| !c.is_ascii_digit()).unwrap_or(digits.len());
    let magnitude = digits[..end].parse::<i64>().unwrap_or(if end == 0 { 0 } else { i64::MAX });
    if negative { -magnitude } else { magnitude }
}

/// Coerce a submitted list; anything that isn't an array becomes empty.
pub fn int_list(value: Option<&Value>) -> Vec<i64> {
    match value {
        Some(Value::Array(items)) => items.iter().map(coerce_int).collect(),
        _ => Vec::new(),
    }
}
