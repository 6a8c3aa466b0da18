//! Utility functions shared by the adapters.

use rand::Rng;
use rand::distributions::Alphanumeric;
use serde_json::Value;

/// Generate a random alphanumeric string of `length` characters.
///
/// Uses the thread-local CSPRNG.
#[must_use]
pub fn random_string(length: usize) -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(length)
        .map(char::from)
        .collect()
}

/// Escape a value for embedding in a single- or double-quoted JS string.
///
/// Quotes, backslashes, HTML-significant characters, control characters
/// and the JS line separators are emitted as `\uXXXX` escapes. `%` is
/// escaped too, since `javascript:` URLs are percent-decoded before they run.
///
/// # Examples
///
/// ```
/// use socialaccount::utils::escape_js;
///
/// assert_eq!(escape_js("/next"), "/next");
/// assert_eq!(escape_js("it's"), "it\\u0027s");
/// assert_eq!(escape_js("</script>"), "\\u003C/script\\u003E");
/// assert_eq!(escape_js("%27"), "\\u002527");
/// ```
#[must_use]
pub fn escape_js(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        let needs_escape = matches!(
            c,
            '\\' | '\'' | '"' | '>' | '<' | '&' | '=' | '-' | ';' | '`' | '%' | '\u{2028}'
                | '\u{2029}'
        ) || (c as u32) < 0x20;

        if needs_escape {
            escaped.push_str(&format!("\\u{:04X}", c as u32));
        } else {
            escaped.push(c);
        }
    }
    escaped
}

/// Read a string field, treating empty strings as absent.
#[must_use]
pub fn json_str(data: &Value, key: &str) -> Option<String> {
    match data.get(key)? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        _ => None,
    }
}

/// Read an identifier field that may be encoded as a string or a number.
#[must_use]
pub fn json_id(data: &Value, key: &str) -> Option<String> {
    match data.get(key)? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
