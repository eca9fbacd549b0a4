//! Shared URL/form parsing for route handlers.

/// Decoded `key=value` pairs from a query string or an HTMX form body.
#[derive(Debug, Clone, Default)]
pub struct Params(Vec<(String, String)>);

impl Params {
    /// Parse a URL-encoded body (`key=value&key2=value2`).
    pub fn from_body(body: &str) -> Self {
        if body.is_empty() {
            return Self::default();
        }
        Params(
            body.split('&')
                .filter(|pair| !pair.is_empty())
                .map(|pair| {
                    let (key, val) = pair.split_once('=').unwrap_or((pair, ""));
                    (percent_decode(key), percent_decode(val))
                })
                .collect(),
        )
    }

    /// Parse a query string, with or without the leading `?`.
    pub fn from_query(query: &str) -> Self {
        Self::from_body(query.strip_prefix('?').unwrap_or(query))
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn get_u8(&self, key: &str) -> Option<u8> {
        self.get(key).and_then(|v| v.trim().parse().ok())
    }

    pub fn get_u64(&self, key: &str) -> Option<u64> {
        self.get(key).and_then(|v| v.trim().parse().ok())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Percent-decode a URL-encoded value (`+` is a space). Malformed escapes
/// are kept literally; invalid UTF-8 is replaced.
pub fn percent_decode(input: &str) -> String {
    let bytes = input.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'%' => {
                match (hex_val(bytes.get(i + 1)), hex_val(bytes.get(i + 2))) {
                    (Some(hi), Some(lo)) => {
                        out.push(hi << 4 | lo);
                        i += 3;
                    }
                    _ => {
                        out.push(b'%');
                        i += 1;
                    }
                }
            }
            b'+' => {
                out.push(b' ');
                i += 1;
            }
            b => {
                out.push(b);
                i += 1;
            }
        }
    }
    String::from_utf8_lossy(&out).into_owned()
}

fn hex_val(b: Option<&u8>) -> Option<u8> {
    match *b? {
        b @ b'0'..=b'9' => Some(b - b'0'),
        b @ b'a'..=b'f' => Some(b - b'a' + 10),
        b @ b'A'..=b'F' => Some(b - b'A' + 10),
        _ => None,
    }
}

/// Escape text for HTML element content and attribute values.
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn body_pairs() {
        let p = Params::from_body("index=2&ticket=17&id=mimi");
        assert_eq!(p.get_u8("index"), Some(2));
        assert_eq!(p.get_u64("ticket"), Some(17));
        assert_eq!(p.get("id"), Some("mimi"));
        assert_eq!(p.get("missing"), None);
    }

    #[test]
    fn empty_body() {
        assert!(Params::from_body("").is_empty());
    }

    #[test]
    fn query_prefix_is_optional() {
        assert_eq!(Params::from_query("?a=1").get("a"), Some("1"));
        assert_eq!(Params::from_query("a=1").get("a"), Some("1"));
    }

    #[test]
    fn non_numeric_is_none() {
        let p = Params::from_body("index=two&big=300");
        assert_eq!(p.get_u8("index"), None);
        assert_eq!(p.get_u8("big"), None);
    }

    #[test]
    fn decodes_plus_hex_and_utf8() {
        assert_eq!(percent_decode("hello+world"), "hello world");
        assert_eq!(percent_decode("a%20b"), "a b");
        assert_eq!(percent_decode("%F0%9F%8D%8E"), "\u{1F34E}");
        assert_eq!(percent_decode("100%"), "100%");
        assert_eq!(percent_decode("%zz"), "%zz");
    }

    #[test]
    fn escapes_markup() {
        assert_eq!(escape_html(r#"<a href="x">'"#), "&lt;a href=&quot;x&quot;&gt;&#39;");
    }
}
