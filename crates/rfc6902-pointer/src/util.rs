/// Tokens that are never used to navigate into a value.
pub const RESERVED_TOKENS: [&str; 3] = ["__proto__", "constructor", "prototype"];

/// Token that addresses the slot after the last array element.
pub const APPEND_TOKEN: &str = "-";

/// Unescapes a JSON Pointer reference token.
///
/// `~1` becomes `/` before `~0` becomes `~`, so `~01` decodes to `~1`.
///
/// # Example
///
/// ```
/// use rfc6902_pointer::unescape_token;
///
/// assert_eq!(unescape_token("a~0b"), "a~b");
/// assert_eq!(unescape_token("c~1d"), "c/d");
/// assert_eq!(unescape_token("~01"), "~1");
/// ```
pub fn unescape_token(token: &str) -> String {
    if !token.contains('~') {
        return token.to_string();
    }
    token.replace("~1", "/").replace("~0", "~")
}

/// Escapes a JSON Pointer reference token.
///
/// `~` becomes `~0` before `/` becomes `~1`.
///
/// # Example
///
/// ```
/// use rfc6902_pointer::escape_token;
///
/// assert_eq!(escape_token("a/b~c"), "a~1b~0c");
/// assert_eq!(escape_token("plain"), "plain");
/// ```
pub fn escape_token(token: &str) -> String {
    if !token.contains('/') && !token.contains('~') {
        return token.to_string();
    }
    token.replace('~', "~0").replace('/', "~1")
}

/// Check if a token is a canonical non-negative array index.
///
/// Leading zeros are rejected, `"0"` itself is accepted.
///
/// # Example
///
/// ```
/// use rfc6902_pointer::is_valid_index;
///
/// assert!(is_valid_index("0"));
/// assert!(is_valid_index("42"));
/// assert!(!is_valid_index("01"));
/// assert!(!is_valid_index("-"));
/// assert!(!is_valid_index("1.5"));
/// ```
pub fn is_valid_index(token: &str) -> bool {
    if token.is_empty() {
        return false;
    }
    let bytes = token.as_bytes();
    if bytes.len() > 1 && bytes[0] == b'0' {
        return false;
    }
    bytes.iter().all(|&b| b.is_ascii_digit())
}

/// Parse a token as an array index, `None` when it is not canonical.
pub fn parse_index(token: &str) -> Option<usize> {
    if !is_valid_index(token) {
        return None;
    }
    token.parse().ok()
}

/// Check if a token must be skipped during traversal.
pub fn is_reserved(token: &str) -> bool {
    RESERVED_TOKENS.contains(&token)
}
