//! Input validation for targets and short codes
//!
//! Pure functions only: malformed input yields `false`, never a panic.

use url::Url;

pub const MIN_CODE_LEN: usize = 6;
pub const MAX_CODE_LEN: usize = 8;

/// Paths that belong to the application itself and can never be short codes
pub const RESERVED_CODES: &[&str] = &["api", "healthz", "code"];

/// True iff `code` matches `^[A-Za-z0-9]{6,8}$`
pub fn is_valid_code(code: &str) -> bool {
    (MIN_CODE_LEN..=MAX_CODE_LEN).contains(&code.len())
        && code.bytes().all(|b| b.is_ascii_alphanumeric())
}

/// True iff `target` is an absolute URL with an `http` or `https` scheme
///
/// Control characters are refused outright: the target ends up verbatim in
/// a `Location` header, and the URL parser would silently strip them.
pub fn is_valid_url(target: &str) -> bool {
    if target.chars().any(char::is_control) {
        return false;
    }

    match Url::parse(target) {
        Ok(parsed) => matches!(parsed.scheme(), "http" | "https") && parsed.host().is_some(),
        Err(_) => false,
    }
}

/// True for the empty path and for application routes, ignoring case
pub fn is_reserved(code: &str) -> bool {
    code.is_empty()
        || RESERVED_CODES
            .iter()
            .any(|reserved| reserved.eq_ignore_ascii_case(code))
}
