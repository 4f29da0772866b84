//! Email shape validation and normalization.
//!
//! The check is deliberately loose: `^[^\s@]+@[^\s@]+\.[^\s@]+$`, where
//! `\s` is the ECMAScript whitespace set the landing page's form validation
//! uses. Anything stricter risks turning away real sign-ups.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::InvalidEmail;

/// ECMAScript `\s`: differs from Unicode `White_Space` in that it includes
/// U+FEFF and excludes U+0085.
const JS_SPACE: &str =
    r"\t\n\x0B\f\r \x{A0}\x{1680}\x{2000}-\x{200A}\x{2028}\x{2029}\x{202F}\x{205F}\x{3000}\x{FEFF}";

/// `local@domain.tld` with no whitespace or extra `@` in any part.
#[allow(clippy::expect_used)]
static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    let part = format!("[^{JS_SPACE}@]+");
    Regex::new(&format!(r"^{part}@{part}\.{part}$")).expect("email pattern is a valid regex")
});

/// Validate a submitted email value.
///
/// `None` means the field was absent or not a string. An empty string is
/// treated the same as a missing one.
///
/// # Errors
///
/// - [`InvalidEmail::Missing`] if there is no usable value.
/// - [`InvalidEmail::Format`] if the value fails [`is_well_formed`].
pub fn validate(raw: Option<&str>) -> Result<&str, InvalidEmail> {
    let email = raw.filter(|s| !s.is_empty()).ok_or(InvalidEmail::Missing)?;

    if !is_well_formed(email) {
        return Err(InvalidEmail::Format);
    }

    Ok(email)
}

/// Returns `true` if `email` looks like `local@domain.tld`.
#[must_use]
pub fn is_well_formed(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

/// Lower-case an email for storage and comparison.
#[must_use]
pub fn normalize(email: &str) -> String {
    email.to_lowercase()
}
