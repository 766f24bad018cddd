//! Set-Cookie directives for the session transport.
//!
//! Both session cookies are HttpOnly and scoped to the whole site, and their
//! Max-Age mirrors the token lifetime so browser and token expire together.

use cookie::Cookie;

/// A rendered Set-Cookie directive, ready for whatever carries HTTP headers.
///
/// Produced here so every issuance and termination path stamps the same
/// attributes; the transport layer only copies `header_value` out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetCookie {
    name: String,
    header_value: String,
}

impl SetCookie {
    /// Directive carrying a freshly minted token.
    pub(crate) fn session(name: &str, token: String, max_age_secs: i64, secure: bool) -> Self {
        let cookie = Cookie::build((name.to_string(), token))
            .http_only(true)
            .secure(secure)
            .path("/")
            .max_age(cookie::time::Duration::seconds(max_age_secs))
            .build();
        Self {
            name: name.to_string(),
            header_value: cookie.to_string(),
        }
    }

    /// Directive that clears `name` immediately (empty value, Max-Age=0).
    pub(crate) fn clearing(name: &str, secure: bool) -> Self {
        Self::session(name, String::new(), 0, secure)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The full value for a `Set-Cookie` header.
    pub fn header_value(&self) -> &str {
        &self.header_value
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
