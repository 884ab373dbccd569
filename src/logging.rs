//! Secret redaction for logs and displayed configuration
//!
//! Session tokens are forwarded to the pricing backend on behalf of callers
//! and must never appear in log output in full.

use std::fmt;

/// Redacted view of a bearer token or API secret
///
/// Shows the first 8 characters followed by `***`. Secrets that short are
/// hidden entirely.
#[derive(Clone, Debug)]
pub struct SensitiveToken<'a> {
    inner: &'a str,
}

impl<'a> SensitiveToken<'a> {
    /// # Example
    /// ```
    /// use drivedrop_pricing::logging::SensitiveToken;
    ///
    /// let token = "eyJhbGciOiJIUzI1NiJ9.payload.signature";
    /// assert_eq!(SensitiveToken::new(token).to_string(), "eyJhbGci***");
    /// ```
    pub fn new(token: &'a str) -> Self {
        Self { inner: token }
    }
}

impl fmt::Display for SensitiveToken<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let visible_len = 8;
        match self.inner.get(..visible_len) {
            Some(prefix) if self.inner.len() > visible_len => write!(f, "{}***", prefix),
            _ => write!(f, "***"),
        }
    }
}

/// Owned redacted form, for places that need a `String`
pub fn mask_secret(secret: &str) -> String {
    SensitiveToken::new(secret).to_string()
}
