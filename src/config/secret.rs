//! Credential values
//!
//! Attributes declared secret (machine account and SMTP passwords) resolve to
//! a [`SecretString`] instead of plain text. The value is zeroed when dropped,
//! never shows up in `Debug` output, and is only readable through
//! [`ExposeSecret::expose_secret`](secrecy::ExposeSecret::expose_secret).
//!
//! ```rust
//! use navigator_config::config::secret_string;
//! use secrecy::ExposeSecret;
//!
//! let password = secret_string("tiger".to_string());
//! assert_eq!(password.expose_secret().as_ref(), "tiger");
//! assert!(!format!("{password:?}").contains("tiger"));
//! ```

use secrecy::{CloneableSecret, DebugSecret, Secret};
use std::fmt;
use zeroize::Zeroize;

/// Text wrapped by [`SecretString`]
#[derive(Clone, Zeroize)]
#[zeroize(drop)]
pub struct SecretValue(String);

impl CloneableSecret for SecretValue {}
impl DebugSecret for SecretValue {}

impl fmt::Debug for SecretValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[REDACTED]")
    }
}

impl From<String> for SecretValue {
    fn from(s: String) -> Self {
        SecretValue(s)
    }
}

impl AsRef<str> for SecretValue {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for SecretValue {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for SecretValue {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// Zeroing, redacted string
pub type SecretString = Secret<SecretValue>;

/// Wraps `value` in a [`SecretString`]
#[inline]
pub fn secret_string(value: String) -> SecretString {
    Secret::new(SecretValue::from(value))
}
