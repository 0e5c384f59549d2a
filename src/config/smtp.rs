//! SMTP settings bundle
//!
//! Mailer libraries usually want SMTP settings as one flat option map. The
//! serialized form of [`SmtpSettings`] is that map: unset options are left
//! out entirely rather than written as nulls. The password is only exposed
//! when the bundle is serialized.

use super::secret::SecretString;
use secrecy::ExposeSecret;
use serde::{Serialize, Serializer};

/// SMTP delivery settings derived from the `[SMTP]` section
#[derive(Debug, Clone, Serialize)]
pub struct SmtpSettings {
    pub address: String,
    pub port: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub authentication: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_name: Option<String>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        serialize_with = "expose_password"
    )]
    pub password: Option<SecretString>,
    /// Present only when STARTTLS is turned on
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enable_starttls_auto: Option<bool>,
}

fn expose_password<S>(password: &Option<SecretString>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match password {
        Some(password) => serializer.serialize_str(password.expose_secret().as_ref()),
        None => serializer.serialize_none(),
    }
}
