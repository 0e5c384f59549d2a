//! The resolved configuration
//!
//! A [`Configuration`] is built once from an INI file or an in-memory
//! [`RawSource`]. Construction resolves every attribute of the schema up front
//! and fails as a whole if any of them is missing or malformed; afterwards the
//! value is read-only, apart from the sampling unit hierarchy, which is loaded
//! on first access and then kept.

use super::attribute::{AttributeValue, Symbol};
use super::schema::{navigator_schema, CORE, PSC, STAFF_PORTAL};
use super::secret::SecretString;
use super::smtp::SmtpSettings;
use super::source::{absolutize, ConfigSource, RawSource, Section};
use crate::domain::result::Result;
use crate::sampling::{
    read_sampling_units, PrimarySamplingUnit, SamplingUnitArea, SamplingUnits,
    SecondarySamplingUnit,
};
use once_cell::sync::OnceCell;
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use url::Url;

static EMPTY_SECTION: Section = Section::new();

/// Typed configuration for one deployment of the suite
pub struct Configuration {
    source_path: Option<PathBuf>,
    attributes: BTreeMap<&'static str, AttributeValue>,
    sections: BTreeMap<&'static str, Section>,
    sampling_units: OnceCell<SamplingUnits>,
}

impl Configuration {
    /// Builds a configuration from a file path or a raw mapping
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use navigator_config::config::Configuration;
    ///
    /// let config = Configuration::new("/etc/nubic/ncs/navigator.ini")
    ///     .expect("Failed to load config");
    /// println!("Study center: {:?}", config.study_center_id());
    /// ```
    pub fn new(source: impl Into<ConfigSource>) -> Result<Self> {
        match source.into() {
            ConfigSource::File(path) => Self::from_file(path),
            ConfigSource::Raw(raw) => Self::from_source(raw),
        }
    }

    /// Reads an INI file and resolves it
    ///
    /// Relative path attributes are resolved against the file's directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or decoded, or if any
    /// attribute is missing or cannot be converted.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        tracing::debug!(path = %path.display(), "Loading configuration file");

        let raw = RawSource::read_ini(path)?;
        let absolute = absolutize(path)?;
        Self::resolve(&raw, Some(absolute))
    }

    /// Resolves an in-memory mapping
    ///
    /// Relative path attributes are kept exactly as given.
    pub fn from_source(raw: RawSource) -> Result<Self> {
        Self::resolve(&raw, None)
    }

    fn resolve(raw: &RawSource, source_path: Option<PathBuf>) -> Result<Self> {
        let schema = navigator_schema()?;
        let base_dir = source_path.as_deref().and_then(Path::parent);

        let mut attributes = BTreeMap::new();
        for descriptor in schema.attributes() {
            if let Some(value) = descriptor.resolve(raw, base_dir)? {
                attributes.insert(descriptor.name, value);
            }
        }

        let sections = schema
            .pass_through_sections()
            .iter()
            .map(|&name| (name, raw.section(name).cloned().unwrap_or_default()))
            .collect();

        tracing::debug!(
            source = ?source_path,
            attributes = attributes.len(),
            "Configuration resolved"
        );

        Ok(Self {
            source_path,
            attributes,
            sections,
            sampling_units: OnceCell::new(),
        })
    }

    /// Absolute path of the file this configuration was read from
    pub fn source_path(&self) -> Option<&Path> {
        self.source_path.as_deref()
    }

    /// A resolved attribute by name
    pub fn attribute(&self, name: &str) -> Option<&AttributeValue> {
        self.attributes.get(name)
    }

    fn string(&self, name: &str) -> Option<&str> {
        self.attribute(name).and_then(AttributeValue::as_str)
    }

    fn secret(&self, name: &str) -> Option<&SecretString> {
        self.attribute(name).and_then(AttributeValue::as_secret)
    }

    fn path(&self, name: &str) -> Option<&Path> {
        self.attribute(name).and_then(AttributeValue::as_path)
    }

    fn uri(&self, name: &str) -> Option<&Url> {
        self.attribute(name).and_then(AttributeValue::as_uri)
    }

    fn list(&self, name: &str) -> &[String] {
        self.attribute(name)
            .and_then(AttributeValue::as_list)
            .unwrap_or_default()
    }

    // Study Center

    /// The SC_ID of the study center; it must match an ID in the MDES
    pub fn study_center_id(&self) -> Option<&str> {
        self.string("study_center_id")
    }

    pub fn recruitment_type_id(&self) -> Option<&str> {
        self.string("recruitment_type_id")
    }

    /// Short name of the study center, `SC` unless configured
    pub fn study_center_short_name(&self) -> &str {
        self.string("study_center_short_name").unwrap_or_default()
    }

    /// Name of the institutional identity, e.g. "Northwestern NetID"
    pub fn study_center_username(&self) -> &str {
        self.string("study_center_username").unwrap_or_default()
    }

    pub fn sampling_units_file(&self) -> Option<&Path> {
        self.path("sampling_units_file")
    }

    pub fn exception_email_recipients(&self) -> &[String] {
        self.list("exception_email_recipients")
    }

    pub fn footer_logo_left(&self) -> Option<&Path> {
        self.path("footer_logo_left")
    }

    pub fn footer_logo_right(&self) -> Option<&Path> {
        self.path("footer_logo_right")
    }

    pub fn footer_text(&self) -> Option<&str> {
        self.string("footer_text")
    }

    /// The footer text as HTML, with a `<br>` at the end of every line but
    /// the last
    pub fn footer_center_html(&self) -> Option<String> {
        self.footer_text().map(|text| text.replace('\n', "<br>\n"))
    }

    // Staff Portal

    /// Always present on a successfully built configuration
    pub fn staff_portal_uri(&self) -> Option<&Url> {
        self.uri("staff_portal_uri")
    }

    pub fn staff_portal_mail_from(&self) -> &str {
        self.string("staff_portal_mail_from").unwrap_or_default()
    }

    /// All raw values of the `[Staff Portal]` section
    pub fn staff_portal(&self) -> &Section {
        self.section(STAFF_PORTAL).unwrap_or(&EMPTY_SECTION)
    }

    // Core

    pub fn core_uri(&self) -> Option<&Url> {
        self.uri("core_uri")
    }

    pub fn core_machine_account_username(&self) -> Option<&str> {
        self.string("core_machine_account_username")
    }

    pub fn core_machine_account_password(&self) -> Option<&SecretString> {
        self.secret("core_machine_account_password")
    }

    pub fn core_conflict_email_recipients(&self) -> &[String] {
        self.list("core_conflict_email_recipients")
    }

    pub fn core_mail_from(&self) -> &str {
        self.string("core_mail_from").unwrap_or_default()
    }

    /// All raw values of the `[Core]` section
    pub fn core(&self) -> &Section {
        self.section(CORE).unwrap_or(&EMPTY_SECTION)
    }

    // PSC

    /// Always present on a successfully built configuration
    pub fn psc_uri(&self) -> Option<&Url> {
        self.uri("psc_uri")
    }

    /// All raw values of the `[PSC]` section
    pub fn psc(&self) -> &Section {
        self.section(PSC).unwrap_or(&EMPTY_SECTION)
    }

    // Pancakes

    pub fn pancakes_mdes_version(&self) -> Option<&str> {
        self.string("pancakes_mdes_version")
    }

    // SMTP

    pub fn smtp_host(&self) -> &str {
        self.string("smtp_host").unwrap_or_default()
    }

    pub fn smtp_port(&self) -> i64 {
        self.attribute("smtp_port")
            .and_then(AttributeValue::as_integer)
            .unwrap_or_default()
    }

    pub fn smtp_helo_domain(&self) -> Option<&str> {
        self.string("smtp_helo_domain")
    }

    pub fn smtp_authentication_method(&self) -> Option<Symbol> {
        self.attribute("smtp_authentication_method")
            .and_then(AttributeValue::as_symbol)
    }

    pub fn smtp_username(&self) -> Option<&str> {
        self.string("smtp_username")
    }

    pub fn smtp_password(&self) -> Option<&SecretString> {
        self.secret("smtp_password")
    }

    pub fn smtp_starttls(&self) -> bool {
        self.attribute("smtp_starttls")
            .and_then(AttributeValue::as_bool)
            .unwrap_or(false)
    }

    /// The SMTP settings as a mailer option bundle
    pub fn smtp_settings(&self) -> SmtpSettings {
        SmtpSettings {
            address: self.smtp_host().to_string(),
            port: self.smtp_port(),
            domain: self.smtp_helo_domain().map(str::to_string),
            authentication: self
                .smtp_authentication_method()
                .map(|method| method.as_str().to_string()),
            user_name: self.smtp_username().map(str::to_string),
            password: self.smtp_password().cloned(),
            enable_starttls_auto: self.smtp_starttls().then_some(true),
        }
    }

    /// Raw values of a pass-through section
    ///
    /// Returns `None` for sections outside the pass-through list; listed
    /// sections missing from the source are empty.
    pub fn section(&self, name: &str) -> Option<&Section> {
        self.sections.get(name)
    }

    // Sampling units

    /// The sampling unit hierarchy, loaded on first access
    ///
    /// Without a configured sampling units file the hierarchy is empty and
    /// nothing is read. A failed load is not remembered; the next call tries
    /// again.
    ///
    /// # Errors
    ///
    /// Returns an error if the sampling units file cannot be read or decoded.
    pub fn sampling_units(&self) -> Result<&SamplingUnits> {
        self.sampling_units
            .get_or_try_init(|| match self.sampling_units_file() {
                Some(path) => read_sampling_units(path),
                None => Ok(SamplingUnits::new()),
            })
    }

    /// All PSUs, in the order they first appear in the file
    pub fn primary_sampling_units(&self) -> Result<Vec<PrimarySamplingUnit<'_>>> {
        Ok(self.sampling_units()?.primary_sampling_units().collect())
    }

    /// All areas, PSU by PSU
    pub fn sampling_unit_areas(&self) -> Result<Vec<SamplingUnitArea<'_>>> {
        Ok(self.sampling_units()?.sampling_unit_areas().collect())
    }

    /// All SSUs, area by area
    pub fn secondary_sampling_units(&self) -> Result<Vec<SecondarySamplingUnit<'_>>> {
        Ok(self.sampling_units()?.secondary_sampling_units().collect())
    }
}

impl fmt::Debug for Configuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Configuration")
            .field("source_path", &self.source_path)
            .field("attributes", &self.attributes)
            .field("sections", &self.sections.keys().collect::<Vec<_>>())
            .field("sampling_units_loaded", &self.sampling_units.get().is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::errors::{ConfigError, ErrorKind};
    use secrecy::ExposeSecret;

    fn minimum_valid() -> RawSource {
        RawSource::new()
            .with("Staff Portal", "uri", "https://sp.example.edu/")
            .with("PSC", "uri", "https://psc.example.edu/")
    }

    fn input() -> RawSource {
        minimum_valid()
            .with("Study Center", "sc_id", "23000000")
            .with("Study Center", "recruitment_type_id", "3")
            .with("Study Center", "sampling_units_file", "foo.csv")
    }

    #[test]
    fn test_minimum_valid_source() {
        let config = Configuration::from_source(minimum_valid()).unwrap();
        assert_eq!(config.study_center_id(), None);
        assert_eq!(config.recruitment_type_id(), None);
        assert_eq!(config.sampling_units_file(), None);
        assert_eq!(config.pancakes_mdes_version(), None);
        assert!(config.source_path().is_none());
    }

    #[test]
    fn test_reflects_configured_values() {
        let config = Configuration::from_source(input()).unwrap();
        assert_eq!(config.study_center_id(), Some("23000000"));
        assert_eq!(config.recruitment_type_id(), Some("3"));
    }

    #[test]
    fn test_non_string_values_become_strings() {
        let config =
            Configuration::from_source(input().with("Study Center", "sc_id", 234)).unwrap();
        assert_eq!(config.study_center_id(), Some("234"));
    }

    #[test]
    fn test_defaults() {
        let config = Configuration::from_source(input()).unwrap();
        assert_eq!(config.study_center_short_name(), "SC");
        assert_eq!(config.study_center_username(), "Username");
        assert_eq!(config.staff_portal_mail_from(), "ops@navigator.example.edu");
        assert_eq!(config.core_mail_from(), "cases@navigator.example.edu");
        assert!(config.exception_email_recipients().is_empty());
        assert!(config.core_conflict_email_recipients().is_empty());
        assert_eq!(config.smtp_host(), "localhost");
        assert_eq!(config.smtp_port(), 25);
        assert_eq!(config.smtp_helo_domain(), None);
        assert_eq!(config.smtp_authentication_method(), None);
        assert_eq!(config.smtp_username(), None);
        assert!(config.smtp_password().is_none());
        assert!(!config.smtp_starttls());
        assert_eq!(config.core_uri(), None);
    }

    #[test]
    fn test_missing_required_uri() {
        let raw = RawSource::new().with("Staff Portal", "uri", "https://sp.example.edu/");
        let err = Configuration::from_source(raw).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingRequiredAttribute);
        assert_eq!(err.to_string(), "Please set a value for [PSC]: uri");
    }

    #[test]
    fn test_malformed_uri_fails_construction() {
        let raw = input().with("Core", "uri", "not a uri");
        let err = Configuration::from_source(raw).unwrap_err();
        assert!(matches!(err, ConfigError::Coercion { .. }));
    }

    #[test]
    fn test_relative_path_kept_when_from_mapping() {
        let config = Configuration::from_source(input()).unwrap();
        assert_eq!(config.sampling_units_file(), Some(Path::new("foo.csv")));
    }

    #[test]
    fn test_uri_exposes_host() {
        let config = Configuration::from_source(input()).unwrap();
        assert_eq!(
            config.staff_portal_uri().and_then(Url::host_str),
            Some("sp.example.edu")
        );
        assert_eq!(config.psc_uri().map(Url::as_str), Some("https://psc.example.edu/"));
    }

    #[test]
    fn test_pass_through_sections() {
        let raw = input()
            .with("Staff Portal", "mail_from", "staffportal@example.edu")
            .with("Staff Portal", "extra", "kept");
        let config = Configuration::from_source(raw).unwrap();
        assert_eq!(config.staff_portal().get("extra").map(String::as_str), Some("kept"));
        assert_eq!(
            config.psc().get("uri").map(String::as_str),
            Some("https://psc.example.edu/")
        );
        assert!(config.core().is_empty());
        assert!(config.section("SMTP").is_none());
    }

    #[test]
    fn test_footer_center_html() {
        let raw = input().with("Study Center", "footer_text", "Line one\nLine two\nLine three");
        let config = Configuration::from_source(raw).unwrap();
        assert_eq!(
            config.footer_center_html().as_deref(),
            Some("Line one<br>\nLine two<br>\nLine three")
        );
    }

    #[test]
    fn test_footer_center_html_absent() {
        let config = Configuration::from_source(input()).unwrap();
        assert_eq!(config.footer_center_html(), None);
    }

    #[test]
    fn test_smtp_settings_with_defaults() {
        let settings = Configuration::from_source(input()).unwrap().smtp_settings();
        assert_eq!(settings.address, "localhost");
        assert_eq!(settings.port, 25);
        assert_eq!(settings.domain, None);
        assert_eq!(settings.authentication, None);
        assert_eq!(settings.user_name, None);
        assert!(settings.password.is_none());
        assert_eq!(settings.enable_starttls_auto, None);
    }

    #[test]
    fn test_smtp_settings_configured() {
        let raw = input()
            .with("SMTP", "host", "smtp.greaterchicagoncs.org")
            .with("SMTP", "port", "2025")
            .with("SMTP", "domain", "greaterchicagoncs.org")
            .with("SMTP", "authentication", "plain")
            .with("SMTP", "username", "mailman")
            .with("SMTP", "password", "tiger")
            .with("SMTP", "starttls", "true");
        let config = Configuration::from_source(raw).unwrap();
        assert_eq!(config.smtp_authentication_method().map(|m| m.as_str()), Some("plain"));

        let settings = config.smtp_settings();
        assert_eq!(settings.address, "smtp.greaterchicagoncs.org");
        assert_eq!(settings.port, 2025);
        assert_eq!(settings.domain.as_deref(), Some("greaterchicagoncs.org"));
        assert_eq!(settings.authentication.as_deref(), Some("plain"));
        assert_eq!(settings.user_name.as_deref(), Some("mailman"));
        assert_eq!(
            settings.password.as_ref().map(|p| p.expose_secret().as_ref()),
            Some("tiger")
        );
        assert_eq!(settings.enable_starttls_auto, Some(true));
    }

    #[test]
    fn test_no_sampling_units_file_yields_empty_hierarchy() {
        let config = Configuration::from_source(minimum_valid()).unwrap();
        assert!(config.primary_sampling_units().unwrap().is_empty());
        assert!(config.sampling_unit_areas().unwrap().is_empty());
        assert!(config.secondary_sampling_units().unwrap().is_empty());
    }

    #[test]
    fn test_unreadable_sampling_units_file() {
        let raw = input().with("Study Center", "sampling_units_file", "/nonexistent/units.csv");
        let config = Configuration::from_source(raw).unwrap();
        let err = config.primary_sampling_units().unwrap_err();
        assert!(matches!(err, ConfigError::SamplingUnitsUnreadable { .. }));
        assert!(err.to_string().contains("/nonexistent/units.csv"));
    }

    #[test]
    fn test_passwords_are_secret() {
        let raw = input()
            .with("Core", "machine_account_password", "foobar")
            .with("SMTP", "password", "tiger");
        let config = Configuration::from_source(raw).unwrap();
        assert_eq!(
            config.core_machine_account_password().unwrap().expose_secret(),
            "foobar"
        );
        assert_eq!(config.smtp_password().unwrap().expose_secret(), "tiger");
        assert!(config.attribute("smtp_password").unwrap().as_str().is_none());
    }

    #[test]
    fn test_debug_redacts_passwords() {
        let raw = input()
            .with("Core", "machine_account_password", "foobar")
            .with("SMTP", "password", "tiger");
        let config = Configuration::from_source(raw).unwrap();
        let rendered = format!("{config:?}");
        assert!(rendered.contains("REDACTED"));
        assert!(!rendered.contains("foobar"));
        assert!(!rendered.contains("tiger"));
        assert!(rendered.contains("23000000"));
    }
}
