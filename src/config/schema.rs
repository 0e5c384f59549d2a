//! Configuration schema
//!
//! The schema is the ordered list of attributes the suite reads from its
//! configuration file, plus the sections that are exposed verbatim.
//!
//! # Example Configuration
//!
//! ```ini
//! [Study Center]
//! sc_id = 20000000
//! recruitment_type_id = 1
//! short_name = GCSC
//! username = NetID
//! sampling_units_file = every_su.csv
//! exception_email_recipients = Fred MacMurray <fred@pacificlife.net>, Barbara Stanwyck <b@aol.com>
//!
//! [Staff Portal]
//! uri = https://staffportal.greaterchicagoncs.org/
//! mail_from = staffportal@greaterchicagoncs.org
//!
//! [Core]
//! uri = https://ncsnavigator.greaterchicagoncs.org/
//!
//! [PSC]
//! uri = https://calendar.greaterchicagoncs.org/
//!
//! [SMTP]
//! host = smtp.greaterchicagoncs.org
//! port = 2025
//! starttls = true
//! ```

use super::attribute::{AttributeDefault, AttributeDescriptor, AttributeType};
use crate::domain::errors::ConfigError;
use crate::domain::result::Result;
use once_cell::sync::OnceCell;
use std::collections::HashSet;

pub const STUDY_CENTER: &str = "Study Center";
pub const STAFF_PORTAL: &str = "Staff Portal";
pub const CORE: &str = "Core";
pub const PSC: &str = "PSC";
pub const PANCAKES: &str = "Pancakes";
pub const SMTP: &str = "SMTP";

/// Attributes of the NCS Navigator configuration, in resolution order
pub static NAVIGATOR_ATTRIBUTES: &[AttributeDescriptor] = &[
    // The SC_ID for the study center; must match an ID in the MDES
    AttributeDescriptor::new("study_center_id", STUDY_CENTER, "sc_id", AttributeType::String),
    AttributeDescriptor::new(
        "recruitment_type_id",
        STUDY_CENTER,
        "recruitment_type_id",
        AttributeType::String,
    ),
    AttributeDescriptor::new(
        "study_center_short_name",
        STUDY_CENTER,
        "short_name",
        AttributeType::String,
    )
    .with_default(AttributeDefault::Text("SC")),
    // Name of the institutional identity, e.g. "Northwestern NetID"
    AttributeDescriptor::new(
        "study_center_username",
        STUDY_CENTER,
        "username",
        AttributeType::String,
    )
    .with_default(AttributeDefault::Text("Username")),
    AttributeDescriptor::new(
        "sampling_units_file",
        STUDY_CENTER,
        "sampling_units_file",
        AttributeType::Path,
    ),
    AttributeDescriptor::new(
        "exception_email_recipients",
        STUDY_CENTER,
        "exception_email_recipients",
        AttributeType::StringList,
    )
    .with_default(AttributeDefault::List(&[])),
    AttributeDescriptor::new(
        "footer_logo_left",
        STUDY_CENTER,
        "footer_logo_left",
        AttributeType::Path,
    ),
    AttributeDescriptor::new(
        "footer_logo_right",
        STUDY_CENTER,
        "footer_logo_right",
        AttributeType::Path,
    ),
    AttributeDescriptor::new("footer_text", STUDY_CENTER, "footer_text", AttributeType::String),
    AttributeDescriptor::new(
        "staff_portal_uri",
        STAFF_PORTAL,
        "uri",
        AttributeType::Uri,
    )
    .required(),
    AttributeDescriptor::new(
        "staff_portal_mail_from",
        STAFF_PORTAL,
        "mail_from",
        AttributeType::String,
    )
    .with_default(AttributeDefault::Text("ops@navigator.example.edu")),
    AttributeDescriptor::new("core_uri", CORE, "uri", AttributeType::Uri),
    AttributeDescriptor::new(
        "core_machine_account_username",
        CORE,
        "machine_account_username",
        AttributeType::String,
    ),
    AttributeDescriptor::new(
        "core_machine_account_password",
        CORE,
        "machine_account_password",
        AttributeType::String,
    )
    .secret(),
    AttributeDescriptor::new(
        "core_conflict_email_recipients",
        CORE,
        "conflict_email_recipients",
        AttributeType::StringList,
    )
    .with_default(AttributeDefault::List(&[])),
    AttributeDescriptor::new("core_mail_from", CORE, "mail_from", AttributeType::String)
        .with_default(AttributeDefault::Text("cases@navigator.example.edu")),
    AttributeDescriptor::new("psc_uri", PSC, "uri", AttributeType::Uri).required(),
    AttributeDescriptor::new(
        "pancakes_mdes_version",
        PANCAKES,
        "mdes_version",
        AttributeType::String,
    ),
    AttributeDescriptor::new("smtp_host", SMTP, "host", AttributeType::String)
        .with_default(AttributeDefault::Text("localhost")),
    AttributeDescriptor::new("smtp_port", SMTP, "port", AttributeType::Integer)
        .with_default(AttributeDefault::Integer(25)),
    AttributeDescriptor::new("smtp_helo_domain", SMTP, "domain", AttributeType::String),
    AttributeDescriptor::new(
        "smtp_authentication_method",
        SMTP,
        "authentication",
        AttributeType::Symbol,
    ),
    AttributeDescriptor::new("smtp_username", SMTP, "username", AttributeType::String),
    AttributeDescriptor::new("smtp_password", SMTP, "password", AttributeType::String).secret(),
    AttributeDescriptor::new("smtp_starttls", SMTP, "starttls", AttributeType::Boolean)
        .with_default(AttributeDefault::Boolean(false)),
];

/// Sections exposed as raw key/value maps
pub static PASS_THROUGH_SECTIONS: &[&str] = &[STAFF_PORTAL, CORE, PSC];

/// A validated set of attribute descriptors
#[derive(Debug, Clone, Copy)]
pub struct Schema {
    attributes: &'static [AttributeDescriptor],
    pass_through: &'static [&'static str],
}

impl Schema {
    /// Validates the descriptors and builds a schema
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Schema`] if two attributes share a name, or if
    /// any single descriptor is inconsistent.
    pub fn new(
        attributes: &'static [AttributeDescriptor],
        pass_through: &'static [&'static str],
    ) -> Result<Self> {
        let mut names = HashSet::new();
        for attribute in attributes {
            if !names.insert(attribute.name) {
                return Err(ConfigError::Schema(format!(
                    "attribute {} is declared more than once",
                    attribute.name
                )));
            }
            attribute.validate()?;
        }

        Ok(Self {
            attributes,
            pass_through,
        })
    }

    /// The descriptors, in resolution order
    pub fn attributes(&self) -> &'static [AttributeDescriptor] {
        self.attributes
    }

    /// Looks up a descriptor by attribute name
    pub fn descriptor(&self, name: &str) -> Option<&'static AttributeDescriptor> {
        self.attributes.iter().find(|attribute| attribute.name == name)
    }

    /// Names of the pass-through sections
    pub fn pass_through_sections(&self) -> &'static [&'static str] {
        self.pass_through
    }
}

static NAVIGATOR_SCHEMA: OnceCell<Schema> = OnceCell::new();

/// The suite's schema, validated on first use
pub fn navigator_schema() -> Result<&'static Schema> {
    NAVIGATOR_SCHEMA.get_or_try_init(|| Schema::new(NAVIGATOR_ATTRIBUTES, PASS_THROUGH_SECTIONS))
}
