//! Attribute descriptors and value coercion
//!
//! An [`AttributeDescriptor`] declares where a configuration property lives
//! (section and key), what type it has, and whether it is required or has a
//! default. [`AttributeDescriptor::resolve`] turns the raw string found in a
//! [`RawSource`] into a typed [`AttributeValue`].
//!
//! Descriptors are plain `const` data so a whole schema can be written as a
//! static slice:
//!
//! ```rust
//! use navigator_config::config::attribute::{AttributeDefault, AttributeDescriptor, AttributeType};
//!
//! static ATTRIBUTES: &[AttributeDescriptor] = &[
//!     AttributeDescriptor::new("smtp_port", "SMTP", "port", AttributeType::Integer)
//!         .with_default(AttributeDefault::Integer(25)),
//!     AttributeDescriptor::new("psc_uri", "PSC", "uri", AttributeType::Uri).required(),
//! ];
//! # assert_eq!(ATTRIBUTES.len(), 2);
//! ```

use super::secret::{secret_string, SecretString};
use super::source::RawSource;
use crate::domain::errors::ConfigError;
use crate::domain::result::Result;
use once_cell::sync::Lazy;
use std::collections::HashSet;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};
use url::Url;

/// Target type of an attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttributeType {
    /// Text, taken as-is
    String,
    /// File system path, resolved against the configuration file's directory
    Path,
    /// Absolute URI
    Uri,
    /// Token from a small closed vocabulary
    Symbol,
    /// Base-10 signed integer
    Integer,
    /// `true` (any case) or anything else for false
    Boolean,
    /// Comma-separated list of text items
    StringList,
}

impl fmt::Display for AttributeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AttributeType::String => "string",
            AttributeType::Path => "path",
            AttributeType::Uri => "URI",
            AttributeType::Symbol => "symbol",
            AttributeType::Integer => "integer",
            AttributeType::Boolean => "boolean",
            AttributeType::StringList => "string list",
        };
        f.write_str(name)
    }
}

/// Interned token
///
/// Symbols are interned process-wide, so two symbols with the same text share
/// one allocation and comparing them is cheap. Only symbol attributes of a
/// resolved configuration are interned, and each distinct text is kept for
/// the life of the process.
///
/// Symbols come from resolving a configuration; they cannot be interned from
/// outside the crate:
///
/// ```compile_fail
/// use navigator_config::config::Symbol;
///
/// let _ = Symbol::intern("plain");
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Symbol(&'static str);

static SYMBOLS: Lazy<Mutex<HashSet<&'static str>>> = Lazy::new(|| Mutex::new(HashSet::new()));

impl Symbol {
    /// Returns the symbol for `text`, interning it on first use
    pub(crate) fn intern(text: &str) -> Self {
        let mut symbols = SYMBOLS.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(&existing) = symbols.get(text) {
            return Symbol(existing);
        }
        let interned: &'static str = Box::leak(text.to_owned().into_boxed_str());
        symbols.insert(interned);
        Symbol(interned)
    }

    /// Returns the symbol's text
    pub fn as_str(&self) -> &'static str {
        self.0
    }
}

impl fmt::Debug for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, ":{}", self.0)
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

impl PartialEq<str> for Symbol {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for Symbol {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

impl AsRef<str> for Symbol {
    fn as_ref(&self) -> &str {
        self.0
    }
}

/// A resolved, typed attribute value
#[derive(Debug, Clone)]
pub enum AttributeValue {
    /// Text value
    String(String),
    /// Text value of a secret attribute
    Secret(SecretString),
    /// Path value
    Path(PathBuf),
    /// URI value
    Uri(Url),
    /// Token value
    Symbol(Symbol),
    /// Integer value
    Integer(i64),
    /// Boolean value
    Boolean(bool),
    /// List value
    StringList(Vec<String>),
}

impl AttributeValue {
    /// The type this value belongs to
    pub fn attribute_type(&self) -> AttributeType {
        match self {
            AttributeValue::String(_) | AttributeValue::Secret(_) => AttributeType::String,
            AttributeValue::Path(_) => AttributeType::Path,
            AttributeValue::Uri(_) => AttributeType::Uri,
            AttributeValue::Symbol(_) => AttributeType::Symbol,
            AttributeValue::Integer(_) => AttributeType::Integer,
            AttributeValue::Boolean(_) => AttributeType::Boolean,
            AttributeValue::StringList(_) => AttributeType::StringList,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            AttributeValue::String(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_secret(&self) -> Option<&SecretString> {
        match self {
            AttributeValue::Secret(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_path(&self) -> Option<&Path> {
        match self {
            AttributeValue::Path(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_uri(&self) -> Option<&Url> {
        match self {
            AttributeValue::Uri(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_symbol(&self) -> Option<Symbol> {
        match self {
            AttributeValue::Symbol(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            AttributeValue::Integer(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            AttributeValue::Boolean(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            AttributeValue::StringList(value) => Some(value),
            _ => None,
        }
    }
}

/// Default value of an attribute, in a form that can live in a `static`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeDefault {
    /// Text for string, path, URI and symbol attributes
    Text(&'static str),
    /// Default for integer attributes
    Integer(i64),
    /// Default for boolean attributes
    Boolean(bool),
    /// Default for list attributes
    List(&'static [&'static str]),
}

impl AttributeDefault {
    fn fits(&self, ty: AttributeType) -> bool {
        matches!(
            (self, ty),
            (
                AttributeDefault::Text(_),
                AttributeType::String
                    | AttributeType::Path
                    | AttributeType::Uri
                    | AttributeType::Symbol
            ) | (AttributeDefault::Integer(_), AttributeType::Integer)
                | (AttributeDefault::Boolean(_), AttributeType::Boolean)
                | (AttributeDefault::List(_), AttributeType::StringList)
        )
    }
}

/// Declaration of one configuration attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttributeDescriptor {
    /// Name under which the value is exposed
    pub name: &'static str,
    /// Section of the raw source
    pub section: &'static str,
    /// Key within the section
    pub key: &'static str,
    /// Target type
    pub ty: AttributeType,
    /// Whether a value must be present
    pub required: bool,
    /// Whether the value is a credential
    pub secret: bool,
    /// Value used when the source has none
    pub default: Option<AttributeDefault>,
}

impl AttributeDescriptor {
    /// Declares an optional attribute without a default
    pub const fn new(
        name: &'static str,
        section: &'static str,
        key: &'static str,
        ty: AttributeType,
    ) -> Self {
        Self {
            name,
            section,
            key,
            ty,
            required: false,
            secret: false,
            default: None,
        }
    }

    /// Marks the attribute as mandatory
    pub const fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Marks a string attribute as a credential, resolved to a [`SecretString`]
    pub const fn secret(mut self) -> Self {
        self.secret = true;
        self
    }

    /// Sets the value used when the source has none
    pub const fn with_default(mut self, default: AttributeDefault) -> Self {
        self.default = Some(default);
        self
    }

    /// Checks that the declaration is internally consistent
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Schema`] if the default does not fit the declared
    /// type, if a required attribute also declares a default, or if a
    /// non-string attribute is marked secret.
    pub fn validate(&self) -> Result<()> {
        if self.secret && self.ty != AttributeType::String {
            return Err(ConfigError::Schema(format!(
                "secret attribute {} must be a string, not {}",
                self.name, self.ty
            )));
        }
        let Some(default) = self.default else {
            return Ok(());
        };
        if self.required {
            return Err(ConfigError::Schema(format!(
                "required attribute {} cannot have a default",
                self.name
            )));
        }
        if !default.fits(self.ty) {
            return Err(ConfigError::Schema(format!(
                "default {:?} of {} does not fit type {}",
                default, self.name, self.ty
            )));
        }
        if let (AttributeDefault::Text(text), AttributeType::Uri) = (default, self.ty) {
            Url::parse(text).map_err(|e| {
                ConfigError::Schema(format!("default URI of {} is invalid: {}", self.name, e))
            })?;
        }
        Ok(())
    }

    /// Reads this attribute from `source` and converts it to its type
    ///
    /// `base_dir` is the directory of the configuration file, when there is
    /// one; relative path values are resolved against it. Defaults are used
    /// as declared and are never resolved or coerced.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::MissingRequired`] if a required attribute has no value
    /// - [`ConfigError::Coercion`] if the raw value does not convert
    /// - [`ConfigError::Schema`] if the declared default does not fit the type
    pub fn resolve(
        &self,
        source: &RawSource,
        base_dir: Option<&Path>,
    ) -> Result<Option<AttributeValue>> {
        let value = match source.get(self.section, self.key) {
            Some(raw) => Some(self.coerce(raw, base_dir)?),
            None => self.default_value()?,
        };

        if value.is_none() && self.required {
            return Err(ConfigError::MissingRequired {
                section: self.section.to_string(),
                key: self.key.to_string(),
            });
        }

        Ok(value)
    }

    fn default_value(&self) -> Result<Option<AttributeValue>> {
        let Some(default) = self.default else {
            return Ok(None);
        };
        let value = match (default, self.ty) {
            (AttributeDefault::Text(text), AttributeType::String) => self.text(text),
            (AttributeDefault::Text(text), AttributeType::Path) => {
                AttributeValue::Path(PathBuf::from(text))
            }
            (AttributeDefault::Text(text), AttributeType::Uri) => {
                AttributeValue::Uri(Url::parse(text).map_err(|e| {
                    ConfigError::Schema(format!("default URI of {} is invalid: {}", self.name, e))
                })?)
            }
            (AttributeDefault::Text(text), AttributeType::Symbol) => {
                AttributeValue::Symbol(Symbol::intern(text))
            }
            (AttributeDefault::Integer(value), AttributeType::Integer) => {
                AttributeValue::Integer(value)
            }
            (AttributeDefault::Boolean(value), AttributeType::Boolean) => {
                AttributeValue::Boolean(value)
            }
            (AttributeDefault::List(items), AttributeType::StringList) => {
                AttributeValue::StringList(items.iter().map(|item| item.to_string()).collect())
            }
            (default, ty) => {
                return Err(ConfigError::Schema(format!(
                    "default {:?} of {} does not fit type {}",
                    default, self.name, ty
                )))
            }
        };
        Ok(Some(value))
    }

    fn coerce(&self, raw: &str, base_dir: Option<&Path>) -> Result<AttributeValue> {
        let value = match self.ty {
            AttributeType::String => self.text(raw),
            AttributeType::Path => AttributeValue::Path(resolve_path(raw, base_dir)),
            AttributeType::Uri => {
                AttributeValue::Uri(Url::parse(raw).map_err(|e| self.coercion_error(raw, e))?)
            }
            AttributeType::Symbol => AttributeValue::Symbol(Symbol::intern(raw.trim())),
            AttributeType::Integer => AttributeValue::Integer(
                raw.trim()
                    .parse::<i64>()
                    .map_err(|e| self.coercion_error(raw, e))?,
            ),
            AttributeType::Boolean => {
                AttributeValue::Boolean(raw.trim().eq_ignore_ascii_case("true"))
            }
            AttributeType::StringList => AttributeValue::StringList(split_list(raw)),
        };
        Ok(value)
    }

    fn text(&self, raw: &str) -> AttributeValue {
        if self.secret {
            AttributeValue::Secret(secret_string(raw.to_string()))
        } else {
            AttributeValue::String(raw.to_string())
        }
    }

    fn coercion_error(&self, raw: &str, reason: impl fmt::Display) -> ConfigError {
        ConfigError::Coercion {
            section: self.section.to_string(),
            key: self.key.to_string(),
            value: raw.to_string(),
            reason: reason.to_string(),
        }
    }
}

fn resolve_path(raw: &str, base_dir: Option<&Path>) -> PathBuf {
    let path = PathBuf::from(raw);
    match base_dir {
        Some(dir) if path.is_relative() => dir.join(path),
        _ => path,
    }
}

/// Splits a comma-separated value, trimming each item
///
/// Empty items between commas are kept; a blank value and trailing empty
/// items yield nothing.
fn split_list(raw: &str) -> Vec<String> {
    if raw.trim().is_empty() {
        return Vec::new();
    }
    let mut items: Vec<String> = raw.split(',').map(|item| item.trim().to_string()).collect();
    while items.last().is_some_and(|item| item.is_empty()) {
        items.pop();
    }
    items
}
