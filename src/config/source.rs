//! Raw two-level configuration sources
//!
//! A [`RawSource`] is the untyped view of a configuration: section name to key
//! name to string value. It is produced either by decoding an INI file or by
//! collecting an in-memory mapping, and it is the only input the attribute
//! resolver reads.

use crate::domain::errors::ConfigError;
use crate::domain::result::Result;
use ini::{Ini, ParseOption};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// The key/value pairs of a single section
pub type Section = BTreeMap<String, String>;

/// Untyped section → key → value mapping
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawSource {
    sections: BTreeMap<String, Section>,
}

impl RawSource {
    /// Creates an empty source
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a value, returning the updated source
    ///
    /// Sections, keys and values may be anything with a string form, so
    /// `with("SMTP", "port", 2025)` and `with("SMTP", "port", "2025")` are
    /// equivalent.
    pub fn with(
        mut self,
        section: impl ToString,
        key: impl ToString,
        value: impl ToString,
    ) -> Self {
        self.insert(section, key, value);
        self
    }

    /// Adds a value in place, replacing any previous value for the same key
    pub fn insert(&mut self, section: impl ToString, key: impl ToString, value: impl ToString) {
        self.sections
            .entry(section.to_string())
            .or_default()
            .insert(key.to_string(), value.to_string());
    }

    /// Looks up a single raw value
    pub fn get(&self, section: &str, key: &str) -> Option<&str> {
        self.sections
            .get(section)
            .and_then(|entries| entries.get(key))
            .map(String::as_str)
    }

    /// Returns all key/value pairs of a section, if the section exists
    pub fn section(&self, name: &str) -> Option<&Section> {
        self.sections.get(name)
    }

    /// Iterates over the sections in name order
    pub fn sections(&self) -> impl Iterator<Item = (&str, &Section)> {
        self.sections.iter().map(|(name, entries)| (name.as_str(), entries))
    }

    /// Decodes INI text
    ///
    /// Properties that appear before the first section header are ignored;
    /// every attribute lives in a named section. Values may be quoted. Only
    /// the escapes `\\`, `\0`, `\n`, `\r` and `\t` are decoded; any other
    /// backslash is kept as written.
    pub fn from_ini_str(text: &str) -> std::result::Result<Self, String> {
        let options = ParseOption {
            enabled_escape: false,
            ..ParseOption::default()
        };
        let ini = Ini::load_from_str_opt(text, options).map_err(|e| e.to_string())?;
        let mut source = Self::new();

        for (section, properties) in ini.iter() {
            let Some(section) = section else {
                let ignored = properties.iter().count();
                if ignored > 0 {
                    tracing::debug!(
                        count = ignored,
                        "Ignoring properties outside of any section"
                    );
                }
                continue;
            };
            // Headers without entries still count as present sections
            source.sections.entry(section.to_string()).or_default();
            for (key, value) in properties.iter() {
                source.insert(section, key, unescape(value));
            }
        }

        Ok(source)
    }

    /// Reads and decodes an INI file
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::SourceUnreadable`] if the file cannot be read and
    /// [`ConfigError::SourceMalformed`] if its contents are not valid INI.
    pub fn read_ini(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::SourceUnreadable {
            path: path.to_path_buf(),
            source,
        })?;

        Self::from_ini_str(&contents).map_err(|message| ConfigError::SourceMalformed {
            path: path.to_path_buf(),
            message,
        })
    }
}

impl<S, I, K, V> FromIterator<(S, I)> for RawSource
where
    S: ToString,
    I: IntoIterator<Item = (K, V)>,
    K: ToString,
    V: ToString,
{
    fn from_iter<T: IntoIterator<Item = (S, I)>>(iter: T) -> Self {
        let mut source = Self::new();
        for (section, entries) in iter {
            let section = section.to_string();
            source.sections.entry(section.clone()).or_default();
            for (key, value) in entries {
                source.insert(&section, key, value);
            }
        }
        source
    }
}

/// Where a configuration comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// An INI file on disk
    File(PathBuf),
    /// An already decoded mapping
    Raw(RawSource),
}

impl From<&str> for ConfigSource {
    fn from(path: &str) -> Self {
        ConfigSource::File(PathBuf::from(path))
    }
}

impl From<String> for ConfigSource {
    fn from(path: String) -> Self {
        ConfigSource::File(PathBuf::from(path))
    }
}

impl From<&Path> for ConfigSource {
    fn from(path: &Path) -> Self {
        ConfigSource::File(path.to_path_buf())
    }
}

impl From<PathBuf> for ConfigSource {
    fn from(path: PathBuf) -> Self {
        ConfigSource::File(path)
    }
}

impl From<RawSource> for ConfigSource {
    fn from(source: RawSource) -> Self {
        ConfigSource::Raw(source)
    }
}

/// Decodes the escapes INI values may carry, leaving other backslashes alone
fn unescape(value: &str) -> String {
    let mut decoded = String::with_capacity(value.len());
    let mut chars = value.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            decoded.push(c);
            continue;
        }
        match chars.next() {
            Some('\\') => decoded.push('\\'),
            Some('0') => decoded.push('\0'),
            Some('n') => decoded.push('\n'),
            Some('r') => decoded.push('\r'),
            Some('t') => decoded.push('\t'),
            Some(other) => {
                decoded.push('\\');
                decoded.push(other);
            }
            None => decoded.push('\\'),
        }
    }
    decoded
}

/// Makes a path absolute against the current directory without touching the
/// file system beyond looking up that directory
pub(crate) fn absolutize(path: &Path) -> Result<PathBuf> {
    if path.is_absolute() {
        return Ok(path.to_path_buf());
    }
    let cwd = std::env::current_dir().map_err(|source| ConfigError::SourceUnreadable {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(cwd.join(path))
}
