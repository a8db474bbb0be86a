use std::collections::BTreeMap;
use std::fs::File;
use std::path::Path;
use std::str::FromStr;

use serde::de::DeserializeOwned;

use super::bind::{self, SectionData};
use super::coerce::{self, FromValue};
use super::parser;
use super::section::{canonicalize, Section};
use super::ConfigError;

/// A parsed configuration document.
///
/// Holds a default (unnamed) section plus any number of named sections.
/// Lookups without a section name only ever see the default section. A
/// document is immutable once loaded.
///
/// ## Example
///
/// ```
/// use mini_ini::Document;
///
/// let document: Document = "
/// name = demo
///
/// [server]
/// port = 8080
/// hosts[] = a.example.com
/// hosts[] = b.example.com
/// "
/// .parse()?;
///
/// assert_eq!(document.string("name", "unnamed"), "demo");
/// assert_eq!(document.integer_from_section("server", "port", 80), 8080);
/// assert_eq!(document.strings_from_section("server", "hosts").map(<[String]>::len), Some(2));
/// assert_eq!(document.integer_from_section("server", "workers", 4), 4);
/// # Ok::<(), mini_ini::ConfigError>(())
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    default: Section,
    sections: BTreeMap<String, Section>,
}

impl Document {
    /// Loads a document from a file.
    ///
    /// A file that cannot be opened is reported as [`ConfigError::Io`] carrying
    /// the original error; see [`ConfigError::is_not_found`].
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        tracing::debug!(path = %path.display(), "loading configuration file");

        let file = File::open(path)?;
        Self::from_reader(file)
    }

    /// Parses a document from any reader.
    pub fn from_reader<R: std::io::Read>(reader: R) -> Result<Self, ConfigError> {
        parser::parse_reader(reader)
    }

    pub fn parse(text: &str) -> Result<Self, ConfigError> {
        parser::parse_str(text)
    }

    /// Returns the canonical name of `name`, creating the section if it is new.
    pub(crate) fn open_section(&mut self, name: &str) -> String {
        let canonical = canonicalize(name);
        self.sections
            .entry(canonical.clone())
            .or_insert_with(|| Section::new(name));
        canonical
    }

    /// The section an assignment lands in; `None` is the default section.
    pub(crate) fn section_mut(&mut self, canonical: Option<&str>) -> &mut Section {
        match canonical {
            Some(name) => self
                .sections
                .entry(name.to_owned())
                .or_insert_with(|| Section::new(name)),
            None => &mut self.default,
        }
    }

    pub fn default_section(&self) -> &Section {
        &self.default
    }

    /// Looks up a named section, case-insensitively.
    pub fn section(&self, name: &str) -> Option<&Section> {
        self.sections.get(&canonicalize(name))
    }

    pub fn has_section(&self, name: &str) -> bool {
        self.section(name).is_some()
    }

    /// Named sections, ordered by canonical name.
    pub fn sections(&self) -> impl Iterator<Item = &Section> {
        self.sections.values()
    }

    /// Key names of the default section.
    pub fn keys(&self) -> Vec<&str> {
        self.default.keys()
    }

    /// Key names of a named section. `None` if the section does not exist.
    pub fn keys_for_section(&self, name: &str) -> Option<Vec<&str>> {
        self.section(name).map(Section::keys)
    }

    pub fn value<T: FromValue>(&self, key: &str) -> Option<T> {
        self.default.value(key)
    }

    pub fn values<T: FromValue>(&self, key: &str) -> Option<Vec<T>> {
        self.default.values(key)
    }

    pub fn string<'a>(&'a self, key: &str, default: &'a str) -> &'a str {
        self.default.string(key, default)
    }

    pub fn integer(&self, key: &str, default: i64) -> i64 {
        self.default.integer(key, default)
    }

    pub fn float(&self, key: &str, default: f64) -> f64 {
        self.default.float(key, default)
    }

    pub fn boolean(&self, key: &str, default: bool) -> bool {
        self.default.boolean(key, default)
    }

    pub fn strings(&self, key: &str) -> Option<&[String]> {
        self.default.strings(key)
    }

    pub fn integers(&self, key: &str) -> Option<Vec<i64>> {
        self.default.integers(key)
    }

    pub fn floats(&self, key: &str) -> Option<Vec<f64>> {
        self.default.floats(key)
    }

    pub fn value_from_section<T: FromValue>(&self, section: &str, key: &str) -> Option<T> {
        coerce::scalar(lookup(self.section(section), key))
    }

    pub fn values_from_section<T: FromValue>(&self, section: &str, key: &str) -> Option<Vec<T>> {
        coerce::sequence(lookup(self.section(section), key))
    }

    pub fn string_from_section<'a>(
        &'a self,
        section: &str,
        key: &str,
        default: &'a str,
    ) -> &'a str {
        match self.section(section) {
            Some(section) => section.string(key, default),
            None => default,
        }
    }

    pub fn integer_from_section(&self, section: &str, key: &str, default: i64) -> i64 {
        self.value_from_section(section, key).unwrap_or(default)
    }

    pub fn float_from_section(&self, section: &str, key: &str, default: f64) -> f64 {
        self.value_from_section(section, key).unwrap_or(default)
    }

    pub fn boolean_from_section(&self, section: &str, key: &str, default: bool) -> bool {
        self.value_from_section(section, key).unwrap_or(default)
    }

    pub fn strings_from_section(&self, section: &str, key: &str) -> Option<&[String]> {
        lookup(self.section(section), key).filter(|values| !values.is_empty())
    }

    pub fn integers_from_section(&self, section: &str, key: &str) -> Option<Vec<i64>> {
        self.values_from_section(section, key)
    }

    pub fn floats_from_section(&self, section: &str, key: &str) -> Option<Vec<f64>> {
        self.values_from_section(section, key)
    }

    /// Fills the listed fields of `target` from a named section.
    ///
    /// Returns `false`, leaving `target` untouched, when the section does not
    /// exist. Fields whose key is missing or whose value does not coerce keep
    /// their current value.
    pub fn data_from_section<T: SectionData + ?Sized>(&self, section: &str, target: &mut T) -> bool {
        match self.section(section) {
            Some(section) => {
                bind::populate(section, target);
                true
            }
            None => false,
        }
    }

    /// Deserializes the default section into `T`.
    pub fn deserialize<T: DeserializeOwned>(&self) -> Result<T, ConfigError> {
        self.default.deserialize()
    }

    /// Deserializes a named section into `T`. `Ok(None)` if the section does not exist.
    pub fn section_as<T: DeserializeOwned>(&self, section: &str) -> Result<Option<T>, ConfigError> {
        self.section(section)
            .map(Section::deserialize::<T>)
            .transpose()
    }
}

impl FromStr for Document {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Raw values for `key` in a section that may not exist.
pub(crate) fn lookup<'a>(section: Option<&'a Section>, key: &str) -> Option<&'a [String]> {
    section?.get(key)
}
