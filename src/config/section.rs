use std::collections::BTreeMap;

use serde::de::DeserializeOwned;

use super::coerce::{self, FromValue};
use super::de::SectionDeserializer;
use super::ConfigError;

/// Canonical form used for every key and section name on insert and lookup.
pub(crate) fn canonicalize(name: &str) -> String {
    name.to_lowercase()
}

/// A group of key/value entries.
///
/// Keys are case-insensitive and each one maps to an ordered sequence of raw
/// values; a plain key holds a single-element sequence.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Section {
    name: String,
    entries: BTreeMap<String, Vec<String>>,
}

impl Section {
    pub(crate) fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            entries: BTreeMap::new(),
        }
    }

    /// The section name as first written in the source. Empty for the default section.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Replaces the whole sequence stored under `key`.
    pub(crate) fn assign(&mut self, key: &str, value: String) {
        self.entries.insert(canonicalize(key), vec![value]);
    }

    /// Appends one element to the sequence stored under `key`.
    pub(crate) fn append(&mut self, key: &str, value: String) {
        self.entries.entry(canonicalize(key)).or_default().push(value);
    }

    /// Raw values stored under `key`, matched case-insensitively.
    pub fn get(&self, key: &str) -> Option<&[String]> {
        if key.is_empty() {
            return None;
        }
        self.entries.get(&canonicalize(key)).map(Vec::as_slice)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Canonical (lower-case) key names in sorted order.
    pub fn keys(&self) -> Vec<&str> {
        self.entries.keys().map(String::as_str).collect()
    }

    pub(crate) fn entries(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.entries
            .iter()
            .map(|(key, values)| (key.as_str(), values.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Reads `key` as a single value of type `T`.
    pub fn value<T: FromValue>(&self, key: &str) -> Option<T> {
        coerce::scalar(self.get(key))
    }

    /// Reads every element stored under `key` as `T`, or nothing if any element fails.
    pub fn values<T: FromValue>(&self, key: &str) -> Option<Vec<T>> {
        coerce::sequence(self.get(key))
    }

    pub fn string<'a>(&'a self, key: &str, default: &'a str) -> &'a str {
        match self.get(key) {
            Some([value]) if !value.is_empty() => value.as_str(),
            _ => default,
        }
    }

    pub fn integer(&self, key: &str, default: i64) -> i64 {
        self.value(key).unwrap_or(default)
    }

    pub fn float(&self, key: &str, default: f64) -> f64 {
        self.value(key).unwrap_or(default)
    }

    pub fn boolean(&self, key: &str, default: bool) -> bool {
        self.value(key).unwrap_or(default)
    }

    pub fn strings(&self, key: &str) -> Option<&[String]> {
        self.get(key).filter(|values| !values.is_empty())
    }

    pub fn integers(&self, key: &str) -> Option<Vec<i64>> {
        self.values(key)
    }

    pub fn floats(&self, key: &str) -> Option<Vec<f64>> {
        self.values(key)
    }

    /// Deserializes this section into `T`, treating it as a map of canonical keys.
    ///
    /// Unlike the typed getters this is strict: a value that fails to parse as
    /// the requested field type is an error rather than a silent default.
    pub fn deserialize<T: DeserializeOwned>(&self) -> Result<T, ConfigError> {
        T::deserialize(SectionDeserializer::new(self)).map_err(|source| {
            ConfigError::Deserialize {
                section: self.name.clone(),
                source,
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keys_are_case_insensitive() {
        let mut section = Section::new("server");
        section.assign("HoSt", "localhost".into());

        assert_eq!(section.get("host"), Some(&["localhost".to_string()][..]));
        assert_eq!(section.get("HOST"), Some(&["localhost".to_string()][..]));
        assert_eq!(section.keys(), vec!["host"]);
    }

    #[test]
    fn test_assign_overwrites_appended_values() {
        let mut section = Section::new("");
        section.append("key", "one".into());
        section.append("KEY", "two".into());
        assert_eq!(section.strings("key").map(<[String]>::len), Some(2));

        section.assign("key", "three".into());
        assert_eq!(section.strings("key"), Some(&["three".to_string()][..]));
        assert_eq!(section.len(), 1);
    }

    #[test]
    fn test_empty_key_is_never_found() {
        let mut section = Section::new("");
        section.assign("first", "alpha".into());

        assert_eq!(section.get(""), None);
        assert_eq!(section.string("", "test"), "test");
        assert_eq!(section.integer("", 32), 32);
    }

    #[test]
    fn test_scalar_getters_reject_arrays() {
        let mut section = Section::new("section");
        section.append("key", "one".into());
        section.append("key", "two".into());

        assert_eq!(section.string("key", "default"), "default");
    }
}
