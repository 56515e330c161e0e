//! Branch specs and their compact string form
//!
//! The string form is `.`-separated groups; each group's first character is
//! the branch key and the rest is the tag payload, e.g. `sax.mS`.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

/// Group separator of the string form
pub const SEPARATOR: char = '.';

/// Chosen tag(s) for one key
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Choice {
    /// Single tag (or an uninterpreted payload straight from the string form)
    Tag(String),
    /// One tag per slot, in slot order
    Slots(Vec<String>),
}

impl Choice {
    /// Tags as per-slot entries
    ///
    /// A [`Choice::Tag`] payload is read as one tag per character.
    #[must_use]
    pub fn slot_tags(&self) -> Vec<String> {
        match self {
            Self::Tag(payload) => payload.chars().map(String::from).collect(),
            Self::Slots(tags) => tags.clone(),
        }
    }

    /// Concatenated payload, as written in the string form
    #[must_use]
    pub fn payload(&self) -> String {
        match self {
            Self::Tag(tag) => tag.clone(),
            Self::Slots(tags) => tags.concat(),
        }
    }
}

impl From<&str> for Choice {
    fn from(tag: &str) -> Self {
        Self::Tag(tag.to_string())
    }
}

impl From<Vec<&str>> for Choice {
    fn from(tags: Vec<&str>) -> Self {
        Self::Slots(tags.into_iter().map(String::from).collect())
    }
}

/// Mapping from branch key to chosen tag(s)
///
/// Partial specs may omit keys; expanded specs cover every indexed key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Spec(IndexMap<String, Choice>);

impl Spec {
    /// Empty spec
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse the compact string form
    ///
    /// Empty groups are dropped. A key given twice keeps its first position
    /// and its last payload.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        raw.split(SEPARATOR)
            .filter_map(|section| {
                let mut chars = section.chars();
                let key = chars.next()?;
                Some((key.to_string(), Choice::Tag(chars.as_str().to_string())))
            })
            .collect()
    }

    /// Serialize to the compact string form
    #[must_use]
    pub fn format(&self) -> String {
        self.0
            .iter()
            .map(|(key, choice)| format!("{key}{}", choice.payload()))
            .collect::<Vec<_>>()
            .join(&SEPARATOR.to_string())
    }

    /// Choice for `key`
    #[inline]
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Choice> {
        self.0.get(key)
    }

    /// Check if `key` is present
    #[inline]
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Set the choice for `key`, keeping its position if already present
    #[inline]
    pub fn insert(&mut self, key: impl Into<String>, choice: impl Into<Choice>) {
        self.0.insert(key.into(), choice.into());
    }

    /// With choice for `key`
    #[inline]
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, choice: impl Into<Choice>) -> Self {
        self.insert(key, choice);
        self
    }

    /// Entries in spec order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Choice)> {
        self.0.iter().map(|(k, c)| (k.as_str(), c))
    }

    /// Keys in spec order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Number of keys
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if no key is present
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Display for Spec {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format())
    }
}

impl FromStr for Spec {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

impl FromIterator<(String, Choice)> for Spec {
    fn from_iter<I: IntoIterator<Item = (String, Choice)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a Spec {
    type Item = (&'a String, &'a Choice);
    type IntoIter = indexmap::map::Iter<'a, String, Choice>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
