//! Order-preserving keyed tables.
//!
//! Route and action tables are keyed by alias, and their declaration order
//! is part of the routing contract. A `HashMap` would lose that order, so
//! entries are collected into a `Vec` straight from the deserializer.

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::marker::PhantomData;

/// A table of `alias -> entry` pairs kept in declaration order.
#[derive(Debug, Clone, PartialEq)]
pub struct Declared<T> {
    entries: Vec<(String, T)>,
}

impl<T> Declared<T> {
    pub fn new() -> Self {
        Self { entries: Vec::new() }
    }

    /// Append an entry. Replaces the value in place if the alias is already declared.
    pub fn insert(&mut self, alias: impl Into<String>, value: T) {
        let alias = alias.into();
        match self.entries.iter_mut().find(|(k, _)| *k == alias) {
            Some(slot) => slot.1 = value,
            None => self.entries.push((alias, value)),
        }
    }

    pub fn get(&self, alias: &str) -> Option<&T> {
        self.entries.iter().find(|(k, _)| k == alias).map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &T)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<T> Default for Declared<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Into<String>, T> FromIterator<(K, T)> for Declared<T> {
    fn from_iter<I: IntoIterator<Item = (K, T)>>(iter: I) -> Self {
        let mut table = Self::new();
        for (alias, value) in iter {
            table.insert(alias, value);
        }
        table
    }
}

impl<T: Serialize> Serialize for Declared<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (alias, value) in &self.entries {
            map.serialize_entry(alias, value)?;
        }
        map.end()
    }
}

struct DeclaredVisitor<T>(PhantomData<T>);

impl<'de, T: Deserialize<'de>> Visitor<'de> for DeclaredVisitor<T> {
    type Value = Declared<T>;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a table keyed by alias")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut entries: Vec<(String, T)> = Vec::with_capacity(access.size_hint().unwrap_or(0));
        while let Some((alias, value)) = access.next_entry::<String, T>()? {
            if entries.iter().any(|(k, _)| *k == alias) {
                return Err(serde::de::Error::custom(format!("duplicate alias `{}`", alias)));
            }
            entries.push((alias, value));
        }
        Ok(Declared { entries })
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Declared<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(DeclaredVisitor(PhantomData))
    }
}
