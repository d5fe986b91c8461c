//! Partial build configuration values.
//!
//! A [`ConfigFragment`] is a nested, string-keyed map of [`ConfigValue`]s.
//! Fragments are plain values: they carry no identity beyond their content
//! and are combined with [`merge`](crate::merge::merge).
//!
//! Two "absent" states exist:
//!
//! - [`ConfigValue::Undefined`] means "no value". In an override it leaves the
//!   base value untouched.
//! - [`ConfigValue::Unset`] is an explicit removal sentinel set by a target
//!   factory (e.g. a dev-server URL constant in production). It always wins.

use crate::dev::hooks::HookRef;
use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};
use std::collections::BTreeMap;

/// A single configuration value.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigValue {
    /// No value. Ignored when merged as an override.
    Undefined,
    /// Explicit removal sentinel. Replaces whatever the base holds.
    Unset,
    Null,
    Bool(bool),
    Number(serde_json::Number),
    String(String),
    List(Vec<ConfigValue>),
    Map(ConfigFragment),
    /// A plugin-shaped callback object handed to the bundler.
    Hook(HookRef),
}

impl ConfigValue {
    /// Build a list value from anything convertible.
    pub fn list<I, V>(items: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<ConfigValue>,
    {
        Self::List(items.into_iter().map(Into::into).collect())
    }

    /// An empty map value.
    #[must_use]
    pub fn empty_map() -> Self {
        Self::Map(ConfigFragment::new())
    }

    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_list(&self) -> Option<&[ConfigValue]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_map(&self) -> Option<&ConfigFragment> {
        match self {
            Self::Map(map) => Some(map),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_hook(&self) -> Option<&HookRef> {
        match self {
            Self::Hook(hook) => Some(hook),
            _ => None,
        }
    }

    /// `Undefined` or `Null`: values an override never applies.
    #[must_use]
    pub fn is_nullish(&self) -> bool {
        matches!(self, Self::Undefined | Self::Null)
    }
}

impl From<&str> for ConfigValue {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<String> for ConfigValue {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<bool> for ConfigValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<i64> for ConfigValue {
    fn from(n: i64) -> Self {
        Self::Number(n.into())
    }
}

impl From<u16> for ConfigValue {
    fn from(n: u16) -> Self {
        Self::Number(n.into())
    }
}

impl From<ConfigFragment> for ConfigValue {
    fn from(map: ConfigFragment) -> Self {
        Self::Map(map)
    }
}

impl From<Vec<ConfigValue>> for ConfigValue {
    fn from(items: Vec<ConfigValue>) -> Self {
        Self::List(items)
    }
}

impl From<HookRef> for ConfigValue {
    fn from(hook: HookRef) -> Self {
        Self::Hook(hook)
    }
}

impl From<serde_json::Value> for ConfigValue {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Self::Null,
            serde_json::Value::Bool(b) => Self::Bool(b),
            serde_json::Value::Number(n) => Self::Number(n),
            serde_json::Value::String(s) => Self::String(s),
            serde_json::Value::Array(items) => Self::list(items),
            serde_json::Value::Object(map) => Self::Map(
                map.into_iter()
                    .map(|(k, v)| (k, ConfigValue::from(v)))
                    .collect(),
            ),
        }
    }
}

impl Serialize for ConfigValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Undefined | Self::Unset | Self::Null => serializer.serialize_unit(),
            Self::Bool(b) => serializer.serialize_bool(*b),
            Self::Number(n) => n.serialize(serializer),
            Self::String(s) => serializer.serialize_str(s),
            Self::List(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Self::Map(map) => map.serialize(serializer),
            Self::Hook(hook) => serializer.serialize_str(hook.name()),
        }
    }
}

/// A partial configuration object.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigFragment(BTreeMap<String, ConfigValue>);

impl ConfigFragment {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<ConfigValue>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    pub fn insert(
        &mut self,
        key: impl Into<String>,
        value: impl Into<ConfigValue>,
    ) -> Option<ConfigValue> {
        self.0.insert(key.into(), value.into())
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&ConfigValue> {
        self.0.get(key)
    }

    pub fn remove(&mut self, key: &str) -> Option<ConfigValue> {
        self.0.remove(key)
    }

    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Look up a value by dotted path (`build.rollupOptions.external`).
    ///
    /// Use [`get`](Self::get) for keys that themselves contain dots.
    #[must_use]
    pub fn get_path(&self, path: &str) -> Option<&ConfigValue> {
        let mut segments = path.split('.');
        let mut current = self.0.get(segments.next()?)?;
        for segment in segments {
            current = current.as_map()?.get(segment)?;
        }
        Some(current)
    }

    /// Set a value by dotted path, creating intermediate maps.
    ///
    /// A non-map value sitting on the path is replaced by a map.
    pub fn set_path(&mut self, path: &str, value: impl Into<ConfigValue>) {
        match path.split_once('.') {
            None => {
                self.0.insert(path.to_string(), value.into());
            }
            Some((head, rest)) => {
                let slot = self
                    .0
                    .entry(head.to_string())
                    .or_insert_with(ConfigValue::empty_map);
                if !matches!(slot, ConfigValue::Map(_)) {
                    *slot = ConfigValue::empty_map();
                }
                if let ConfigValue::Map(inner) = slot {
                    inner.set_path(rest, value);
                }
            }
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &ConfigValue)> {
        self.0.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.0.keys()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Convert a JSON value into a fragment. Returns `None` unless it is an object.
    #[must_use]
    pub fn from_json(value: serde_json::Value) -> Option<Self> {
        match ConfigValue::from(value) {
            ConfigValue::Map(map) => Some(map),
            _ => None,
        }
    }

    /// Render as JSON (sentinels become `null`, hooks become their name).
    #[must_use]
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}

impl FromIterator<(String, ConfigValue)> for ConfigFragment {
    fn from_iter<T: IntoIterator<Item = (String, ConfigValue)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl IntoIterator for ConfigFragment {
    type Item = (String, ConfigValue);
    type IntoIter = std::collections::btree_map::IntoIter<String, ConfigValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl Serialize for ConfigFragment {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (key, value) in &self.0 {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}
