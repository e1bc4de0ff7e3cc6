//! Mutable dotted-key view of a configuration
//!
//! [`SelectConfig`] is a plain nested map that can be edited after parsing.
//! Keys are dotted paths: `set("db.host", "localhost")` creates the `db`
//! map when needed. It shares nothing with the [`Config`](crate::Config) it
//! was copied from.

use crate::native::{NativeMap, NativeValue};
use serde::Serialize;

/// Editable nested map addressed by dotted keys
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct SelectConfig {
    config: NativeMap,
}

impl SelectConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_map(config: NativeMap) -> Self {
        Self { config }
    }

    /// Number of top-level keys
    pub fn len(&self) -> usize {
        self.config.len()
    }

    pub fn is_empty(&self) -> bool {
        self.config.is_empty()
    }

    /// Stores `value` at `key`, replacing non-map values on the way
    pub fn set(&mut self, key: &str, value: impl Into<NativeValue>) {
        let keys: Vec<&str> = key.split('.').collect();
        set_in(&mut self.config, &keys, value.into());
    }

    pub fn get(&self, key: &str) -> Option<&NativeValue> {
        let mut keys = key.split('.');
        let first = self.config.get(keys.next()?)?;
        keys.try_fold(first, |node, k| node.as_map()?.get(k))
    }

    pub fn get_or<'s>(&'s self, key: &str, default: &'s NativeValue) -> &'s NativeValue {
        self.get(key).unwrap_or(default)
    }

    /// Removes `key` and returns its value
    pub fn delete(&mut self, key: &str) -> Option<NativeValue> {
        let (parent, last) = match key.rsplit_once('.') {
            Some((parent, last)) => (Some(parent), last),
            None => (None, key),
        };

        let map = match parent {
            None => &mut self.config,
            Some(parent) => {
                let mut keys = parent.split('.');
                let first = self.config.get_mut(keys.next()?)?;
                keys.try_fold(first, |node, k| node.as_map_mut()?.get_mut(k))?
                    .as_map_mut()?
            }
        };
        map.shift_remove(last)
    }

    /// Sets every dotted key of `entries`
    pub fn update<I, K, V>(&mut self, entries: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<NativeValue>,
    {
        for (key, value) in entries {
            self.set(key.as_ref(), value);
        }
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// The underlying map
    pub fn config(&self) -> &NativeMap {
        &self.config
    }

    pub fn into_map(self) -> NativeMap {
        self.config
    }
}

fn set_in(map: &mut NativeMap, keys: &[&str], value: NativeValue) {
    match keys {
        [] => {}
        [last] => {
            map.insert(last.to_string(), value);
        }
        [first, rest @ ..] => {
            let entry = map
                .entry(first.to_string())
                .or_insert_with(|| NativeValue::Map(NativeMap::new()));
            if !entry.is_map() {
                *entry = NativeValue::Map(NativeMap::new());
            }
            if let Some(child) = entry.as_map_mut() {
                set_in(child, rest, value);
            }
        }
    }
}
