//! Ordered configuration bag handed to upload strategies.

use std::fmt;

use serde::Serialize;
use serde_json::Value;

use crate::core::{Error, Result};

/// Key of an upload option: a name or a positional index.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum OptionKey {
    Name(String),
    Index(i64),
}

impl OptionKey {
    /// Name of the key, if it is not positional.
    #[inline]
    pub fn as_name(&self) -> Option<&str> {
        match self {
            OptionKey::Name(name) => Some(name),
            OptionKey::Index(_) => None,
        }
    }
}

impl fmt::Display for OptionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptionKey::Name(name) => f.write_str(name),
            OptionKey::Index(index) => write!(f, "{}", index),
        }
    }
}

impl From<&str> for OptionKey {
    fn from(name: &str) -> Self {
        OptionKey::Name(name.to_string())
    }
}

impl From<String> for OptionKey {
    fn from(name: String) -> Self {
        OptionKey::Name(name)
    }
}

impl From<i64> for OptionKey {
    fn from(index: i64) -> Self {
        OptionKey::Index(index)
    }
}

impl From<i32> for OptionKey {
    fn from(index: i32) -> Self {
        OptionKey::Index(index.into())
    }
}

/// Ordered mapping from [`OptionKey`] to arbitrary JSON-like values.
///
/// Recognized keys (strategy-specific):
///
/// | Key | Type | Used by |
/// |-----|------|---------|
/// | `target_directory` | non-empty string | directory, move |
/// | `dir_permissions` | integer, owner `rwx` required | directory |
/// | `file_permissions` | integer, owner `rw-` required | move |
#[derive(Clone, Debug, Default, PartialEq)]
pub struct UploadOptions {
    entries: Vec<(OptionKey, Value)>,
}

impl UploadOptions {
    pub const TARGET_DIRECTORY: &'static str = "target_directory";
    pub const DIR_PERMISSIONS: &'static str = "dir_permissions";
    pub const FILE_PERMISSIONS: &'static str = "file_permissions";

    /// Create an empty bag.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from the public fields of any serializable struct or map.
    pub fn from_serializable<T: Serialize + ?Sized>(value: &T) -> Result<Self> {
        Self::try_from(serde_json::to_value(value)?)
    }

    /// Value stored under `key`.
    pub fn get(&self, key: impl Into<OptionKey>) -> Option<&Value> {
        let key = key.into();
        self.entries
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, value)| value)
    }

    /// Value stored under `key`, or `default`.
    pub fn get_or<'a>(&'a self, key: impl Into<OptionKey>, default: &'a Value) -> &'a Value {
        self.get(key).unwrap_or(default)
    }

    /// Store `value` under `key`, replacing in place if the key exists.
    pub fn set(&mut self, key: impl Into<OptionKey>, value: impl Into<Value>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    /// Merge `options` into the bag.
    ///
    /// Named keys overwrite existing entries. Positional keys never collide:
    /// existing indexes are renumbered from zero and new positional values are
    /// appended after them.
    pub fn add<K, V, I>(&mut self, options: I)
    where
        K: Into<OptionKey>,
        V: Into<Value>,
        I: IntoIterator<Item = (K, V)>,
    {
        let mut next = 0i64;
        for (key, _) in &mut self.entries {
            if let OptionKey::Index(index) = key {
                *index = next;
                next += 1;
            }
        }

        for (key, value) in options {
            match key.into() {
                OptionKey::Index(_) => {
                    self.entries.push((OptionKey::Index(next), value.into()));
                    next += 1;
                }
                key => self.set(key, value),
            }
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&OptionKey, &Value)> {
        self.entries.iter().map(|(key, value)| (key, value))
    }

    /// Copy of all entries in insertion order.
    pub fn to_vec(&self) -> Vec<(OptionKey, Value)> {
        self.entries.clone()
    }
}

impl<K, V> FromIterator<(K, V)> for UploadOptions
where
    K: Into<OptionKey>,
    V: Into<Value>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut options = Self::new();
        for (key, value) in iter {
            options.set(key, value);
        }
        options
    }
}

impl TryFrom<Value> for UploadOptions {
    type Error = Error;

    fn try_from(value: Value) -> Result<Self> {
        match value {
            Value::Object(map) => Ok(map.into_iter().collect()),
            Value::Array(items) => Ok(items
                .into_iter()
                .enumerate()
                .map(|(index, value)| (OptionKey::Index(index as i64), value))
                .collect()),
            other => Err(Error::InvalidArgument(format!(
                "invalid options provided; must be an object or an array, {} received",
                json_type_name(&other)
            ))),
        }
    }
}

impl IntoIterator for UploadOptions {
    type Item = (OptionKey, Value);
    type IntoIter = std::vec::IntoIter<(OptionKey, Value)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<'a> IntoIterator for &'a UploadOptions {
    type Item = &'a (OptionKey, Value);
    type IntoIter = std::slice::Iter<'a, (OptionKey, Value)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// Read a recognized option as a non-empty string.
pub(crate) fn expect_non_empty_str<'a>(name: &str, value: &'a Value) -> Result<&'a str> {
    match value.as_str() {
        Some(s) if !s.is_empty() => Ok(s),
        _ => Err(Error::InvalidOption {
            name: name.to_string(),
            message: format!(
                "must be a non-empty string, {} received",
                json_type_name(value)
            ),
        }),
    }
}

/// Read a recognized option as a permission mode.
pub(crate) fn expect_mode(name: &str, value: &Value) -> Result<u32> {
    value
        .as_u64()
        .and_then(|mode| u32::try_from(mode).ok())
        .ok_or_else(|| Error::InvalidOption {
            name: name.to_string(),
            message: format!("must be an integer, {} received", json_type_name(value)),
        })
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_iterator_and_get() {
        let options: UploadOptions = [("foo", "bar"), ("baz", "bat")].into_iter().collect();
        assert_eq!(options.get("foo"), Some(&json!("bar")));
        assert_eq!(options.get("missing"), None);
        assert_eq!(options.len(), 2);
    }

    #[test]
    fn test_get_or_default() {
        let options = UploadOptions::new();
        let default = json!(100);
        assert_eq!(options.get_or("foo", &default), &json!(100));
    }

    #[test]
    fn test_from_serializable_struct() {
        #[derive(Serialize)]
        struct Settings {
            target_directory: String,
            dir_permissions: u32,
        }

        let options = UploadOptions::from_serializable(&Settings {
            target_directory: "/tmp/uploads".into(),
            dir_permissions: 0o750,
        })
        .unwrap();
        assert_eq!(options.get("target_directory"), Some(&json!("/tmp/uploads")));
        assert_eq!(options.get("dir_permissions"), Some(&json!(0o750)));
    }

    #[test]
    fn test_object_keeps_insertion_order() {
        let options = UploadOptions::try_from(json!({"zeta": 1, "alpha": 2})).unwrap();
        let keys: Vec<_> = options.iter().filter_map(|(key, _)| key.as_name()).collect();
        assert_eq!(keys, ["zeta", "alpha"]);

        #[derive(Serialize)]
        struct Settings {
            target_directory: &'static str,
            file_permissions: u32,
        }
        let options = UploadOptions::from_serializable(&Settings {
            target_directory: "/tmp/uploads",
            file_permissions: 0o600,
        })
        .unwrap();
        let keys: Vec<_> = options.iter().filter_map(|(key, _)| key.as_name()).collect();
        assert_eq!(keys, ["target_directory", "file_permissions"]);
    }

    #[test]
    fn test_from_json_array_uses_indexes() {
        let options = UploadOptions::try_from(json!(["a", "b"])).unwrap();
        assert_eq!(options.get(0), Some(&json!("a")));
        assert_eq!(options.get(1), Some(&json!("b")));
    }

    #[test]
    fn test_from_invalid_value() {
        assert!(UploadOptions::try_from(json!(100)).is_err());
        assert!(UploadOptions::try_from(json!(true)).is_err());
        assert!(UploadOptions::try_from(Value::Null).is_err());
    }

    #[test]
    fn test_set_replaces_in_place() {
        let mut options: UploadOptions = [("foo", 1), ("bar", 2)].into_iter().collect();
        options.set("foo", 3);
        let keys: Vec<String> = options.iter().map(|(k, _)| k.to_string()).collect();
        assert_eq!(keys, vec!["foo", "bar"]);
        assert_eq!(options.get("foo"), Some(&json!(3)));
    }

    #[test]
    fn test_add_merges() {
        let mut options = UploadOptions::try_from(json!({"foo": "bar", "baz": "bat"})).unwrap();
        options.add([("foo", json!("new")), ("con", json!("coz"))]);

        assert_eq!(options.get("foo"), Some(&json!("new")));
        assert_eq!(options.get("baz"), Some(&json!("bat")));
        assert_eq!(options.get("con"), Some(&json!("coz")));
    }

    #[test]
    fn test_add_appends_positional_values() {
        let mut options = UploadOptions::try_from(json!(["a", "b"])).unwrap();
        options.add([(0, "c")]);

        assert_eq!(options.len(), 3);
        assert_eq!(options.get(2), Some(&json!("c")));
    }

    #[test]
    fn test_expect_helpers() {
        assert_eq!(expect_non_empty_str("dir", &json!("/tmp")).unwrap(), "/tmp");
        assert!(expect_non_empty_str("dir", &json!("")).is_err());
        assert!(expect_non_empty_str("dir", &json!(100)).is_err());

        assert_eq!(expect_mode("mode", &json!(0o700)).unwrap(), 0o700);
        assert!(expect_mode("mode", &json!("0700")).is_err());
        assert!(expect_mode("mode", &json!(-1)).is_err());
        assert!(matches!(
            expect_mode("mode", &json!(true)),
            Err(Error::InvalidOption { .. })
        ));
    }
}
