//! Type-safe launch settings and daemon addresses.

use std::fmt;
use std::net::SocketAddr;

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Default address of the hsd HTTP API.
pub const DEFAULT_API_ADDR: &str = "localhost:5580";

/// Newtype for `host:port` daemon addresses to prevent string mixups.
///
/// No validation is performed; a malformed address surfaces as a transport
/// error once a request is made.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Address(pub String);

impl Address {
    /// Create a new Address from a string.
    pub fn new(addr: impl Into<String>) -> Self {
        Address(addr.into())
    }

    /// Get the address as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Full URL for `path` on this address.
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.0, path)
    }
}

impl Default for Address {
    fn default() -> Self {
        Address(DEFAULT_API_ADDR.to_string())
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for Address {
    fn from(s: String) -> Self {
        Address(s)
    }
}

impl From<&str> for Address {
    fn from(s: &str) -> Self {
        Address(s.to_string())
    }
}

impl From<&Address> for Address {
    fn from(addr: &Address) -> Self {
        addr.clone()
    }
}

impl From<SocketAddr> for Address {
    fn from(addr: SocketAddr) -> Self {
        Address(addr.to_string())
    }
}

impl AsRef<str> for Address {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Value of a single hsd command-line setting.
///
/// `Disabled` keeps a flag off the command line entirely, which is how
/// default-on flags are switched off.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SettingValue {
    /// Rendered as `--key=value`.
    Value(String),
    /// Omitted from the command line.
    Disabled,
}

impl SettingValue {
    /// Check whether the flag is omitted.
    pub fn is_disabled(&self) -> bool {
        matches!(self, SettingValue::Disabled)
    }

    /// Get the rendered value, if any.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            SettingValue::Value(v) => Some(v),
            SettingValue::Disabled => None,
        }
    }
}

impl From<bool> for SettingValue {
    fn from(enabled: bool) -> Self {
        if enabled {
            SettingValue::Value("true".to_string())
        } else {
            SettingValue::Disabled
        }
    }
}

impl From<String> for SettingValue {
    fn from(s: String) -> Self {
        SettingValue::Value(s)
    }
}

impl From<&str> for SettingValue {
    fn from(s: &str) -> Self {
        SettingValue::Value(s.to_string())
    }
}

impl From<u16> for SettingValue {
    fn from(n: u16) -> Self {
        SettingValue::Value(n.to_string())
    }
}

impl From<u32> for SettingValue {
    fn from(n: u32) -> Self {
        SettingValue::Value(n.to_string())
    }
}

impl From<u64> for SettingValue {
    fn from(n: u64) -> Self {
        SettingValue::Value(n.to_string())
    }
}

/// Raw shapes accepted when deserializing a setting.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawSettingValue {
    Flag(bool),
    Text(String),
    Integer(i64),
    Float(f64),
}

impl From<RawSettingValue> for SettingValue {
    fn from(raw: RawSettingValue) -> Self {
        match raw {
            RawSettingValue::Flag(b) => b.into(),
            RawSettingValue::Text(s) => SettingValue::Value(s),
            RawSettingValue::Integer(n) => SettingValue::Value(n.to_string()),
            RawSettingValue::Float(n) => SettingValue::Value(n.to_string()),
        }
    }
}

impl<'de> Deserialize<'de> for SettingValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        RawSettingValue::deserialize(deserializer).map(Into::into)
    }
}

impl Serialize for SettingValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            SettingValue::Value(v) => serializer.serialize_str(v),
            SettingValue::Disabled => serializer.serialize_bool(false),
        }
    }
}

/// Insertion-ordered map of hsd flag names to values.
///
/// Setting an existing key replaces its value in place, so merged settings
/// keep the order of the defaults followed by any new keys.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Settings {
    entries: IndexMap<String, SettingValue>,
}

impl Settings {
    /// Create an empty settings map.
    pub fn new() -> Self {
        Self::default()
    }

    /// The flags hsd is launched with when the caller overrides nothing.
    pub fn defaults() -> Self {
        Settings::new()
            .with("api-addr", DEFAULT_API_ADDR)
            .with("host-addr", ":5582")
            .with("rpc-addr", ":5581")
            .with("authenticate-api", false)
            .with("disable-api-security", false)
    }

    /// Builder-style [`set`](Self::set).
    pub fn with(mut self, key: impl Into<String>, value: impl Into<SettingValue>) -> Self {
        self.set(key, value);
        self
    }

    /// Set a key, replacing any existing value without moving it.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<SettingValue>) {
        self.entries.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&SettingValue> {
        self.entries.get(key)
    }

    /// Check whether a key is present (disabled keys included).
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Remove a key, keeping the order of the rest.
    pub fn remove(&mut self, key: &str) -> Option<SettingValue> {
        self.entries.shift_remove(key)
    }

    /// Overlay `overrides` on top of these settings, key by key.
    pub fn merge(&mut self, overrides: Settings) {
        self.entries.extend(overrides.entries);
    }

    /// [`defaults`](Self::defaults) merged with `overrides`.
    pub fn merged_with_defaults(overrides: Settings) -> Self {
        let mut settings = Self::defaults();
        settings.merge(overrides);
        settings
    }

    /// Iterate over entries in order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &SettingValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for Settings
where
    K: Into<String>,
    V: Into<SettingValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Settings {
            entries: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }
}

impl IntoIterator for Settings {
    type Item = (String, SettingValue);
    type IntoIter = indexmap::map::IntoIter<String, SettingValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}
