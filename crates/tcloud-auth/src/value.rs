//! The parameter tree shared by both signing schemes.
//!
//! API parameters arrive as arbitrarily nested maps and lists. [`Value`] is the
//! closed set of shapes a parameter can take; every traversal in this crate
//! (flattening, null removal, stream materialization, payload hashing) matches
//! over these variants instead of inspecting types at runtime.
//!
//! Maps keep insertion order. The v3 payload hash is computed over the JSON
//! serialization of the tree, so the order fields were inserted in is part of
//! the signed bytes.

use std::fmt;
use std::pin::Pin;

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use bytes::Bytes;
use indexmap::IndexMap;
use serde::ser::{Error as _, SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};
use tokio::io::AsyncRead;

/// A leaf parameter value.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    /// String value.
    String(String),
    /// Numeric value.
    Number(serde_json::Number),
    /// Boolean value.
    Bool(bool),
}

impl Scalar {
    /// Render the scalar the way it appears in a v1 sign source and query string.
    ///
    /// Floats follow JavaScript number formatting: integral values print without
    /// a fractional part (`3.0` becomes `3`), and magnitudes of `1e21` and above
    /// or below `1e-6` use exponent notation (`1e+21`, `1.5e-7`).
    ///
    /// # Examples
    ///
    /// ```
    /// use tcloud_auth::value::Scalar;
    ///
    /// assert_eq!(Scalar::Bool(true).to_param_string(), "true");
    /// assert_eq!(Scalar::from(20_u64).to_param_string(), "20");
    /// ```
    #[must_use]
    pub fn to_param_string(&self) -> String {
        match self {
            Self::String(s) => s.clone(),
            Self::Bool(b) => b.to_string(),
            Self::Number(n) => {
                if let Some(i) = n.as_i64() {
                    i.to_string()
                } else if let Some(u) = n.as_u64() {
                    u.to_string()
                } else {
                    n.as_f64().map_or_else(|| n.to_string(), format_float)
                }
            }
        }
    }
}

fn format_float(f: f64) -> String {
    let magnitude = f.abs();
    if f == 0.0 {
        "0".to_owned()
    } else if magnitude >= 1e21 || magnitude < 1e-6 {
        let exp = format!("{f:e}");
        match exp.split_once('e') {
            Some((mantissa, power)) if !power.starts_with('-') => format!("{mantissa}e+{power}"),
            _ => exp,
        }
    } else {
        f.to_string()
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_param_string())
    }
}

impl From<&str> for Scalar {
    fn from(value: &str) -> Self {
        Self::String(value.to_owned())
    }
}

impl From<String> for Scalar {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<bool> for Scalar {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for Scalar {
    fn from(value: i64) -> Self {
        Self::Number(value.into())
    }
}

impl From<u64> for Scalar {
    fn from(value: u64) -> Self {
        Self::Number(value.into())
    }
}

impl From<i32> for Scalar {
    fn from(value: i32) -> Self {
        Self::Number(value.into())
    }
}

impl From<u32> for Scalar {
    fn from(value: u32) -> Self {
        Self::Number(value.into())
    }
}

impl Serialize for Scalar {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::String(s) => serializer.serialize_str(s),
            Self::Number(n) => n.serialize(serializer),
            Self::Bool(b) => serializer.serialize_bool(*b),
        }
    }
}

/// An open, not yet consumed byte stream (for example a file being uploaded).
///
/// Streams cannot be hashed or serialized. They must be drained with
/// [`materialize`](crate::materialize::materialize) before signing.
pub struct ByteStream {
    reader: Pin<Box<dyn AsyncRead + Send>>,
}

impl ByteStream {
    /// Wrap any async reader.
    pub fn new(reader: impl AsyncRead + Send + 'static) -> Self {
        Self {
            reader: Box::pin(reader),
        }
    }

    pub(crate) fn into_reader(self) -> Pin<Box<dyn AsyncRead + Send>> {
        self.reader
    }
}

impl fmt::Debug for ByteStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ByteStream").finish_non_exhaustive()
    }
}

/// A request parameter tree.
#[derive(Debug)]
pub enum Value {
    /// Explicit null.
    Null,
    /// A field that is present in the tree but carries no value.
    ///
    /// The v1 flattener drops it like [`Value::Null`]; v3 null removal keeps it,
    /// and JSON serialization omits it from maps.
    Absent,
    /// String, number, or boolean leaf.
    Scalar(Scalar),
    /// Binary blob.
    Bytes(Bytes),
    /// Unread byte stream.
    Stream(ByteStream),
    /// Ordered list.
    List(Vec<Value>),
    /// Map preserving insertion order.
    Map(IndexMap<String, Value>),
}

impl Value {
    /// Create an empty map.
    #[must_use]
    pub fn map() -> Self {
        Self::Map(IndexMap::new())
    }

    /// Insert a field, turning `self` into a map if it is not one already.
    ///
    /// # Examples
    ///
    /// ```
    /// use tcloud_auth::value::Value;
    ///
    /// let params = Value::map().with("Limit", 10_u64).with("Offset", 0_u64);
    /// assert_eq!(params.as_map().map(indexmap::IndexMap::len), Some(2));
    /// ```
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        if !matches!(self, Self::Map(_)) {
            self = Self::map();
        }
        if let Self::Map(map) = &mut self {
            map.insert(key.into(), value.into());
        }
        self
    }

    /// Returns the map if this is a `Map` variant.
    #[must_use]
    pub fn as_map(&self) -> Option<&IndexMap<String, Value>> {
        match self {
            Self::Map(m) => Some(m),
            _ => None,
        }
    }

    /// Returns `true` for [`Value::Null`].
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// A short name for the variant, used in error messages.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Absent => "absent",
            Self::Scalar(Scalar::String(_)) => "string",
            Self::Scalar(Scalar::Number(_)) => "number",
            Self::Scalar(Scalar::Bool(_)) => "bool",
            Self::Bytes(_) => "bytes",
            Self::Stream(_) => "stream",
            Self::List(_) => "list",
            Self::Map(_) => "map",
        }
    }
}

impl PartialEq for Value {
    /// Streams never compare equal, not even to themselves.
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Null, Self::Null) | (Self::Absent, Self::Absent) => true,
            (Self::Scalar(a), Self::Scalar(b)) => a == b,
            (Self::Bytes(a), Self::Bytes(b)) => a == b,
            (Self::List(a), Self::List(b)) => a == b,
            (Self::Map(a), Self::Map(b)) => a == b,
            _ => false,
        }
    }
}

macro_rules! impl_from_scalar {
    ($($ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for Value {
                fn from(value: $ty) -> Self {
                    Self::Scalar(value.into())
                }
            }
        )*
    };
}

impl_from_scalar!(&str, String, bool, i32, u32, i64, u64, Scalar);

impl From<Bytes> for Value {
    fn from(value: Bytes) -> Self {
        Self::Bytes(value)
    }
}

impl From<ByteStream> for Value {
    fn from(value: ByteStream) -> Self {
        Self::Stream(value)
    }
}

impl From<Vec<Value>> for Value {
    fn from(value: Vec<Value>) -> Self {
        Self::List(value)
    }
}

impl From<IndexMap<String, Value>> for Value {
    fn from(value: IndexMap<String, Value>) -> Self {
        Self::Map(value)
    }
}

impl From<Option<Value>> for Value {
    fn from(value: Option<Value>) -> Self {
        value.unwrap_or(Self::Absent)
    }
}

impl From<serde_json::Value> for Value {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Self::Null,
            serde_json::Value::Bool(b) => Self::Scalar(Scalar::Bool(b)),
            serde_json::Value::Number(n) => Self::Scalar(Scalar::Number(n)),
            serde_json::Value::String(s) => Self::Scalar(Scalar::String(s)),
            serde_json::Value::Array(items) => {
                Self::List(items.into_iter().map(Into::into).collect())
            }
            serde_json::Value::Object(fields) => {
                Self::Map(fields.into_iter().map(|(k, v)| (k, v.into())).collect())
            }
        }
    }
}

impl<K: Into<String>> FromIterator<(K, Value)> for Value {
    fn from_iter<I: IntoIterator<Item = (K, Value)>>(iter: I) -> Self {
        Self::Map(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Null | Self::Absent => serializer.serialize_none(),
            Self::Scalar(s) => s.serialize(serializer),
            Self::Bytes(b) => serializer.serialize_str(&BASE64.encode(b)),
            Self::Stream(_) => Err(S::Error::custom("cannot serialize an unread byte stream")),
            Self::List(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Self::Map(fields) => {
                let mut map = serializer.serialize_map(None)?;
                for (key, value) in fields {
                    if matches!(value, Self::Absent) {
                        continue;
                    }
                    map.serialize_entry(key, value)?;
                }
                map.end()
            }
        }
    }
}
