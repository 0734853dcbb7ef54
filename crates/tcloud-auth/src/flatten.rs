//! Parameter tree normalization.
//!
//! The two signing schemes clean the parameter tree differently, and the
//! difference is observable on the wire:
//!
//! - [`flatten`] (v1, and v3 GET query strings) collapses the tree into dotted
//!   keys such as `Filters.0.Values.1`, dropping both [`Value::Null`] and
//!   [`Value::Absent`] at every depth.
//! - [`remove_nulls`] (v3) keeps the tree shape and drops only explicit
//!   [`Value::Null`] map entries. Absent fields survive and list elements are
//!   never removed.

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use indexmap::IndexMap;
use tracing::warn;

use crate::value::{Scalar, Value};

/// Flattened parameters: dotted key to scalar, in depth-first traversal order.
pub type FlatParams = IndexMap<String, Scalar>;

/// Flatten a parameter tree into dotted-path scalar pairs.
///
/// Lists are treated as maps keyed by index. Byte blobs become base64 strings.
/// A scalar at the root has no key and yields nothing.
///
/// # Examples
///
/// ```
/// use tcloud_auth::flatten::flatten;
/// use tcloud_auth::value::Value;
///
/// let params = Value::map()
///     .with("InstanceIds", Value::List(vec!["ins-1".into(), "ins-2".into()]))
///     .with("Limit", 10_u64);
/// let flat = flatten(&params);
/// let keys: Vec<&str> = flat.keys().map(String::as_str).collect();
/// assert_eq!(keys, ["InstanceIds.0", "InstanceIds.1", "Limit"]);
/// ```
#[must_use]
pub fn flatten(tree: &Value) -> FlatParams {
    let mut out = FlatParams::new();
    flatten_into(tree, "", &mut out);
    out
}

fn flatten_into(node: &Value, prefix: &str, out: &mut FlatParams) {
    match node {
        Value::Map(fields) => {
            for (key, child) in fields {
                flatten_child(child, format!("{prefix}{key}"), out);
            }
        }
        Value::List(items) => {
            for (index, child) in items.iter().enumerate() {
                flatten_child(child, format!("{prefix}{index}"), out);
            }
        }
        _ => {}
    }
}

fn flatten_child(child: &Value, key: String, out: &mut FlatParams) {
    match child {
        Value::Null | Value::Absent => {}
        Value::Map(_) | Value::List(_) => flatten_into(child, &format!("{key}."), out),
        Value::Scalar(scalar) => {
            out.insert(key, scalar.clone());
        }
        Value::Bytes(bytes) => {
            out.insert(key, Scalar::String(BASE64.encode(bytes)));
        }
        Value::Stream(_) => {
            warn!(key = %key, "skipping unread byte stream while flattening parameters");
        }
    }
}

/// Drop explicit null map entries at every depth, keeping the tree shape.
///
/// # Examples
///
/// ```
/// use tcloud_auth::flatten::remove_nulls;
/// use tcloud_auth::value::Value;
///
/// let tree = Value::map().with("a", Value::Null).with("b", Value::Absent);
/// let cleaned = remove_nulls(tree);
/// assert_eq!(cleaned, Value::map().with("b", Value::Absent));
/// ```
#[must_use]
pub fn remove_nulls(tree: Value) -> Value {
    match tree {
        Value::Map(fields) => Value::Map(
            fields
                .into_iter()
                .filter(|(_, v)| !v.is_null())
                .map(|(k, v)| (k, remove_nulls(v)))
                .collect(),
        ),
        Value::List(items) => Value::List(items.into_iter().map(remove_nulls).collect()),
        other => other,
    }
}
