//! Stream materialization.
//!
//! Both signing schemes hash the final payload bytes, so any
//! [`Value::Stream`] in the parameter tree is drained into a [`Value::Bytes`]
//! buffer before canonicalization. This is the only step of signing that
//! suspends. A stream that never ends blocks the call; callers that need a
//! deadline wrap the future in `tokio::time::timeout`.
//!
//! The tree is taken by value and a new tree is returned, so a parameter tree
//! cannot be shared between two concurrent signing calls.

use bytes::Bytes;
use futures::FutureExt;
use futures::future::BoxFuture;
use indexmap::IndexMap;
use tokio::io::AsyncReadExt;
use tracing::debug;

use crate::error::{AuthError, AuthResult};
use crate::value::{ByteStream, Value};

/// Drain every byte stream in `tree`, at any depth, into an in-memory buffer.
///
/// `limit` caps the size of each individual stream.
///
/// # Errors
///
/// Returns [`AuthError::StreamRead`] if a stream fails, or
/// [`AuthError::StreamTooLarge`] if a stream yields more than `limit` bytes.
pub async fn materialize(tree: Value, limit: Option<u64>) -> AuthResult<Value> {
    materialize_node(tree, String::new(), limit).await
}

fn materialize_node(
    node: Value,
    path: String,
    limit: Option<u64>,
) -> BoxFuture<'static, AuthResult<Value>> {
    async move {
        match node {
            Value::Stream(stream) => {
                let buffer = read_stream(stream, limit).await?;
                debug!(field = %path, bytes = buffer.len(), "materialized byte stream");
                Ok(Value::Bytes(buffer))
            }
            Value::Map(fields) => {
                let mut out = IndexMap::with_capacity(fields.len());
                for (key, child) in fields {
                    let child_path = join_path(&path, &key);
                    out.insert(key, materialize_node(child, child_path, limit).await?);
                }
                Ok(Value::Map(out))
            }
            Value::List(items) => {
                let mut out = Vec::with_capacity(items.len());
                for (index, child) in items.into_iter().enumerate() {
                    let child_path = join_path(&path, &index.to_string());
                    out.push(materialize_node(child, child_path, limit).await?);
                }
                Ok(Value::List(out))
            }
            other => Ok(other),
        }
    }
    .boxed()
}

async fn read_stream(stream: ByteStream, limit: Option<u64>) -> AuthResult<Bytes> {
    let mut buffer = Vec::new();
    match limit {
        Some(limit) => {
            // Read one byte past the limit to tell "exactly at" from "over".
            let mut reader = stream.into_reader().take(limit.saturating_add(1));
            reader.read_to_end(&mut buffer).await?;
            if buffer.len() as u64 > limit {
                return Err(AuthError::StreamTooLarge { limit });
            }
        }
        None => {
            stream.into_reader().read_to_end(&mut buffer).await?;
        }
    }
    Ok(Bytes::from(buffer))
}

fn join_path(prefix: &str, key: &str) -> String {
    if prefix.is_empty() {
        key.to_owned()
    } else {
        format!("{prefix}.{key}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_should_replace_streams_with_bytes() {
        let tree = Value::map()
            .with("Name", "photo.png")
            .with("File", ByteStream::new(&b"\x89PNG"[..]));

        let result = materialize(tree, None).await.unwrap();
        let expected = Value::map()
            .with("Name", "photo.png")
            .with("File", Bytes::from_static(b"\x89PNG"));
        assert_eq!(result, expected);
    }

    #[tokio::test]
    async fn test_should_materialize_nested_streams() {
        let tree = Value::map().with(
            "Parts",
            Value::List(vec![Value::map().with("Body", ByteStream::new(&b"abc"[..]))]),
        );

        let result = materialize(tree, None).await.unwrap();
        let expected = Value::map().with(
            "Parts",
            Value::List(vec![Value::map().with("Body", Bytes::from_static(b"abc"))]),
        );
        assert_eq!(result, expected);
    }

    #[tokio::test]
    async fn test_should_leave_trees_without_streams_unchanged() {
        let build = || {
            Value::map()
                .with("a", 1_u64)
                .with("b", Value::Null)
                .with("c", Value::Absent)
        };
        let result = materialize(build(), Some(0)).await.unwrap();
        assert_eq!(result, build());
    }

    #[tokio::test]
    async fn test_should_accept_stream_exactly_at_limit() {
        let tree = Value::map().with("File", ByteStream::new(&b"1234"[..]));
        let result = materialize(tree, Some(4)).await.unwrap();
        assert_eq!(result, Value::map().with("File", Bytes::from_static(b"1234")));
    }

    #[tokio::test]
    async fn test_should_reject_stream_over_limit() {
        let tree = Value::map().with("File", ByteStream::new(&b"12345"[..]));
        let result = materialize(tree, Some(4)).await;
        assert!(matches!(result, Err(AuthError::StreamTooLarge { limit: 4 })));
    }
}
