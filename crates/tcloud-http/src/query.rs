//! Query string and form body encoding.
//!
//! Keys and values are percent-encoded the way Node's `querystring.stringify`
//! does it: everything except ASCII alphanumerics and `-_.!~*'()` is encoded,
//! spaces become `%20`, and non-ASCII text is encoded as UTF-8.

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};

const QUERY_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Encode key/value pairs as `k1=v1&k2=v2`, in the order given.
///
/// # Examples
///
/// ```
/// use tcloud_http::query::encode_query;
///
/// let query = encode_query([("Name", "a b"), ("Filters.0", "x/y")]);
/// assert_eq!(query, "Name=a%20b&Filters.0=x%2Fy");
/// ```
#[must_use]
pub fn encode_query<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> String
where
    K: AsRef<str>,
    V: AsRef<str>,
{
    pairs
        .into_iter()
        .map(|(k, v)| {
            format!(
                "{}={}",
                utf8_percent_encode(k.as_ref(), QUERY_ENCODE_SET),
                utf8_percent_encode(v.as_ref(), QUERY_ENCODE_SET)
            )
        })
        .collect::<Vec<_>>()
        .join("&")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_should_return_empty_for_no_pairs() {
        assert_eq!(encode_query(Vec::<(&str, &str)>::new()), "");
    }

    #[test]
    fn test_should_keep_unreserved_characters() {
        assert_eq!(
            encode_query([("k", "AZaz09-_.!~*'()")]),
            "k=AZaz09-_.!~*'()"
        );
    }

    #[test]
    fn test_should_encode_reserved_characters() {
        assert_eq!(
            encode_query([("k", "a+b=c&d/e?f#g,h:i;j@k$l")]),
            "k=a%2Bb%3Dc%26d%2Fe%3Ff%23g%2Ch%3Ai%3Bj%40k%24l"
        );
        assert_eq!(encode_query([("Signature", "ab/c+d=")]), "Signature=ab%2Fc%2Bd%3D");
    }

    #[test]
    fn test_should_encode_non_ascii_as_utf8() {
        assert_eq!(encode_query([("Name", "云")]), "Name=%E4%BA%91");
    }

    #[test]
    fn test_should_preserve_pair_order() {
        assert_eq!(encode_query([("b", "1"), ("a", "2")]), "b=1&a=2");
    }
}
