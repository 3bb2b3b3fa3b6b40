//! Tuple keys with structural ordering.

use std::fmt;

use serde::{Deserialize, Serialize};

/// One segment of a key tuple.
///
/// The derived `Ord` gives the cross-type order bytes < string < integer
/// < boolean (variant order), with natural ordering within a type. All
/// that matters for the store is that the order is total and stable so
/// prefix ranges are contiguous.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum KeyPart {
    Bytes(Vec<u8>),
    Str(String),
    Int(i64),
    Bool(bool),
}

impl From<&str> for KeyPart {
    fn from(value: &str) -> Self {
        KeyPart::Str(value.to_string())
    }
}

impl From<String> for KeyPart {
    fn from(value: String) -> Self {
        KeyPart::Str(value)
    }
}

impl From<&String> for KeyPart {
    fn from(value: &String) -> Self {
        KeyPart::Str(value.clone())
    }
}

impl From<i64> for KeyPart {
    fn from(value: i64) -> Self {
        KeyPart::Int(value)
    }
}

impl From<bool> for KeyPart {
    fn from(value: bool) -> Self {
        KeyPart::Bool(value)
    }
}

impl From<Vec<u8>> for KeyPart {
    fn from(value: Vec<u8>) -> Self {
        KeyPart::Bytes(value)
    }
}

impl fmt::Display for KeyPart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyPart::Str(s) => write!(f, "{s}"),
            KeyPart::Int(i) => write!(f, "{i}"),
            KeyPart::Bool(b) => write!(f, "{b}"),
            KeyPart::Bytes(bytes) => {
                for byte in bytes {
                    write!(f, "{byte:02x}")?;
                }
                Ok(())
            }
        }
    }
}

/// A full key: an ordered tuple of [`KeyPart`]s.
///
/// Lexicographic ordering over the parts means every key extending a
/// prefix sorts into one contiguous range directly after that prefix,
/// which is what makes [`KvStore::list`](crate::KvStore::list) a cheap
/// range scan.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KvKey(pub Vec<KeyPart>);

impl KvKey {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Append a part, builder-style.
    pub fn push(mut self, part: impl Into<KeyPart>) -> Self {
        self.0.push(part.into());
        self
    }

    pub fn parts(&self) -> &[KeyPart] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// True when `prefix` matches this key's leading parts exactly.
    pub fn starts_with(&self, prefix: &KvKey) -> bool {
        self.0.len() >= prefix.0.len() && self.0[..prefix.0.len()] == prefix.0[..]
    }
}

impl<P: Into<KeyPart>, const N: usize> From<[P; N]> for KvKey {
    fn from(parts: [P; N]) -> Self {
        Self(parts.into_iter().map(Into::into).collect())
    }
}

impl fmt::Display for KvKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for part in &self.0 {
            if !first {
                write!(f, "/")?;
            }
            write!(f, "{part}")?;
            first = false;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_compare_structurally() {
        let a = KvKey::from(["cards", "info", "meta"]);
        let b = KvKey::from(["cards", "info", "meta"]);
        assert_eq!(a, b);

        let c = KvKey::from(["cards", "info", "data"]);
        assert_ne!(a, c);
    }

    #[test]
    fn prefix_extensions_sort_before_sibling_segments() {
        // ["cards","info",...] must form a contiguous range that ends
        // before ["cards","infoa"] starts.
        let prefix = KvKey::from(["cards", "info"]);
        let extension = KvKey::new().push("cards").push("info").push("zzz");
        let sibling = KvKey::from(["cards", "infoa"]);

        assert!(prefix < extension);
        assert!(extension < sibling);
        assert!(extension.starts_with(&prefix));
        assert!(!sibling.starts_with(&prefix));
    }

    #[test]
    fn mixed_part_types_have_total_order() {
        let bytes = KvKey::new().push(vec![0xffu8]);
        let string = KvKey::new().push("a");
        let int = KvKey::new().push(1i64);
        let boolean = KvKey::new().push(true);

        assert!(bytes < string);
        assert!(string < int);
        assert!(int < boolean);
    }

    #[test]
    fn serializes_as_plain_array() {
        let key = KvKey::new().push("cards").push("info").push(3i64);
        let value = serde_json::to_value(&key).unwrap();
        assert_eq!(value, serde_json::json!(["cards", "info", 3]));

        let back: KvKey = serde_json::from_value(value).unwrap();
        assert_eq!(back, key);
    }

    #[test]
    fn display_joins_parts() {
        let key = KvKey::from(["users", "abc"]);
        assert_eq!(key.to_string(), "users/abc");
    }
}
