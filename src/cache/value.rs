//! Cache Value Module
//!
//! Defines what the LRU cache can store and the immutable byte handle
//! groups hand out to callers.

use std::fmt;

use bytes::Bytes;

// == Value ==
/// Anything storable in an [`LruCache`](crate::cache::LruCache).
///
/// The cache only needs to know how many bytes a value accounts for.
/// The reported size is trusted: a value that misreports it skews the
/// byte budget but never breaks the cache.
pub trait Value {
    /// Size of the value in bytes.
    fn len_bytes(&self) -> usize;
}

impl Value for String {
    fn len_bytes(&self) -> usize {
        self.len()
    }
}

impl Value for Vec<u8> {
    fn len_bytes(&self) -> usize {
        self.len()
    }
}

impl Value for Bytes {
    fn len_bytes(&self) -> usize {
        self.len()
    }
}

// == Byte View ==
/// Immutable view over cached bytes.
///
/// Cloning is cheap (reference counted), and nothing handed out can be
/// used to mutate what the cache holds.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct ByteView {
    bytes: Bytes,
}

impl ByteView {
    /// Creates a view over the given bytes.
    pub fn new(bytes: impl Into<Bytes>) -> Self {
        Self {
            bytes: bytes.into(),
        }
    }

    /// Borrows the underlying bytes.
    pub fn as_slice(&self) -> &[u8] {
        &self.bytes
    }

    /// Returns an owned copy of the bytes.
    pub fn byte_slice(&self) -> Vec<u8> {
        self.bytes.to_vec()
    }

    /// Returns the shared handle to the bytes, suitable for a response body.
    pub fn raw_bytes(&self) -> Bytes {
        self.bytes.clone()
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

impl Value for ByteView {
    fn len_bytes(&self) -> usize {
        self.bytes.len()
    }
}

impl From<Bytes> for ByteView {
    fn from(bytes: Bytes) -> Self {
        Self { bytes }
    }
}

impl From<Vec<u8>> for ByteView {
    fn from(bytes: Vec<u8>) -> Self {
        Self::new(bytes)
    }
}

impl From<String> for ByteView {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

impl From<&str> for ByteView {
    fn from(value: &str) -> Self {
        Self::new(Bytes::copy_from_slice(value.as_bytes()))
    }
}

impl fmt::Display for ByteView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&String::from_utf8_lossy(&self.bytes))
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_byte_view_len_matches_value_len() {
        let view = ByteView::from("630");
        assert_eq!(view.len(), 3);
        assert_eq!(view.len_bytes(), 3);
        assert!(!view.is_empty());
    }

    #[test]
    fn test_byte_slice_is_a_copy() {
        let view = ByteView::from("abc");
        let mut copy = view.byte_slice();
        copy[0] = b'z';

        assert_eq!(view.as_slice(), b"abc");
        assert_eq!(view.to_string(), "abc");
    }

    #[test]
    fn test_display_is_lossy_for_invalid_utf8() {
        let view = ByteView::from(vec![0x66, 0xff, 0x6f]);
        assert_eq!(view.to_string(), "f\u{fffd}o");
    }

    #[test]
    fn test_plain_types_report_their_length() {
        assert_eq!(String::from("hello").len_bytes(), 5);
        assert_eq!(vec![1u8, 2, 3].len_bytes(), 3);
        assert_eq!(Bytes::from_static(b"xy").len_bytes(), 2);
    }
}
