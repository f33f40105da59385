//! Buffer management for raw video data

use bytes::Bytes;

/// A reference-counted, immutable buffer holding a raw video payload.
///
/// A parsed stream keeps a handle to the buffer it was indexed from, so the
/// plane views it hands out can never outlive the underlying bytes. Cloning
/// only bumps a reference count.
#[derive(Debug, Clone)]
pub struct Buffer {
    data: Bytes,
}

impl Buffer {
    /// Create a new buffer from bytes
    pub fn new(data: Bytes) -> Self {
        Buffer { data }
    }

    /// Create a buffer from a vector
    pub fn from_vec(vec: Vec<u8>) -> Self {
        Buffer {
            data: Bytes::from(vec),
        }
    }

    /// Create a buffer borrowing a static byte string
    pub fn from_static(bytes: &'static [u8]) -> Self {
        Buffer {
            data: Bytes::from_static(bytes),
        }
    }

    /// Create an empty buffer
    pub fn empty() -> Self {
        Buffer { data: Bytes::new() }
    }

    /// Get the length of the buffer
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Check if the buffer is empty
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Get a slice of the buffer data
    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }

    /// Get the underlying bytes
    pub fn as_bytes(&self) -> &Bytes {
        &self.data
    }
}

impl From<Vec<u8>> for Buffer {
    fn from(vec: Vec<u8>) -> Self {
        Buffer::from_vec(vec)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_buffer_creation() {
        let buf = Buffer::from_vec(vec![1, 2, 3, 4]);
        assert_eq!(buf.len(), 4);
        assert_eq!(buf.as_slice(), &[1, 2, 3, 4]);
    }

    #[test]
    fn test_buffer_empty() {
        let buf = Buffer::empty();
        assert!(buf.is_empty());
        assert_eq!(buf.len(), 0);
    }

    #[test]
    fn test_buffer_clone_shares_bytes() {
        let buf = Buffer::from_static(b"YUV4MPEG2");
        let clone = buf.clone();
        assert_eq!(buf.as_slice(), clone.as_slice());
        assert_eq!(buf.as_bytes().as_ptr(), clone.as_bytes().as_ptr());
    }
}
