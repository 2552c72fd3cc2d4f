//! Content hashing for deterministic conversion verification.
//!
//! Produces a SHA-256 hash of frame buffer data, enabling bit-exact
//! output verification across platforms and runs.

use sha2::{Digest, Sha256};

use crate::frame::FrameBuffer;

/// A content hash digest (SHA-256, 32 bytes).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ContentHash {
    bytes: [u8; 32],
}

impl ContentHash {
    /// Create from raw bytes.
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self { bytes }
    }

    /// Get the hash as a hex string.
    pub fn to_hex(&self) -> String {
        self.bytes.iter().map(|b| format!("{:02x}", b)).collect()
    }

    /// Get the raw bytes.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.bytes
    }
}

impl std::fmt::Display for ContentHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

/// Compute the content hash of a single frame buffer.
pub fn hash_frame(frame: &FrameBuffer) -> ContentHash {
    let mut hasher = FrameHasher::new();
    hasher.update(frame);
    hasher.finalize()
}

/// Incremental hasher over a sequence of frames.
///
/// The conversion loop is streaming, so frames are folded in one at a time
/// as they are written rather than collected and hashed at the end. The
/// frame count and each frame's dimensions and format are included so that
/// different-shaped outputs with identical pixel bytes hash differently.
pub struct FrameHasher {
    hasher: Sha256,
    count: u64,
}

impl FrameHasher {
    pub fn new() -> Self {
        Self {
            hasher: Sha256::new(),
            count: 0,
        }
    }

    /// Fold one frame into the digest.
    pub fn update(&mut self, frame: &FrameBuffer) {
        self.hasher.update(frame.width.to_le_bytes());
        self.hasher.update(frame.height.to_le_bytes());
        self.hasher.update([frame.format as u8]);
        self.hasher.update(&frame.data);
        self.count += 1;
    }

    /// Number of frames folded in so far.
    pub fn frame_count(&self) -> u64 {
        self.count
    }

    /// Finish the digest, sealing it with the frame count.
    pub fn finalize(mut self) -> ContentHash {
        self.hasher.update(self.count.to_le_bytes());
        let result = self.hasher.finalize();
        let mut bytes = [0u8; 32];
        bytes.copy_from_slice(&result);
        ContentHash::from_bytes(bytes)
    }
}

impl Default for FrameHasher {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_deterministic() {
        let frame1 = FrameBuffer::solid(10, 10, [255, 0, 0]);
        let frame2 = FrameBuffer::solid(10, 10, [255, 0, 0]);
        assert_eq!(hash_frame(&frame1), hash_frame(&frame2));
    }

    #[test]
    fn test_hash_different_content() {
        let frame1 = FrameBuffer::solid(10, 10, [255, 0, 0]);
        let frame2 = FrameBuffer::solid(10, 10, [0, 0, 255]);
        assert_ne!(hash_frame(&frame1), hash_frame(&frame2));
    }

    #[test]
    fn test_hash_different_size() {
        let frame1 = FrameBuffer::solid(10, 10, [255, 0, 0]);
        let frame2 = FrameBuffer::solid(20, 20, [255, 0, 0]);
        assert_ne!(hash_frame(&frame1), hash_frame(&frame2));
    }

    #[test]
    fn test_hash_sequence_deterministic() {
        let frames = [
            FrameBuffer::solid(4, 4, [255, 0, 0]),
            FrameBuffer::solid(4, 4, [0, 255, 0]),
            FrameBuffer::solid(4, 4, [0, 0, 255]),
        ];
        let mut h1 = FrameHasher::new();
        let mut h2 = FrameHasher::new();
        for f in &frames {
            h1.update(f);
            h2.update(f);
        }
        assert_eq!(h1.frame_count(), 3);
        assert_eq!(h1.finalize(), h2.finalize());
    }

    #[test]
    fn test_hash_sequence_order_matters() {
        let a = FrameBuffer::solid(4, 4, [255, 0, 0]);
        let b = FrameBuffer::solid(4, 4, [0, 255, 0]);
        let mut h1 = FrameHasher::new();
        h1.update(&a);
        h1.update(&b);
        let mut h2 = FrameHasher::new();
        h2.update(&b);
        h2.update(&a);
        assert_ne!(h1.finalize(), h2.finalize());
    }

    #[test]
    fn test_hash_hex_format() {
        let frame = FrameBuffer::solid(2, 2, [0, 0, 0]);
        let hash = hash_frame(&frame);
        let hex = hash.to_hex();
        assert_eq!(hex.len(), 64); // SHA-256 = 64 hex chars
        assert!(hex.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_hash_display() {
        let frame = FrameBuffer::solid(2, 2, [0, 0, 0]);
        let hash = hash_frame(&frame);
        assert_eq!(format!("{}", hash), hash.to_hex());
    }
}
