//! # relievo-core
//!
//! Core types and primitives for the Relievo anaglyph engine.
//! This crate contains the foundational types shared across all Relievo
//! crates: frame buffers, depth maps, error types, configuration, and
//! content hashing.

pub mod config;
pub mod error;
pub mod frame;
pub mod hash;

pub use config::RelievoConfig;
pub use error::{RelievoError, RelievoResult};
pub use frame::{DepthMap, FrameBuffer, PixelFormat};
pub use hash::{ContentHash, FrameHasher};
