//! # relievo-render
//!
//! The Relievo transform chain. Takes decoded video frames and produces
//! red/cyan anaglyph frames: depth estimation, stereo view synthesis, and
//! channel recombination. Single-threaded, CPU-only — every stage is a pure
//! per-frame function with no state carried across frames.

pub mod anaglyph;
pub mod depth;
pub mod image_loader;
pub mod pipeline;
pub mod stereo;
pub mod video_decoder;

pub use pipeline::process_frame;
pub use stereo::StereoPair;
pub use video_decoder::{FrameStream, VideoInfo};
