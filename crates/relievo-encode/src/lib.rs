//! # relievo-encode
//!
//! Encoding module — converts raw FrameBuffers to encoded video files by
//! shelling out to FFmpeg, one frame at a time, and optionally mirrors the
//! stream to an ffplay preview window.

pub mod ffmpeg;
pub mod preview;

pub use ffmpeg::FfmpegSink;
pub use preview::PreviewWindow;
