//! Live preview window.
//! Mirrors the output frame stream to an `ffplay` subprocess so the user
//! can watch the anaglyph while it encodes. Strictly optional: the
//! conversion never depends on the preview staying alive.

use std::io::Write;
use std::process::{Child, ChildStdin, Command, Stdio};

use relievo_core::frame::{FrameBuffer, PixelFormat};
use relievo_core::RelievoError;

/// An on-screen preview backed by an ffplay subprocess reading raw frames.
pub struct PreviewWindow {
    child: Option<Child>,
    stdin: Option<ChildStdin>,
    width: u32,
    height: u32,
}

impl PreviewWindow {
    /// Check if ffplay is available on the system.
    pub fn is_available() -> bool {
        Command::new("ffplay")
            .arg("-version")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map(|s| s.success())
            .unwrap_or(false)
    }

    /// Open a preview window for frames of the given shape.
    pub fn open(width: u32, height: u32, fps: f64, title: &str) -> Result<Self, RelievoError> {
        if width == 0 || height == 0 {
            return Err(RelievoError::Preview(format!(
                "cannot preview zero-sized frames ({}x{})",
                width, height
            )));
        }

        if !Self::is_available() {
            return Err(RelievoError::Preview(
                "ffplay not found in PATH. Install FFmpeg: https://ffmpeg.org/download.html"
                    .into(),
            ));
        }

        let mut child = Command::new("ffplay")
            .args([
                "-loglevel", "error",
                "-f", "rawvideo",
                "-pixel_format", "rgb24",
                "-video_size", &format!("{}x{}", width, height),
                "-framerate", &format!("{}", fps),
                "-window_title", title,
                "-i", "-",
            ])
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| RelievoError::Preview(format!("failed to start ffplay: {}", e)))?;

        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| RelievoError::Preview("failed to open ffplay stdin".into()))?;

        Ok(Self {
            child: Some(child),
            stdin: Some(stdin),
            width,
            height,
        })
    }

    /// Push one frame to the window.
    ///
    /// Fails if the window was closed by the user (broken pipe); callers
    /// should treat that as "preview gone", not as a conversion failure.
    pub fn write_frame(&mut self, frame: &FrameBuffer) -> Result<(), RelievoError> {
        if frame.width != self.width || frame.height != self.height {
            return Err(RelievoError::Preview(format!(
                "preview frame is {}x{}, expected {}x{}",
                frame.width, frame.height, self.width, self.height
            )));
        }
        if frame.format != PixelFormat::Rgb8 {
            return Err(RelievoError::Preview(format!(
                "preview expects Rgb8 frames, got {:?}",
                frame.format
            )));
        }

        let stdin = self
            .stdin
            .as_mut()
            .ok_or_else(|| RelievoError::Preview("preview already closed".into()))?;

        stdin
            .write_all(&frame.data)
            .map_err(|e| RelievoError::Preview(format!("preview window closed: {}", e)))
    }

    /// Close the window.
    pub fn close(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        drop(self.stdin.take());
        if let Some(mut child) = self.child.take() {
            let _ = child.kill();
            let _ = child.wait();
        }
    }
}

impl Drop for PreviewWindow {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ffplay_availability_does_not_panic() {
        let _ = PreviewWindow::is_available();
    }

    #[test]
    fn test_open_rejects_zero_dimensions() {
        let result = PreviewWindow::open(0, 240, 30.0, "relievo");
        assert!(result.is_err());
    }
}
